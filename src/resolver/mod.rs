//! Document structure resolver: turns noisy OCR'd table-of-contents text and
//! per-page footer labels into a total, deterministic page-to-section
//! mapping. Data flows one way: raw TOC text -> parser -> merger ->
//! hierarchy builder -> page resolver -> auditor. Everything here is
//! immutable once constructed and does no I/O.

mod audit;
mod config;
mod hierarchy;
mod merge;
mod numerals;
mod page_index;
mod toc_parse;

pub use audit::StructureAuditor;
pub use config::{AuditConfig, IndentConfig, RomanTable};
pub use hierarchy::{ResolvedSection, SectionNode, SectionTree};
pub use merge::{MergedToc, merge_toc_passes};
pub use numerals::NumeralNormalizer;
pub use page_index::build_page_index;
pub use toc_parse::TocLineParser;
