use anyhow::{Result, bail};
use tracing::debug;

use crate::model::{PageLabel, PageRecord};

use super::hierarchy::SectionTree;
use super::numerals::NumeralNormalizer;

/// Builds the per-page structural metadata for the whole document.
///
/// Pages are a flat append-only array addressed by physical index; each
/// record is written exactly once here and read-only afterward. Downstream
/// stages (rasterization workers) key off `section_title`/`section_level`,
/// so this pass is the synchronization barrier before any fan-out.
pub fn build_page_index(
    tree: &SectionTree,
    normalizer: &NumeralNormalizer,
    labels: &[PageLabel],
) -> Result<Vec<PageRecord>> {
    let mut records = Vec::with_capacity(labels.len());

    for (offset, label) in labels.iter().enumerate() {
        let expected = offset as u32 + 1;
        if label.physical_index != expected {
            bail!(
                "physical page indices must be contiguous starting at 1: expected {}, got {}",
                expected,
                label.physical_index
            );
        }

        let canonical_ordinal = label
            .raw_label
            .as_deref()
            .and_then(|raw| normalizer.normalize(raw));

        let resolved = canonical_ordinal.and_then(|ordinal| tree.resolve(ordinal));
        if let (Some(ordinal), None) = (canonical_ordinal, &resolved) {
            debug!(
                physical_index = label.physical_index,
                ordinal, "page precedes the first declared section"
            );
        }

        let (section_title, section_level, parent_section_title) = match resolved {
            Some(section) => (Some(section.title), section.level, section.parent_title),
            None => (None, 0, None),
        };

        records.push(PageRecord {
            physical_index: label.physical_index,
            raw_label: label.raw_label.clone(),
            canonical_ordinal,
            section_title,
            section_level,
            parent_section_title,
            header_text: label.header_text.clone(),
        });
    }

    Ok(records)
}
