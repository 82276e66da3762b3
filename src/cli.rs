use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "cafrstrip",
    version,
    about = "CAFR document structure resolution tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse and merge OCR'd TOC text and print the hierarchy for review
    Toc(TocArgs),
    /// Resolve every physical page to its section and write the page index
    Resolve(ResolveArgs),
    /// Summarize the outputs of a previous resolve run
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ResolverTuning {
    /// Leading spaces at or beyond which a TOC line is a level-2 entry
    #[arg(long, default_value_t = 4)]
    pub level2_indent: usize,

    /// Leading spaces at or beyond which a TOC line is a level-3 entry
    #[arg(long, default_value_t = 8)]
    pub level3_indent: usize,

    /// Upper bound of the Roman numeral lookup table
    #[arg(long, default_value_t = 30)]
    pub roman_max: u32,

    /// Minimum number of main sections before the audit warns
    #[arg(long, default_value_t = 3)]
    pub min_main_sections: usize,

    /// Ordinal gap between section starts that triggers an audit warning
    #[arg(long, default_value_t = 100)]
    pub gap_threshold: u32,

    /// Keyword expected in at least one main section title (repeatable;
    /// defaults to the canonical CAFR sections when omitted)
    #[arg(long = "expected-keyword")]
    pub expected_keywords: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TocArgs {
    /// OCR'd TOC text file, one per screenshot, in reading order
    #[arg(long = "toc-text", required = true)]
    pub toc_texts: Vec<PathBuf>,

    /// Optional path for the merged entries as JSON
    #[arg(long)]
    pub entries_path: Option<PathBuf>,

    #[command(flatten)]
    pub tuning: ResolverTuning,
}

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// OCR'd TOC text file, one per screenshot, in reading order
    #[arg(long = "toc-text", required = true)]
    pub toc_texts: Vec<PathBuf>,

    /// JSON array of per-page footer labels from the PDF text extractor
    #[arg(long)]
    pub page_labels: PathBuf,

    /// Directory for the page index, audit report, text report and manifest
    #[arg(long, default_value = "out")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub tuning: ResolverTuning,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// Output directory of a previous resolve run
    #[arg(long, default_value = "out")]
    pub output_dir: PathBuf,
}
