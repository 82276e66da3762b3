use serde::{Deserialize, Serialize};

/// A claimed section heading parsed from one OCR'd TOC line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub title: String,
    /// Canonical page number, already normalized from Arabic or Roman text.
    pub ordinal: u32,
    /// Nesting depth derived from leading whitespace: 1 = main section.
    pub level: u32,
}

/// One physical page as supplied by the PDF text-extraction collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLabel {
    pub physical_index: u32,
    pub raw_label: Option<String>,
    pub header_text: Option<String>,
}

/// Per-page structural metadata, written exactly once by the page-index
/// build step and serialized for downstream collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub physical_index: u32,
    pub raw_label: Option<String>,
    pub canonical_ordinal: Option<u32>,
    pub section_title: Option<String>,
    /// 0 when the page has no parseable number or precedes the first section.
    pub section_level: u32,
    pub parent_section_title: Option<String>,
    pub header_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinalGap {
    pub after_ordinal: u32,
    pub before_ordinal: u32,
    pub gap_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub gaps: Vec<OrdinalGap>,
    pub main_section_count: usize,
    pub total_entries: usize,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputHash {
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveCounts {
    pub toc_passes: usize,
    pub toc_entries_parsed: usize,
    pub toc_entries_merged: usize,
    pub duplicates_discarded: usize,
    pub main_sections: usize,
    pub total_pages: usize,
    pub pages_with_labels: usize,
    pub pages_with_ordinals: usize,
    pub pages_with_sections: usize,
}

/// Run manifest written next to the resolver outputs so a later `status`
/// invocation can report what happened without re-running anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub generated_at: String,
    pub toc_inputs: Vec<InputHash>,
    pub page_labels_input: InputHash,
    pub counts: ResolveCounts,
    pub warnings: Vec<String>,
    pub is_complete: bool,
}
