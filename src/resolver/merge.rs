use std::collections::HashSet;

use crate::model::TocEntry;

#[derive(Debug, Clone)]
pub struct MergedToc {
    pub entries: Vec<TocEntry>,
    pub duplicates_discarded: usize,
}

/// Combines TOC entries from one or more OCR passes into a single
/// duplicate-free list sorted by ordinal.
///
/// Multi-page TOCs are captured as several screenshots whose OCR output can
/// overlap, so the same heading may arrive more than once, sometimes with
/// different casing. The first occurrence of a `(title, ordinal)` key wins;
/// the sort is stable so entries sharing an ordinal keep their reading order,
/// which matters when a section and its first subsection start on the same
/// page.
pub fn merge_toc_passes(passes: &[Vec<TocEntry>]) -> MergedToc {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    let mut duplicates_discarded = 0usize;

    for pass in passes {
        for entry in pass {
            let key = (entry.title.trim().to_lowercase(), entry.ordinal);
            if seen.insert(key) {
                entries.push(entry.clone());
            } else {
                duplicates_discarded += 1;
            }
        }
    }

    entries.sort_by_key(|entry| entry.ordinal);

    MergedToc {
        entries,
        duplicates_discarded,
    }
}
