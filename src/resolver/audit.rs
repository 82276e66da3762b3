use tracing::debug;

use crate::model::{AuditReport, OrdinalGap, PageRecord};

use super::config::AuditConfig;
use super::hierarchy::SectionTree;

/// Runs completeness and consistency checks over a resolved hierarchy and
/// the full page set. Every check is independent and non-fatal; findings
/// accumulate as warnings and never halt processing.
pub struct StructureAuditor {
    config: AuditConfig,
}

impl StructureAuditor {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    pub fn audit(&self, tree: &SectionTree, pages: &[PageRecord]) -> AuditReport {
        let mut warnings = Vec::new();
        let errors = Vec::new();

        warnings.extend(tree.structural_warnings().iter().cloned());

        let main_section_count = tree.main_section_count();
        if main_section_count < self.config.min_main_sections {
            warnings.push(format!(
                "only {} main section(s) found, expected at least {}",
                main_section_count, self.config.min_main_sections
            ));
        }

        let gaps = self.detect_section_gaps(tree);
        for gap in &gaps {
            warnings.push(format!(
                "large gap in TOC coverage: {} pages between section starts {} and {}",
                gap.gap_size, gap.after_ordinal, gap.before_ordinal
            ));
        }

        for keyword in &self.config.expected_keywords {
            let lowered = keyword.to_lowercase();
            let present = tree
                .nodes()
                .iter()
                .filter(|node| node.level == 1)
                .any(|node| node.entry.title.to_lowercase().contains(&lowered));
            if !present {
                warnings.push(format!(
                    "no main section title mentions expected keyword '{keyword}'"
                ));
            }
        }

        if let Some(warning) = self.check_page_numbering(pages) {
            warnings.push(warning);
        }

        // Policy threshold carried over verbatim: one warning is tolerated,
        // two or more mean the structure needs review.
        let is_complete = errors.is_empty() && warnings.len() <= 1;

        AuditReport {
            warnings,
            errors,
            gaps,
            main_section_count,
            total_entries: tree.nodes().len(),
            is_complete,
        }
    }

    fn detect_section_gaps(&self, tree: &SectionTree) -> Vec<OrdinalGap> {
        let mut starts: Vec<u32> = tree.nodes().iter().map(|node| node.range_start).collect();
        starts.sort_unstable();
        starts.dedup();

        starts
            .windows(2)
            .filter_map(|pair| {
                let gap_size = pair[1] - pair[0];
                if gap_size > self.config.gap_threshold {
                    Some(OrdinalGap {
                        after_ordinal: pair[0],
                        before_ordinal: pair[1],
                        gap_size,
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Scans canonical ordinals in physical order. A forward jump beyond the
    /// gap threshold suggests footer extraction dropped a numbering run; a
    /// negative jump is a numbering-scheme reset (Roman front matter giving
    /// way to Arabic body pages, or vice versa) and is not a finding.
    fn check_page_numbering(&self, pages: &[PageRecord]) -> Option<String> {
        let mut previous: Option<(u32, u32)> = None;
        let mut jumps = Vec::new();

        for page in pages {
            let Some(ordinal) = page.canonical_ordinal else {
                continue;
            };
            if let Some((previous_index, previous_ordinal)) = previous {
                if ordinal < previous_ordinal {
                    debug!(
                        physical_index = page.physical_index,
                        from = previous_ordinal,
                        to = ordinal,
                        "page numbering scheme reset"
                    );
                } else if ordinal - previous_ordinal > self.config.gap_threshold {
                    jumps.push(format!(
                        "{} -> {} (physical pages {} -> {})",
                        previous_ordinal, ordinal, previous_index, page.physical_index
                    ));
                }
            }
            previous = Some((page.physical_index, ordinal));
        }

        if jumps.is_empty() {
            None
        } else {
            Some(format!(
                "gaps in page numbering larger than {} pages: {}",
                self.config.gap_threshold,
                jumps.join(", ")
            ))
        }
    }
}
