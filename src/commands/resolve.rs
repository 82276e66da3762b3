use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::ResolveArgs;
use crate::commands::toc;
use crate::model::{
    AuditReport, InputHash, PageLabel, PageRecord, ResolveCounts, ResolveRunManifest,
};
use crate::resolver::{SectionTree, StructureAuditor, build_page_index};
use crate::util::{
    now_utc_string, sha256_file, utc_compact_string, write_json_pretty, write_text_file,
};

pub const PAGE_INDEX_FILE: &str = "page_index.json";
pub const AUDIT_REPORT_FILE: &str = "audit_report.json";
pub const TEXT_REPORT_FILE: &str = "resolve_report.txt";
pub const MANIFEST_FILE: &str = "resolve_manifest.json";

pub fn run(args: ResolveArgs) -> Result<()> {
    let parser = toc::build_parser(&args.tuning)?;
    let merged = toc::load_merged_toc(&parser, &args.toc_texts)?;
    let entries_parsed = merged.entries.len() + merged.duplicates_discarded;

    let tree = SectionTree::build(&merged.entries)?;
    info!(
        entries = merged.entries.len(),
        main_sections = tree.main_section_count(),
        "built section hierarchy"
    );

    let labels = load_page_labels(&args.page_labels)?;
    let pages = build_page_index(&tree, parser.normalizer(), &labels)?;

    let auditor = StructureAuditor::new(toc::audit_config(&args.tuning));
    let report = auditor.audit(&tree, &pages);
    for warning in &report.warnings {
        warn!(warning = %warning, "structure audit warning");
    }

    let counts = ResolveCounts {
        toc_passes: args.toc_texts.len(),
        toc_entries_parsed: entries_parsed,
        toc_entries_merged: merged.entries.len(),
        duplicates_discarded: merged.duplicates_discarded,
        main_sections: report.main_section_count,
        total_pages: pages.len(),
        pages_with_labels: pages.iter().filter(|page| page.raw_label.is_some()).count(),
        pages_with_ordinals: pages
            .iter()
            .filter(|page| page.canonical_ordinal.is_some())
            .count(),
        pages_with_sections: pages
            .iter()
            .filter(|page| page.section_title.is_some())
            .count(),
    };

    let mut toc_inputs = Vec::with_capacity(args.toc_texts.len());
    for path in &args.toc_texts {
        toc_inputs.push(InputHash {
            path: path.display().to_string(),
            sha256: sha256_file(path)?,
        });
    }

    let manifest = ResolveRunManifest {
        manifest_version: 1,
        run_id: format!("resolve-{}", utc_compact_string(Utc::now())),
        generated_at: now_utc_string(),
        toc_inputs,
        page_labels_input: InputHash {
            path: args.page_labels.display().to_string(),
            sha256: sha256_file(&args.page_labels)?,
        },
        counts,
        warnings: report.warnings.clone(),
        is_complete: report.is_complete,
    };

    let page_index_path = args.output_dir.join(PAGE_INDEX_FILE);
    write_json_pretty(&page_index_path, &pages)?;
    info!(path = %page_index_path.display(), "wrote page index");

    let audit_path = args.output_dir.join(AUDIT_REPORT_FILE);
    write_json_pretty(&audit_path, &report)?;
    info!(path = %audit_path.display(), "wrote audit report");

    let text_report = render_text_report(&manifest, &report, &pages);
    let report_path = args.output_dir.join(TEXT_REPORT_FILE);
    write_text_file(&report_path, &text_report)?;
    info!(path = %report_path.display(), "wrote text report");

    let manifest_path = args.output_dir.join(MANIFEST_FILE);
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote run manifest");

    info!(
        total_pages = manifest.counts.total_pages,
        pages_with_sections = manifest.counts.pages_with_sections,
        complete = manifest.is_complete,
        "resolution finished"
    );

    Ok(())
}

fn load_page_labels(path: &Path) -> Result<Vec<PageLabel>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let labels: Vec<PageLabel> = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse page labels: {}", path.display()))?;
    Ok(labels)
}

fn render_text_report(
    manifest: &ResolveRunManifest,
    report: &AuditReport,
    pages: &[PageRecord],
) -> String {
    let mut lines = Vec::new();

    lines.push("CAFR Structure Resolution Report".to_string());
    lines.push("=".repeat(60));
    lines.push(format!("Generated: {}", manifest.generated_at));
    lines.push(format!("Run id:    {}", manifest.run_id));
    lines.push(String::new());

    lines.push(format!("Total pages:          {}", manifest.counts.total_pages));
    lines.push(format!(
        "Pages with labels:    {}",
        manifest.counts.pages_with_labels
    ));
    lines.push(format!(
        "Pages with sections:  {}",
        manifest.counts.pages_with_sections
    ));
    lines.push(format!(
        "TOC entries (merged): {}",
        manifest.counts.toc_entries_merged
    ));
    lines.push(format!("Main sections:        {}", report.main_section_count));
    lines.push(format!("Complete:             {}", report.is_complete));
    lines.push(String::new());

    lines.push("Section page counts".to_string());
    lines.push("-".repeat(60));
    for (title, count) in section_page_counts(pages) {
        lines.push(format!("{title:<48} {count:>5} pages"));
    }
    lines.push(String::new());

    if !report.warnings.is_empty() {
        lines.push("Warnings".to_string());
        lines.push("-".repeat(60));
        for warning in &report.warnings {
            lines.push(format!("- {warning}"));
        }
        lines.push(String::new());
    }

    lines.push("End of report".to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// Level-1 section titles in first-seen page order with the number of
/// physical pages attributed to each (directly or via a subsection).
fn section_page_counts(pages: &[PageRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for page in pages {
        let title = match (&page.section_title, &page.parent_section_title) {
            (Some(_), Some(parent)) if page.section_level > 1 => top_level_title(pages, parent),
            (Some(title), _) if page.section_level == 1 => title.clone(),
            (Some(_), None) => continue,
            _ => continue,
        };

        match counts.iter_mut().find(|(existing, _)| *existing == title) {
            Some((_, count)) => *count += 1,
            None => counts.push((title, 1)),
        }
    }

    counts
}

fn top_level_title(pages: &[PageRecord], start: &str) -> String {
    // Walk parent links through the records until a level-1 title is found.
    // The links are OCR'd titles and can be self-referential or cyclic, so
    // each title is followed at most once.
    let mut visited = HashSet::new();
    let mut current = start.to_string();
    while visited.insert(current.clone()) {
        let parent = pages.iter().find_map(|page| {
            match (&page.section_title, &page.parent_section_title) {
                (Some(title), Some(parent)) if *title == current && page.section_level > 1 => {
                    Some(parent.clone())
                }
                _ => None,
            }
        });
        match parent {
            Some(next) => current = next,
            None => break,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(
        physical_index: u32,
        section_title: Option<&str>,
        section_level: u32,
        parent: Option<&str>,
    ) -> PageRecord {
        PageRecord {
            physical_index,
            raw_label: Some(physical_index.to_string()),
            canonical_ordinal: Some(physical_index),
            section_title: section_title.map(str::to_string),
            section_level,
            parent_section_title: parent.map(str::to_string),
            header_text: None,
        }
    }

    fn manifest(counts: ResolveCounts) -> ResolveRunManifest {
        ResolveRunManifest {
            manifest_version: 1,
            run_id: "resolve-test".to_string(),
            generated_at: "2026-01-01T00:00:00Z".to_string(),
            toc_inputs: Vec::new(),
            page_labels_input: InputHash {
                path: "labels.json".to_string(),
                sha256: String::new(),
            },
            counts,
            warnings: Vec::new(),
            is_complete: true,
        }
    }

    #[test]
    fn section_page_counts_attributes_subsection_pages_to_main_section() {
        let pages = vec![
            page(1, Some("Introductory Section"), 1, None),
            page(2, Some("Letter of Transmittal"), 2, Some("Introductory Section")),
            page(3, Some("Letter of Transmittal"), 2, Some("Introductory Section")),
            page(4, Some("Financial Section"), 1, None),
            page(5, None, 0, None),
        ];

        let counts = section_page_counts(&pages);
        assert_eq!(
            counts,
            vec![
                ("Introductory Section".to_string(), 3),
                ("Financial Section".to_string(), 1),
            ]
        );
    }

    #[test]
    fn section_page_counts_terminates_on_self_referential_parent_titles() {
        // OCR noise can re-emit a heading as its own subsection; the walk
        // must still terminate and attribute the page somewhere stable
        let pages = vec![
            page(1, Some("Financial Section"), 1, None),
            page(2, Some("Financial Section"), 2, Some("Financial Section")),
        ];

        let counts = section_page_counts(&pages);
        assert_eq!(counts, vec![("Financial Section".to_string(), 2)]);
    }

    #[test]
    fn render_text_report_includes_counts_and_warnings() {
        let pages = vec![page(1, Some("Financial Section"), 1, None)];
        let counts = ResolveCounts {
            toc_passes: 1,
            toc_entries_parsed: 4,
            toc_entries_merged: 3,
            duplicates_discarded: 1,
            main_sections: 3,
            total_pages: 1,
            pages_with_labels: 1,
            pages_with_ordinals: 1,
            pages_with_sections: 1,
        };
        let report = AuditReport {
            warnings: vec!["only 1 main section(s) found, expected at least 3".to_string()],
            errors: Vec::new(),
            gaps: Vec::new(),
            main_section_count: 3,
            total_entries: 3,
            is_complete: true,
        };

        let rendered = render_text_report(&manifest(counts), &report, &pages);
        assert!(rendered.contains("Total pages:          1"));
        assert!(rendered.contains("Financial Section"));
        assert!(rendered.contains("only 1 main section(s) found"));
    }
}
