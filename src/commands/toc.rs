use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::{ResolverTuning, TocArgs};
use crate::model::TocEntry;
use crate::resolver::{
    AuditConfig, IndentConfig, MergedToc, NumeralNormalizer, RomanTable, SectionTree,
    StructureAuditor, TocLineParser, merge_toc_passes,
};
use crate::util::{read_text_file, write_json_pretty};

pub fn run(args: TocArgs) -> Result<()> {
    let parser = build_parser(&args.tuning)?;
    let merged = load_merged_toc(&parser, &args.toc_texts)?;
    let tree = SectionTree::build(&merged.entries)?;

    print_toc(&merged.entries);

    let auditor = StructureAuditor::new(audit_config(&args.tuning));
    let report = auditor.audit(&tree, &[]);
    for warning in &report.warnings {
        warn!(warning = %warning, "TOC completeness warning");
    }
    info!(
        entries = merged.entries.len(),
        main_sections = report.main_section_count,
        duplicates_discarded = merged.duplicates_discarded,
        complete = report.is_complete,
        "TOC verification finished"
    );

    if let Some(path) = args.entries_path {
        write_json_pretty(&path, &merged.entries)?;
        info!(path = %path.display(), "wrote merged TOC entries");
    }

    Ok(())
}

pub fn build_parser(tuning: &ResolverTuning) -> Result<TocLineParser> {
    let indent = IndentConfig {
        level2_spaces: tuning.level2_indent,
        level3_spaces: tuning.level3_indent,
    };
    let normalizer = NumeralNormalizer::new(RomanTable::bounded(tuning.roman_max))?;
    TocLineParser::new(indent, normalizer)
}

pub fn audit_config(tuning: &ResolverTuning) -> AuditConfig {
    let mut config = AuditConfig {
        min_main_sections: tuning.min_main_sections,
        gap_threshold: tuning.gap_threshold,
        ..AuditConfig::default()
    };
    if !tuning.expected_keywords.is_empty() {
        config.expected_keywords = tuning.expected_keywords.clone();
    }
    config
}

/// Reads each OCR pass, parses it into candidate entries, and merges the
/// passes into one deduplicated, ordinal-sorted list.
pub fn load_merged_toc(parser: &TocLineParser, paths: &[PathBuf]) -> Result<MergedToc> {
    let mut passes = Vec::with_capacity(paths.len());

    for path in paths {
        let text = read_text_file(path)?;
        let entries = parser.parse_text(&text);
        info!(
            path = %path.display(),
            entries = entries.len(),
            "parsed TOC pass"
        );
        passes.push(entries);
    }

    let merged = merge_toc_passes(&passes);
    if merged.duplicates_discarded > 0 {
        info!(
            duplicates = merged.duplicates_discarded,
            "discarded duplicate TOC entries across passes"
        );
    }

    Ok(merged)
}

fn print_toc(entries: &[TocEntry]) {
    println!("{:<60} {:>6} {:>6}", "Section", "Page", "Level");
    println!("{}", "-".repeat(74));
    for entry in entries {
        let indent = "  ".repeat((entry.level.saturating_sub(1)) as usize);
        println!(
            "{:<60} {:>6} {:>6}",
            format!("{indent}{}", entry.title),
            entry.ordinal,
            entry.level
        );
    }
}
