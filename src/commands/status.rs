use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::resolve::{AUDIT_REPORT_FILE, MANIFEST_FILE};
use crate::model::{AuditReport, ResolveRunManifest};

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_path = args.output_dir.join(MANIFEST_FILE);
    let audit_path = args.output_dir.join(AUDIT_REPORT_FILE);

    info!(output_dir = %args.output_dir.display(), "status requested");

    if manifest_path.exists() {
        let manifest: ResolveRunManifest = read_json(&manifest_path)?;
        info!(
            run_id = %manifest.run_id,
            generated_at = %manifest.generated_at,
            toc_passes = manifest.counts.toc_passes,
            toc_entries = manifest.counts.toc_entries_merged,
            total_pages = manifest.counts.total_pages,
            pages_with_sections = manifest.counts.pages_with_sections,
            complete = manifest.is_complete,
            "loaded resolve manifest"
        );
    } else {
        warn!(path = %manifest_path.display(), "resolve manifest missing");
    }

    if audit_path.exists() {
        let report: AuditReport = read_json(&audit_path)?;
        info!(
            main_sections = report.main_section_count,
            warnings = report.warnings.len(),
            errors = report.errors.len(),
            gaps = report.gaps.len(),
            complete = report.is_complete,
            "loaded audit report"
        );
        for warning in &report.warnings {
            warn!(warning = %warning, "recorded audit warning");
        }
    } else {
        warn!(path = %audit_path.display(), "audit report missing");
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
