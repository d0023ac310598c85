use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::store::{ImportRow, count_rows, default_db_path, latest_import, open_store};
use crate::model::{ImportRunManifest, ImportSummary};

pub fn run(args: StatusArgs) -> Result<()> {
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| default_db_path(&args.cache_root));

    info!(cache_root = %args.cache_root.display(), "status requested");

    if !db_path.exists() {
        warn!(path = %db_path.display(), "store file missing");
        return Ok(());
    }

    let connection = open_store(&db_path)?;
    let officers = count_rows(&connection, "SELECT COUNT(*) FROM officers").unwrap_or(0);
    let ratings = count_rows(&connection, "SELECT COUNT(*) FROM capability_ratings").unwrap_or(0);
    let positions =
        count_rows(&connection, "SELECT COUNT(*) FROM establishment_positions").unwrap_or(0);
    let imports = count_rows(&connection, "SELECT COUNT(*) FROM imports").unwrap_or(0);

    info!(
        path = %db_path.display(),
        officers,
        ratings,
        positions,
        imports,
        "store status"
    );

    for import_kind in ["officers", "establishment"] {
        match latest_import(&connection, import_kind)? {
            Some(row) => report_import(&row)?,
            None => warn!(import_kind, "no completed import recorded"),
        }
    }

    Ok(())
}

fn report_import(row: &ImportRow) -> Result<()> {
    info!(
        import_id = %row.import_id,
        import_kind = %row.import_kind,
        agency_type = %row.agency_type,
        source = %row.source_path,
        records = row.record_count,
        completed_at = %row.completed_at,
        "latest import"
    );

    let manifest_path = Path::new(&row.manifest_path);
    if !manifest_path.exists() {
        warn!(path = %manifest_path.display(), "import manifest missing");
        return Ok(());
    }

    let raw = fs::read(manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    let manifest: ImportRunManifest = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", manifest_path.display()))?;

    match &manifest.summary {
        ImportSummary::Officers(summary) => info!(
            officers = summary.officer_count,
            unrated = summary.unrated_officer_count,
            aligned = summary.gap_tags.get("ALIGNED").copied().unwrap_or(0),
            qual_gap = summary.gap_tags.get("QUAL_GAP").copied().unwrap_or(0),
            skill_gap = summary.gap_tags.get("SKILL_GAP").copied().unwrap_or(0),
            critical_gap = summary.gap_tags.get("CRITICAL_GAP").copied().unwrap_or(0),
            warnings = manifest.warnings.len(),
            "officer import summary"
        ),
        ImportSummary::Establishment(summary) => info!(
            positions = summary.position_count,
            vacant = summary.vacant_count,
            filled = summary.filled_count,
            vacancy_rate = summary.vacancy_rate,
            warnings = manifest.warnings.len(),
            "establishment import summary"
        ),
    }

    Ok(())
}
