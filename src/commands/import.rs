use anyhow::{Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::ImportArgs;
use crate::commands::load_config;
use crate::commands::source_files::{LoadedSource, load_source};
use crate::commands::store::{default_db_path, open_store, record_import, replace_officers};
use crate::model::{ImportCounts, ImportPaths, ImportRunManifest, ImportSummary};
use crate::normalize::{
    ParsedOfficers, dedupe_officers, identity_key, parse_pasted_table, parse_remote_rows,
    parse_workbook_rows, summarize_officers,
};
use crate::util::{ensure_directory, now_utc_string, utc_compact_string, write_json_pretty};

pub fn run(args: ImportArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let stamp = utc_compact_string(started_ts);
    let import_id = format!("officers-{stamp}");

    let cache_root = args.cache_root.clone();
    let manifest_dir = cache_root.join("manifests");
    ensure_directory(&manifest_dir)?;

    let manifest_path = args
        .manifest_path
        .clone()
        .unwrap_or_else(|| manifest_dir.join(format!("officer_import_{stamp}.json")));
    let records_path = args
        .records_path
        .clone()
        .unwrap_or_else(|| cache_root.join("records").join(format!("officers_{stamp}.json")));
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| default_db_path(&cache_root));

    info!(
        input = %args.input.display(),
        agency_type = args.agency_type.as_str(),
        import_id = %import_id,
        "starting officer import"
    );

    let config = load_config(args.synonyms_path.as_deref())?;
    let (source, source_entry) = load_source(&args.input, args.source_kind)?;

    let parsed = match &source {
        LoadedSource::Workbook(sheets) => parse_workbook_rows(sheets, args.agency_type, &config)?,
        LoadedSource::Pasted(text) => parse_pasted_table(text, args.agency_type, &config)?,
        LoadedSource::Remote(rows) => parse_remote_rows(rows, args.agency_type, &config)?,
    };
    drop(source);

    let ParsedOfficers {
        headers,
        records,
        resolved_fields,
        unresolved_fields,
        rating_columns,
    } = parsed;

    let mut warnings = Vec::<String>::new();
    if rating_columns.is_empty() {
        warnings.push("no capability rating columns were recognized in the header row".to_string());
    }
    for field in &unresolved_fields {
        warnings.push(format!("no header matched logical field '{field}'"));
    }
    for message in &warnings {
        warn!(import_id = %import_id, "{message}");
    }

    let records_built = records.len();
    let unkeyed_records = records
        .iter()
        .filter(|record| identity_key(record).is_none())
        .count();
    let records = if args.no_dedupe {
        records
    } else {
        dedupe_officers(records)
    };
    if records.is_empty() {
        bail!("import produced no officer records");
    }

    let summary = summarize_officers(&records);

    let mut connection = open_store(&db_path)?;
    let ratings_emitted = replace_officers(&mut connection, &import_id, &records)?;
    write_json_pretty(&records_path, &records)?;

    let manifest = ImportRunManifest {
        manifest_version: 1,
        import_id: import_id.clone(),
        import_kind: "officers".to_string(),
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_import_command(&args),
        agency_type: args.agency_type,
        source: source_entry,
        paths: ImportPaths {
            cache_root: cache_root.display().to_string(),
            manifest_dir: manifest_dir.display().to_string(),
            db_path: db_path.display().to_string(),
            records_path: records_path.display().to_string(),
        },
        headers,
        resolved_fields,
        unresolved_fields,
        counts: ImportCounts {
            records_built,
            records_kept: records.len(),
            duplicates_collapsed: records_built - records.len(),
            unkeyed_records,
            rating_columns: rating_columns.len(),
            ratings_emitted,
        },
        rating_columns,
        summary: ImportSummary::Officers(summary),
        warnings,
    };

    write_json_pretty(&manifest_path, &manifest)?;
    record_import(&connection, &manifest, &manifest_path)?;

    info!(path = %manifest_path.display(), "wrote import manifest");
    info!(
        officers = manifest.counts.records_kept,
        duplicates = manifest.counts.duplicates_collapsed,
        ratings = ratings_emitted,
        "officer import completed"
    );

    Ok(())
}

fn render_import_command(args: &ImportArgs) -> String {
    let mut parts = vec![
        "workforce-ingest".to_string(),
        "import".to_string(),
        "--input".to_string(),
        args.input.display().to_string(),
        "--agency-type".to_string(),
        args.agency_type.as_str().replace('_', "-"),
        "--source-kind".to_string(),
        args.source_kind.as_str().to_string(),
        "--cache-root".to_string(),
        args.cache_root.display().to_string(),
    ];

    if let Some(path) = &args.synonyms_path {
        parts.push("--synonyms-path".to_string());
        parts.push(path.display().to_string());
    }
    if args.no_dedupe {
        parts.push("--no-dedupe".to_string());
    }

    parts.join(" ")
}
