use anyhow::{Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::EstablishmentArgs;
use crate::commands::load_config;
use crate::commands::source_files::{LoadedSource, load_source};
use crate::commands::store::{default_db_path, open_store, record_import, replace_establishment};
use crate::model::{ImportCounts, ImportPaths, ImportRunManifest, ImportSummary};
use crate::normalize::{
    parse_establishment_grid, parse_pasted_establishment, summarize_establishment,
};
use crate::util::{ensure_directory, now_utc_string, utc_compact_string, write_json_pretty};

pub fn run(args: EstablishmentArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let stamp = utc_compact_string(started_ts);
    let import_id = format!("establishment-{stamp}");

    let cache_root = args.cache_root.clone();
    let manifest_dir = cache_root.join("manifests");
    ensure_directory(&manifest_dir)?;

    let manifest_path = args
        .manifest_path
        .clone()
        .unwrap_or_else(|| manifest_dir.join(format!("establishment_import_{stamp}.json")));
    let records_path = args.records_path.clone().unwrap_or_else(|| {
        cache_root
            .join("records")
            .join(format!("establishment_{stamp}.json"))
    });
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| default_db_path(&cache_root));

    info!(
        input = %args.input.display(),
        import_id = %import_id,
        "starting establishment import"
    );

    let config = load_config(args.synonyms_path.as_deref())?;
    let (source, source_entry) = load_source(&args.input, args.source_kind)?;

    let parsed = match &source {
        LoadedSource::Workbook(sheets) => parse_establishment_grid(sheets, &config)?,
        LoadedSource::Pasted(text) => parse_pasted_establishment(text, &config)?,
        LoadedSource::Remote(_) => {
            bail!("establishment imports accept workbook or pasted tables only")
        }
    };
    drop(source);

    let warnings = parsed
        .unresolved_fields
        .iter()
        .map(|field| format!("no header matched logical field '{field}'"))
        .collect::<Vec<String>>();
    for message in &warnings {
        warn!(import_id = %import_id, "{message}");
    }

    let summary = summarize_establishment(&parsed.records);

    let mut connection = open_store(&db_path)?;
    let positions = replace_establishment(&mut connection, &import_id, &parsed.records)?;
    write_json_pretty(&records_path, &parsed.records)?;

    let manifest = ImportRunManifest {
        manifest_version: 1,
        import_id: import_id.clone(),
        import_kind: "establishment".to_string(),
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: format!(
            "workforce-ingest establishment --input {} --source-kind {} --cache-root {}",
            args.input.display(),
            args.source_kind.as_str(),
            cache_root.display()
        ),
        agency_type: args.agency_type,
        source: source_entry,
        paths: ImportPaths {
            cache_root: cache_root.display().to_string(),
            manifest_dir: manifest_dir.display().to_string(),
            db_path: db_path.display().to_string(),
            records_path: records_path.display().to_string(),
        },
        headers: parsed.headers,
        resolved_fields: parsed.resolved_fields,
        unresolved_fields: parsed.unresolved_fields,
        rating_columns: Vec::new(),
        counts: ImportCounts {
            records_built: parsed.records.len(),
            records_kept: positions,
            ..ImportCounts::default()
        },
        summary: ImportSummary::Establishment(summary.clone()),
        warnings,
    };

    write_json_pretty(&manifest_path, &manifest)?;
    record_import(&connection, &manifest, &manifest_path)?;

    info!(path = %manifest_path.display(), "wrote import manifest");
    info!(
        positions = summary.position_count,
        vacant = summary.vacant_count,
        vacancy_rate = summary.vacancy_rate,
        "establishment import completed"
    );

    Ok(())
}
