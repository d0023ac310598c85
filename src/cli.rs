use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::AgencyType;

#[derive(Parser, Debug)]
#[command(
    name = "workforce-ingest",
    version,
    about = "Workforce survey and establishment ingestion tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Import(ImportArgs),
    Establishment(EstablishmentArgs),
    Status(StatusArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum SourceKind {
    Auto,
    Workbook,
    Pasted,
    Remote,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Workbook => "workbook",
            Self::Pasted => "pasted",
            Self::Remote => "remote",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = AgencyType::NationalDepartment)]
    pub agency_type: AgencyType,

    #[arg(long, value_enum, default_value_t = SourceKind::Auto)]
    pub source_kind: SourceKind,

    #[arg(long, default_value = ".cache/workforce")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub synonyms_path: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long)]
    pub records_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_dedupe: bool,
}

#[derive(Args, Debug, Clone)]
pub struct EstablishmentArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = AgencyType::NationalDepartment)]
    pub agency_type: AgencyType,

    #[arg(long, value_enum, default_value_t = SourceKind::Auto)]
    pub source_kind: SourceKind,

    #[arg(long, default_value = ".cache/workforce")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub synonyms_path: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long)]
    pub records_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/workforce")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}
