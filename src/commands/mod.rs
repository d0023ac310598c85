use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::normalize::NormalizeConfig;

pub mod establishment;
pub mod import;
mod source_files;
pub mod status;
mod store;
#[cfg(test)]
mod tests;

fn load_config(path: Option<&Path>) -> Result<NormalizeConfig> {
    match path {
        Some(path) => {
            let config = NormalizeConfig::load(path)?;
            info!(path = %path.display(), "loaded header synonym configuration");
            Ok(config)
        }
        None => Ok(NormalizeConfig::default()),
    }
}
