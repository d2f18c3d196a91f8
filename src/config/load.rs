use std::path::Path;

use super::{ConfigError, TrainingConfig};

/// Load a TOML config file. Keys that are absent keep their default values.
pub fn load_from_path(path: &Path) -> Result<TrainingConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: TrainingConfig = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Loaded training config");
    Ok(config)
}
