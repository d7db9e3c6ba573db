//! Workspace config files, lowest precedence first:
//! `sitesmith.toml`, `config/config.toml`, `config/{SITESMITH_ENV}.toml`

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

const ENV_NAME: &str = "SITESMITH_ENV";
const DEFAULT_ENV: &str = "development";

/// Existing workspace config files under `workspace_root`, in merge order
pub fn workspace_config_paths(workspace_root: &Path) -> Vec<PathBuf> {
    let env_name = std::env::var(ENV_NAME)
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENV.to_string());
    let config_dir = workspace_root.join("config");

    [
        workspace_root.join("sitesmith.toml"),
        config_dir.join("config.toml"),
        config_dir.join(format!("{}.toml", env_name)),
    ]
    .into_iter()
    .filter(|path| path.is_file())
    .collect()
}

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(workspace_config_paths(workspace_root)
        .into_iter()
        .fold(builder, |builder, path| {
            debug!(config_path = %path.display(), "Adding workspace configuration");
            builder.add_source(File::from(path).required(false))
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_paths_in_merge_order() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("config")).unwrap();
        fs::write(dir.path().join("config").join("config.toml"), "").unwrap();
        fs::write(dir.path().join("sitesmith.toml"), "").unwrap();

        let paths = workspace_config_paths(dir.path());
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("sitesmith.toml"));
        assert!(paths[1].ends_with("config/config.toml"));
    }
}
