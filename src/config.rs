//! Configuration System
//!
//! Layered configuration for the assembly engine, the content cache and the content writer.
//! Sources, lowest precedence first: built-in defaults, the global config file, the
//! workspace `sitesmith.toml`, `config/config.toml` and `config/{SITESMITH_ENV}.toml`, then
//! `SITESMITH__`-prefixed environment variables (`SITESMITH__CACHE__WARM_LIMIT=50`).

use crate::error::EngineError;
use crate::logging::LoggingConfig;
use directories::ProjectDirs;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod merge {
    pub mod merge_policy;
}
mod sources {
    pub mod global_file;
    pub mod workspace_file;
}

pub use sources::global_file::global_config_path;

const ENV_PREFIX: &str = "SITESMITH";

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitesmithConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Candidate generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Candidates produced by a full generation run
    #[serde(default = "default_variation_count")]
    pub variation_count: usize,

    /// How many top candidates or structures a random pick chooses from
    #[serde(default = "default_diversify_pool")]
    pub diversify_pool: usize,

    /// Year used for business-age tests; the current UTC year when unset
    #[serde(default)]
    pub reference_year: Option<i32>,
}

fn default_variation_count() -> usize {
    3
}

fn default_diversify_pool() -> usize {
    3
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            variation_count: default_variation_count(),
            diversify_pool: default_diversify_pool(),
            reference_year: None,
        }
    }
}

/// Content cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Byte budget of the resident tier
    #[serde(default = "default_resident_budget")]
    pub resident_budget_bytes: u64,

    /// Durable tier location; the platform cache directory when unset
    #[serde(default)]
    pub durable_path: Option<PathBuf>,

    /// Durable hits with more accesses than this are promoted to the resident tier
    #[serde(default = "default_promotion_threshold")]
    pub promotion_threshold: u64,

    #[serde(default = "default_prune_hours")]
    pub prune_default_hours: u64,

    /// Entries listed as most accessed in stats
    #[serde(default = "default_top_accessed")]
    pub top_accessed: usize,

    #[serde(default = "default_warm_limit")]
    pub warm_limit: usize,
}

fn default_resident_budget() -> u64 {
    100 * 1024 * 1024
}

fn default_promotion_threshold() -> u64 {
    5
}

fn default_prune_hours() -> u64 {
    168
}

fn default_top_accessed() -> usize {
    10
}

fn default_warm_limit() -> usize {
    100
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            resident_budget_bytes: default_resident_budget(),
            durable_path: None,
            promotion_threshold: default_promotion_threshold(),
            prune_default_hours: default_prune_hours(),
            top_accessed: default_top_accessed(),
            warm_limit: default_warm_limit(),
        }
    }
}

impl CacheConfig {
    /// Configured durable path, or `<platform cache dir>/content` for `sitesmith`
    pub fn resolved_durable_path(&self) -> Option<PathBuf> {
        self.durable_path.clone().or_else(|| {
            ProjectDirs::from("", "", "sitesmith").map(|dirs| dirs.cache_dir().join("content"))
        })
    }
}

/// Content writer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Upper bound for one generation request
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Requests in flight per candidate
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_timeout_ms() -> u64 {
    8000
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// Catalog sources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory of TOML rule files layered over the built-in catalog
    #[serde(default)]
    pub rules_dir: Option<PathBuf>,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Engine(String),
    Cache(String),
    Content(String),
    Catalog(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Engine(msg) => write!(f, "Engine: {}", msg),
            ValidationError::Cache(msg) => write!(f, "Cache: {}", msg),
            ValidationError::Content(msg) => write!(f, "Content: {}", msg),
            ValidationError::Catalog(msg) => write!(f, "Catalog: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl SitesmithConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.engine.variation_count == 0 {
            errors.push(ValidationError::Engine(
                "variation_count must be at least 1".to_string(),
            ));
        }
        if self.engine.diversify_pool == 0 {
            errors.push(ValidationError::Engine(
                "diversify_pool must be at least 1".to_string(),
            ));
        }
        if let Some(year) = self.engine.reference_year {
            if !(1800..=3000).contains(&year) {
                errors.push(ValidationError::Engine(format!(
                    "reference_year {} is out of range",
                    year
                )));
            }
        }

        if self.cache.resident_budget_bytes == 0 {
            errors.push(ValidationError::Cache(
                "resident_budget_bytes must be positive".to_string(),
            ));
        }
        if self.cache.top_accessed == 0 {
            errors.push(ValidationError::Cache(
                "top_accessed must be at least 1".to_string(),
            ));
        }
        if let Some(path) = &self.cache.durable_path {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError::Cache(
                    "durable_path cannot be empty".to_string(),
                ));
            }
        }

        if self.content.timeout_ms == 0 {
            errors.push(ValidationError::Content(
                "timeout_ms must be positive".to_string(),
            ));
        }
        if self.content.max_concurrent == 0 {
            errors.push(ValidationError::Content(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        if let Some(dir) = &self.catalog.rules_dir {
            if !dir.is_dir() {
                errors.push(ValidationError::Catalog(format!(
                    "rules_dir {} is not a directory",
                    dir.display()
                )));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Builds a [`SitesmithConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, global file, workspace files under `workspace_root`, then environment
    pub fn load(workspace_root: &Path) -> Result<SitesmithConfig, EngineError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load a single TOML file over the defaults, without global or environment sources
    pub fn load_from_file(path: &Path) -> Result<SitesmithConfig, EngineError> {
        if !path.exists() {
            return Err(EngineError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = merge::merge_policy::builder_with_defaults()?
            .add_source(config::File::from(path))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

/// Shared configuration with validated reloads
pub struct ConfigManager {
    config: Arc<RwLock<SitesmithConfig>>,
}

impl ConfigManager {
    pub fn new(config: SitesmithConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Reload from `workspace_root`; the current configuration is kept when validation fails
    pub fn reload(&self, workspace_root: &Path) -> Result<(), EngineError> {
        let new_config = ConfigLoader::load(workspace_root)?;

        new_config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            EngineError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;

        *self.config.write() = new_config;
        Ok(())
    }

    /// Snapshot of the current configuration
    pub fn get(&self) -> SitesmithConfig {
        self.config.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SitesmithConfig::default();
        assert_eq!(config.engine.variation_count, 3);
        assert_eq!(config.cache.resident_budget_bytes, 100 * 1024 * 1024);
        assert_eq!(config.cache.promotion_threshold, 5);
        assert_eq!(config.content.timeout_ms, 8000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_collects_every_error() {
        let mut config = SitesmithConfig::default();
        config.engine.variation_count = 0;
        config.cache.resident_budget_bytes = 0;
        config.content.timeout_ms = 0;
        config.catalog.rules_dir = Some(PathBuf::from("/definitely/not/here"));

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::Catalog(_))));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sitesmith.toml");
        fs::write(
            &path,
            r#"
[engine]
variation_count = 5
reference_year = 2024

[cache]
warm_limit = 20
durable_path = "/tmp/sitesmith-cache"
"#,
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.engine.variation_count, 5);
        assert_eq!(config.engine.reference_year, Some(2024));
        assert_eq!(config.cache.warm_limit, 20);
        assert_eq!(config.cache.promotion_threshold, 5);
        assert_eq!(
            config.cache.resolved_durable_path(),
            Some(PathBuf::from("/tmp/sitesmith-cache"))
        );
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = ConfigLoader::load_from_file(Path::new("/no/such/sitesmith.toml")).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
    }

    #[test]
    fn test_workspace_file_is_read() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        fs::write(
            dir.path().join("config").join("config.toml"),
            "[content]\ntimeout_ms = 1500\n",
        )
        .unwrap();

        let config = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(config.content.timeout_ms, 1500);
    }

    #[test]
    fn test_manager_reload() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::new(SitesmithConfig::default());
        fs::create_dir_all(dir.path().join("config")).unwrap();
        fs::write(
            dir.path().join("config").join("config.toml"),
            "[engine]\ndiversify_pool = 4\n",
        )
        .unwrap();

        manager.reload(dir.path()).unwrap();
        assert_eq!(manager.get().engine.diversify_pool, 4);
    }
}
