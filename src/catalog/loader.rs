//! Rule file loading
//!
//! Reads every `*.toml` file under a directory. A file may declare `[[rules]]` and a
//! `[compatibility]` table mapping a block type to its required predecessors. Files are read
//! in path order so later files win on duplicate ids.

use crate::error::CatalogError;
use crate::rules::Rule;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Everything read from a rules directory
#[derive(Debug, Clone, Default)]
pub struct LoadedRules {
    pub rules: Vec<Rule>,
    pub compatibility: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<Rule>,
    #[serde(default)]
    compatibility: BTreeMap<String, Vec<String>>,
}

/// Parse one rule file's contents; `path` is only used for error messages
pub fn parse_rule_file(path: &Path, raw: &str) -> Result<LoadedRules, CatalogError> {
    let file: RuleFile = toml::from_str(raw).map_err(|e| CatalogError::File {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    for rule in &file.rules {
        rule.validate().map_err(|e| CatalogError::File {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    }

    Ok(LoadedRules {
        rules: file.rules,
        compatibility: file.compatibility,
    })
}

/// Load every rule file under `dir`, recursively
pub fn load_rules_dir(dir: &Path) -> Result<LoadedRules, CatalogError> {
    let mut loaded = LoadedRules::default();

    let walker = WalkDir::new(dir).follow_links(false).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| {
            CatalogError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to walk rules directory: {}", e),
            ))
        })?;

        let path = entry.path();
        let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
        if !entry.file_type().is_file() || !is_toml {
            continue;
        }

        let raw = std::fs::read_to_string(path)?;
        let file = parse_rule_file(path, &raw)?;
        debug!(
            path = %path.display(),
            rules = file.rules.len(),
            "Read rule file"
        );

        for rule in file.rules {
            match loaded.rules.iter_mut().find(|r| r.id == rule.id) {
                Some(existing) => *existing = rule,
                None => loaded.rules.push(rule),
            }
        }
        loaded.compatibility.extend(file.compatibility);
    }

    Ok(loaded)
}
