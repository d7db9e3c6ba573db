//! Integration tests for rule files and configuration driving composition

use serde_json::json;
use sitesmith::catalog::Catalog;
use sitesmith::config::ConfigLoader;
use sitesmith::error::{CatalogError, EngineError};
use sitesmith::{Composer, Record};
use std::fs;
use tempfile::TempDir;

const NIGHT_RULES: &str = r#"
[[rules]]
id = "night-service"
name = "Service de nuit"
category = "urgency"
priority = 60

[[rules.conditions]]
field = "openAtNight"
operator = "equals"
value = true
weight = 100

[[rules.actions]]
kind = "addBlock"
target = "cta"
priority = 90
payload = { variant = "urgent-night", title = "Ouvert toute la nuit" }
"#;

const OVERRIDE_URGENCY: &str = r#"
[[rules]]
id = "urgency-service"
name = "Urgence désactivée"
category = "services"
priority = 10

[[rules.conditions]]
field = "is24x7"
operator = "equals"
value = true
weight = 10

[compatibility]
cta = ["hero"]
"#;

fn rules_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("10-night.toml"), NIGHT_RULES).unwrap();
    fs::write(dir.path().join("20-urgency.toml"), OVERRIDE_URGENCY).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    dir
}

/// File rules extend the built-in set and replace rules by id
#[test]
fn test_rule_files_extend_and_override() {
    let dir = rules_dir();
    let catalog = Catalog::load(Some(dir.path())).unwrap();

    assert!(catalog.rules.iter().any(|r| r.id == "night-service"));
    let urgency = catalog.rules.iter().find(|r| r.id == "urgency-service").unwrap();
    assert_eq!(urgency.priority, 10);
    assert!(urgency.actions.is_empty());
    assert_eq!(catalog.compatibility.requirements("cta"), ["hero".to_string()]);
}

/// A malformed rule file is reported with its path
#[test]
fn test_malformed_rule_file_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.toml"), "[[rules]]\nid = 3").unwrap();

    match Catalog::load(Some(dir.path())) {
        Err(CatalogError::File { path, .. }) => assert!(path.ends_with("broken.toml")),
        other => panic!("expected a file error, got {other:?}"),
    }
}

/// A config file pointing at a rules directory drives the composer
#[test]
fn test_config_file_drives_composer() {
    let rules = rules_dir();
    let workspace = TempDir::new().unwrap();
    let config_path = workspace.path().join("sitesmith.toml");
    fs::write(
        &config_path,
        format!(
            "[engine]\nvariation_count = 2\nreference_year = 2025\n\n[catalog]\nrules_dir = {:?}\n",
            rules.path().display().to_string()
        ),
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_path).unwrap();
    assert_eq!(config.engine.variation_count, 2);
    assert!(config.validate().is_ok());

    let composer = Composer::from_config(&config).unwrap();
    let record = Record::new(json!({
        "businessName": "SOS Serrure",
        "businessType": "serrurier",
        "openAtNight": true
    }));
    let candidate = composer.compose(&record);
    let cta = candidate.block("cta").expect("night rule adds a CTA");
    assert_eq!(cta.variant, "urgent-night");
    assert_eq!(cta.props["title"], json!("Ouvert toute la nuit"));
}

/// A missing config file is a configuration error
#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let result = ConfigLoader::load_from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(EngineError::ConfigError(_))));
}
