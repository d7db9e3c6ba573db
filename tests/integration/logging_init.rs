//! Integration test for subscriber installation

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use sitesmith::catalog::Catalog;
use sitesmith::config::EngineConfig;
use sitesmith::logging::{init_logging, LoggingConfig};
use sitesmith::{Composer, Record};
use tempfile::TempDir;

/// A file subscriber records engine events; a second install is refused
#[test]
fn test_file_logging_records_engine_events() {
    let dir = TempDir::new().unwrap();
    let log_file = dir.path().join("logs").join("sitesmith.log");
    let config = LoggingConfig {
        level: "info".to_string(),
        format: "json".to_string(),
        output: "file".to_string(),
        file: log_file.clone(),
        color: false,
        ..LoggingConfig::default()
    };

    init_logging(Some(&config)).unwrap();
    assert!(init_logging(Some(&config)).is_err());

    let composer = Composer::new(Catalog::builtin(), EngineConfig::default()).unwrap();
    let record = Record::new(json!({ "businessType": "plombier", "is24x7": true }));
    composer.generate(&record, 2, &mut StdRng::seed_from_u64(1));

    let written = std::fs::read_to_string(&log_file).unwrap();
    assert!(written.contains("Generated candidates"));
}
