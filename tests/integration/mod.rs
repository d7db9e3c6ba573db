//! Integration tests for rule-driven site assembly

mod cache_tiers;
mod catalog_files;
mod composition;
mod logging_init;
mod ordering;
mod rule_scenarios;
