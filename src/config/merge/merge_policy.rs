//! Merge rules: defaults applied before any file or environment source.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with the engine defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("engine.variation_count", 3)?
        .set_default("engine.diversify_pool", 3)?
        .set_default("cache.resident_budget_bytes", 100 * 1024 * 1024)?
        .set_default("cache.promotion_threshold", 5)?
        .set_default("cache.prune_default_hours", 168)?
        .set_default("cache.top_accessed", 10)?
        .set_default("cache.warm_limit", 100)?
        .set_default("content.timeout_ms", 8000)?
        .set_default("content.max_concurrent", 4)
}
