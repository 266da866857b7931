//! Built-in defaults applied beneath every other source.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("timeout_secs", 60_i64)?
        .set_default("listing.max_pages", 10_000_i64)?
        .set_default("listing.fetch_details", true)?
        .set_default("listing.detail_concurrency", 4_i64)?
        .set_default("retry.max_attempts", 3_i64)?
        .set_default("retry.delay_ms", 500_i64)
}
