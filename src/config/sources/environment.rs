//! Environment variable source: NEXUSFS_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// Uses NEXUSFS prefix and __ as separator for nested keys (NEXUSFS__LISTING__MAX_PAGES).
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("NEXUSFS")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
