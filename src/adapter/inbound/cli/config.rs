//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;

/// Documented configuration template.
const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your settings", path.display()));
    output::note(&format!("2. Run: matchstats config validate {}", path.display()));
    output::note(&format!("3. Run: matchstats serve -c {}", path.display()));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load(path)?;

    output::section("Effective Configuration");
    output::field("Log level", &config.logging.level);
    output::field("Log format", format!("{:?}", config.logging.format).to_lowercase());
    output::field("Bind", &config.server.bind);

    output::section("Storage");
    output::field("Backend", format!("{:?}", config.storage.backend).to_lowercase());
    output::field("Match store", &config.storage.match_store);
    output::field("Statistics store", &config.storage.statistics_store);

    output::section("Change Feed");
    output::field("Retention (s)", config.feed.retention_secs);
    output::field("Max events", config.feed.max_retained_events);

    output::section("Aggregation");
    let kinds: Vec<&str> = config
        .aggregation
        .event_kinds
        .iter()
        .map(|k| k.as_str())
        .collect();
    output::field("Workers", config.aggregation.workers);
    output::field("Channel capacity", config.aggregation.channel_capacity);
    output::field("Starting position", config.aggregation.starting_position);
    output::field("Event kinds", kinds.join(", "));
    output::field("Timeout (ms)", config.aggregation.invocation_timeout_ms);
    output::field("Deliveries", config.aggregation.max_delivery_attempts);
    output::field("Redelivery (ms)", config.aggregation.redelivery_delay_ms);

    output::section("Retry");
    output::field("Initial (ms)", config.retry.initial_delay_ms);
    output::field("Max (ms)", config.retry.max_delay_ms);
    output::field("Multiplier", config.retry.backoff_multiplier);
    output::field("Attempts", config.retry.max_attempts);

    output::section("Ingest");
    output::field("Max event age (s)", config.ingest.max_event_age_secs);
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    Config::load(path)?;
    output::success(&format!("{} is valid", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_a_valid_config() {
        let config = Config::parse_toml(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.aggregation.max_delivery_attempts, 3);
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        execute_init(&path, false).unwrap();
        assert!(execute_init(&path, false).is_err());
        execute_init(&path, true).unwrap();
    }
}
