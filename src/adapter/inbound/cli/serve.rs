//! Handler for the `serve` command.

use tracing::info;

use crate::adapter::inbound::cli::command::ServeArgs;
use crate::error::Result;
use crate::infrastructure::config::logging::LogFormat;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::runtime;

/// Execute the serve command.
pub async fn execute(args: &ServeArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    apply_overrides(&mut config, args);
    config.validate()?;
    config.init_logging();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        bind = %config.server.bind,
        backend = ?config.storage.backend,
        starting_position = %config.aggregation.starting_position,
        workers = config.aggregation.workers,
        "matchstats starting"
    );
    runtime::serve(config).await?;
    info!("matchstats stopped");
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &ServeArgs) {
    if let Some(bind) = &args.bind {
        config.server.bind = bind.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = LogFormat::Json;
    }
    if let Some(position) = args.starting_position {
        config.aggregation.starting_position = position;
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::port::outbound::feed::StartingPosition;

    #[test]
    fn flags_override_file_values() {
        let mut config = Config::default();
        let args = ServeArgs {
            config: PathBuf::from("config.toml"),
            bind: Some("0.0.0.0:9000".into()),
            log_level: Some("debug".into()),
            json_logs: true,
            starting_position: Some(StartingPosition::Earliest),
        };
        apply_overrides(&mut config, &args);

        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.aggregation.starting_position, StartingPosition::Earliest);
    }
}
