//! Service runtime: HTTP server plus aggregation dispatcher.
//!
//! The dispatcher subscribes to the change log before the listener accepts
//! its first request, so with the default `latest` position no write made
//! through this process is missed. On shutdown the server stops accepting
//! requests, the log is closed, and the dispatcher drains what it already
//! holds.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::adapter::inbound::http::create_router;
use crate::application::aggregation::{DispatchStats, Dispatcher};
use crate::error::Result;
use crate::infrastructure::bootstrap::{self, Pipeline};
use crate::infrastructure::config::settings::Config;

/// Bind the configured address and run until Ctrl-C.
///
/// # Errors
/// Returns an error if the stores cannot be opened, the address cannot be
/// bound, or the server fails.
pub async fn serve(config: Config) -> Result<()> {
    let addr = config.bind_addr()?;
    let pipeline = bootstrap::build(&config)?;
    let listener = TcpListener::bind(addr).await?;
    run(&config, pipeline, listener, shutdown_signal()).await?;
    Ok(())
}

/// Run the dispatcher and the HTTP server on `listener` until `shutdown`
/// resolves. Returns the dispatcher's final counters.
///
/// # Errors
/// Returns an error if the server fails.
pub async fn run<S>(
    config: &Config,
    pipeline: Pipeline,
    listener: TcpListener,
    shutdown: S,
) -> Result<DispatchStats>
where
    S: Future<Output = ()> + Send + 'static,
{
    let reader = pipeline
        .log
        .subscribe(config.aggregation.starting_position);
    let dispatcher = Dispatcher::new(Arc::clone(&pipeline.engine), &config.aggregation);
    let dispatch = tokio::spawn(dispatcher.run(reader));

    let app = create_router(pipeline.api_state());
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "HTTP API listening");
    }
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    info!("HTTP API stopped, draining aggregation");
    pipeline.log.close();
    let stats = match dispatch.await {
        Ok(stats) => stats,
        Err(e) => {
            error!(error = %e, "Dispatcher task failed");
            DispatchStats::default()
        }
    };

    served?;
    Ok(stats)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
