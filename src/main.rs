use std::sync::Arc;

use tracing::{error, info};

use resource_probe::config::Config;
use resource_probe::observability::Metrics;
use resource_probe::server::Server;
use resource_probe::{logging, reporter, VERSION};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Logging is not up yet, config errors go to stderr
    let config = Config::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;

    logging::init(&config.logging)?;

    info!("Starting resource_probe {}", VERSION);
    config.log_summary();

    // Probes run on blocking threads, the runtime only serves HTTP
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let metrics = Arc::new(Metrics::new()?);
    let router = reporter::build_router(&config.reporter, Arc::clone(&metrics));

    let server = match Server::bind(config.server.listen_addr, router, metrics).await {
        Ok(server) => server.with_access_log(config.server.access_log),
        Err(e) => {
            error!("Error starting server: {}", e);
            return Err(e.into());
        }
    };

    // Handle shutdown gracefully
    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    Ok(())
}
