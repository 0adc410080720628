use std::process::ExitCode;
use std::sync::Arc;

use switchback::middleware::{Registry, StatefulMiddleware};
use switchback::{Config, Error, Server, app};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "switchback=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Config::default()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Error> {
    let stateful = Arc::new(StatefulMiddleware::new(&config.initial_variant, Registry::builtin())?);
    info!(addr = %config.addr, variant = %stateful.current(), names = ?stateful.names(), "starting");

    Server::bind(config.addr).serve(app(stateful)).await
}
