use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use portwatch::config::Config;
use portwatch::logging;
use portwatch::poller::Poller;
use portwatch::prober::TcpProber;
use portwatch::report::ConsoleReporter;
use portwatch::server;
use portwatch::store::StatusStore;

/// portwatch — polls local TCP ports and serves their state over an authenticated HTTP route.
#[derive(Debug, Clone, Parser)]
#[command(name = "portwatch", version, about, long_about = None)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the console report without ANSI colors.
    #[arg(long = "no-color", default_value_t = false)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();

    let cfg = Config::load(&cli.config)
        .with_context(|| format!("fatal error config file: {}", cli.config.display()))?;
    let targets = cfg.targets()?;
    let credential = cfg.credential()?;
    let bind = cfg.bind_addr()?;
    let route = cfg.route_path()?;

    tracing::info!("portwatch starting");
    tracing::info!("  config : {}", cli.config.display());
    tracing::info!("  bind   : {}", bind);
    tracing::info!("  route  : GET {}", route);
    tracing::info!("  header : {}", credential.header().as_str());
    for t in &targets {
        tracing::info!("  target : {} -> {}", t.port, t.name);
    }

    let store = StatusStore::new();
    let cancel = CancellationToken::new();

    let poller = Poller::new(targets, store.clone(), TcpProber::default())
        .with_reporter(ConsoleReporter::new(!cli.no_color))
        .spawn(cancel.child_token());

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    let app = server::build_router(store, &route, credential);

    tokio::spawn(server::cancel_on_signal(
        tokio::signal::ctrl_c(),
        cancel.clone(),
    ));

    let served = server::serve(listener, app, cancel.clone()).await;
    poller.shutdown().await;
    served
}
