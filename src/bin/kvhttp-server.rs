use clap::{arg, Command};
use kvhttp::{KvServer, MemoryStore, ServerConfig};
use log::{error, info};
use std::process::exit;
use stderrlog::Timestamp;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .disable_help_subcommand(true)
        .args([
            arg!(-a --addr <IPADDR> "Address to listen on, with the format HOST:PORT. \
                If --addr is not specified then listen on localhost:8080"),
            arg!(-c --config <FILE> "JSON config file. Command line flags take precedence"),
            arg!(-v --verbose ... "Raise log verbosity, may be repeated"),
        ])
        .get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    let verbose = match matches.get_count("verbose") {
        0 => None,
        n => Some(n as usize + 2),
    };
    let config = config.merge(matches.get_one::<String>("addr"), verbose);
    config.validate()?;

    stderrlog::new()
        .module(module_path!())
        .module("kvhttp")
        .timestamp(Timestamp::Second)
        .verbosity(config.verbosity)
        .init()?;

    info!(env!("CARGO_PKG_VERSION"));
    info!("IP: {}", config.addr);

    let store = MemoryStore::new();
    if !store.is_initialized() {
        error!("Cannot initialize storage!");
        exit(1);
    }

    let server = KvServer::new(store);
    if let Err(e) = server.start(&config.addr, shutdown_signal()).await {
        error!("Cannot serve on {}: {e}", config.addr);
        exit(1);
    }
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Cannot listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
