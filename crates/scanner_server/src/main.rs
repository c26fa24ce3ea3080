use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use scanner_engine::{load_config, ReqwestTransport, CONFIG_FILENAME};
use scanner_logging::{scanner_info, LogDestination};
use scanner_server::{create_app, AppState};

#[derive(Debug, Parser)]
#[command(name = "scanner-server", about = "HTTP proxy for JustWatch new titles")]
struct Args {
    /// RON configuration file.
    #[arg(long, default_value = CONFIG_FILENAME)]
    config: PathBuf,

    /// Overrides the port of the configured listen address.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Log debug output, including every upstream request.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    scanner_logging::initialize(LogDestination::Terminal, level);

    let config = load_config(&args.config);
    let mut addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("invalid listen_addr {:?}", config.listen_addr))?;
    if let Some(port) = args.port {
        addr.set_port(port);
    }

    let transport = ReqwestTransport::new(config.transport_settings())
        .context("failed to build the upstream client")?;
    scanner_info!("Upstream endpoint {}", transport.settings().endpoint);
    let state = AppState::new(Arc::new(transport), config.shared_pacing(), &config);
    let static_dir = config.static_dir.is_dir().then_some(config.static_dir.as_path());
    let app = create_app(state, static_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    scanner_info!("JustWatch scanner listening on http://{}", addr);
    scanner_info!("Connection test: http://{}/api/test", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
