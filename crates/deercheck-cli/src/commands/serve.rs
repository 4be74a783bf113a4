use anyhow::{Context as _, Result};
use clap::Args;
use deercheck_config::{parse_bind, validate_port, AppConfig};
use deercheck_server::{serve, shutdown_signal, AppState};
use deercheck_store::Store;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind, overrides server.bind
    #[arg(long)]
    pub bind: Option<String>,
    /// Port to listen on, overrides server.port
    #[arg(long)]
    pub port: Option<u16>,
}

pub fn launch(store: Store, config: &AppConfig, args: ServeArgs) -> Result<()> {
    let bind = match args.bind.as_deref() {
        Some(raw) => parse_bind(raw)?,
        None => config.server.bind,
    };
    let port = match args.port {
        Some(port) => validate_port(port)?,
        None => config.server.port,
    };
    let address = SocketAddr::new(bind, port);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_context(|| "start async runtime")?;

    runtime.block_on(async move {
        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("bind {address}"))?;
        info!(%address, "server running");
        serve(listener, AppState::new(store), shutdown_signal())
            .await
            .with_context(|| "serve http")?;
        info!("server stopped");
        Ok::<(), anyhow::Error>(())
    })
}
