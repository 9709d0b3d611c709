//! Storage-and-transform proxy daemon.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use pre::server::router;
use pre::store::ProxyStore;

#[derive(Debug, Parser)]
#[command(name = "pre-proxy", about = "Proxy re-encryption storage service")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let store = Arc::new(ProxyStore::new());
    let app = router(store);

    let listener = TcpListener::bind(&args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    info!(addr = %args.listen, "proxy listening");
    axum::serve(listener, app).await?;
    Ok(())
}
