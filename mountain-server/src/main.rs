use clap::Parser;
use mountain_server::{Args, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let state = args.build_state()?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&args.http_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, provider = ?args.provider, "mountain.server.listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "mountain.server.signal_failed");
            }
            tracing::info!("mountain.server.shutdown");
        })
        .await?;

    Ok(())
}
