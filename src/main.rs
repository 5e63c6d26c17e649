use image_denoiser::{api, config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let mut server = api::start_server(config::bind_addr()).await?;
    tracing::info!(addr = %server.addr, "listening; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    server.shutdown();
    Ok(())
}
