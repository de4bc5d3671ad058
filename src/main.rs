use anyhow::Context;

use galaxy_api::config::AppConfig;
use galaxy_api::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    eprintln!("🌌 Galaxy API v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Listening: http://{}", config.bind);
    eprintln!("   Database: {}", config.database_path.display());
    eprintln!(
        "   Mail: {}:{} (tls: {})\n",
        config.mail.server, config.mail.port, config.mail.use_tls
    );

    server::run(config).await?;
    Ok(())
}
