use anyhow::Context;
use tokio::net::TcpListener;

use crm_api::{config, factory, router, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let config = config::read_config().context("failed to read configuration")?;
    let repositories = factory::build_repositories(&config)
        .await
        .context("failed to initialise storage backend")?;
    let app = router::create(repositories, &config);

    let addr = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        %addr,
        remote = config.remote_configured(),
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
