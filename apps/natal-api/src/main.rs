use anyhow::Context;
use log::info;
use natal_api::{router, AppState};
use natal_config::NatalConfig;
use natal_core::{ChartAssembler, SwissEphemerisAdapter};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = natal_config::load_config().context("Failed to load configuration")?;
    let adapter = SwissEphemerisAdapter::new(&config.ephemeris_path)
        .context("Failed to initialize Swiss Ephemeris")?;
    info!(
        "Ephemeris path: {}, authorization {}",
        adapter.ephemeris_path().display(),
        if config.auth_enabled() { "enabled" } else { "disabled" }
    );

    let state = AppState::new(
        ChartAssembler::new(Arc::new(adapter)),
        config.api_key.clone(),
    );

    // The ephemeris engine is not reentrant; one thread serves every request.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    runtime.block_on(serve(config, state))
}

async fn serve(config: NatalConfig, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Listening on {}", config.bind_address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler; run until killed.
        std::future::pending::<()>().await;
    }
}
