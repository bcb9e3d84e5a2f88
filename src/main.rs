use candidate_tracker::{
    config::{get_config, init_config, LogFormat},
    routes::build_router,
    AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "candidate_tracker=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let app_state = AppState::new(config.clone());
    if config.seed_demo_data {
        info!("Seeded demo candidate data");
    }
    info!(
        "Storing CVs in {} (max {} bytes)",
        config.uploads_dir.display(),
        config.max_cv_size_bytes
    );

    let app = build_router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {} ({})", addr, config.environment);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
