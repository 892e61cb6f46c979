pub mod handlers;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use emotion_detection::config::ServiceConfig;
use emotion_detection::service::CommonService;
use handlers::{emotion_detector_form, emotion_detector_query, index};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env()?;
    info!(endpoint = %config.endpoint, timeout = ?config.timeout, "loaded emotion service config");
    let service = CommonService::new(&config)?;

    let app = router(service);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Error binding {}", config.bind_address))?;
    info!("listening on http://{}", config.bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(service: CommonService) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/emotionDetector", get(emotion_detector_query).post(emotion_detector_form))
        .with_state(service)
}
