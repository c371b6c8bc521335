mod courses;
mod error;
mod router;
mod telemetry;

use std::{net::SocketAddr, sync::Arc};

use tracing::info;

use course_storage::{CourseStore, InMemoryCourseStore};
use course_util::{load_env_file, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;
    let metrics = telemetry::init_metrics()?;

    let store = Arc::new(InMemoryCourseStore::seeded());
    info!(stage = "app", courses = store.len(), "course collection seeded");
    let state = router::AppState::new(metrics, store);

    let addr: SocketAddr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(stage = "app", %addr, env = %config.environment.as_str(), "listening on port {}", addr.port());

    axum::serve(listener, router::app_router(state))
        .await
        .map_err(|err| err.into())
}
