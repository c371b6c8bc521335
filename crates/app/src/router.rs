use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;

use course_storage::CourseStore;

use crate::{courses, telemetry};

pub const ROOT_GREETING: &str = "This is the root :)";

#[derive(Clone)]
pub struct AppState {
    metrics: PrometheusHandle,
    courses: Arc<dyn CourseStore>,
}

impl AppState {
    pub fn new(metrics: PrometheusHandle, courses: Arc<dyn CourseStore>) -> Self {
        Self { metrics, courses }
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }

    pub fn courses(&self) -> &dyn CourseStore {
        self.courses.as_ref()
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .route("/api/courses", get(courses::list).post(courses::create))
        .route(
            "/api/courses/:id",
            get(courses::get)
                .put(courses::update)
                .delete(courses::delete),
        )
        .with_state(state)
}

async fn root() -> &'static str {
    ROOT_GREETING
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = telemetry::render_metrics(state.metrics());
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}
