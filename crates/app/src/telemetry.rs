use std::{
    fmt::{self, Write as _},
    sync::{Mutex, OnceLock},
    time::Instant,
};

use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{
    fmt::time::UtcTime, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
    EnvFilter,
};

use course_util::{AppConfig, Environment};

#[derive(Debug)]
pub enum TelemetryError {
    Tracing(TryInitError),
    Metrics(BuildError),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tracing(err) => write!(f, "failed to initialize tracing: {err}"),
            Self::Metrics(err) => write!(f, "failed to initialize prometheus recorder: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {}

impl From<TryInitError> for TelemetryError {
    fn from(value: TryInitError) -> Self {
        Self::Tracing(value)
    }
}

impl From<BuildError> for TelemetryError {
    fn from(value: BuildError) -> Self {
        Self::Metrics(value)
    }
}

static TRACING_READY: OnceLock<()> = OnceLock::new();
static RECORDER: Mutex<Option<PrometheusHandle>> = Mutex::new(None);
static STARTED_AT: OnceLock<Instant> = OnceLock::new();

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Installs the global subscriber: pretty output for development and tests,
/// JSON lines in production. Later calls are no-ops.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryError> {
    if TRACING_READY.get().is_some() {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_timer(UtcTime::rfc_3339());
    let registry = tracing_subscriber::registry().with(filter);

    match config.environment {
        Environment::Production => registry.with(layer.json()).try_init()?,
        Environment::Development | Environment::Test => {
            registry.with(layer.pretty()).try_init()?
        }
    }

    TRACING_READY.set(()).ok();
    tracing::info!(
        stage = "telemetry",
        env = config.environment.as_str(),
        version = BUILD_VERSION,
        "tracing initialized"
    );
    Ok(())
}

/// Installs the Prometheus recorder once and returns a handle to it.
pub fn init_metrics() -> Result<PrometheusHandle, TelemetryError> {
    let mut installed = RECORDER.lock().expect("metrics recorder guard poisoned");
    if let Some(handle) = installed.as_ref() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_course_metrics();
    STARTED_AT.get_or_init(Instant::now);
    *installed = Some(handle.clone());

    Ok(handle)
}

fn describe_course_metrics() {
    describe_counter!(
        "course_requests_total",
        "Count of course API requests, labelled by operation and result"
    );
    describe_gauge!(
        "course_collection_size",
        "Number of courses held in the collection after the last request"
    );
}

/// Renders the recorder output followed by build and uptime gauges.
pub fn render_metrics(handle: &PrometheusHandle) -> String {
    let mut body = handle.render();
    if !body.is_empty() && !body.ends_with('\n') {
        body.push('\n');
    }

    let uptime = STARTED_AT
        .get()
        .map(|start| start.elapsed().as_secs_f64())
        .unwrap_or_default();
    let _ = write!(
        body,
        "# TYPE app_build_info gauge\n\
         app_build_info{{version=\"{BUILD_VERSION}\"}} 1\n\
         # TYPE app_uptime_seconds gauge\n\
         app_uptime_seconds {uptime}\n"
    );

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_metrics_reuses_installed_recorder() {
        init_metrics().expect("metrics init");
        let handle = init_metrics().expect("metrics reinit");
        metrics::counter!("course_requests_total", "op" => "list", "result" => "ok").increment(1);

        let rendered = render_metrics(&handle);
        assert!(rendered.contains("course_requests_total"));
        assert!(rendered.contains(&format!("app_build_info{{version=\"{BUILD_VERSION}\"}} 1")));
    }
}
