use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Initialize structured logging.
///
/// `RUST_LOG` wins over the configured level when present.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // stdout belongs to CLI output
    let json_layer = config.json_logs.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!config.json_logs).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    tracing::info!("Tramites telemetry initialized with structured logging");
    Ok(())
}

/// Generate a correlation ID for linking related operations
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span with common trámite workflow attributes
pub fn create_workflow_span(
    operation: &str,
    tramite_id: Option<i64>,
    correlation_id: Option<&str>,
) -> tracing::Span {
    tracing::info_span!(
        "tramite_workflow",
        operation = operation,
        tramite.id = tramite_id,
        correlation.id = correlation_id,
    )
}
