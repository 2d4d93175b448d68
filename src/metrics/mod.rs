/*!
 * # Metrics Module
 *
 * Prometheus metrics for the material API, exposed in text format at `/metrics`.
 *
 * - `material_operations_total{operation, outcome}`: service calls by outcome
 *   (`ok` or the error kind)
 * - `material_operation_duration_seconds{operation}`: service call latency
 * - `material_db_max_connections`: configured pool size
 */

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::time::Duration;
use thiserror::Error;
use tracing::error;

use crate::errors::ServiceError;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to export metrics: {0}")]
    ExportError(String),
}

pub struct MaterialMetrics {
    registry: Registry,
    operations_total: IntCounterVec,
    operation_duration: HistogramVec,
    db_max_connections: IntGauge,
}

impl MaterialMetrics {
    fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let operations_total = IntCounterVec::new(
            Opts::new(
                "material_operations_total",
                "Material service operations by outcome",
            ),
            &["operation", "outcome"],
        )?;
        let operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "material_operation_duration_seconds",
                "Material service operation latency",
            ),
            &["operation"],
        )?;
        let db_max_connections = IntGauge::new(
            "material_db_max_connections",
            "Configured database pool size",
        )?;

        registry.register(Box::new(operations_total.clone()))?;
        registry.register(Box::new(operation_duration.clone()))?;
        registry.register(Box::new(db_max_connections.clone()))?;

        Ok(Self {
            registry,
            operations_total,
            operation_duration,
            db_max_connections,
        })
    }

    pub fn export(&self) -> Result<String, MetricsError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| MetricsError::ExportError(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| MetricsError::ExportError(e.to_string()))
    }
}

pub static METRICS: Lazy<MaterialMetrics> =
    Lazy::new(|| MaterialMetrics::new().expect("metric descriptors are static and valid"));

/// Records one service call
pub fn record_operation(operation: &str, err: Option<&ServiceError>, elapsed: Duration) {
    let outcome = err.map(ServiceError::kind).unwrap_or("ok");
    METRICS
        .operations_total
        .with_label_values(&[operation, outcome])
        .inc();
    METRICS
        .operation_duration
        .with_label_values(&[operation])
        .observe(elapsed.as_secs_f64());
}

pub fn set_db_max_connections(value: u32) {
    METRICS.db_max_connections.set(i64::from(value));
}

pub async fn metrics_handler() -> impl IntoResponse {
    match METRICS.export() {
        Ok(body) => (StatusCode::OK, body),
        Err(err) => {
            error!("{}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("metrics error"),
            )
        }
    }
}
