//! Prometheus metrics for cart repository queries

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};
use std::time::Duration;
use tracing::warn;

use crate::error::CartError;

static METRICS: Lazy<RepositoryMetrics> = Lazy::new(RepositoryMetrics::register);

#[derive(Clone)]
pub struct RepositoryMetrics {
    pub query_duration: HistogramVec,
    pub errors: IntCounterVec,
}

impl RepositoryMetrics {
    /// Process-wide instance, registered on the default registry
    pub fn global() -> &'static Self {
        &METRICS
    }

    fn register() -> Self {
        let registry = prometheus::default_registry();

        let query_duration = HistogramVec::new(
            HistogramOpts::new(
                "cart_repository_query_duration_seconds",
                "Time spent in cart repository queries, including transaction control",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["repository", "operation"],
        )
        .expect("valid metric opts for cart_repository_query_duration_seconds");

        let errors = IntCounterVec::new(
            Opts::new(
                "cart_repository_errors_total",
                "Cart repository operations that failed at the query boundary",
            ),
            &["repository", "operation", "kind"],
        )
        .expect("valid metric opts for cart_repository_errors_total");

        for metric in [
            Box::new(query_duration.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(errors.clone()),
        ] {
            if let Err(e) = registry.register(metric) {
                warn!("Failed to register cart repository metric: {}", e);
            }
        }

        Self {
            query_duration,
            errors,
        }
    }

    pub fn observe(
        &self,
        repository: &str,
        operation: &str,
        elapsed: Duration,
        error: Option<&CartError>,
    ) {
        self.query_duration
            .with_label_values(&[repository, operation])
            .observe(elapsed.as_secs_f64());

        if let Some(err) = error {
            self.record_error(repository, operation, err);
        }
    }

    /// Count a failure that never reached the database
    pub fn record_error(&self, repository: &str, operation: &str, err: &CartError) {
        self.errors
            .with_label_values(&[repository, operation, error_kind(err)])
            .inc();
    }
}

fn error_kind(err: &CartError) -> &'static str {
    match err {
        CartError::Validation(_) => "validation",
        CartError::InvalidCurrency { .. } | CartError::UnknownCurrency(_) => "mapping",
        CartError::Storage { .. } => "storage",
        CartError::Timeout { .. } => "timeout",
        CartError::Rollback { .. } => "rollback",
        CartError::InvalidExecutor(_) | CartError::TransactionClosed => "executor",
    }
}
