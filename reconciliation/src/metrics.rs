//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `recon_transfers_created_total` - Transfers created through this service
//! - `recon_approvals_total` - Accepted approval submissions
//! - `recon_duplicate_approvals_total` - Deduplicated approval submissions
//! - `recon_ledger_errors_total` - Failed ledger gateway round-trips
//! - `recon_gateway_duration_seconds` - Gateway round-trip latencies

use prometheus::{Histogram, HistogramOpts, IntCounter, Opts, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone, Debug)]
pub struct Metrics {
    /// Transfers created
    pub transfers_created: IntCounter,

    /// Accepted approvals
    pub approvals: IntCounter,

    /// Duplicate approvals deduplicated
    pub duplicate_approvals: IntCounter,

    /// Ledger gateway failures
    pub ledger_errors: IntCounter,

    /// Gateway round-trip latency
    pub gateway_duration: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let transfers_created = IntCounter::with_opts(Opts::new(
            "recon_transfers_created_total",
            "Transfers created through this service",
        ))?;
        registry.register(Box::new(transfers_created.clone()))?;

        let approvals = IntCounter::with_opts(Opts::new(
            "recon_approvals_total",
            "Accepted approval submissions",
        ))?;
        registry.register(Box::new(approvals.clone()))?;

        let duplicate_approvals = IntCounter::with_opts(Opts::new(
            "recon_duplicate_approvals_total",
            "Deduplicated approval submissions",
        ))?;
        registry.register(Box::new(duplicate_approvals.clone()))?;

        let ledger_errors = IntCounter::with_opts(Opts::new(
            "recon_ledger_errors_total",
            "Failed ledger gateway round-trips",
        ))?;
        registry.register(Box::new(ledger_errors.clone()))?;

        let gateway_duration = Histogram::with_opts(
            HistogramOpts::new(
                "recon_gateway_duration_seconds",
                "Gateway round-trip latencies",
            )
            .buckets(vec![0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0]),
        )?;
        registry.register(Box::new(gateway_duration.clone()))?;

        Ok(Self {
            transfers_created,
            approvals,
            duplicate_approvals,
            ledger_errors,
            gateway_duration,
            registry,
        })
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
