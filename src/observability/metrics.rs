//! Metrics for the dashboard pipeline.
//!
//! Recorded through the `metrics` facade and exposed in Prometheus text
//! format once `init()` installed the recorder.

use std::fmt;
use std::sync::OnceLock;
use tracing::info;

/// Every metric name used by the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Sources metrics
    SourcesRequestsSuccess,
    SourcesRequestsError,
    SourcesRequestDuration,
    SourcesPayloadBytes,

    // Normalize metrics
    NormalizeRowsKept,
    NormalizeRowsRejected,
    NormalizeCellsZeroFilled,

    // Cache metrics
    CacheHits,
    CacheMisses,

    // Export metrics
    ExportsGenerated,
    ExportRows,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::SourcesRequestsSuccess => "adiz_sources_requests_success_total",
            MetricName::SourcesRequestsError => "adiz_sources_requests_error_total",
            MetricName::SourcesRequestDuration => "adiz_sources_request_duration_seconds",
            MetricName::SourcesPayloadBytes => "adiz_sources_payload_bytes",

            MetricName::NormalizeRowsKept => "adiz_normalize_rows_kept_total",
            MetricName::NormalizeRowsRejected => "adiz_normalize_rows_rejected_total",
            MetricName::NormalizeCellsZeroFilled => "adiz_normalize_cells_zero_filled_total",

            MetricName::CacheHits => "adiz_cache_hits_total",
            MetricName::CacheMisses => "adiz_cache_misses_total",

            MetricName::ExportsGenerated => "adiz_exports_generated_total",
            MetricName::ExportRows => "adiz_export_rows",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        [
            MetricName::SourcesRequestsSuccess,
            MetricName::SourcesRequestsError,
            MetricName::SourcesRequestDuration,
            MetricName::SourcesPayloadBytes,
            MetricName::NormalizeRowsKept,
            MetricName::NormalizeRowsRejected,
            MetricName::NormalizeCellsZeroFilled,
            MetricName::CacheHits,
            MetricName::CacheMisses,
            MetricName::ExportsGenerated,
            MetricName::ExportRows,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static METRICS_HANDLE: OnceLock<metrics_exporter_prometheus::PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Calling it again is a no-op.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;
    METRICS_HANDLE.set(handle).ok();
    info!("Metrics system initialized");
    Ok(())
}

/// Current metrics in Prometheus text format, `None` before `init()`.
pub fn render() -> Option<String> {
    METRICS_HANDLE.get().map(|handle| handle.render())
}

// ============================================================================
// Sources Metrics
// ============================================================================

pub mod sources {
    use super::MetricName;

    pub fn request_success(mode: &'static str, secs: f64, bytes: usize) {
        ::metrics::counter!(MetricName::SourcesRequestsSuccess.as_str(), "mode" => mode).increment(1);
        ::metrics::histogram!(MetricName::SourcesRequestDuration.as_str(), "mode" => mode).record(secs);
        ::metrics::histogram!(MetricName::SourcesPayloadBytes.as_str(), "mode" => mode)
            .record(bytes as f64);
    }

    pub fn request_error(mode: &'static str, error_kind: &'static str) {
        ::metrics::counter!(
            MetricName::SourcesRequestsError.as_str(),
            "mode" => mode,
            "error" => error_kind
        )
        .increment(1);
    }
}

// ============================================================================
// Normalize Metrics
// ============================================================================

pub mod normalize {
    use super::MetricName;
    use crate::pipeline::normalize::NormalizeReport;

    pub fn report_recorded(report: &NormalizeReport) {
        ::metrics::counter!(MetricName::NormalizeRowsKept.as_str()).increment(report.rows_kept as u64);
        for rejection in &report.rejections {
            ::metrics::counter!(
                MetricName::NormalizeRowsRejected.as_str(),
                "reason" => rejection.reason.label()
            )
            .increment(1);
        }
        ::metrics::counter!(MetricName::NormalizeCellsZeroFilled.as_str())
            .increment(report.cells_zero_filled as u64);
    }
}

// ============================================================================
// Cache Metrics
// ============================================================================

pub mod cache {
    use super::MetricName;

    pub fn hit() {
        ::metrics::counter!(MetricName::CacheHits.as_str()).increment(1);
    }

    pub fn miss() {
        ::metrics::counter!(MetricName::CacheMisses.as_str()).increment(1);
    }
}

// ============================================================================
// Export Metrics
// ============================================================================

pub mod export {
    use super::MetricName;

    pub fn generated(rows: usize) {
        ::metrics::counter!(MetricName::ExportsGenerated.as_str()).increment(1);
        ::metrics::histogram!(MetricName::ExportRows.as_str()).record(rows as f64);
    }
}
