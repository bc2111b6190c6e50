use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

use crate::app::ports::DataSource;
use crate::domain::DateRange;
use crate::error::{DashboardError, LoadError};
use crate::observability::metrics;
use crate::pipeline::cache::{DatasetCache, LoadedDataset};
use crate::pipeline::export::export_csv;
use crate::pipeline::filter::ViewRequest;
use crate::pipeline::normalize::Normalizer;
use crate::pipeline::present::{summarize, table_rows, ChartSeries, Summary, TableRow};

/// Row accounting of the load behind a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadDigest {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
}

/// Everything a dashboard page needs, owned so it can outlive the snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// Oldest and newest date in the dataset (picker bounds).
    pub bounds: Option<DateRange>,
    /// Range actually applied.
    pub range: Option<DateRange>,
    pub summary: Summary,
    pub series: ChartSeries,
    pub table: Vec<TableRow>,
    pub load: LoadDigest,
    pub origin: String,
    pub fetched_at: DateTime<Utc>,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Resolver -> Normalizer -> Filter -> Presenter, with the dataset cached
/// for the configured TTL.
pub struct DashboardUseCase {
    source: Box<dyn DataSource>,
    normalizer: Normalizer,
    cache: DatasetCache,
}

impl DashboardUseCase {
    pub fn new(source: Box<dyn DataSource>, normalizer: Normalizer, cache: DatasetCache) -> Self {
        Self {
            source,
            normalizer,
            cache,
        }
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    /// Current dataset, from cache while fresh. Failures are never papered
    /// over with an older snapshot.
    #[instrument(skip(self), fields(mode = self.source.mode()))]
    pub async fn load(&self) -> Result<Arc<LoadedDataset>, LoadError> {
        if let Some(snapshot) = self.cache.get() {
            metrics::cache::hit();
            return Ok(snapshot);
        }
        metrics::cache::miss();

        let mode = self.source.mode();
        let started = Instant::now();
        let table = match self.source.fetch().await {
            Ok(table) => table,
            Err(e) => {
                error!(error = %e, kind = e.kind(), "Failed to fetch source table");
                metrics::sources::request_error(mode, e.kind());
                return Err(e);
            }
        };
        metrics::sources::request_success(mode, started.elapsed().as_secs_f64(), table.bytes.len());

        let normalized = self.normalizer.normalize(&table.bytes).map_err(|e| {
            error!(error = %e, kind = e.kind(), origin = %table.origin, "Failed to normalize source table");
            e
        })?;
        metrics::normalize::report_recorded(&normalized.report);

        info!(
            origin = %table.origin,
            bytes = table.bytes.len(),
            rows_kept = normalized.report.rows_kept,
            rows_dropped = normalized.report.rows_dropped(),
            "Loaded dataset"
        );

        Ok(self.cache.store(LoadedDataset {
            dataset: normalized.dataset,
            report: normalized.report,
            origin: table.origin,
            fetched_at: Utc::now(),
        }))
    }

    pub async fn render(&self, request: ViewRequest) -> Result<DashboardView, LoadError> {
        let snapshot = self.load().await?;
        let bounds = snapshot.dataset.span();
        let range = request.resolve(bounds);
        let view = snapshot.dataset.filter(range);

        Ok(DashboardView {
            bounds,
            range: view.range(),
            summary: summarize(&view),
            series: ChartSeries::from_view(&view),
            table: table_rows(&view),
            load: LoadDigest {
                rows_read: snapshot.report.rows_read,
                rows_kept: snapshot.report.rows_kept,
                rows_dropped: snapshot.report.rows_dropped(),
            },
            origin: snapshot.origin.clone(),
            fetched_at: snapshot.fetched_at,
        })
    }

    /// CSV export of the same view `render` would show for `request`.
    pub async fn export(&self, request: ViewRequest) -> Result<Vec<u8>, DashboardError> {
        let snapshot = self.load().await?;
        let view = snapshot.dataset.filter(request.resolve(snapshot.dataset.span()));
        let bytes = export_csv(&view)?;
        metrics::export::generated(view.len());
        info!(rows = view.len(), bytes = bytes.len(), "Generated CSV export");
        Ok(bytes)
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}
