use askama::Template;

use crate::app::DashboardView;
use crate::constants::EXPORT_FILE_NAME;
use crate::domain::DateRange;
use crate::pipeline::present::{Metric, TableRow};

const DATE_FMT: &str = "%Y-%m-%d";

pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub delta: String,
    pub trend: &'static str,
}

impl From<&Metric> for MetricCard {
    fn from(m: &Metric) -> Self {
        let trend = match m.delta {
            d if d > 0 => "up",
            d if d < 0 => "down",
            _ => "flat",
        };
        Self {
            label: m.label.to_string(),
            value: m.value.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string()),
            delta: format!("{:+}", m.delta),
            trend,
        }
    }
}

/// Full dashboard page. Every field is preformatted so the template only
/// lays things out.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub has_error: bool,
    pub error_title: &'static str,
    pub error_message: String,
    pub min_date: String,
    pub max_date: String,
    pub start_value: String,
    pub end_value: String,
    pub as_of: String,
    pub cards: Vec<MetricCard>,
    pub row_count: usize,
    pub rows_dropped: usize,
    pub rows: Vec<TableRow>,
    pub export_href: String,
    pub export_name: &'static str,
    pub origin: String,
    pub fetched_at: String,
}

fn fmt_bound(range: Option<DateRange>, pick: fn(&DateRange) -> chrono::NaiveDate) -> String {
    range
        .as_ref()
        .map(|r| pick(r).format(DATE_FMT).to_string())
        .unwrap_or_default()
}

impl DashboardTemplate {
    pub fn from_view(view: &DashboardView) -> Self {
        let start_value = fmt_bound(view.range, |r| r.start);
        let end_value = fmt_bound(view.range, |r| r.end);
        let export_href = if view.range.is_some() {
            format!("/api/export.csv?start={}&end={}", start_value, end_value)
        } else {
            "/api/export.csv".to_string()
        };

        Self {
            has_error: false,
            error_title: "",
            error_message: String::new(),
            min_date: fmt_bound(view.bounds, |r| r.start),
            max_date: fmt_bound(view.bounds, |r| r.end),
            start_value,
            end_value,
            as_of: view
                .summary
                .as_of
                .map(|d| d.format(DATE_FMT).to_string())
                .unwrap_or_default(),
            cards: view.summary.metrics.iter().map(MetricCard::from).collect(),
            row_count: view.summary.row_count,
            rows_dropped: view.load.rows_dropped,
            rows: view.table.clone(),
            export_href,
            export_name: EXPORT_FILE_NAME,
            origin: view.origin.clone(),
            fetched_at: view.fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }

    /// Error page: the message verbatim and nothing from older loads.
    pub fn error(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            has_error: true,
            error_title: title,
            error_message: message.into(),
            min_date: String::new(),
            max_date: String::new(),
            start_value: String::new(),
            end_value: String::new(),
            as_of: String::new(),
            cards: Vec::new(),
            row_count: 0,
            rows_dropped: 0,
            rows: Vec::new(),
            export_href: String::new(),
            export_name: EXPORT_FILE_NAME,
            origin: String::new(),
            fetched_at: String::new(),
        }
    }
}
