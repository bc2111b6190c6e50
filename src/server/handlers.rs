use askama::Template;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use serde::{Deserialize, Deserializer};
use tracing::{error, warn};

use crate::constants::EXPORT_FILE_NAME;
use crate::error::{DashboardError, LoadError};
use crate::observability::metrics as dashboard_metrics;
use crate::pipeline::filter::ViewRequest;
use crate::pipeline::normalize::parse_date;
use crate::server::templates::DashboardTemplate;
use crate::server::AppState;

/// `?start=&end=` as sent by the range form. Blank values mean "unset".
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub end: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }))
}

impl RangeQuery {
    pub fn to_request(&self) -> Result<ViewRequest, ApiError> {
        let parse = |name: &str, value: &Option<String>| match value {
            Some(raw) => parse_date(raw)
                .map(Some)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid {name} date '{raw}'"))),
            None => Ok(None),
        };
        Ok(ViewRequest::new(
            parse("start", &self.start)?,
            parse("end", &self.end)?,
        ))
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Dashboard(DashboardError),
}

impl From<LoadError> for ApiError {
    fn from(e: LoadError) -> Self {
        ApiError::Dashboard(DashboardError::Load(e))
    }
}

impl From<DashboardError> for ApiError {
    fn from(e: DashboardError) -> Self {
        ApiError::Dashboard(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Dashboard(DashboardError::Load(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Dashboard(DashboardError::Export(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Heading for the HTML error page.
    fn title(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Invalid date range.",
            ApiError::Dashboard(DashboardError::Load(_)) => "Could not load data.",
            ApiError::Dashboard(DashboardError::Export(_)) => "Could not export data.",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Dashboard(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message() }));
        (self.status(), body).into_response()
    }
}

pub async fn index(State(state): State<AppState>, Query(query): Query<RangeQuery>) -> Response {
    let rendered = match query.to_request() {
        Ok(request) => state
            .dashboard
            .render(request)
            .await
            .map_err(ApiError::from),
        Err(e) => Err(e),
    };

    let (status, template) = match rendered {
        Ok(view) => (StatusCode::OK, DashboardTemplate::from_view(&view)),
        Err(e) => {
            warn!(error = %e.message(), "Dashboard page rendered with error");
            (e.status(), DashboardTemplate::error(e.title(), e.message()))
        }
    };

    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "Template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering failed").into_response()
        }
    }
}

pub async fn dashboard_json(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state.dashboard.render(query.to_request()?).await?;
    Ok(Json(view))
}

pub async fn series_json(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state.dashboard.render(query.to_request()?).await?;
    Ok(Json(view.series))
}

pub async fn report_json(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.dashboard.load().await?;
    Ok(Json(snapshot.report.clone()))
}

pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.dashboard.export(query.to_request()?).await?;
    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let source = state.dashboard.source();
    Json(serde_json::json!({
        "status": "healthy",
        "service": "adiz-dashboard",
        "version": env!("CARGO_PKG_VERSION"),
        "source": {
            "mode": source.mode(),
            "location": source.describe(),
        }
    }))
}

pub async fn metrics() -> Response {
    match dashboard_metrics::render() {
        Some(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}
