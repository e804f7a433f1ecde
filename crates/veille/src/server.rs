use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{info, info_span, warn};
use uuid::Uuid;
use veille_core::{
    error::ReportError,
    filters::{FilterSpec, YearRange},
    pipelines::{MentionReport, ReportOptions, ReportSession},
    temporal::{GapPolicy, Granularity},
};

use crate::{config::AppConfig, html::render_report_html};

pub const REPORT_ID_HEADER: &str = "x-report-id";
const UPLOAD_FIELD: &str = "file";
const AUTHOR_PARAM: &str = "author";

#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unprocessable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Unprocessable(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("invalid multipart body: {}", err.body_text()))
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        if err.is_schema_error() {
            ApiError::Unprocessable(err.to_string())
        } else if matches!(err, ReportError::Parser(_)) {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

/// Query parameters of `POST /api/report`. Authors are selected with repeated
/// `author=` parameters, taken verbatim, or with a comma-separated `authors` list.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub granularity: Option<String>,
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,
    pub authors: Option<String>,
    #[serde(default)]
    pub keep_undated: bool,
    #[serde(default)]
    pub zero_fill: bool,
}

impl ReportQuery {
    fn report_options(&self, defaults: ReportOptions) -> Result<ReportOptions, ApiError> {
        let mut options = defaults;
        if let Some(raw) = &self.granularity {
            options.granularity = raw.parse::<Granularity>().map_err(ApiError::BadRequest)?;
        }
        if self.zero_fill {
            options.gap_policy = GapPolicy::ZeroFill;
        }
        Ok(options)
    }

    fn filter_spec(&self, observed: Option<YearRange>, author_params: &[String]) -> FilterSpec {
        let year_range = match (self.from_year, self.to_year) {
            (None, None) => None,
            (Some(min), Some(max)) => Some(YearRange::new(min, max)),
            (Some(min), None) => {
                Some(YearRange::new(min, observed.map_or(min, |r| r.max.max(min))))
            }
            (None, Some(max)) => {
                Some(YearRange::new(observed.map_or(max, |r| r.min.min(max)), max))
            }
        };

        let listed = self
            .authors
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim);
        let authors = author_params
            .iter()
            .map(|author| author.trim())
            .chain(listed)
            .filter(|author| !author.is_empty())
            .map(str::to_string)
            .collect();

        FilterSpec {
            year_range,
            authors,
            keep_undated: self.keep_undated,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;
    Router::new()
        .route("/health", get(health))
        .route("/generate-report", post(generate_report))
        .route("/api/report", post(api_report))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub async fn serve(config: AppConfig) -> Result<()> {
    let bind_addr = config.server.bind_addr.clone();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(AppState::new(config)).into_make_service())
        .await
        .context("server terminated")?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field.bytes().await?;
            return Ok(bytes.to_vec());
        }
    }
    Err(ApiError::BadRequest(format!(
        "multipart field '{UPLOAD_FIELD}' is required"
    )))
}

fn report_id_header(report_id: Uuid) -> [(HeaderName, HeaderValue); 1] {
    let value = HeaderValue::from_str(&report_id.to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("invalid"));
    [(HeaderName::from_static(REPORT_ID_HEADER), value)]
}

fn run_report(
    report_id: Uuid,
    upload: &[u8],
    query: &ReportQuery,
    author_params: &[String],
    defaults: ReportOptions,
) -> Result<MentionReport, ApiError> {
    info_span!("report", %report_id).in_scope(|| {
        let session = ReportSession::from_bytes(upload).map_err(|err| {
            warn!(error = %err, "rejected upload");
            ApiError::from(err)
        })?;
        let options = query.report_options(defaults)?;
        let filter = query.filter_spec(session.filter_options().years, author_params);
        let report = session.report(&filter, &options);
        info!(
            records = session.dataset().len(),
            total = report.kpis.total_mentions,
            granularity = %options.granularity,
            "report generated"
        );
        Ok(report)
    })
}

async fn generate_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let report_id = Uuid::new_v4();
    let upload = read_upload(multipart).await?;
    let defaults = ReportOptions {
        granularity: Granularity::Month,
        gap_policy: GapPolicy::Observed,
        ..state.config.report
    };
    let report = run_report(report_id, &upload, &ReportQuery::default(), &[], defaults)?;
    Ok((report_id_header(report_id), Html(render_report_html(&report))).into_response())
}

async fn api_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
    Query(params): Query<Vec<(String, String)>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let report_id = Uuid::new_v4();
    let author_params: Vec<String> = params
        .into_iter()
        .filter(|(key, _)| key == AUTHOR_PARAM)
        .map(|(_, value)| value)
        .collect();
    let upload = read_upload(multipart).await?;
    let report = run_report(report_id, &upload, &query, &author_params, state.config.report)?;
    Ok((report_id_header(report_id), Json(report)).into_response())
}
