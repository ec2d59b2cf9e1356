//! HTTP endpoint handlers

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use stature_core::{DashboardError, DataSource, PreviewConfig, Report};
use stature_io::{IoError, Table};

use crate::charts::{preview_table, ChartError, SvgCharts};
use crate::page::{Page, PageBody};
use crate::AppState;

/// Multipart field carrying the uploaded table
pub const UPLOAD_FIELD: &str = "file";

/// Request failure
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Analysis task failed: {0}")]
    Task(String),
}

impl From<IoError> for AppError {
    fn from(err: IoError) -> Self {
        AppError::Dashboard(err.into())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Dashboard(DashboardError::MissingColumn { .. })
            | AppError::Dashboard(DashboardError::NoData { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Dashboard(DashboardError::MalformedInput(_)) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Dashboard(_) | AppError::Chart(_) | AppError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn log(&self) {
        if self.status().is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
    }
}

/// Error body for the JSON endpoints
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Dashboard page
///
/// Shows the upload form, or analyzes the configured file.
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    if let DataSource::Upload = state.config.source {
        return Html(Page::new(&state.config.source).render()).into_response();
    }
    blocking(move || match &state.config.source {
        DataSource::Path(path) => dashboard_page(&state, &display_name(path), load_path(path)),
        DataSource::Upload => Html(Page::new(&state.config.source).render()).into_response(),
    })
    .await
    .unwrap_or_else(IntoResponse::into_response)
}

/// Analyze an uploaded file and show the dashboard page
pub async fn upload(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let (name, bytes) = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(err) => return error_page(Page::new(&state.config.source), err),
    };
    blocking(move || {
        let table = Table::load_bytes(&name, bytes).map_err(AppError::from);
        dashboard_page(&state, &name, table)
    })
    .await
    .unwrap_or_else(IntoResponse::into_response)
}

/// Analyze an uploaded file and return the report as JSON
pub async fn analyze_upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Report>, AppError> {
    let (name, bytes) = read_upload(multipart).await?;
    let report = blocking(move || -> Result<Report, AppError> {
        let table = Table::load_bytes(&name, bytes)?;
        Ok(state.dashboard.analyze(&table)?.report())
    })
    .await??;
    Ok(Json(report))
}

/// Report for the configured file
pub async fn fixed_report(State(state): State<Arc<AppState>>) -> Result<Json<Report>, AppError> {
    let report = blocking(move || -> Result<Report, AppError> {
        let table = load_path(fixed_path(&state)?)?;
        Ok(state.dashboard.analyze(&table)?.report())
    })
    .await??;
    Ok(Json(report))
}

/// Preview image of the configured file
pub async fn preview_image(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let svg = blocking(move || -> Result<String, AppError> {
        let table = load_path(fixed_path(&state)?)?;
        Ok(render_preview(&state.config.preview, &table)?)
    })
    .await??;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

/// Run file parsing and chart rendering off the async worker threads
async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Task(e.to_string()))
}

/// Server status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub column: String,
    pub source: String,
}

/// Get server status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        column: state.dashboard.column().to_string(),
        source: state.config.source.describe(),
    })
}

/// First multipart field named [`UPLOAD_FIELD`], with its file name
async fn read_upload(mut multipart: Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("The uploaded file is empty".to_string()));
        }
        tracing::info!(file = %name, bytes = bytes.len(), "received upload");
        return Ok((name, bytes.to_vec()));
    }
    Err(AppError::BadRequest(format!(
        "No file was uploaded in field \"{}\"",
        UPLOAD_FIELD
    )))
}

fn fixed_path(state: &AppState) -> Result<&Path, AppError> {
    match &state.config.source {
        DataSource::Path(path) => Ok(path.as_path()),
        DataSource::Upload => Err(AppError::NotFound(
            "No fixed data file is configured".to_string(),
        )),
    }
}

fn load_path(path: &Path) -> Result<Table, AppError> {
    let table = Table::load_file(&path.to_string_lossy())?;
    tracing::info!(path = %path.display(), rows = table.num_rows(), "loaded table");
    Ok(table)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Preview image for a table, also written to the export path when set
fn render_preview(config: &PreviewConfig, table: &Table) -> Result<String, ChartError> {
    let svg = preview_table(&table.head(config.rows))?;
    if let Some(path) = &config.export_path {
        if let Err(e) = std::fs::write(path, &svg) {
            tracing::warn!(path = %path.display(), error = %e, "failed to export preview image");
        }
    }
    Ok(svg)
}

/// Full dashboard page for a loaded (or failed) table
///
/// The preview stays visible when the analysis itself fails.
fn dashboard_page(state: &AppState, file_name: &str, table: Result<Table, AppError>) -> Response {
    let mut page = Page::new(&state.config.source);
    page.file_name = Some(file_name);

    let table = match table {
        Ok(table) => table,
        Err(err) => return error_page(page, err),
    };

    let preview = match render_preview(&state.config.preview, &table) {
        Ok(svg) => svg,
        Err(err) => return error_page(page, err.into()),
    };
    page.preview = Some((preview.as_str(), table.num_rows()));

    let analysis = match state.dashboard.analyze(&table) {
        Ok(analysis) => analysis,
        Err(err) => return error_page(page, err.into()),
    };

    let charts = match state
        .dashboard
        .render(&analysis, &SvgCharts::new(&state.config.charts))
    {
        Ok(charts) => charts,
        Err(err) => return error_page(page, err.into()),
    };

    let report = analysis.report();
    page.body = PageBody::Results {
        report: &report,
        charts: &charts,
    };
    Html(page.render()).into_response()
}

fn error_page(mut page: Page<'_>, err: AppError) -> Response {
    err.log();
    page.body = PageBody::Error(err.to_string());
    (err.status(), Html(page.render())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let missing: AppError = DashboardError::MissingColumn {
            column: "Alt".to_string(),
        }
        .into();
        assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let no_data: AppError = DashboardError::NoData {
            column: "Alt".to_string(),
        }
        .into();
        assert_eq!(no_data.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let malformed: AppError = IoError::InvalidFormat("bad".to_string()).into();
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

        let io: AppError = IoError::FileNotFound("x.csv".to_string()).into();
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let chart: AppError = ChartError::Drawing("oops".to_string()).into();
        assert_eq!(chart.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let task = AppError::Task("cancelled".to_string());
        assert_eq!(task.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_blocking_runs_work() {
        let value = blocking(|| 6 * 7).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_blocking_reports_panics() {
        let err = blocking(|| -> usize { panic!("chart backend crashed") })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Task(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("data/alturas.xlsx")), "alturas.xlsx");
    }

    #[test]
    fn test_render_preview_exports() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("preview.svg");
        let config = PreviewConfig {
            rows: 2,
            export_path: Some(export.clone()),
        };
        let table = Table::load_bytes("t.csv", b"Nome,Alt\nA,1.6\nB,1.7\nC,1.8\n".to_vec()).unwrap();

        let svg = render_preview(&config, &table).unwrap();

        assert_eq!(std::fs::read_to_string(&export).unwrap(), svg);
        assert!(svg.contains("Nome"));
    }

    #[test]
    fn test_render_preview_export_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = PreviewConfig {
            rows: 5,
            export_path: Some(dir.path().join("missing").join("preview.svg")),
        };
        let table = Table::load_bytes("t.csv", b"Alt\n1.6\n".to_vec()).unwrap();
        assert!(render_preview(&config, &table).is_ok());
    }
}
