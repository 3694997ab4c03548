//! HTTP server for the browser front-end

use crate::config::Config;
use crate::error::FileReplaceError;
use crate::input::UploadedFile;
use crate::output::archive;
use crate::output::formatter::HtmlFileRow;
use crate::output::ReplacementSummary;
use crate::processing::{Matcher, ReplaceEngine};
use crate::web::store::{ResultStore, StoredArchive};
use crate::web::templates::{FormTemplate, ResultTemplate};
use askama::Template;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use log::{error, info, warn};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use uuid::Uuid;

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    engine: Arc<ReplaceEngine>,
    results: Arc<Mutex<ResultStore>>,
}

impl AppState {
    pub fn new(config: Config) -> crate::error::Result<Self> {
        let engine = ReplaceEngine::new(&config)?;
        let results = ResultStore::new(config.web.max_stored_results);
        Ok(Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            results: Arc::new(Mutex::new(results)),
        })
    }
}

/// Error page returned by the handlers
struct WebError {
    status: StatusCode,
    message: String,
}

impl WebError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<FileReplaceError> for WebError {
    fn from(err: FileReplaceError) -> Self {
        match err {
            FileReplaceError::InvalidInput(_) => Self::bad_request(err.to_string()),
            other => Self::internal(other.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{}", self.message);
        }
        (self.status, self.message).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();
    Router::new()
        .route("/", get(index))
        .route("/replace", post(replace))
        .route("/download/:id", get(download))
        .route("/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let bind = config.web.bind.clone();
    let state = AppState::new(config)?;
    let app = router(state);

    let listener = TcpListener::bind(&bind).await?;
    info!("File replace UI listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    render_form(FormTemplate::new(state.config.replace.case_sensitive))
}

fn render_form(template: FormTemplate) -> Result<Html<String>, WebError> {
    template
        .render()
        .map(Html)
        .map_err(|e| WebError::internal(e.to_string()))
}

#[derive(Default)]
struct ReplaceForm {
    files: Vec<UploadedFile>,
    find: String,
    replace: String,
    case_sensitive: bool,
}

async fn read_form(mut multipart: Multipart) -> Result<ReplaceForm, WebError> {
    let mut form = ReplaceForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::bad_request(format!("Malformed upload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| WebError::bad_request(format!("Failed to read upload: {}", e)))?;
                // Browsers send an empty part when no file was picked
                if !file_name.is_empty() {
                    form.files.push(UploadedFile::new(file_name, bytes.to_vec()));
                }
            }
            "find" | "replace" | "case_sensitive" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| WebError::bad_request(format!("Failed to read field: {}", e)))?;
                match name.as_str() {
                    "find" => form.find = value,
                    "replace" => form.replace = value,
                    _ => form.case_sensitive = matches!(value.as_str(), "on" | "true" | "1"),
                }
            }
            other => warn!("Ignoring unexpected form field '{}'", other),
        }
    }

    Ok(form)
}

async fn replace(State(state): State<AppState>, multipart: Multipart) -> Result<Html<String>, WebError> {
    let form = read_form(multipart).await?;

    let warning = if form.files.is_empty() {
        Some("Please upload at least one file.")
    } else if form.find.is_empty() {
        Some("Please enter a word to find.")
    } else {
        None
    };
    if let Some(warning) = warning {
        let mut template = FormTemplate::new(form.case_sensitive).with_warning(warning);
        template.find = form.find;
        template.replace = form.replace;
        return render_form(template);
    }

    let matcher = Matcher::new(&form.find, &form.replace, form.case_sensitive)?;
    info!(
        "Processing {} uploaded files ({} bytes)",
        form.files.len(),
        form.files.iter().map(|f| f.bytes.len()).sum::<usize>()
    );

    let engine = Arc::clone(&state.engine);
    let files = form.files;
    let batch_matcher = matcher.clone();
    let batch = tokio::task::spawn_blocking(move || engine.process_batch(&files, &batch_matcher))
        .await
        .map_err(|e| WebError::internal(format!("Processing task failed: {}", e)))??;

    let summary = ReplacementSummary::from_outcomes(&matcher, &batch.outcomes);
    let download_url = if summary.processed_count() > 0 {
        let archive = StoredArchive {
            file_name: state.config.output.archive_name.clone(),
            format: batch.archive_format,
            bytes: batch.archive,
        };
        let id = state
            .results
            .lock()
            .map_err(|_| WebError::internal("Result store is poisoned"))?
            .insert(archive);
        Some(format!("/download/{}", id))
    } else {
        None
    };

    let rows = summary.files.iter().map(HtmlFileRow::from_summary).collect();
    ResultTemplate::new(rows, summary.total_replacements, download_url)
        .render()
        .map(Html)
        .map_err(|e| WebError::internal(e.to_string()))
}

async fn download(Path(id): Path<String>, State(state): State<AppState>) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return (StatusCode::NOT_FOUND, "Unknown download").into_response();
    };

    let stored = match state.results.lock() {
        Ok(results) => results.get(&id).cloned(),
        Err(_) => return WebError::internal("Result store is poisoned").into_response(),
    };
    let Some(stored) = stored else {
        return (StatusCode::NOT_FOUND, "Unknown or expired download").into_response();
    };

    let file_name = archive::sanitize_file_name(&stored.file_name);
    (
        [
            (header::CONTENT_TYPE, stored.format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        stored.bytes,
    )
        .into_response()
}
