//! Web server for the sunburst page
//!
//! One route, `/`. Every request reruns the pipeline against the input file,
//! so edits to the CSV show up on reload.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::application::render::page::escape_html;
use crate::application::services::OrganigramService;
use crate::application::ApplicationError;
use crate::infrastructure::{InfraError, InfraResult};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OrganigramService>,
    pub input: Arc<PathBuf>,
}

/// Failed page render, shown to the browser as a 500.
pub struct PageError(ApplicationError);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!("render failed: {}", self.0);
        let body = format!(
            "<!DOCTYPE html>\n<html><head><title>Error</title></head><body><h1>Error</h1><p>{}</p></body></html>\n",
            escape_html(&self.0.to_string())
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}

pub fn router(service: Arc<OrganigramService>, input: PathBuf) -> Router {
    Router::new()
        .route("/", get(index))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState {
            service,
            input: Arc::new(input),
        })
}

/// Reads and renders on the blocking pool; the runtime has a single thread.
async fn index(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let AppState { service, input } = state;
    tokio::task::spawn_blocking(move || service.sunburst_page(&input))
        .await
        .map_err(|e| ApplicationError::OperationFailed {
            context: "render sunburst page".to_string(),
            source: Box::new(e),
        })
        .and_then(|page| page)
        .map(Html)
        .map_err(PageError)
}

/// Serve the sunburst page on `host:port` until the process is stopped.
pub fn serve(service: Arc<OrganigramService>, input: PathBuf, host: &str, port: u16) -> InfraResult<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| InfraError::io("start async runtime", e))?;

    let addr = format!("{host}:{port}");
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| InfraError::Server {
                message: format!("bind {addr}: {e}"),
            })?;
        info!("serving {} on http://{}", input.display(), addr);

        axum::serve(listener, router(service, input))
            .await
            .map_err(|e| InfraError::io("serve http", e))
    })
}
