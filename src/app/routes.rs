use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use tokio_util::io::ReaderStream;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::app::model::{ContactAccepted, ErrorBody};
use crate::contact::{self, ContactError, ContactSettings, ContactSubmission};
use crate::mailer::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<dyn Mailer>,
    pub contact: Arc<ContactSettings>,
    pub snapshot_path: PathBuf,
}

/// Builds the app router. `web_dir` is served for every other path when it
/// contains an `index.html`.
pub fn router(state: AppState, web_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app = Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/api/contact", post(submit_contact))
        .route("/api/content", get(download_snapshot))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(web_dir) = web_dir {
        let web_index = web_dir.join("index.html");
        if web_index.exists() {
            let static_files =
                ServeDir::new(web_dir).not_found_service(ServeFile::new(web_index));
            app = app.fallback_service(static_files);
        } else {
            tracing::warn!(web_dir = %web_dir.display(), "web assets not found; not serving frontend");
        }
    }

    app
}

async fn submit_contact(
    State(state): State<AppState>,
    Json(submission): Json<ContactSubmission>,
) -> Response {
    let result = contact::submit(
        state.mailer.as_ref(),
        &state.contact,
        &submission,
        chrono::Utc::now(),
    )
    .await;

    match result {
        Ok(()) => (StatusCode::OK, Json(ContactAccepted::sent())).into_response(),
        Err(err) if err.is_client_error() => {
            tracing::debug!(%err, "rejected contact submission");
            (StatusCode::BAD_REQUEST, Json(ErrorBody::new(err.to_string()))).into_response()
        }
        Err(err) => {
            if let ContactError::Delivery(source) = &err {
                tracing::error!(error = %format!("{source:#}"), "contact email delivery failed");
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(err.to_string())),
            )
                .into_response()
        }
    }
}

async fn download_snapshot(State(state): State<AppState>) -> Result<Response, StatusCode> {
    let file = tokio::fs::File::open(&state.snapshot_path)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;
    let stream = ReaderStream::new(file);
    let body = axum::body::Body::from_stream(stream);

    let mut resp = Response::new(body);
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Ok(resp)
}
