//! Router assembly

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::Config;
use utoipa::OpenApi;

use crate::api_doc::ApiDoc;
use crate::constants::{API_PREFIX, ASSETS_ROUTE};
use crate::handlers::{health, thumbnail_upload, video_upload, videos};
use crate::state::AppState;

pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    let body_limit = usize::try_from(config.max_upload_bytes()).unwrap_or(usize::MAX);

    tracing::info!(
        max_upload_bytes = config.max_upload_bytes(),
        max_thumbnail_bytes = config.max_thumbnail_bytes(),
        assets_root = %config.assets_root().display(),
        "Configuring routes"
    );

    Router::new()
        .nest(API_PREFIX, api_routes())
        .nest_service(ASSETS_ROUTE, ServeDir::new(config.assets_root()))
        // Multipart reads are bounded by DefaultBodyLimit, raw bodies by the tower layer.
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/videos", post(videos::create_video))
        .route("/videos/{videoID}", get(videos::get_video))
        .route(
            "/thumbnail_upload/{videoID}",
            post(thumbnail_upload::upload_thumbnail),
        )
        .route("/video_upload/{videoID}", post(video_upload::upload_video))
}
