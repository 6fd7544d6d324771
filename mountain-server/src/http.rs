//! Route table and middleware.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::routes::{chat, pages, speech, vision};
use crate::state::AppState;

/// Status endpoint path.
pub const STATUS_PATH: &str = "/";
/// Chat endpoint path.
pub const CHATBOT_PATH: &str = "/chatbot/";
/// Image endpoint path.
pub const VISION_PATH: &str = "/vision/";
/// Synthesis endpoint path.
pub const TTS_PATH: &str = "/tts/";
/// Transcription endpoint path.
pub const STT_PATH: &str = "/stt/";
/// Recruiter page path.
pub const RECRUITER_PATH: &str = "/HR";
/// Prefix for files under the static directory.
pub const STATIC_PREFIX: &str = "/static";

/// Largest request body accepted (image and audio uploads).
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Every route, with permissive CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.settings.static_dir);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(STATUS_PATH, get(pages::status))
        .route(RECRUITER_PATH, get(pages::recruiter))
        .route(CHATBOT_PATH, post(chat::chatbot))
        .route(VISION_PATH, post(vision::vision))
        .route(TTS_PATH, post(speech::tts))
        .route(STT_PATH, post(speech::stt))
        .nest_service(STATIC_PREFIX, static_files)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
