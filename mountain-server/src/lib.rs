#![deny(missing_docs)]
//! HTTP front end for the Mountain API service.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | [`routes::pages::status`] |
//! | `GET /HR` | [`routes::pages::recruiter`] |
//! | `POST /chatbot/` | [`routes::chat::chatbot`] |
//! | `POST /vision/` | [`routes::vision::vision`] |
//! | `POST /tts/` | [`routes::speech::tts`] |
//! | `POST /stt/` | [`routes::speech::stt`] |
//! | `/static/*` | files under [`Settings::static_dir`] |
//!
//! [`router`] assembles everything around an [`AppState`];
//! [`Args::build_state`] builds that state from flags and environment.

pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod routes;
pub mod state;

pub use config::{Args, ConfigError, ProviderKind};
pub use error::ApiError;
pub use http::router;
pub use state::{AppState, RecruiterPage, Settings};
