//! `GET /` and `GET /HR`.

use axum::Json;
use axum::extract::State;
use axum::response::Html;

use crate::error::ApiError;
use crate::state::{AppState, RecruiterPage};

/// Service status.
pub async fn status() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "online",
        "output": "Welcome to the Mountain API Service! 🏔️",
        "🌌": "Or perhaps you're looking for the answer to the ultimate question of life, the universe, and everything?",
    }))
}

/// The recruiter chat page.
pub async fn recruiter(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let path = state.settings.static_dir.join("recruiter").join("recruiter.html");
    let template = tokio::fs::read_to_string(&path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "mountain.pages.template_missing");
        ApiError::NotFound("recruiter page is not installed".into())
    })?;
    Ok(Html(render(&template, &state.settings.recruiter)))
}

fn render(template: &str, page: &RecruiterPage) -> String {
    let countdown = page.countdown.to_string();
    [
        ("username", escape_html(&page.username)),
        ("assistant_id", escape_html(&page.assistant_id)),
        ("countdown", countdown),
    ]
    .iter()
    .fold(template.to_string(), |html, (key, value)| {
        html.replace(&format!("{{{{ {key} }}}}"), value)
            .replace(&format!("{{{{{key}}}}}"), value)
    })
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
