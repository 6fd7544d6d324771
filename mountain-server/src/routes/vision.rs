//! `POST /vision/`.

use std::path::Path;

use axum::Json;
use axum::extract::State;
use mountain_types::VisionRequest;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::form::FormFields;
use crate::state::AppState;

const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// What the client gets back for an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionReply {
    /// Verdict or description.
    #[serde(rename = "VisionOutput")]
    pub vision_output: String,
    /// Thread to continue on.
    pub thread_id: String,
}

fn has_accepted_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Check an uploaded image and hand it to the vision collaborator.
pub async fn vision(
    State(state): State<AppState>,
    mut fields: FormFields,
) -> Result<Json<VisionReply>, ApiError> {
    let upload = fields
        .take_file("image_file")
        .ok_or_else(|| ApiError::BadRequest("No image file provided.".into()))?;

    if !has_accepted_extension(&upload.file_name) {
        return Err(ApiError::BadRequest(
            "Invalid image file extension. Only JPG, JPEG, or PNG files are accepted.".into(),
        ));
    }
    if upload.bytes.is_empty() {
        return Err(ApiError::BadRequest("Empty image file.".into()));
    }

    let request = VisionRequest {
        user_input: fields.text(&["userinput", "userInput", "user_input"]),
        thread_id: fields.text(&["thread_id", "threadId"]),
        assistant_id: fields.text(&["assistant_id", "assistantId"]),
        file_name: upload.file_name,
        image: upload.bytes,
    };
    tracing::info!(
        thread_id = %request.thread_id,
        file = %request.file_name,
        bytes = request.image.len(),
        "mountain.vision.received"
    );

    let output = state
        .vision
        .describe(request)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(VisionReply {
        vision_output: output.content,
        thread_id: output.thread_id,
    }))
}
