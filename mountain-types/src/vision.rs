//! Vision collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An uploaded image plus the conversation it belongs to.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// Text accompanying the image.
    pub user_input: String,
    /// Conversation thread.
    pub thread_id: String,
    /// Assistant persona.
    pub assistant_id: String,
    /// Original file name as uploaded.
    pub file_name: String,
    /// Raw image bytes (never empty).
    pub image: Vec<u8>,
}

/// What the vision collaborator says about an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionOutput {
    /// Description or verdict.
    pub content: String,
    /// Thread to continue on.
    pub thread_id: String,
}

/// Errors from vision collaborators.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum VisionError {
    /// The image could not be processed.
    #[error("vision processing failed: {0}")]
    Failed(String),
}

/// Image analysis backend.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Analyse one image.
    async fn describe(&self, request: VisionRequest) -> Result<VisionOutput, VisionError>;
}
