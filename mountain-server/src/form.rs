//! Form extraction that accepts multipart and urlencoded bodies alike.

use std::collections::HashMap;

use axum::async_trait;
use axum::extract::{Form, FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;

use crate::error::ApiError;

/// A file part of a multipart form.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    /// File name the client sent, empty when it sent none.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Text fields and file parts of a submitted form.
///
/// The browser client posts `multipart/form-data`; scripted callers often use
/// `application/x-www-form-urlencoded`. Both land here.
#[derive(Debug, Default)]
pub struct FormFields {
    text: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl FormFields {
    /// First present value among `names`, or an empty string.
    pub fn text(&self, names: &[&str]) -> String {
        names
            .iter()
            .find_map(|name| self.text.get(*name))
            .cloned()
            .unwrap_or_default()
    }

    /// Take the file part named `name`.
    pub fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            text: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Some(content_type) = req.headers().get(CONTENT_TYPE) else {
            // Nothing declared: every field reads as absent.
            return Ok(Self::default());
        };
        let is_multipart = content_type
            .to_str()
            .is_ok_and(|v| v.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(text) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            return Ok(Self {
                text,
                files: HashMap::new(),
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let mut fields = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let is_file = field.file_name().is_some()
                || field
                    .content_type()
                    .is_some_and(|ct| !ct.starts_with("text/"));
            if is_file {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                fields.files.insert(
                    name,
                    Upload {
                        file_name,
                        bytes: bytes.to_vec(),
                    },
                );
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                fields.text.insert(name, value);
            }
        }

        Ok(fields)
    }
}
