//! Request body parsing for the form-based endpoints.

use crate::ApiError;
use axum::{
    Form,
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::header::CONTENT_TYPE,
};
use std::collections::HashMap;
use whisker_core::FeedbackUpdate;

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), err.body_text())
}

/// Parse a consent flag. Absent means no consent.
///
/// # Errors
///
/// Returns 400 for anything other than true/false, 1/0, yes/no, on/off.
pub fn parse_consent(value: Option<&str>) -> Result<bool, ApiError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(false);
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ApiError::bad_request(format!(
            "rgpd_consent must be a boolean, got '{}'",
            other
        ))),
    }
}

/// The multipart body of a prediction request.
#[derive(Debug, Clone, Default)]
pub struct PredictUpload {
    /// Client-side filename of the uploaded file
    pub filename: Option<String>,
    /// Declared MIME type of the uploaded file
    pub content_type: Option<String>,
    /// Raw file contents
    pub bytes: Vec<u8>,
    /// Whether the uploader agreed to data retention
    pub rgpd_consent: bool,
}

impl PredictUpload {
    /// Read the `file` and `rgpd_consent` fields. Other fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns 400 if the body is malformed, the file is missing, or consent
    /// cannot be parsed; 413 if the body exceeds the upload limit.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut upload = PredictUpload::default();
        let mut has_file = false;
        let mut consent = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("file") => {
                    upload.filename = field.file_name().map(str::to_string);
                    upload.content_type = field.content_type().map(str::to_string);
                    upload.bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
                    has_file = true;
                }
                Some("rgpd_consent") => {
                    consent = Some(field.text().await.map_err(multipart_error)?);
                }
                _ => {}
            }
        }

        if !has_file {
            return Err(ApiError::bad_request("No file uploaded"));
        }
        upload.rgpd_consent = parse_consent(consent.as_deref())?;
        Ok(upload)
    }

    /// Whether the declared MIME type is `image/*`.
    ///
    /// Without a declared type the bytes themselves are sniffed.
    pub fn is_image(&self) -> bool {
        match self.content_type.as_deref() {
            Some(content_type) => content_type.starts_with("image/"),
            None => whisker_models::inspect_image(&self.bytes).is_some(),
        }
    }
}

/// Body of `POST /api/update-feedback`.
///
/// Accepts `application/x-www-form-urlencoded` and `multipart/form-data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackForm {
    /// Record to update
    pub feedback_id: i32,
    /// The rating and comment to apply
    pub update: FeedbackUpdate,
}

impl FeedbackForm {
    /// Build from decoded form fields.
    ///
    /// # Errors
    ///
    /// Returns 400 if `feedback_id` is missing or either number is not an integer.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, ApiError> {
        let feedback_id = fields
            .get("feedback_id")
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::bad_request("feedback_id is required"))?
            .parse::<i32>()
            .map_err(|_| ApiError::bad_request("feedback_id must be an integer"))?;

        let user_feedback = match fields.get("user_feedback").map(|v| v.trim()) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i32>()
                    .map_err(|_| ApiError::bad_request("user_feedback must be 0 or 1"))?,
            ),
        };

        Ok(Self {
            feedback_id,
            update: FeedbackUpdate {
                user_feedback,
                user_comment: fields.get("user_comment").cloned(),
            },
        })
    }
}

#[axum::async_trait]
impl<S> FromRequest<S> for FeedbackForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        let fields = if is_multipart {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
            let mut fields = HashMap::new();
            while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                let value = field.text().await.map_err(multipart_error)?;
                fields.insert(name, value);
            }
            fields
        } else {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
            fields
        };

        Self::from_fields(&fields)
    }
}
