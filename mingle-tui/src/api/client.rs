use std::path::{Path, PathBuf};

use reqwest::multipart;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult};
use mingle_types::{ErrorResponse, LoginRequest, LoginResponse, User};

/// API client for communicating with the Mingle server
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Helper to handle API responses
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            // Prefer the backend's structured error message when the body
            // parses as one.
            let structured_message = serde_json::from_str::<ErrorResponse>(&error_text)
                .ok()
                .and_then(|body| body.message().map(str::to_string));

            // Clean up HTML error messages (e.g., from proxy 404 pages)
            let clean_error = if let Some(message) = structured_message {
                message
            } else if error_text.contains("<html>") || error_text.contains("<!DOCTYPE") {
                format!(
                    "Server returned {} error. Please check the server URL.",
                    status.as_u16()
                )
            } else {
                error_text
            };

            match status.as_u16() {
                404 => Err(ApiError::NotFound(clean_error)),
                401 => Err(ApiError::Unauthorized(clean_error)),
                400 => Err(ApiError::BadRequest(clean_error)),
                _ => Err(ApiError::Api(clean_error)),
            }
        }
    }

    // Authentication endpoints

    /// Log in with email and password
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let url = format!("{}/auth/login", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;
        self.handle_response(response).await
    }

    /// Register a new account. All field values travel as multipart form
    /// data together with the picture bytes and the derived file name.
    pub async fn register(&self, request: RegisterRequest) -> ApiResult<User> {
        let url = format!("{}/auth/register", self.base_url);
        let form = build_register_form(request).await?;
        let response = self.client.post(&url).multipart(form).send().await?;
        self.handle_response(response).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        let base_url = std::env::var("MINGLE_SERVER_URL")
            .unwrap_or_else(|_| crate::config::DEFAULT_SERVER_URL.to_string());
        Self::new(base_url)
    }
}

/// Payload for the registration endpoint, built by the form once every
/// field validates. `picture_path` is the selected file's name and is what
/// the server stores alongside the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub location: String,
    pub occupation: String,
    pub picture: PathBuf,
    pub picture_path: String,
}

async fn build_register_form(request: RegisterRequest) -> ApiResult<multipart::Form> {
    let picture_bytes = tokio::fs::read(&request.picture).await?;
    let picture_part = multipart::Part::bytes(picture_bytes)
        .file_name(request.picture_path.clone())
        .mime_str(image_mime(&request.picture))?;

    Ok(multipart::Form::new()
        .text("firstName", request.first_name)
        .text("lastName", request.last_name)
        .text("email", request.email)
        .text("password", request.password)
        .text("location", request.location)
        .text("occupation", request.occupation)
        .part("picture", picture_part)
        .text("picturePath", request.picture_path))
}

fn image_mime(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
            "image/jpeg"
        }
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_mime_matches_accepted_extensions() {
        assert_eq!(image_mime(Path::new("photo.png")), "image/png");
        assert_eq!(image_mime(Path::new("photo.PNG")), "image/png");
        assert_eq!(image_mime(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(image_mime(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(image_mime(Path::new("photo")), "application/octet-stream");
    }
}
