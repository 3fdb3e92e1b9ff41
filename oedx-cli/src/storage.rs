//! HTTP object-storage uploader.
//!
//! Copies each image by downloading it from the CDN and `PUT`ting the bytes to
//! `<storage_base_url><key>`. Authentication is optional and taken from the
//! `OEDX_STORAGE_TOKEN` environment variable as a bearer token.

use oedx_babel::{ImageUploader, PendingUpload};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::future::Future;
use thiserror::Error;

pub const TOKEN_ENV: &str = "OEDX_STORAGE_TOKEN";

/// Storage client errors.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("could not download '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage rejected the upload: {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

#[derive(Debug, Clone)]
pub struct HttpUploader {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl HttpUploader {
    /// Create an uploader reading the token from the environment.
    pub fn from_env(base_url: impl Into<String>) -> Self {
        Self::new(base_url, std::env::var(TOKEN_ENV).ok())
    }

    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
            client: Client::new(),
        }
    }

    fn target_url(&self, key: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{key}", self.base_url)
        } else {
            format!("{}/{key}", self.base_url)
        }
    }
}

impl ImageUploader for HttpUploader {
    type Error = UploadError;

    fn upload(
        &self,
        upload: &PendingUpload,
    ) -> impl Future<Output = Result<(), UploadError>> + Send {
        let client = self.client.clone();
        let token = self.token.clone();
        let source_url = upload.source_url.clone();
        let target = self.target_url(&upload.key);

        async move {
            let fetch_error = |source| UploadError::Fetch {
                url: source_url.clone(),
                source,
            };
            let response = client
                .get(&source_url)
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(fetch_error)?;
            let content_type = response.headers().get(CONTENT_TYPE).cloned();
            let bytes = response.bytes().await.map_err(fetch_error)?;

            let mut request = client.put(&target).body(bytes);
            if let Some(content_type) = content_type {
                request = request.header(CONTENT_TYPE, content_type);
            }
            if let Some(ref token) = token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;
            let status = response.status();
            if status.is_success() {
                tracing::debug!(target = %target, "stored image");
                Ok(())
            } else {
                let body = response.text().await.unwrap_or_default();
                Err(UploadError::Rejected { status, body })
            }
        }
    }
}
