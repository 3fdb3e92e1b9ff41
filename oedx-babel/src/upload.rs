//! Sequential image uploads
//!
//! The library decides what to upload ([`PendingUpload`]); the transport lives behind
//! [`ImageUploader`] so the CLI can plug in an HTTP client and tests a fake.

use crate::bridge::PendingUpload;
use crate::error::{ConvertError, Result};
use std::fmt::Display;
use std::future::Future;

/// Copies one image into object storage.
pub trait ImageUploader {
    type Error: Display;

    fn upload(
        &self,
        upload: &PendingUpload,
    ) -> impl Future<Output = std::result::Result<(), Self::Error>> + Send;
}

/// Upload `pending` one at a time, in order.
///
/// Each upload is awaited before the next starts. The first failure stops the sequence
/// and is returned as [`ConvertError::UploadFailure`]; nothing is retried.
pub async fn upload_sequentially<U: ImageUploader>(
    uploader: &U,
    pending: &[PendingUpload],
) -> Result<usize> {
    let total = pending.len();
    for (position, upload) in pending.iter().enumerate() {
        tracing::info!(key = %upload.key, "Uploading image {}/{}", position + 1, total);
        uploader
            .upload(upload)
            .await
            .map_err(|err| ConvertError::UploadFailure {
                source_url: upload.source_url.clone(),
                key: upload.key.clone(),
                message: err.to_string(),
            })?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    impl ImageUploader for Recording {
        type Error = String;

        fn upload(
            &self,
            upload: &PendingUpload,
        ) -> impl Future<Output = std::result::Result<(), String>> + Send {
            let key = upload.key.clone();
            let outcome = if self.fail_on.as_deref() == Some(key.as_str()) {
                Err("storage said no".to_string())
            } else {
                Ok(())
            };
            self.seen.lock().unwrap().push(key);
            async move { outcome }
        }
    }

    fn pending(keys: &[&str]) -> Vec<PendingUpload> {
        keys.iter()
            .map(|key| PendingUpload {
                source_url: format!("https://cdn.ironhack.school/x@{key}"),
                key: key.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn uploads_run_in_order() {
        let uploader = Recording::default();
        let count = upload_sequentially(&uploader, &pending(&["a", "b", "c"]))
            .await
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(*uploader.seen.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn first_failure_aborts_the_rest() {
        let uploader = Recording {
            fail_on: Some("b".to_string()),
            ..Recording::default()
        };
        let err = upload_sequentially(&uploader, &pending(&["a", "b", "c"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ConvertError::UploadFailure { ref key, .. } if key == "b"));
        assert_eq!(*uploader.seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn nothing_to_upload_is_fine() {
        let uploader = Recording::default();
        assert_eq!(upload_sequentially(&uploader, &[]).await.unwrap(), 0);
    }
}
