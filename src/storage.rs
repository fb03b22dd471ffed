//! Object-store client and the staged upload pipeline.
//!
//! Files arrive staged on local temp disk (multipart middleware); each is
//! pushed to the external store under a per-user folder and the returned
//! `{public_id, secure_url}` pair is what the proposal row keeps. On a
//! partial failure, only the uploads that actually succeeded are deleted
//! again, then the whole operation fails.

use std::path::{Path, PathBuf};

use futures_util::future::join_all;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::proposal::types::DocumentRef;

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Clone)]
pub struct ObjectStore {
    client: reqwest::Client,
    settings: Option<StorageSettings>,
}

/// A file staged on local disk, ready for remote upload.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub path: PathBuf,
    pub name: String,
}

impl ObjectStore {
    pub fn new(settings: Option<StorageSettings>) -> Self {
        if settings.is_none() {
            log::warn!("Object storage not configured — document uploads will fail");
        }
        ObjectStore {
            client: reqwest::Client::new(),
            settings,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let settings = match (&config.storage_url, &config.storage_api_key) {
            (Some(base_url), Some(api_key)) => Some(StorageSettings {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: api_key.clone(),
            }),
            _ => None,
        };
        ObjectStore::new(settings)
    }

    fn settings(&self) -> Result<&StorageSettings, AppError> {
        self.settings
            .as_ref()
            .ok_or_else(|| AppError::Upstream("Object storage is not configured".to_string()))
    }

    /// Upload one staged file into the given folder.
    pub async fn upload(
        &self,
        path: &Path,
        name: &str,
        folder: &str,
    ) -> Result<DocumentRef, AppError> {
        let settings = self.settings()?;
        let bytes = tokio::fs::read(path).await?;

        let part = reqwest::multipart::Part::bytes(bytes).file_name(name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("folder", folder.to_string())
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", settings.base_url))
            .bearer_auth(&settings.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Document upload failed with status {}",
                response.status()
            )));
        }

        let doc: DocumentRef = response.json().await?;
        Ok(doc)
    }

    /// Delete a stored object by its public id.
    pub async fn delete(&self, public_id: &str) -> Result<(), AppError> {
        let settings = self.settings()?;

        let response = self
            .client
            .post(format!("{}/destroy", settings.base_url))
            .bearer_auth(&settings.api_key)
            .json(&serde_json::json!({ "public_id": public_id }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Document delete failed with status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Upload all staged files concurrently, preserving order.
///
/// Successful references accumulate as each upload completes; if any upload
/// fails, exactly that accumulated set is deleted again (best effort) before
/// the error propagates. Nothing is written to the database until every
/// upload has succeeded.
pub async fn upload_all(
    store: &ObjectStore,
    files: &[StagedFile],
    folder: &str,
) -> Result<Vec<DocumentRef>, AppError> {
    let uploads = files.iter().map(|f| store.upload(&f.path, &f.name, folder));
    let results = join_all(uploads).await;

    let mut uploaded = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(doc) => uploaded.push(doc),
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if let Some(error) = first_error {
        for doc in &uploaded {
            if let Err(cleanup) = store.delete(&doc.public_id).await {
                log::warn!("Failed to clean up uploaded document {}: {cleanup}", doc.public_id);
            }
        }
        return Err(error);
    }

    Ok(uploaded)
}
