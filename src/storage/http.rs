use super::{blob_key, BlobStore};
use crate::error::StorageError;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Object-storage backend speaking the bucket REST API:
/// `PUT {endpoint}/object/{bucket}/{key}` to write,
/// `{endpoint}/object/public/{bucket}/{key}` to read.
pub struct HttpBlobStore {
    client: reqwest::Client,
    endpoint: String,
    bucket: String,
    token: String,
}

impl HttpBlobStore {
    pub fn new(endpoint: String, bucket: String, token: String) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder().timeout(UPLOAD_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket,
            token,
        })
    }

    fn upload_url(&self, key: &str) -> String {
        format!("{}/object/{}/{}", self.endpoint, self.bucket, key)
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/object/public/{}/{}", self.endpoint, self.bucket, key)
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn store(
        &self,
        bytes: &[u8],
        filename: &str,
        content_type: &str,
        category: &str,
        owner_id: Uuid,
    ) -> Result<String, StorageError> {
        let key = blob_key(bytes, filename, category, owner_id)?;
        let content_type = if content_type.is_empty() {
            "application/octet-stream"
        } else {
            content_type
        };

        let response = self
            .client
            .put(self.upload_url(&key))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(key = %key, status = status.as_u16(), "Object storage rejected upload");
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(key = %key, size = bytes.len(), "Uploaded blob to object storage");
        Ok(self.public_url(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let store = HttpBlobStore::new(
            "https://storage.example.com/storage/v1/".to_string(),
            "gusto".to_string(),
            "token".to_string(),
        )
        .unwrap();

        assert_eq!(
            store.upload_url("payments/x/abc-proof.png"),
            "https://storage.example.com/storage/v1/object/gusto/payments/x/abc-proof.png"
        );
        assert_eq!(
            store.public_url("payments/x/abc-proof.png"),
            "https://storage.example.com/storage/v1/object/public/gusto/payments/x/abc-proof.png"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_loudly() {
        // Port 9 (discard) on localhost is essentially never an HTTP server
        let store = HttpBlobStore::new(
            "http://127.0.0.1:9".to_string(),
            "gusto".to_string(),
            "token".to_string(),
        )
        .unwrap();

        let result = store
            .store(b"bytes", "proof.png", "image/png", "payments", Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(StorageError::Http(_))));
    }
}
