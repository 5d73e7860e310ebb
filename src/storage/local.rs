use super::{blob_key, BlobStore};
use crate::error::StorageError;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

/// Writes blobs under a directory on local disk
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(
        &self,
        bytes: &[u8],
        filename: &str,
        _content_type: &str,
        category: &str,
        owner_id: Uuid,
    ) -> Result<String, StorageError> {
        let key = blob_key(bytes, filename, category, owner_id)?;
        let path = self.root.join(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::File::create(&path).await?;
        file.write_all(bytes).await?;
        // Durable before the URL is handed out
        file.sync_all().await?;

        debug!(key = %key, size = bytes.len(), "Stored blob on local disk");
        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_store_writes_file() {
        let root = std::env::temp_dir().join(format!("gusto-blobs-{}", Uuid::new_v4()));
        let store = LocalBlobStore::new(root.clone(), "http://localhost:8080/uploads/".to_string());
        let owner = Uuid::new_v4();

        let url = store
            .store(b"png-bytes", "proof.png", "image/png", "payments", owner)
            .await
            .unwrap();

        assert!(url.starts_with(&format!("http://localhost:8080/uploads/payments/{}/", owner)));
        let key = url.trim_start_matches("http://localhost:8080/uploads/");
        let written = tokio::fs::read(root.join(key)).await.unwrap();
        assert_eq!(written, b"png-bytes");

        tokio::fs::remove_dir_all(&root).await.ok();
    }
}
