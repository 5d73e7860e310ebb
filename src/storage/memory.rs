use super::{blob_key, BlobStore};
use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Keeps blobs in memory; `memory://` URLs. Used by tests.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, StoredBlob>>,
    failing: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn keys(&self) -> Vec<String> {
        let blobs = self.blobs.lock().unwrap_or_else(|p| p.into_inner());
        let mut keys: Vec<String> = blobs.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn get(&self, key: &str) -> Option<StoredBlob> {
        let blobs = self.blobs.lock().unwrap_or_else(|p| p.into_inner());
        blobs.get(key).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn store(
        &self,
        bytes: &[u8],
        filename: &str,
        content_type: &str,
        category: &str,
        owner_id: Uuid,
    ) -> Result<String, StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Upload("memory blob store is set to fail".to_string()));
        }

        let key = blob_key(bytes, filename, category, owner_id)?;
        let mut blobs = self.blobs.lock().unwrap_or_else(|p| p.into_inner());
        blobs.insert(
            key.clone(),
            StoredBlob {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{}", key))
    }
}
