//! Blob storage for payment screenshots.
//!
//! Every backend either returns a durable URL or fails with a
//! [`StorageError`]; none of them hands back a placeholder.

pub mod http;
pub mod local;
pub mod memory;

pub use http::HttpBlobStore;
pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;

use crate::config::StorageConfig;
use crate::error::StorageError;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

/// Logical category for payment proofs
pub const PAYMENTS_CATEGORY: &str = "payments";

const MAX_FILENAME_LEN: usize = 64;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `bytes` and return a URL that will keep resolving to them
    async fn store(
        &self,
        bytes: &[u8],
        filename: &str,
        content_type: &str,
        category: &str,
        owner_id: Uuid,
    ) -> Result<String, StorageError>;
}

/// Build a backend from configuration
pub fn from_config(config: &StorageConfig) -> Result<Arc<dyn BlobStore>, StorageError> {
    match config {
        StorageConfig::Local {
            root,
            public_base_url,
        } => Ok(Arc::new(LocalBlobStore::new(root.clone(), public_base_url.clone()))),
        StorageConfig::Http {
            endpoint,
            bucket,
            token,
        } => Ok(Arc::new(HttpBlobStore::new(
            endpoint.clone(),
            bucket.clone(),
            token.clone(),
        )?)),
    }
}

/// Keep filenames path- and URL-safe
pub fn sanitize_filename(filename: &str) -> String {
    // Browsers on some platforms send the full client path
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.');

    if cleaned.is_empty() {
        return "upload".to_string();
    }

    // Keep the tail so the extension survives truncation
    let skip = cleaned.len().saturating_sub(MAX_FILENAME_LEN);
    cleaned[skip..].to_string()
}

/// `<category>/<owner>/<sha256 prefix>-<filename>`
pub fn blob_key(
    bytes: &[u8],
    filename: &str,
    category: &str,
    owner_id: Uuid,
) -> Result<String, StorageError> {
    let valid_category = !category.is_empty()
        && category
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if !valid_category {
        return Err(StorageError::InvalidKey(format!("bad category: {:?}", category)));
    }

    let digest = hex::encode(Sha256::digest(bytes));
    Ok(format!(
        "{}/{}/{}-{}",
        category,
        owner_id,
        &digest[..16],
        sanitize_filename(filename)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("proof.png"), "proof.png");
        assert_eq!(sanitize_filename("C:\\Users\\me\\my proof.png"), "my_proof.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename(".."), "upload");
        assert_eq!(sanitize_filename(""), "upload");

        let long = format!("{}.jpeg", "x".repeat(100));
        let cleaned = sanitize_filename(&long);
        assert_eq!(cleaned.len(), MAX_FILENAME_LEN);
        assert!(cleaned.ends_with(".jpeg"));
    }

    #[test]
    fn test_blob_key_embeds_owner_and_category() {
        let owner = Uuid::new_v4();
        let key = blob_key(b"bytes", "proof.png", PAYMENTS_CATEGORY, owner).unwrap();
        assert!(key.starts_with(&format!("payments/{}/", owner)));
        assert!(key.ends_with("-proof.png"));

        // Same content, same key
        assert_eq!(key, blob_key(b"bytes", "proof.png", PAYMENTS_CATEGORY, owner).unwrap());
        assert_ne!(key, blob_key(b"other", "proof.png", PAYMENTS_CATEGORY, owner).unwrap());
    }

    #[test]
    fn test_blob_key_rejects_bad_category() {
        assert!(blob_key(b"x", "a.png", "../etc", Uuid::new_v4()).is_err());
        assert!(blob_key(b"x", "a.png", "", Uuid::new_v4()).is_err());
    }
}
