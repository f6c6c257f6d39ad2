//! ObjectStore trait definition
//!
//! The interface the CLI uses for storage operations, decoupled from the
//! vendor SDK. Only the adapter crate depends on the SDK.

use async_trait::async_trait;
use serde::Serialize;

use crate::endpoint::ObjectLocation;
use crate::error::Result;

/// Metadata for a stored object, as reported after an upload
#[derive(Debug, Clone, Serialize)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size_bytes: i64,

    /// Human-readable size
    pub size_human: String,

    /// ETag reported by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for an object of the given size
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: size,
            size_human: humansize::format_size(size.max(0) as u64, humansize::BINARY),
            etag: None,
        }
    }
}

/// Downloaded object content plus the content type the service reported
#[derive(Debug, Clone)]
pub struct ObjectData {
    /// Object bytes
    pub bytes: Vec<u8>,

    /// Content type from the response metadata, if any
    pub content_type: Option<String>,
}

/// Trait for OBS/S3-compatible storage operations
///
/// Implemented by the SDK adapter; each method maps to a single vendor call.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Check that a bucket exists and is reachable with these credentials
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    /// Upload an object
    async fn put_object(
        &self,
        location: &ObjectLocation,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<ObjectInfo>;

    /// Download an object
    async fn get_object(&self, location: &ObjectLocation) -> Result<ObjectData>;
}
