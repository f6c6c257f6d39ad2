//! Storage client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from oc-core.

use async_trait::async_trait;

use oc_core::{
    Endpoint, Error, ObjectData, ObjectInfo, ObjectLocation, ObjectStore, Profile, Result,
};

/// Storage client wrapper
pub struct StorageClient {
    inner: aws_sdk_s3::Client,
}

impl StorageClient {
    /// Create a new storage client from a credential profile
    pub async fn new(profile: &Profile) -> Result<Self> {
        // The SDK requires a scheme on the endpoint URL
        let endpoint_url = Endpoint::parse(&profile.endpoint)?.base_url();

        let credentials = aws_credential_types::Credentials::new(
            profile.access_key.clone(),
            profile.secret_key.clone(),
            None, // session token
            None, // expiry
            "oc-static-credentials",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(profile.region.clone()))
            .endpoint_url(endpoint_url)
            .load()
            .await;

        // Path-style addressing for compatibility with OBS-style endpoints
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

#[async_trait]
impl ObjectStore for StorageClient {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        match self.inner.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                let err_str = e.to_string();
                if err_str.contains("NotFound") || err_str.contains("NoSuchBucket") {
                    Ok(false)
                } else if err_str.contains("AccessDenied") || err_str.contains("Forbidden") {
                    Err(Error::Auth(format!(
                        "access to bucket '{bucket}' denied: {err_str}"
                    )))
                } else {
                    Err(Error::Network(err_str))
                }
            }
        }
    }

    async fn put_object(
        &self,
        location: &ObjectLocation,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<ObjectInfo> {
        let size = data.len() as i64;
        let body = aws_sdk_s3::primitives::ByteStream::from(data);

        let mut request = self
            .inner
            .put_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .body(body);

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        tracing::debug!(key = %location.key, size, "object uploaded");

        let mut info = ObjectInfo::new(&location.key, size);
        if let Some(etag) = response.e_tag() {
            info.etag = Some(etag.trim_matches('"').to_string());
        }

        Ok(info)
    }

    async fn get_object(&self, location: &ObjectLocation) -> Result<ObjectData> {
        let response = self
            .inner
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("NotFound") || err_str.contains("NoSuchKey") {
                    Error::NotFound(location.to_string())
                } else {
                    Error::Network(err_str)
                }
            })?;

        let content_type = response.content_type().map(|ct| ct.to_string());

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(ObjectData {
            bytes,
            content_type,
        })
    }
}
