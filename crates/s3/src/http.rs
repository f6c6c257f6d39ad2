//! Public file download
//!
//! Plain HTTP GET for files that are not behind the storage credentials.

use std::time::Duration;

use oc_core::{Error, ObjectData, Result};

/// Request timeout for public downloads
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Download a public file.
///
/// Returns the body bytes and the Content-Type header (parameters such as
/// charset stripped). Non-success statuses are mapped onto the error
/// taxonomy: 404 to NotFound, 401/403 to Auth, anything else to Network.
pub async fn fetch_public(url: &str) -> Result<ObjectData> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| Error::Network(format!("failed to create HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::Network(format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(match status.as_u16() {
            404 => Error::NotFound(url.to_string()),
            401 | 403 => Error::Auth(format!("access denied: {url}")),
            _ => Error::Network(format!("request failed with status {status}: {url}")),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::Network(format!("failed to read response body: {e}")))?
        .to_vec();

    tracing::debug!(url, size = bytes.len(), "public file downloaded");

    Ok(ObjectData {
        bytes,
        content_type,
    })
}
