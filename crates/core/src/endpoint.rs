//! Endpoint normalization and object URL resolution
//!
//! An object URL can address the store in two shapes:
//! path-style `https://<endpoint-host>/<bucket>/<key>` or virtual-host-style
//! `https://<bucket>.<endpoint-host>/<key>`. Resolution compares the URL's
//! authority against the configured endpoint and extracts `(bucket, key)`
//! accordingly.

use url::Url;

use crate::error::{Error, Result};

/// A normalized storage endpoint.
///
/// The configured endpoint string may omit the scheme; `https://` is assumed.
/// The authority (lower-cased host, plus port when explicit) is what URL
/// resolution compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    authority: String,
}

impl Endpoint {
    /// Parse and normalize a configured endpoint string
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::Config("endpoint is not configured".into()));
        }

        let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
            raw.to_string()
        } else {
            format!("https://{raw}")
        };

        let url = Url::parse(&with_scheme)?;
        let authority = authority_of(&url)
            .ok_or_else(|| Error::Config(format!("endpoint has no host: {raw}")))?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            authority,
        })
    }

    /// Lower-cased `host[:port]` used for URL matching
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Base URL of the endpoint, scheme included
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.authority)
    }

    /// Path-style URL of an object, the inverse of [`resolve_object_url`]
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}://{}/{}/{}", self.scheme, self.authority, bucket, key)
    }
}

/// A storage location extracted from an object URL.
///
/// Both components are non-empty; produced fresh per resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    /// Bucket name
    pub bucket: String,
    /// Object key within the bucket
    pub key: String,
}

impl ObjectLocation {
    /// Create a new ObjectLocation
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Final path segment of the key
    pub fn base_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

impl std::fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Resolve a fully-qualified object URL into `(bucket, key)`.
///
/// Path-style matching (exact authority equality) is checked before
/// virtual-host matching (authority suffix). The ordering is part of the
/// contract.
pub fn resolve_object_url(endpoint: &Endpoint, raw_url: &str) -> Result<ObjectLocation> {
    let url = Url::parse(raw_url)?;
    let authority = authority_of(&url)
        .ok_or_else(|| Error::UrlParse(format!("URL has no host: {raw_url}")))?;

    let path = url.path().trim_start_matches('/');

    let (bucket, key) = if authority == endpoint.authority() {
        // Path-style: first segment is the bucket
        let (bucket, key) = path.split_once('/').unwrap_or((path, ""));
        if bucket.is_empty() {
            return Err(Error::UrlParse(format!(
                "cannot derive bucket name from URL: {raw_url}"
            )));
        }
        (bucket.to_string(), key.to_string())
    } else if let Some(bucket) = authority.strip_suffix(&format!(".{}", endpoint.authority())) {
        // Virtual-host-style: host prefix is the bucket
        if bucket.is_empty() {
            return Err(Error::UrlParse(format!(
                "cannot derive bucket name from URL: {raw_url}"
            )));
        }
        (bucket.to_string(), path.to_string())
    } else {
        return Err(Error::UrlParse(format!(
            "URL host does not match endpoint: {} != {}",
            authority,
            endpoint.authority()
        )));
    };

    if key.is_empty() {
        return Err(Error::UrlParse(format!(
            "cannot derive object key from URL: {raw_url}"
        )));
    }

    Ok(ObjectLocation::new(bucket, key))
}

/// Lower-cased `host[:port]` of a parsed URL, port included only when explicit
fn authority_of(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Endpoint {
        Endpoint::parse("obs.cn-north-4.example.com").unwrap()
    }

    #[test]
    fn test_endpoint_scheme_defaulted() {
        let ep = Endpoint::parse("obs.example.com").unwrap();
        assert_eq!(ep.base_url(), "https://obs.example.com");
    }

    #[test]
    fn test_endpoint_scheme_preserved() {
        let ep = Endpoint::parse("http://obs.example.com").unwrap();
        assert_eq!(ep.base_url(), "http://obs.example.com");
    }

    #[test]
    fn test_endpoint_host_lowercased() {
        let ep = Endpoint::parse("OBS.Example.COM").unwrap();
        assert_eq!(ep.authority(), "obs.example.com");
    }

    #[test]
    fn test_endpoint_empty_is_config_error() {
        let result = Endpoint::parse("  ");
        assert!(matches!(result.unwrap_err(), Error::Config(_)));
    }

    #[test]
    fn test_endpoint_with_port() {
        let ep = Endpoint::parse("localhost:9000").unwrap();
        assert_eq!(ep.authority(), "localhost:9000");
    }

    #[test]
    fn test_resolve_path_style() {
        let loc = resolve_object_url(
            &endpoint(),
            "https://obs.cn-north-4.example.com/mybucket/docs/report.pdf",
        )
        .unwrap();
        assert_eq!(loc.bucket, "mybucket");
        assert_eq!(loc.key, "docs/report.pdf");
    }

    #[test]
    fn test_resolve_virtual_host_style() {
        let loc = resolve_object_url(
            &endpoint(),
            "https://mybucket.obs.cn-north-4.example.com/docs/report.pdf",
        )
        .unwrap();
        assert_eq!(loc.bucket, "mybucket");
        assert_eq!(loc.key, "docs/report.pdf");
    }

    #[test]
    fn test_resolve_normalization_idempotent() {
        // A bare host and an https URL configure the same endpoint
        let bare = Endpoint::parse("obs.example.com").unwrap();
        let schemed = Endpoint::parse("https://obs.example.com").unwrap();
        let url = "https://obs.example.com/bucket/key.txt";

        let a = resolve_object_url(&bare, url).unwrap();
        let b = resolve_object_url(&schemed, url).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_resolve_host_mismatch_names_both_hosts() {
        let ep = Endpoint::parse("obs.example.com").unwrap();
        let err = resolve_object_url(&ep, "https://other.example.com/bucket/key").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("other.example.com"));
        assert!(message.contains("obs.example.com"));
    }

    #[test]
    fn test_resolve_missing_bucket() {
        let ep = Endpoint::parse("obs.example.com").unwrap();
        let result = resolve_object_url(&ep, "https://obs.example.com/");
        assert!(matches!(result.unwrap_err(), Error::UrlParse(_)));
    }

    #[test]
    fn test_resolve_missing_key_path_style() {
        let ep = Endpoint::parse("obs.example.com").unwrap();
        let err = resolve_object_url(&ep, "https://obs.example.com/bucketonly").unwrap_err();
        assert!(err.to_string().contains("object key"));
    }

    #[test]
    fn test_resolve_missing_key_virtual_host_style() {
        let ep = Endpoint::parse("obs.example.com").unwrap();
        let err = resolve_object_url(&ep, "https://bucket.obs.example.com/").unwrap_err();
        assert!(err.to_string().contains("object key"));
    }

    #[test]
    fn test_resolve_url_host_case_insensitive() {
        let loc =
            resolve_object_url(&endpoint(), "https://OBS.CN-NORTH-4.EXAMPLE.COM/bucket/key.txt")
                .unwrap();
        assert_eq!(loc.bucket, "bucket");
        assert_eq!(loc.key, "key.txt");
    }

    #[test]
    fn test_resolve_with_port() {
        let ep = Endpoint::parse("http://localhost:9000").unwrap();
        let loc = resolve_object_url(&ep, "http://localhost:9000/bucket/a/b.txt").unwrap();
        assert_eq!(loc.bucket, "bucket");
        assert_eq!(loc.key, "a/b.txt");

        let loc = resolve_object_url(&ep, "http://bucket.localhost:9000/a/b.txt").unwrap();
        assert_eq!(loc.bucket, "bucket");
        assert_eq!(loc.key, "a/b.txt");
    }

    #[test]
    fn test_object_url_round_trip_path_style() {
        let ep = endpoint();
        let key = "2024/03/05/report_1700000000.pdf";
        let url = ep.object_url("mybucket", key);
        assert_eq!(
            url,
            "https://obs.cn-north-4.example.com/mybucket/2024/03/05/report_1700000000.pdf"
        );

        let loc = resolve_object_url(&ep, &url).unwrap();
        assert_eq!(loc.bucket, "mybucket");
        assert_eq!(loc.key, key);
    }

    #[test]
    fn test_virtual_host_round_trip() {
        let ep = endpoint();
        let url = format!("https://mybucket.{}/docs/a.txt", ep.authority());
        let loc = resolve_object_url(&ep, &url).unwrap();
        assert_eq!(loc.bucket, "mybucket");
        assert_eq!(loc.key, "docs/a.txt");
    }

    #[test]
    fn test_built_key_round_trips_through_resolver() {
        use crate::key::{build_object_key, Clock, DirectoryStrategy, KeyParams};
        use jiff::tz::TimeZone;

        struct FixedClock(jiff::Zoned);
        impl Clock for FixedClock {
            fn now(&self) -> jiff::Zoned {
                self.0.clone()
            }
        }

        let clock = FixedClock(
            jiff::Timestamp::from_second(1700000000)
                .unwrap()
                .to_zoned(TimeZone::UTC),
        );
        let params = KeyParams {
            source_name: Some("report.pdf"),
            directory: "backups",
            layout: DirectoryStrategy::DateHierarchy,
            ..Default::default()
        };
        let key = build_object_key(&params, &clock);

        let ep = endpoint();
        let loc = resolve_object_url(&ep, &ep.object_url("mybucket", &key)).unwrap();
        assert_eq!(loc.bucket, "mybucket");
        assert_eq!(loc.key, key);
    }

    #[test]
    fn test_location_base_name() {
        let loc = ObjectLocation::new("bucket", "docs/report.pdf");
        assert_eq!(loc.base_name(), "report.pdf");

        let loc = ObjectLocation::new("bucket", "report.pdf");
        assert_eq!(loc.base_name(), "report.pdf");
    }
}
