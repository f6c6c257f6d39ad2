//! oc-s3: Storage SDK adapter for the oc CLI
//!
//! This crate provides the implementation of the ObjectStore trait using the
//! aws-sdk-s3 crate (OBS-compatible services speak the S3 API), plus the
//! unauthenticated HTTP download used for public files. It is the only crate
//! that talks to the network.

pub mod client;
pub mod http;

pub use client::StorageClient;
pub use http::fetch_public;
