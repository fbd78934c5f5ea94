//! Travel Backend service: liveness checks and presigned image uploads

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    dead_code,
    missing_docs
)]

/// HTTP routes
pub mod routes;

/// Router assembly and server bootstrap
pub mod server;

/// Environment, error and extractor types
pub mod types;

/// Presigned direct-to-bucket uploads
pub mod upload_storage;
