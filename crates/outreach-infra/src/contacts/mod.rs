//! Contact directory implementations.

pub mod http;

pub use http::HttpContactDirectory;
