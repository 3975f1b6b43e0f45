//! Mail delivery transport implementations.

pub mod http;

pub use http::HttpDeliveryTransport;
