//! REST API request handlers.

pub mod compose;
