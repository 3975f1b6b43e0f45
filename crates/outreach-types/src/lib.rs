//! Shared domain types for Outreach.
//!
//! Pure data shapes and error taxonomies used across the workspace.
//! No I/O, no async; serde derives for everything that crosses a wire.

pub mod batch;
pub mod compose;
pub mod config;
pub mod contact;
pub mod draft;
pub mod error;
pub mod llm;
pub mod template;
