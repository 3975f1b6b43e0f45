//! Composition and dispatch logic for Outreach.
//!
//! This crate defines the "ports" (collaborator traits) that the
//! infrastructure layer implements. It depends only on `outreach-types` --
//! never on `outreach-infra` or any HTTP/IO crate.

pub mod compose;
pub mod dispatch;
pub mod generator;
pub mod llm;
pub mod resolver;
