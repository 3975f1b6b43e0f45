//! Infrastructure layer for Outreach.
//!
//! Contains implementations of the collaborator traits defined in
//! `outreach-core`: the OpenAI-compatible text-generation provider, the
//! HTTP contact directory, the HTTP delivery transport, and the TOML
//! config loader.

pub mod config;
pub mod contacts;
pub mod delivery;
pub mod llm;
