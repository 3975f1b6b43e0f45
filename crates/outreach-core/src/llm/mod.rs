//! LLM provider abstraction: the port the draft generator calls through.

pub mod box_provider;
pub mod provider;
