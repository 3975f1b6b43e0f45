//! Compose workflow: the four-step wizard that owns the in-progress draft.

pub mod session;

pub use session::{ComposeSession, DraftEdit, RenderedPreview};
