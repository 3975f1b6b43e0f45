//! Bulk dispatch: audience expansion, per-recipient resolution, and
//! delivery with partial-failure accounting.

pub mod directory;
pub mod dispatcher;
pub mod transport;

pub use directory::ContactDirectory;
pub use dispatcher::BulkDispatcher;
pub use transport::DeliveryTransport;
