//! Transport implementations

pub mod socket;

pub use socket::{Endpoint, SocketTransport};

// Re-export the trait next to its implementations
pub use crate::core::{Ack, Transport};
