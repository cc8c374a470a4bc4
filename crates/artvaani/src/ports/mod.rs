//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the flows interact with external
//! services. Implementations live in the server's adapter layer.

pub mod services;

// Re-exports
pub use services::*;
