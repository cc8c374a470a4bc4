//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod field_value;
mod media_reference;
mod verification_status;

pub use field_value::*;
pub use media_reference::*;
pub use verification_status::*;
