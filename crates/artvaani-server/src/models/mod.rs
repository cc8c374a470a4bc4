//! API Models
//!
//! Request/response bodies for the flow endpoints.

mod flows;

pub use flows::*;
