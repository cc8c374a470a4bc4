//! Service Ports
//!
//! Abstract interfaces for external services.

mod generative_model;
mod reverse_geocoder;

pub use generative_model::*;
pub use reverse_geocoder::*;
