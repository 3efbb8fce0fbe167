//! Service-specific client implementations
//!
//! Typed clients for the endpoints of the detection backend.

pub mod similarity;
