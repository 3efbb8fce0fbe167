//! # busted SDK
//!
//! Client side of the git-busted code similarity checker.
//!
//! This crate provides:
//!
//! - `HttpClient`: a JSON-over-HTTP client that normalizes every failure
//!   into a `ClientError`
//! - `HttpTransport`: the injectable network primitive behind it
//! - `SimilarityService`: the typed `/detect_similarity` contract
//! - `SimilarityCheckController`: the observable "check my code" state machine
//! - `ClientConfig`: immutable configuration loaded once at start-up

pub mod core;
pub use core::{
    ClientBuilder, HttpClient, HttpTransport, Method, RequestDescriptor, ResponseBody,
    ReqwestTransport, TransportRequest, TransportResponse,
};

pub mod services;
pub use services::similarity::{
    CheckOutcome, CheckState, SimilarityCheckController, SimilarityRequest, SimilarityResult,
    SimilarityService, Verdict,
};

pub mod error;
pub use error::{ClientError, Result};

pub mod config;
pub use config::{ClientConfig, ConfigProvider, EnvConfigProvider};

mod util;

#[cfg(test)]
mod tests;

/// Create a new default client builder
pub fn client() -> core::ClientBuilder {
    core::ClientBuilder::new()
}

/// Build a controller wired to the real HTTP transport
pub fn similarity_controller(config: ClientConfig) -> Result<SimilarityCheckController> {
    let client = ClientBuilder::from_config(config).build()?;
    Ok(SimilarityCheckController::new(SimilarityService::new(client)))
}
