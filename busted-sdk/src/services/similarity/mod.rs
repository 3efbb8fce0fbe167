//! Similarity detection service client
//!
//! Owns the endpoint contract of the remote detector: a JSON POST to
//! `/detect_similarity` answered by a `SimilarityResult`.

mod models;
pub mod controller;

pub use controller::{CheckOutcome, CheckState, SimilarityCheckController};
pub use models::*;

use log::debug;

use crate::core::HttpClient;
use crate::error::Result;

/// Path of the detection endpoint, relative to the base URL
pub const DETECT_SIMILARITY_PATH: &str = "/detect_similarity";

/// Typed client for the similarity detection endpoint
#[derive(Debug, Clone)]
pub struct SimilarityService {
    client: HttpClient,
}

impl SimilarityService {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Ask the backend whether `request.query` matches its corpus
    pub async fn detect(&self, request: &SimilarityRequest) -> Result<SimilarityResult> {
        request.validate()?;

        debug!(
            "Detecting similarity: query_len={} top_k={} min_score={}",
            request.query.len(),
            request.top_k,
            request.min_score
        );

        self.client
            .post_json(DETECT_SIMILARITY_PATH, request)
            .await
    }
}
