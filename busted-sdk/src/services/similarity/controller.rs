//! "Check my code" controller
//!
//! Drives one similarity check at a time and publishes every state
//! transition on a `watch` channel so a view can render it.
//!
//! Each interaction takes a new generation number. A response is applied
//! only if no newer interaction has started since its request went out;
//! otherwise it is dropped. Generation changes and state writes both happen
//! inside the channel's write lock.

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, warn};
use tokio::sync::watch;

use super::{SimilarityRequest, SimilarityResult, SimilarityService, DEFAULT_MIN_SCORE, DEFAULT_TOP_K};

/// Shown when the input is empty after trimming
pub const EMPTY_INPUT_MESSAGE: &str = "Please paste some code to check";

/// Shown when a failure carries no message of its own
pub const CHECK_FAILED_MESSAGE: &str = "Failed to check code. Make sure the backend is running.";

/// Observable state of the controller
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CheckState {
    #[default]
    Idle,
    Checking,
    Success(SimilarityResult),
    Error(String),
}

impl CheckState {
    pub fn is_checking(&self) -> bool {
        matches!(self, CheckState::Checking)
    }

    pub fn result(&self) -> Option<&SimilarityResult> {
        match self {
            CheckState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CheckState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// What happened to one `check_code` call
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// The call's result is now the controller state
    Applied(CheckState),
    /// A newer interaction started first; this result was discarded
    Superseded,
}

/// Controller for the single "check my code" use case
pub struct SimilarityCheckController {
    service: SimilarityService,
    top_k: u32,
    min_score: f64,
    generation: AtomicU64,
    state: watch::Sender<CheckState>,
}

impl SimilarityCheckController {
    pub fn new(service: SimilarityService) -> Self {
        let (state, _) = watch::channel(CheckState::Idle);
        Self {
            service,
            top_k: DEFAULT_TOP_K,
            min_score: DEFAULT_MIN_SCORE,
            generation: AtomicU64::new(0),
            state,
        }
    }

    /// Override the request parameters sent with every check
    pub fn with_parameters(mut self, top_k: u32, min_score: f64) -> Self {
        self.top_k = top_k;
        self.min_score = min_score;
        self
    }

    /// Snapshot of the current state
    pub fn state(&self) -> CheckState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state transition
    pub fn subscribe(&self) -> watch::Receiver<CheckState> {
        self.state.subscribe()
    }

    /// True while a check is in flight; the view disables its trigger
    pub fn is_checking(&self) -> bool {
        self.state.borrow().is_checking()
    }

    /// Return to `Idle`, discarding any in-flight response
    pub fn reset(&self) {
        self.begin(CheckState::Idle);
    }

    /// Run one similarity check for `raw_input`
    pub async fn check_code(&self, raw_input: &str) -> CheckOutcome {
        if raw_input.trim().is_empty() {
            debug!("Rejecting empty input without a request");
            let state = CheckState::Error(EMPTY_INPUT_MESSAGE.to_string());
            self.begin(state.clone());
            return CheckOutcome::Applied(state);
        }

        let generation = self.begin(CheckState::Checking);
        let request = SimilarityRequest::new(raw_input)
            .with_top_k(self.top_k)
            .with_min_score(self.min_score);

        let next = match self.service.detect(&request).await {
            Ok(result) => {
                info!(
                    "Check #{} finished: status={} score={}",
                    generation,
                    result.status_label(),
                    result
                        .similarity_score
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "n/a".to_string())
                );
                CheckState::Success(result)
            }
            Err(err) => {
                warn!("Check #{} failed ({}): {}", generation, err.kind(), err.message());
                let message = err.message().trim();
                if message.is_empty() {
                    CheckState::Error(CHECK_FAILED_MESSAGE.to_string())
                } else {
                    CheckState::Error(message.to_string())
                }
            }
        };

        if self.settle(generation, next.clone()) {
            CheckOutcome::Applied(next)
        } else {
            warn!("Discarding stale response of check #{}", generation);
            CheckOutcome::Superseded
        }
    }

    /// Start a new interaction and enter `state`; returns its generation
    fn begin(&self, state: CheckState) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|current| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *current = state;
        });
        generation
    }

    /// Apply `state` only if `generation` is still the newest interaction
    fn settle(&self, generation: u64, state: CheckState) -> bool {
        self.state.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = state;
            true
        })
    }
}
