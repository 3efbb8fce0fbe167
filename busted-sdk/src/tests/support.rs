//! Scripted transports shared by the unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::config::ClientConfig;
use crate::core::{HttpClient, HttpTransport, TransportRequest, TransportResponse};
use crate::error::{ClientError, Result};
use crate::services::similarity::{SimilarityCheckController, SimilarityService};

/// One scripted reply, optionally held back until its gate is opened
struct Step {
    gate: Option<Arc<Notify>>,
    reply: Result<TransportResponse>,
}

/// Transport that replays scripted replies in order and records requests
#[derive(Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, reply: Result<TransportResponse>) {
        self.steps.lock().unwrap().push_back(Step { gate: None, reply });
    }

    /// Queue a reply that is only delivered after the returned gate is notified
    pub fn gated_reply(&self, reply: Result<TransportResponse>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.steps.lock().unwrap().push_back(Step {
            gate: Some(Arc::clone(&gate)),
            reply,
        });
        gate
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front();

        match step {
            Some(Step { gate, reply }) => {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                reply
            }
            None => Err(ClientError::transport("no scripted reply")),
        }
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig::new("http://backend.test")
}

pub fn client_over(transport: &Arc<ScriptedTransport>, config: ClientConfig) -> HttpClient {
    HttpClient::new(config, transport.clone()).expect("valid test config")
}

pub fn controller_over(transport: &Arc<ScriptedTransport>) -> SimilarityCheckController {
    SimilarityCheckController::new(SimilarityService::new(client_over(transport, test_config())))
}
