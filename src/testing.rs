use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{BlueError, Result};
use crate::graphql::{Envelope, GraphQlRequest, Transport};

/// A transport that records every request and answers from a script.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Envelope>>>,
    sent: Arc<Mutex<Vec<GraphQlRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a raw `{data, errors}` body.
    pub fn respond(self, body: Value) -> Self {
        let envelope: Envelope = serde_json::from_value(body).unwrap();
        self.responses.lock().unwrap().push_back(Ok(envelope));
        self
    }

    pub fn fail_with(self, err: BlueError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn sent(&self) -> Arc<Mutex<Vec<GraphQlRequest>>> {
        self.sent.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &GraphQlRequest) -> Result<Envelope> {
        self.sent.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BlueError::validation("unexpected request: script exhausted")))
    }
}
