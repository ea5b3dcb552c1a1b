//! Shared test doubles.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::completion::{CompletionError, CompletionGateway, CompletionRequest};

/// Gateway that replays queued answers and records every request it saw.
/// When the queue is empty it echoes a fixed prose answer.
#[derive(Default)]
pub struct ScriptedGateway {
    answers: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let gateway = Self::new();
        for answer in answers {
            gateway.push_answer(answer);
        }
        gateway
    }

    pub fn failing() -> Self {
        let gateway = Self::new();
        for _ in 0..8 {
            gateway.push_failure(CompletionError::Request("connection refused".to_string()));
        }
        gateway
    }

    pub fn push_answer(&self, answer: impl Into<String>) {
        self.answers.lock().unwrap().push_back(Ok(answer.into()));
    }

    pub fn push_failure(&self, error: CompletionError) {
        self.answers.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Faz sentido validar isso com o time ainda hoje.".to_string()))
    }
}
