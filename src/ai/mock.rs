use super::CompletionService;
use crate::models::ModelPrompt;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted result of one mock completion.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Text(String),
    Upstream {
        status: u16,
        details: serde_json::Value,
    },
    Internal(String),
    Panic(String),
}

impl MockOutcome {
    fn into_result(self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Upstream { status, details } => Err(Error::Upstream { status, details }),
            Self::Internal(message) => Err(Error::Internal(message)),
            Self::Panic(message) => panic!("{}", message),
        }
    }
}

/// In-memory [`CompletionService`] that records every prompt it receives.
///
/// Outcomes are replayed in order and cycle; with none configured it echoes
/// the user text.
pub struct MockCompletionClient {
    outcomes: Arc<Mutex<Vec<MockOutcome>>>,
    prompts: Arc<Mutex<Vec<ModelPrompt>>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_outcome(self, outcome: MockOutcome) -> Self {
        self.outcomes.lock().unwrap().push(outcome);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_outcome(MockOutcome::Text(text.into()))
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<ModelPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionService for MockCompletionClient {
    async fn complete(&self, prompt: &ModelPrompt) -> Result<String> {
        let count = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.clone());
            prompts.len()
        };

        let outcome = {
            let outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                MockOutcome::Text(format!("Echo: {}", prompt.user_content.text()))
            } else {
                outcomes[(count - 1) % outcomes.len()].clone()
            }
        };

        outcome.into_result()
    }
}
