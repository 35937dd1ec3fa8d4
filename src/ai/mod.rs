//! Language-model integration
//!
//! [`ModelGateway`] owns the personas and call parameters; the remote model
//! itself sits behind [`CompletionService`] so it can be swapped for a mock.

pub mod gateway;
pub mod mock;
pub mod openai;

pub use gateway::ModelGateway;
pub use mock::{MockCompletionClient, MockOutcome};
pub use openai::OpenAiCompletionClient;

use crate::models::ModelPrompt;
use crate::Result;
use async_trait::async_trait;

/// Remote text and vision completion.
///
/// Implementations return the text of the first candidate. Failures must be
/// reported as [`crate::Error::Upstream`] when the remote side answered with
/// an error status, and as an internal error otherwise.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &ModelPrompt) -> Result<String>;
}
