//! LLM provider domain models and traits

mod invoker;
mod message;
mod model_id;
mod provider;
mod request;
mod response;
mod retry;

pub use invoker::{Completion, ModelInvoker};
pub use message::{Message, MessageRole};
pub use model_id::{ModelIdentifier, ProviderKind};
pub use provider::LlmProvider;
pub use request::{LlmRequest, LlmRequestBuilder};
pub use response::{LlmResponse, Usage};
pub use retry::RetryPolicy;

#[cfg(test)]
pub use invoker::MockModelInvoker;
#[cfg(test)]
pub use provider::mock::MockLlmProvider;
