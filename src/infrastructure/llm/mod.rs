//! LLM provider implementations

mod anthropic;
mod factory;
mod gemini;
mod http_client;
mod invoker;
mod ollama;
mod openai;
mod simulated;

pub use anthropic::AnthropicProvider;
pub use factory::{LlmProviderFactory, BASE_URL_PARAM};
pub use gemini::GeminiProvider;
pub use http_client::{HttpClient, HttpClientTrait};
pub use invoker::{InvocationSettings, ProviderInvoker};
pub use ollama::{OllamaProvider, DEFAULT_OLLAMA_HOST};
pub use openai::OpenAiProvider;
pub use simulated::SimulatedProvider;
