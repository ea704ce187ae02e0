//! Taskwise LLM Provider Layer
//!
//! Remote language-model providers behind one capability trait.
//!
//! # Architecture
//!
//! ```text
//! TaskProvider (parse / suggest_tags / breakdown / recommend_priority)
//!     └── ChatProvider<B>      prompts + lenient response parsing
//!             └── ChatBackend  OpenAI | Gemini | Ollama | Mock
//! ```
//!
//! A [`ChatBackend`] only moves text to and from a model. [`ChatProvider`]
//! turns the four task operations into prompts and reads the answers,
//! accepting fenced JSON, JSON buried in prose, quoted strings and
//! numbered lists before giving up with a [`ProviderError`].
//!
//! Each call is a single attempt. Deciding what happens after a failure
//! is the orchestrator's job.
//!
//! # Examples
//!
//! ```
//! use taskwise_llm::{ChatProvider, MockBackend, TaskProvider};
//!
//! # tokio_test::block_on(async {
//! let provider = ChatProvider::new(MockBackend::new(r#"["Work", "Meeting"]"#));
//! let tags = provider.suggest_tags("Weekly sync", None).await.unwrap();
//! assert_eq!(tags, ["Work", "Meeting"]);
//! # });
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod chat;
pub mod error;
pub mod gemini;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod response;
mod transport;

pub use backend::{ChatBackend, ChatRequest};
pub use chat::ChatProvider;
pub use error::{ProviderError, Result};
pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;
pub use prompt::PromptBuilder;
pub use provider::{Capabilities, Operation, ProviderDescriptor, TaskProvider};
pub use transport::DEFAULT_TIMEOUT_SECS;
