//! Core library for the weather assistant.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Weather provider and language model collaborators
//! - Normalization of provider payloads
//! - Intent classification, insight composition and the turn orchestrator
//!
//! It is used by `weather-assistant-cli` and `weather-assistant-api`.

pub mod assistant;
pub mod config;
pub mod error;
pub mod insights;
pub mod intent;
pub mod llm;
pub mod model;
pub mod parser;
pub mod provider;

pub use assistant::{Assistant, INSIGHTS_UNAVAILABLE};
pub use config::{Config, Credentials};
pub use error::{AssistantError, ComposeError, InputError, ModelError, ParseError, ProviderError};
pub use llm::{GenerationOptions, LanguageModel};
pub use model::{AssistantResult, Insights, IntentResult, ParsedIntent, WeatherRecord};
pub use provider::WeatherProvider;
