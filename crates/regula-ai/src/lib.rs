//! Text-generation backends and the rule generation pipeline.

mod backend;
mod config;
mod error;
mod generator;
pub mod wire;

pub use backend::{Backend, HttpBackend};
pub use config::{BackendConfig, Provider};
pub use error::{BackendError, ConfigError};
pub use generator::{GenerationRequest, GenerationResult, RuleGenerator};
