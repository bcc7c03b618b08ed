//! The rule generation pipeline: select → assemble → invoke → extract.

use std::sync::Arc;

use regula_core::{
    Corpus, Example, ExtractError, ExtractMode, Selection, build_prompt, extract_json_with,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::backend::Backend;
use crate::error::BackendError;

/// Outcome of one generation once the backend has answered.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    /// The JSON object extracted from the completion.
    Rule(Value),
    /// No usable JSON; the error carries the raw completion.
    Invalid(ExtractError),
}

impl GenerationResult {
    pub fn is_rule(&self) -> bool {
        matches!(self, Self::Rule(_))
    }

    /// The rule itself, or `{"error": "Invalid JSON response", "raw_output": ...}`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Rule(v) => v.clone(),
            Self::Invalid(e) => e.to_payload(),
        }
    }
}

/// A statement plus the examples picked for it. Lives for one call.
#[derive(Debug)]
pub struct GenerationRequest<'a> {
    pub statement: &'a str,
    pub examples: Vec<&'a Example>,
}

impl GenerationRequest<'_> {
    pub fn prompt(&self) -> String {
        build_prompt(self.statement, &self.examples)
    }
}

/// Turns statements into rules against a fixed corpus and backend.
///
/// Holds no per-request state, so one generator can serve concurrent calls.
pub struct RuleGenerator {
    corpus: Arc<Corpus>,
    backend: Arc<dyn Backend>,
    selection: Selection,
    extract_mode: ExtractMode,
}

impl RuleGenerator {
    pub fn new(corpus: Arc<Corpus>, backend: Arc<dyn Backend>) -> Self {
        Self {
            corpus,
            backend,
            selection: Selection::default(),
            extract_mode: ExtractMode::default(),
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_extract_mode(mut self, mode: ExtractMode) -> Self {
        self.extract_mode = mode;
        self
    }

    /// Pick examples for `statement` without calling the backend.
    pub fn prepare<'a>(&'a self, statement: &'a str) -> GenerationRequest<'a> {
        GenerationRequest {
            statement,
            examples: self.selection.apply(statement, &self.corpus),
        }
    }

    /// Run the full pipeline for one statement.
    ///
    /// Extraction failures come back as [`GenerationResult::Invalid`]; only a
    /// failed backend call is an `Err`.
    pub async fn generate_rule(&self, statement: &str) -> Result<GenerationResult, BackendError> {
        let request = self.prepare(statement);
        info!(
            examples = request.examples.len(),
            model = %self.backend.model(),
            "generating rule"
        );

        let raw = self.backend.invoke(&request.prompt()).await?;
        debug!(response = %raw, "backend response");

        Ok(match extract_json_with(&raw, self.extract_mode) {
            Ok(rule) => GenerationResult::Rule(rule),
            Err(e) => {
                info!(error = %e, "no rule extracted from response");
                GenerationResult::Invalid(e)
            }
        })
    }
}
