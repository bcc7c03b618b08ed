//! Pull a JSON object out of free-form generated text.
//!
//! Generators wrap their answer in prose or markdown fences more often than
//! not. The default [`ExtractMode::Greedy`] takes everything from the first
//! `{` to the last `}` and parses it. That span is not depth-matched: two
//! separate objects in one response become one unparseable span.
//! [`ExtractMode::Balanced`] is an opt-in alternative that parses the first
//! brace-balanced object instead.

use serde_json::{Value, json};
use thiserror::Error;

/// Tag placed in the `error` field of the failure payload.
pub const INVALID_JSON_RESPONSE: &str = "Invalid JSON response";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractMode {
    /// First `{` through last `}`.
    #[default]
    Greedy,
    /// First `{` through its matching `}`, skipping braces inside strings.
    Balanced,
}

/// Why no rule could be extracted. Both variants keep the raw text verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no JSON object found in response")]
    NoJsonFound { raw: String },

    #[error("malformed JSON in response: {detail}")]
    MalformedJson { detail: String, raw: String },
}

impl ExtractError {
    /// The text the extraction was attempted on.
    pub fn raw(&self) -> &str {
        match self {
            Self::NoJsonFound { raw } | Self::MalformedJson { raw, .. } => raw,
        }
    }

    /// `{"error": "Invalid JSON response", "raw_output": <raw>}`
    pub fn to_payload(&self) -> Value {
        json!({
            "error": INVALID_JSON_RESPONSE,
            "raw_output": self.raw(),
        })
    }
}

/// Extract with the default greedy span.
pub fn extract_json(text: &str) -> Result<Value, ExtractError> {
    extract_json_with(text, ExtractMode::Greedy)
}

pub fn extract_json_with(text: &str, mode: ExtractMode) -> Result<Value, ExtractError> {
    let span = match mode {
        ExtractMode::Greedy => greedy_span(text),
        ExtractMode::Balanced => balanced_span(text),
    };
    let Some(candidate) = span else {
        return Err(ExtractError::NoJsonFound {
            raw: text.to_string(),
        });
    };

    serde_json::from_str(candidate).map_err(|e| ExtractError::MalformedJson {
        detail: e.to_string(),
        raw: text.to_string(),
    })
}

fn greedy_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn balanced_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
