//! Example corpus, few-shot selection, prompt assembly and JSON extraction.

pub mod corpus;
pub mod extract;
pub mod prompt;
pub mod select;

pub use corpus::{Corpus, CorpusLoadError, Example};
pub use extract::{ExtractError, ExtractMode, INVALID_JSON_RESPONSE, extract_json, extract_json_with};
pub use prompt::build_prompt;
pub use select::{DEFAULT_K, ScoredExample, Selection, overlap_score, select, tokenize};
