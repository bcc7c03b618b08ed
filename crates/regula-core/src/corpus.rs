//! Few-shot example corpus: the built-in student-records set and file-backed corpora.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

const FIXED_EXAMPLES: &str = include_str!("../data/fixed_examples.json");

/// A natural-language statement paired with the rule it should produce.
///
/// `output` is kept as raw JSON. Shapes vary across a corpus (flat
/// `conditions`, `all`/`any` groups, `next_action` chains, `source` lookups)
/// and nothing here enforces one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub input: String,
    pub output: Value,
}

impl Example {
    pub fn new(input: impl Into<String>, output: Value) -> Self {
        Self {
            input: input.into(),
            output,
        }
    }
}

#[derive(Debug, Error)]
pub enum CorpusLoadError {
    #[error("corpus file not readable: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus file is not a JSON array of {{input, output}} objects: {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Ordered, read-only collection of [`Example`]s.
///
/// Loaded once at startup and shared (behind an `Arc`) by every request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    examples: Vec<Example>,
}

impl Corpus {
    pub fn new(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The hand-written example set compiled into the binary.
    pub fn fixed() -> Self {
        Self::from_embedded(FIXED_EXAMPLES)
    }

    fn from_embedded(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(examples) => Self { examples },
            Err(e) => {
                warn!(error = %e, "built-in example corpus unreadable; continuing without few-shot examples");
                Self::empty()
            }
        }
    }

    /// Load a corpus from a JSON file holding an array of `{input, output}` objects.
    pub fn load(path: &Path) -> Result<Self, CorpusLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| CorpusLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let examples: Vec<Example> =
            serde_json::from_str(&text).map_err(|source| CorpusLoadError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        info!(count = examples.len(), path = %path.display(), "loaded example corpus");
        Ok(Self { examples })
    }

    /// Like [`load`](Self::load), but falls back to an empty corpus on failure.
    ///
    /// The failure is logged at `warn`, which the CLI shows by default.
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!(error = %e, "corpus load failed; continuing without few-shot examples");
            Self::empty()
        })
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn fixed_corpus_parses() {
        let parsed: Vec<Example> = serde_json::from_str(FIXED_EXAMPLES).unwrap();
        assert_eq!(parsed.len(), 51);
        assert_eq!(Corpus::fixed().len(), 51);
    }

    #[test]
    fn fixed_corpus_declared_order() {
        let corpus = Corpus::fixed();
        let first = &corpus.examples()[0];
        assert!(first.input.starts_with("If the students computed age is less than 18"));
        assert_eq!(first.output["conditions"]["fact"], "computed_age");
        assert_eq!(first.output["conditions"]["operator"], "lessThan");
    }

    #[test]
    fn fixed_corpus_covers_output_shapes() {
        let corpus = Corpus::fixed();
        let outputs: Vec<&Value> = corpus.examples().iter().map(|e| &e.output).collect();
        assert!(outputs.iter().any(|o| o["conditions"].get("all").is_some()));
        assert!(outputs.iter().any(|o| o["conditions"].get("any").is_some()));
        assert!(outputs.iter().any(|o| o["actions"].get("next_action").is_some()));
        assert!(outputs.iter().any(|o| o["actions"].get("source").is_some()));
    }

    #[test]
    fn load_valid_file() {
        let f = write_tmp(
            r#"[
                {"input": "if gpa is below 2.0 flag probation",
                 "output": {"conditions": {"fact": "gpa", "operator": "lessThan", "value": 2.0},
                            "actions": {"message": "Academic probation."}}},
                {"input": "second", "output": {"conditions": {}, "actions": {}}, "note": "ignored"}
            ]"#,
        );
        let corpus = Corpus::load(f.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.examples()[0].output["conditions"]["fact"], "gpa");
        assert_eq!(corpus.examples()[1].input, "second");
    }

    #[test]
    fn load_preserves_output_field_order() {
        let f = write_tmp(r#"[{"input": "x", "output": {"zeta": 1, "alpha": 2}}]"#);
        let corpus = Corpus::load(f.path()).unwrap();
        let keys: Vec<&String> = corpus.examples()[0]
            .output
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn load_missing_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = Corpus::load(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CorpusLoadError::Io { .. }));
    }

    #[test]
    fn load_invalid_json_errors() {
        let f = write_tmp("[{\"input\": ");
        let err = Corpus::load(f.path()).unwrap_err();
        assert!(matches!(err, CorpusLoadError::Json { .. }));
    }

    #[test]
    fn load_wrong_top_level_shape_errors() {
        let f = write_tmp(r#"{"input": "x", "output": {}}"#);
        assert!(matches!(
            Corpus::load(f.path()).unwrap_err(),
            CorpusLoadError::Json { .. }
        ));
    }

    #[test]
    fn load_entry_missing_input_errors() {
        let f = write_tmp(r#"[{"output": {}}]"#);
        assert!(Corpus::load(f.path()).is_err());
    }

    #[test]
    fn load_or_empty_degrades() {
        let tmp = tempfile::TempDir::new().unwrap();
        let corpus = Corpus::load_or_empty(&tmp.path().join("missing.json"));
        assert!(corpus.is_empty());
    }

    #[test]
    fn load_or_empty_passes_through_success() {
        let f = write_tmp(r#"[{"input": "a", "output": {"k": 1}}]"#);
        let corpus = Corpus::load_or_empty(f.path());
        assert_eq!(corpus, Corpus::new(vec![Example::new("a", json!({"k": 1}))]));
    }

    #[test]
    fn broken_embedded_corpus_degrades_to_empty() {
        assert!(Corpus::from_embedded("[{\"input\": ").is_empty());
        assert!(Corpus::from_embedded(r#"{"input": "x", "output": {}}"#).is_empty());
        assert_eq!(Corpus::from_embedded(FIXED_EXAMPLES).len(), 51);
    }
}
