//! Stdout rendering. Logs and warnings go to stderr; stdout carries only JSON.

use regula_core::ScoredExample;
use serde_json::{Value, json};

pub fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `[{"score": .., "input": .., "output": ..}, ..]` in selection order.
pub fn scored_examples(scored: &[ScoredExample<'_>]) -> Value {
    Value::Array(
        scored
            .iter()
            .map(|s| {
                json!({
                    "score": s.score,
                    "input": s.example.input,
                    "output": s.example.output,
                })
            })
            .collect(),
    )
}
