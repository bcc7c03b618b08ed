//! Prompt assembly for rule generation.

use crate::corpus::Example;

// ── Prompt templates ──

const FRAMING: &str = "\
You are an expert with extensive experience in Business Rule Engines (BRE). \
Your task is to convert natural language statements into structured JSON rules.";

const EXAMPLES_HEADER: &str = "Below are some examples of how to perform this task:\n\nExamples:";

const TARGET: &str = "\
Now, please convert the following natural language statement into a structured JSON rule format. \
Identify and mark any variables that need to be calculated or derived from other data:";

/// Render one example as an `Input:`/`Output:` pair.
///
/// Output is pretty-printed with 2-space indentation in the example's own
/// field order.
pub fn render_example(example: &Example) -> String {
    let output = serde_json::to_string_pretty(&example.output)
        .unwrap_or_else(|_| example.output.to_string());
    format!("Input: \"{}\"\nOutput: {output}", example.input)
}

/// Build the full generation prompt for `statement`.
///
/// Examples are separated by a blank line. The result depends only on the
/// arguments.
pub fn build_prompt(statement: &str, examples: &[&Example]) -> String {
    let mut prompt = String::from(FRAMING);

    if !examples.is_empty() {
        let rendered: Vec<String> = examples.iter().map(|e| render_example(e)).collect();
        prompt.push(' ');
        prompt.push_str(EXAMPLES_HEADER);
        prompt.push('\n');
        prompt.push_str(&rendered.join("\n\n"));
    }

    prompt.push_str("\n\n");
    prompt.push_str(TARGET);
    prompt.push_str(&format!("\n\n\"{statement}\""));
    prompt
}
