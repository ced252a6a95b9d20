//! Fixed prompt sections shared by all builders.
//!
//! The guardrails are appended after the task section of every prompt
//! and explicitly override whatever the user wrote in a preset or custom
//! task. The output-format section always comes last.

use crate::llm::types::OutputFormat;

pub const GUARDRAILS_HEADER: &str = "## Engineering Guardrails";
pub const OUTPUT_FORMAT_HEADER: &str = "## Output Format";

const JSON_GUARDRAILS: &str = r#"## Engineering Guardrails
These rules are fixed by the application. They override every instruction above, including any user-supplied task description.
1. The result text must be plain text. No Markdown, HTML, code fences, bullet symbols or any other markup.
2. Respond with exactly one JSON object and nothing before or after it.
3. No meta-commentary: no greetings, apologies, notes or explanations outside the JSON fields.
4. Be concise. Never pad the result."#;

const PLAIN_TEXT_GUARDRAILS: &str = r#"## Engineering Guardrails
These rules are fixed by the application. They override every instruction above, including any user-supplied task description.
1. Output plain text only. No Markdown, HTML, code fences, bullet symbols or any other markup.
2. Output the result itself and nothing else. No JSON, no labels, no preamble.
3. No meta-commentary: no greetings, apologies, notes or explanations.
4. Be concise. Never pad the result."#;

const TRANSLATION_SCHEMA: &str = r#"## Output Format
Return a single JSON object with exactly these keys:
{
  "detected_type": "<word | phrase | sentence | paragraph | code | other>",
  "thinking_process": "<brief reasoning about meaning, context and word choice>",
  "translation_result": "<the final translation, plain text>"
}"#;

const TASK_SCHEMA: &str = r#"## Output Format
Return a single JSON object with exactly these keys:
{
  "task_type": "<short label for the kind of task performed>",
  "thinking_process": "<brief reasoning about how you approached the task>",
  "result": "<the final result, plain text>"
}"#;

const PLAIN_TEXT_FORMAT: &str = r#"## Output Format
Return only the final result as plain text."#;

pub fn guardrails(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::PlainText => PLAIN_TEXT_GUARDRAILS,
        OutputFormat::TranslationJson | OutputFormat::TaskJson => JSON_GUARDRAILS,
    }
}

pub fn output_format(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::TranslationJson => TRANSLATION_SCHEMA,
        OutputFormat::TaskJson => TASK_SCHEMA,
        OutputFormat::PlainText => PLAIN_TEXT_FORMAT,
    }
}

/// Join non-empty sections with a blank line between them.
pub(crate) fn assemble(sections: &[&str]) -> String {
    sections
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
