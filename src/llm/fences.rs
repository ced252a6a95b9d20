//! Markdown code-fence normalization for model output.
//!
//! Models asked for "JSON only" still wrap it in ```json fences often
//! enough that every parser in this crate runs through here first.

const FENCE: &str = "```";

/// Remove one leading fence (with optional language tag) and one trailing
/// fence, then trim. Text without fences is returned trimmed.
pub fn strip_code_fences(text: &str) -> String {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        body = match rest.find('\n') {
            Some(newline) if is_language_tag(&rest[..newline]) => &rest[newline + 1..],
            Some(_) => rest,
            None => {
                let tag_len = rest
                    .find(|c: char| !c.is_ascii_alphanumeric())
                    .unwrap_or(rest.len());
                &rest[tag_len..]
            }
        };
    }

    let body = body.trim_end();
    body.strip_suffix(FENCE).unwrap_or(body).trim().to_string()
}

fn is_language_tag(s: &str) -> bool {
    s.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+')
}
