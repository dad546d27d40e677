//! JSON replies

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Pretty-print the JSON carried by a reply
///
/// Uses the body of a ```` ```json ```` fenced block when one is present,
/// otherwise the whole text with fence markers removed. Returns `None` if the
/// candidate does not parse.
#[must_use]
pub fn pretty_json(text: &str) -> Option<String> {
    let candidate = fenced_block(text).map_or_else(|| text.replace(FENCE, ""), String::from);
    let value: serde_json::Value = serde_json::from_str(candidate.trim()).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find(JSON_FENCE)? + JSON_FENCE.len();
    let body = &text[start..];
    let end = body.find(FENCE)?;
    Some(&body[..end])
}
