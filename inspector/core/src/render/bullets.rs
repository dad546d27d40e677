//! Bullet-list parsing

const BULLET_MARKERS: [char; 3] = ['-', '•', '*'];

/// Extract list items from `text`
///
/// A line is an item when it starts with a bullet marker (`-`, `•`, `*`) or
/// an enumerator such as `1.` or `b)`. The marker is stripped. Other lines,
/// blank lines included, are dropped.
#[must_use]
pub fn parse_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(item_text)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn item_text(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix(BULLET_MARKERS) {
        let rest = rest.trim_start();
        return (!rest.starts_with(BULLET_MARKERS)).then_some(rest);
    }

    let marker_len = line
        .find(|c: char| !c.is_alphanumeric())
        .filter(|&len| len > 0)?;
    let rest = line[marker_len..].strip_prefix(['.', ')'])?;

    rest.starts_with(char::is_whitespace)
        .then_some(rest.trim_start())
}
