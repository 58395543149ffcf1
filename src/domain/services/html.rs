#[cfg(test)]
#[path = "html_test.rs"]
mod tests;

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"(?i)<br\s*/?>").expect("static regex"));
static BLOCK_END: Lazy<Regex> = Lazy::new(|| {
    return Regex::new(r"(?i)</(p|div|ul|ol|h[1-6]|pre|blockquote)\s*>").expect("static regex");
});
static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"(?i)<li(\s[^>]*)?>").expect("static regex"));
static LIST_ITEM_END: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"(?i)</li\s*>").expect("static regex"));
// A bare `<` followed by a space or digit is text, not a tag.
static TAG: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"</?[A-Za-z][^>]*>").expect("static regex"));
static TRAILING_SPACE: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"[ \t]+\n").expect("static regex"));
static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"\n{3,}").expect("static regex"));

const ENTITIES: [(&str, &str); 7] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#x27;", "'"),
    ("&amp;", "&"),
];

/// Flattens the HTML the backend formats answers with into plain text for
/// the terminal. Block elements become line breaks and list items become
/// dashes.
pub fn html_to_text(html: &str) -> String {
    let text = LINE_BREAK.replace_all(html, "\n");
    let text = LIST_ITEM.replace_all(&text, "\n- ");
    let text = LIST_ITEM_END.replace_all(&text, "");
    let text = BLOCK_END.replace_all(&text, "\n\n");
    let text = TAG.replace_all(&text, "");

    let mut text = text.to_string();
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }

    let text = TRAILING_SPACE.replace_all(&text, "\n");
    let text = BLANK_LINES.replace_all(&text, "\n\n");

    return text.trim().to_string();
}
