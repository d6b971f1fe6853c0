use std::sync::OnceLock;

use regex::Regex;
use scraper::Html;

/// Characters that end the first sentence of a description
const SENTENCE_END: &[char] = &['.', ',', '?', '!', ':', ';'];

/// Soft length cap for headlines synthesized from a description
const SYNTHESIZED_SOFT_CAP: usize = 45;

const ELLIPSIS: &str = "...";

fn break_tag_regex() -> &'static Regex {
    static BREAK_TAG: OnceLock<Regex> = OnceLock::new();
    BREAK_TAG.get_or_init(|| Regex::new(r"(?i)<br\s*/?\s*>").unwrap())
}

/// Resolve HTML entities without interpreting any markup
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    // Escaping `<` keeps the parser from treating anything as a tag
    let escaped = text.replace('<', "&lt;");
    let fragment = Html::parse_fragment(&escaped);
    fragment.root_element().text().collect()
}

/// Convert an HTML fragment to plain text.
///
/// Line-break tags become newlines, block elements start on a new line and
/// entities are decoded.
pub fn strip_tags(html: &str) -> String {
    let with_breaks = break_tag_regex().replace_all(html, "\n");
    let document = Html::parse_fragment(&with_breaks);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        if let Some(element) = node.value().as_element() {
            match element.name() {
                "p" | "div" | "li" | "blockquote" => text.push('\n'),
                _ => {}
            }
        }
        if let Some(text_node) = node.value().as_text() {
            text.push_str(text_node);
        }
    }

    text
}

/// Build a short headline from the first sentence of a description.
///
/// Returns `None` when the description holds no usable text.
pub fn synthesize_headline(description: &str) -> Option<String> {
    let text = strip_tags(description);
    let sentence = match text.find(SENTENCE_END) {
        Some(end) => &text[..end],
        None => text.as_str(),
    };

    let mut headline = String::new();
    for word in sentence.trim().split_whitespace() {
        if !headline.is_empty() {
            headline.push(' ');
        }
        headline.push_str(word);

        if headline.chars().count() >= SYNTHESIZED_SOFT_CAP {
            break;
        }
    }

    if headline.is_empty() {
        return None;
    }

    headline.push_str(ELLIPSIS);
    Some(headline)
}
