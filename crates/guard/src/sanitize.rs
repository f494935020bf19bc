//! Free-text sanitization.
//!
//! HTML-escapes the characters that matter for downstream rendering
//! and query construction, and strips non-printable control bytes.
//! Escaping is idempotent: an ampersand that already heads one of our
//! own escape sequences is left alone, so re-sanitizing stored text
//! never double-escapes it.

use std::borrow::Cow;

/// Escape sequences this sanitizer emits or recognizes as already
/// escaped. `&#39;` is the common alternate spelling for apostrophes.
const ENTITIES: &[&str] = &["&amp;", "&lt;", "&gt;", "&quot;", "&#x27;", "&#39;"];

fn heads_entity(rest: &str) -> bool {
    ENTITIES.iter().any(|e| rest.starts_with(e))
}

/// C0 controls other than tab, newline, and carriage return, plus DEL.
fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}

/// Sanitize free text for safe storage and rendering.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    let dirty_from = text.char_indices().find_map(|(i, c)| {
        let dirty = match c {
            '<' | '>' | '"' | '\'' => true,
            '&' => !heads_entity(&text[i..]),
            _ => is_stripped_control(c),
        };
        dirty.then_some(i)
    });
    let Some(first) = dirty_from else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len() + 16);
    out.push_str(&text[..first]);
    let mut rest = &text[first..];
    while let Some(c) = rest.chars().next() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '&' if heads_entity(rest) => out.push('&'),
            '&' => out.push_str("&amp;"),
            c if is_stripped_control(c) => {}
            c => out.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }
    Cow::Owned(out)
}
