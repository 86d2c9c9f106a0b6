//! Key-case translation between camelCase and snake_case.
//!
//! The two functions are exact inverses for any string composed of
//! lowercase-alphanumeric words joined by underscores or camel humps,
//! which is the full space of JSON keys this framework translates.

/// Converts a camelCase string to snake_case.
///
/// An underscore is inserted before each uppercase letter, which is then
/// lowercased: `"twoWordsHere"` becomes `"two_words_here"`.
#[must_use]
pub fn camel_to_snake(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for ch in s.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Converts a snake_case string to camelCase.
///
/// Each `_x` sequence drops the underscore and uppercases `x`:
/// `"two_words_here"` becomes `"twoWordsHere"`. A trailing underscore is
/// dropped.
#[must_use]
pub fn snake_to_camel(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = false;
    for ch in s.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
