//! Length and whitespace rules shared by validation and tag parsing.
//!
//! Records are edited in browser forms, so lengths are UTF-16 code units
//! and whitespace is the ECMAScript set: Unicode `White_Space` without
//! U+0085, plus the byte-order mark U+FEFF.

/// Length of `s` in UTF-16 code units.
pub(crate) fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Whether `c` is stripped when trimming form input.
pub(crate) fn is_form_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c != '\u{0085}' && c.is_whitespace())
}

/// `s` without leading or trailing form whitespace.
pub(crate) fn trim_form(s: &str) -> &str {
    s.trim_matches(is_form_whitespace)
}
