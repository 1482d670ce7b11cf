//! Conversion between tag lists and the `;`-separated text form used in
//! edit fields.

use super::model::TagItem;
use super::text::trim_form;

/// Separator used when joining tags for display.
pub const TAG_JOIN_SEPARATOR: &str = "; ";

/// Parses a `;`-separated tag string.
///
/// Segments are trimmed and empty ones dropped. Order and duplicates are
/// kept.
#[must_use]
pub fn parse_tags_string(tags: &str) -> Vec<TagItem> {
    tags.split(';')
        .map(trim_form)
        .filter(|tag| !tag.is_empty())
        .map(TagItem::new)
        .collect()
}

/// Joins tag texts with `"; "`.
#[must_use]
pub fn tags_to_string(tags: &[TagItem]) -> String {
    tags.iter()
        .map(|tag| tag.text.as_str())
        .collect::<Vec<_>>()
        .join(TAG_JOIN_SEPARATOR)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn texts(tags: &[TagItem]) -> Vec<&str> {
        tags.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_tags_string("").is_empty());
        assert!(parse_tags_string("   ").is_empty());
        assert!(parse_tags_string("\t\n").is_empty());
    }

    #[test]
    fn test_trims_and_keeps_order() {
        let tags = parse_tags_string("a; b ;c");
        assert_eq!(
            tags,
            vec![TagItem::new("a"), TagItem::new("b"), TagItem::new("c")]
        );
    }

    #[test]
    fn test_drops_empty_segments() {
        assert_eq!(texts(&parse_tags_string(";;a;  ;b;")), vec!["a", "b"]);
        assert!(parse_tags_string(" ; ; ").is_empty());
    }

    #[test]
    fn test_keeps_duplicates() {
        assert_eq!(texts(&parse_tags_string("x;x; x")), vec!["x", "x", "x"]);
    }

    #[test]
    fn test_inner_whitespace_preserved() {
        assert_eq!(
            texts(&parse_tags_string(" main office ; dev")),
            vec!["main office", "dev"]
        );
    }

    #[test]
    fn test_bom_segments_dropped() {
        assert_eq!(texts(&parse_tags_string("\u{FEFF}a;\u{FEFF};b")), vec!["a", "b"]);
    }

    #[test]
    fn test_join() {
        let tags = vec![TagItem::new("a"), TagItem::new("b")];
        assert_eq!(tags_to_string(&tags), "a; b");
        assert_eq!(tags_to_string(&[]), "");
        assert_eq!(tags_to_string(&[TagItem::new("solo")]), "solo");
    }

    #[test]
    fn test_normalizes_spacing() {
        assert_eq!(tags_to_string(&parse_tags_string("a;b ;  c")), "a; b; c");
    }
}
