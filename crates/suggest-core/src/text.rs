#![forbid(unsafe_code)]

//! Grapheme-cluster offsets.
//!
//! Every caret and selection offset handed around by the overlay counts
//! extended grapheme clusters, never bytes or chars.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Number of grapheme clusters in `text`.
pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Byte offset of grapheme `idx`.
///
/// `idx == grapheme_count(text)` maps to `text.len()`; anything past the end
/// is `None`.
pub fn byte_offset(text: &str, idx: usize) -> Option<usize> {
    let mut count = 0;
    for (byte, _) in text.grapheme_indices(true) {
        if count == idx {
            return Some(byte);
        }
        count += 1;
    }
    (count == idx).then_some(text.len())
}

/// Display width in terminal cells.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Zero-based line and display column of grapheme `idx`.
///
/// Offsets past the end clamp to the end of text.
pub fn line_column(text: &str, idx: usize) -> (usize, usize) {
    let mut line = 0;
    let mut column = 0;
    for g in text.graphemes(true).take(idx) {
        if g == "\n" || g == "\r\n" {
            line += 1;
            column = 0;
        } else {
            column += display_width(g);
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn counts_clusters_not_chars() {
        assert_eq!(grapheme_count(""), 0);
        assert_eq!(grapheme_count("abc"), 3);
        // e + combining acute is one cluster
        assert_eq!(grapheme_count("e\u{301}x"), 2);
    }

    #[test]
    fn byte_offset_bounds() {
        assert_eq!(byte_offset("héllo", 0), Some(0));
        assert_eq!(byte_offset("héllo", 2), Some(3));
        assert_eq!(byte_offset("héllo", 5), Some(6));
        assert_eq!(byte_offset("héllo", 6), None);
        assert_eq!(byte_offset("", 0), Some(0));
        assert_eq!(byte_offset("", 1), None);
    }

    #[test]
    fn line_column_follows_newlines() {
        let text = "ab\ncde\nf";
        assert_eq!(line_column(text, 0), (0, 0));
        assert_eq!(line_column(text, 2), (0, 2));
        assert_eq!(line_column(text, 3), (1, 0));
        assert_eq!(line_column(text, 5), (1, 2));
        assert_eq!(line_column(text, 99), (2, 1));
    }

    #[test]
    fn wide_glyphs_take_two_columns() {
        assert_eq!(line_column("日本", 1), (0, 2));
        assert_eq!(display_width("日本"), 4);
    }

    proptest! {
        #[test]
        fn byte_offsets_land_on_char_boundaries(text in "\\PC{0,24}", idx in 0usize..32) {
            match byte_offset(&text, idx) {
                Some(b) => {
                    prop_assert!(idx <= grapheme_count(&text));
                    prop_assert!(text.is_char_boundary(b));
                }
                None => prop_assert!(idx > grapheme_count(&text)),
            }
        }
    }
}
