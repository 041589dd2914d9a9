//! Verse-level pagination over stored lyrics.
//!
//! Lyrics are stored as one blob with verses separated by a blank line. No
//! escaping exists, so a verse can never itself contain a blank line.

use crate::models::Page;

/// Separator between two verses.
pub const VERSE_DELIMITER: &str = "\n\n";

/// Split lyrics into verses. Text without a delimiter is a single verse.
pub fn split_verses(text: &str) -> Vec<&str> {
    text.split(VERSE_DELIMITER).collect()
}

/// Return the verses selected by `page`, rejoined with the delimiter.
///
/// A page starting past the last verse yields an empty string rather than an
/// error, as does a zero limit.
pub fn paginate(text: &str, page: Page) -> String {
    let verses = split_verses(text);
    let start = page.offset as usize;
    if start >= verses.len() {
        return String::new();
    }
    let end = start.saturating_add(page.limit as usize).min(verses.len());
    verses[start..end].join(VERSE_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LYRICS: &str = "Verse 1\n\nVerse 2\n\nVerse 3";

    #[test]
    fn middle_verse() {
        assert_eq!(paginate(LYRICS, Page::new(1, 1)), "Verse 2");
    }

    #[test]
    fn oversized_page_returns_full_text() {
        assert_eq!(paginate(LYRICS, Page::new(10, 0)), LYRICS);
    }

    #[test]
    fn exact_page_round_trips() {
        let count = split_verses(LYRICS).len() as u32;
        assert_eq!(paginate(LYRICS, Page::new(count, 0)), LYRICS);
    }

    #[test]
    fn offset_past_end_is_empty() {
        for limit in [0, 1, 3, u32::MAX] {
            assert_eq!(paginate(LYRICS, Page::new(limit, 3)), "");
            assert_eq!(paginate(LYRICS, Page::new(limit, 40)), "");
        }
    }

    #[test]
    fn zero_limit_is_empty() {
        for offset in 0..3 {
            assert_eq!(paginate(LYRICS, Page::new(0, offset)), "");
        }
    }

    #[test]
    fn tail_is_clamped() {
        assert_eq!(paginate(LYRICS, Page::new(5, 1)), "Verse 2\n\nVerse 3");
        assert_eq!(paginate(LYRICS, Page::new(u32::MAX, 2)), "Verse 3");
    }

    #[test]
    fn text_without_delimiter_is_one_verse() {
        assert_eq!(split_verses("single line\nsecond line").len(), 1);
        assert_eq!(paginate("only verse", Page::VERSES), "only verse");
        assert_eq!(paginate("only verse", Page::new(1, 1)), "");
    }

    #[test]
    fn every_page_is_contiguous_slice() {
        let text = "a\n\nb\n\nc\n\nd\n\ne";
        let verses = split_verses(text);
        for offset in 0..7u32 {
            for limit in 0..7u32 {
                let page = paginate(text, Page::new(limit, offset));
                let start = (offset as usize).min(verses.len());
                let end = (start + limit as usize).min(verses.len());
                assert_eq!(page, verses[start..end].join(VERSE_DELIMITER));
            }
        }
    }
}
