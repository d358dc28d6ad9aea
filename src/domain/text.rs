//! Character/byte offset conversion
//!
//! Spans are expressed in character offsets while Rust strings and `regex`
//! matches are byte-indexed. [`CharIndex`] is built once per text and
//! converts in both directions. ASCII text takes the identity path.

use std::ops::Range;

/// Offset map for a single text
#[derive(Debug, Clone)]
pub struct CharIndex {
    byte_len: usize,
    /// Byte offset of every char boundary, including the end of the text.
    /// `None` when the text is pure ASCII.
    boundaries: Option<Vec<usize>>,
}

impl CharIndex {
    /// Build the index for `text`
    pub fn new(text: &str) -> Self {
        let boundaries = if text.is_ascii() {
            None
        } else {
            let mut offsets: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
            offsets.push(text.len());
            Some(offsets)
        };

        Self {
            byte_len: text.len(),
            boundaries,
        }
    }

    /// Length of the text in characters
    pub fn char_len(&self) -> usize {
        match &self.boundaries {
            Some(offsets) => offsets.len() - 1,
            None => self.byte_len,
        }
    }

    /// Byte offset of a character offset, `None` past the end
    pub fn to_byte(&self, char_offset: usize) -> Option<usize> {
        match &self.boundaries {
            Some(offsets) => offsets.get(char_offset).copied(),
            None => (char_offset <= self.byte_len).then_some(char_offset),
        }
    }

    /// Character offset of a byte offset, `None` if not on a char boundary
    pub fn to_char(&self, byte_offset: usize) -> Option<usize> {
        match &self.boundaries {
            Some(offsets) => offsets.binary_search(&byte_offset).ok(),
            None => (byte_offset <= self.byte_len).then_some(byte_offset),
        }
    }

    /// Byte range for a half-open character range
    pub fn byte_range(&self, start: usize, end: usize) -> Option<Range<usize>> {
        Some(self.to_byte(start)?..self.to_byte(end)?)
    }

    /// Character range for a half-open byte range (e.g. a regex match)
    pub fn char_range(&self, range: Range<usize>) -> Option<Range<usize>> {
        Some(self.to_char(range.start)?..self.to_char(range.end)?)
    }
}
