//! Recognized text items.
//!
//! A [`TextItem`] is one OCR detection after normalization: an identifier, the
//! recognized string, its confidence, and the [`TextRegion`] it was read from.

use serde::{Deserialize, Serialize};

use crate::document::bounds::TextRegion;

/// A recognized text string with its confidence and bounding region.
///
/// Items are immutable once extracted from raw OCR output. The `id` is the
/// index of the item's first appearance in the OCR output and stays stable for
/// the whole run, even when earlier records were dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    /// Index of first appearance in the OCR output.
    pub id: usize,
    /// Recognized text content from OCR.
    pub text: String,
    /// Recognition confidence (0.0 to 1.0). Missing values are stored as 0.0.
    pub confidence: f64,
    /// Polygon the text was detected in.
    pub region: TextRegion,
}

impl TextItem {
    pub fn new(id: usize, text: impl Into<String>, confidence: f64, region: TextRegion) -> Self {
        Self {
            id,
            text: text.into(),
            confidence,
            region,
        }
    }

    /// Number of characters (Unicode scalar values) in the text.
    #[inline]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns `true` when the text is empty or whitespace only.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Returns `true` when the whole text is ASCII digits and at least `min_digits` long.
    pub fn is_numeric_sequence(&self, min_digits: usize) -> bool {
        self.text.len() >= min_digits && self.text.bytes().all(|b| b.is_ascii_digit())
    }
}
