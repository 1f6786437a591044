use serde::{Deserialize, Serialize};

use crate::document::bounds::{CellRect, TextRegion};

/// A piece of recognized text attached to a cell.
///
/// A fragment is either a whole [`TextItem`](crate::document::TextItem) or one
/// piece of a split. Confidence and region are inherited unchanged from the
/// originating item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Id of the originating text item.
    pub text_id: usize,
    pub text: String,
    pub confidence: f64,
    /// Overlap fraction at assignment time; 0.0 for positional pieces.
    pub overlap: f64,
    /// Region of the originating item, reused unchanged for split pieces.
    #[serde(rename = "text_region")]
    pub region: TextRegion,
    pub is_split: bool,
    #[serde(default)]
    pub is_positional: bool,
    /// Full text of the originating item, present only on split pieces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

/// A detected table cell and the text accumulated into it.
///
/// The fragment list is append-only during assignment. `combined_text` and
/// `combined_confidence` are filled in once by [`Cell::aggregate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Index of the cell in the cell-detection list.
    pub id: usize,
    pub rect: CellRect,
    /// Detection score of the cell.
    pub score: f64,
    fragments: Vec<TextFragment>,
    combined_text: String,
    combined_confidence: f64,
}

impl Cell {
    pub fn new(id: usize, rect: CellRect, score: f64) -> Self {
        Self {
            id,
            rect,
            score,
            fragments: Vec::new(),
            combined_text: String::new(),
            combined_confidence: 0.0,
        }
    }

    #[inline]
    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    #[inline]
    pub fn combined_text(&self) -> &str {
        &self.combined_text
    }

    #[inline]
    pub fn combined_confidence(&self) -> f64 {
        self.combined_confidence
    }

    #[inline]
    pub fn has_text(&self) -> bool {
        !self.combined_text.is_empty()
    }

    /// Orders fragments top-to-bottom and computes the combined fields.
    ///
    /// Fragments are sorted by the vertical center of their region; the sort is
    /// stable, so fragments on the same line keep their assignment order. Empty
    /// fragment texts are skipped when joining, and only positive confidences
    /// count towards the mean.
    pub fn aggregate(&mut self) {
        if self.fragments.is_empty() {
            return;
        }

        self.fragments
            .sort_by(|a, b| a.region.center_y().total_cmp(&b.region.center_y()));

        self.combined_text = self
            .fragments
            .iter()
            .filter(|f| !f.text.is_empty())
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let confidences: Vec<f64> = self
            .fragments
            .iter()
            .map(|f| f.confidence)
            .filter(|&c| c > 0.0)
            .collect();

        self.combined_confidence = if confidences.is_empty() {
            0.0
        } else {
            confidences.iter().sum::<f64>() / confidences.len() as f64
        };
    }
}

/// Arena of cells for one document run, addressed by slot.
///
/// Slots are positions in the arena; a cell's `id` is its index in the
/// detection list, which differs from its slot when malformed boxes were
/// dropped. Fragments are only ever appended through [`CellArena::attach`].
#[derive(Debug, Clone, Default)]
pub struct CellArena {
    cells: Vec<Cell>,
}

impl CellArena {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, slot: usize) -> Option<&Cell> {
        self.cells.get(slot)
    }

    /// Appends a fragment to the cell in `slot`. Out-of-range slots are ignored.
    pub fn attach(&mut self, slot: usize, fragment: TextFragment) {
        if let Some(cell) = self.cells.get_mut(slot) {
            cell.fragments.push(fragment);
        }
    }

    /// Runs [`Cell::aggregate`] on every cell.
    pub fn aggregate(&mut self) {
        for cell in &mut self.cells {
            cell.aggregate();
        }
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}
