use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::document::bounds::{CellRect, TextRegion};
use crate::document::table::{Cell, CellArena, TextFragment};

/// How a spanning text was distributed over its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMethod {
    /// Split over the cells the text geometrically overlaps.
    Overlap,
    /// Split over the cells on the same row as the text.
    Positional,
}

/// A text item distributed to more than one piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanningAssignment {
    pub text_id: usize,
    /// The full original text.
    pub text: String,
    pub confidence: f64,
    /// Ids of the cells that received a piece, left to right.
    pub assigned_to_cells: Vec<usize>,
    /// The pieces, parallel to `assigned_to_cells`.
    pub split_texts: Vec<String>,
    pub assignment_method: AssignmentMethod,
}

/// A text item that matched no cell, kept for manual fix-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedText {
    pub text_id: usize,
    pub text: String,
    pub confidence: f64,
    pub text_region: TextRegion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellWithText {
    pub cell_id: usize,
    pub coordinates: CellRect,
    /// Combined text of all fragments, top to bottom.
    pub text: String,
    /// Mean confidence of the fragments with positive confidence.
    pub confidence: f64,
    pub cell_score: f64,
    pub component_texts: Vec<TextFragment>,
}

impl CellWithText {
    /// Returns `true` when any component is a piece of a split text.
    pub fn has_split_text(&self) -> bool {
        self.component_texts.iter().any(|c| c.is_split)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyCell {
    pub cell_id: usize,
    pub coordinates: CellRect,
    pub cell_score: f64,
}

/// Summary counts of one merge run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub total_cells: usize,
    /// Text items handed to the assignment engine.
    pub total_text_items: usize,
    /// Distinct text items attached to at least one cell.
    pub assigned_text_items: usize,
    pub cells_with_text: usize,
    pub empty_cells: usize,
    pub unassigned_text: usize,
    pub spanning_text_items: usize,
    /// Items with blank text, ignored by the engine.
    #[serde(default)]
    pub skipped_text_items: usize,
    /// OCR records dropped before becoming text items.
    #[serde(default)]
    pub discarded_text_items: usize,
}

/// The reconstructed table document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub cells_with_text: Vec<CellWithText>,
    pub empty_cells: Vec<EmptyCell>,
    pub unassigned_text: Vec<UnassignedText>,
    #[serde(rename = "spanning_text")]
    pub spanning_assignments: Vec<SpanningAssignment>,
    pub metadata: ResultMetadata,
}

impl DocumentResult {
    pub fn with_image_path(mut self, image_path: Option<String>) -> Self {
        self.image_path = image_path;
        self
    }

    /// Finds a cell with text by its id.
    pub fn cell_with_text(&self, cell_id: usize) -> Option<&CellWithText> {
        self.cells_with_text.iter().find(|c| c.cell_id == cell_id)
    }
}

/// Terminal state of every text item after assignment.
#[derive(Debug, Clone, Default)]
pub struct AssignmentReport {
    pub total_text_items: usize,
    pub assigned_ids: BTreeSet<usize>,
    pub unassigned: Vec<UnassignedText>,
    pub spanning: Vec<SpanningAssignment>,
    pub skipped: usize,
    pub discarded: usize,
}

/// Builds the final document from aggregated cells and the assignment report.
///
/// Cells are partitioned on whether their combined text is non-empty; both
/// lists keep detection order.
pub fn to_document_result(arena: CellArena, report: AssignmentReport) -> DocumentResult {
    let total_cells = arena.len();
    let (with_text, empty): (Vec<Cell>, Vec<Cell>) =
        arena.into_cells().into_iter().partition(Cell::has_text);

    let cells_with_text: Vec<CellWithText> = with_text
        .into_iter()
        .map(|cell| CellWithText {
            cell_id: cell.id,
            coordinates: cell.rect,
            text: cell.combined_text().to_string(),
            confidence: cell.combined_confidence(),
            cell_score: cell.score,
            component_texts: cell.fragments().to_vec(),
        })
        .collect();

    let empty_cells: Vec<EmptyCell> = empty
        .into_iter()
        .map(|cell| EmptyCell {
            cell_id: cell.id,
            coordinates: cell.rect,
            cell_score: cell.score,
        })
        .collect();

    let metadata = ResultMetadata {
        total_cells,
        total_text_items: report.total_text_items,
        assigned_text_items: report.assigned_ids.len(),
        cells_with_text: cells_with_text.len(),
        empty_cells: empty_cells.len(),
        unassigned_text: report.unassigned.len(),
        spanning_text_items: report.spanning.len(),
        skipped_text_items: report.skipped,
        discarded_text_items: report.discarded,
    };

    DocumentResult {
        image_path: None,
        cells_with_text,
        empty_cells,
        unassigned_text: report.unassigned,
        spanning_assignments: report.spanning,
        metadata,
    }
}
