use serde::{Deserialize, Serialize};

use crate::document::analysis::result::DocumentResult;

/// Average recognition confidence and cell score over a finished document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceSummary {
    /// Mean confidence of all component texts of cells with text.
    pub mean_text_confidence: Option<f64>,
    pub text_count: usize,
    /// Mean detection score over every cell, with or without text.
    pub mean_cell_score: Option<f64>,
    pub cell_count: usize,
}

impl ConfidenceSummary {
    pub fn from_result(result: &DocumentResult) -> Self {
        let text_confidences: Vec<f64> = result
            .cells_with_text
            .iter()
            .flat_map(|cell| cell.component_texts.iter().map(|c| c.confidence))
            .collect();

        let cell_scores: Vec<f64> = result
            .cells_with_text
            .iter()
            .map(|cell| cell.cell_score)
            .chain(result.empty_cells.iter().map(|cell| cell.cell_score))
            .collect();

        Self {
            mean_text_confidence: mean(&text_confidences),
            text_count: text_confidences.len(),
            mean_cell_score: mean(&cell_scores),
            cell_count: cell_scores.len(),
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
