use tracing::{debug, info, instrument, warn};

use crate::document::analysis::result::{
    to_document_result, AssignmentMethod, AssignmentReport, DocumentResult, SpanningAssignment,
    UnassignedText,
};
use crate::document::analysis::splitter::split_text;
use crate::document::error::DocumentError;
use crate::document::input::{CellDetection, OcrDocument};
use crate::document::table::{Cell, CellArena, TextFragment};
use crate::document::text_box::TextItem;
use crate::utils::box_utils;
use crate::utils::config::MergeConfig;

/// Terminal state of a single text item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// Blank text; ignored.
    Skipped,
    /// Attached whole to the cell in this arena slot.
    Single { slot: usize },
    /// Split over several cells.
    Spanning(SpanningAssignment),
    /// Matched no cell.
    Unassigned,
}

/// Assigns OCR text items to table cells.
///
/// Each item is decided independently of every other item, in this order:
///
/// 1. Blank items are skipped.
/// 2. Cells overlapping the item by at least `min_overlap_for_spanning` are
///    spanning candidates. With more than one candidate and split-eligible
///    text, the text is split over the candidates left to right.
/// 3. Otherwise the single best-overlapping cell takes the whole text when
///    its overlap reaches `overlap_threshold`. Ties keep the earlier cell.
/// 4. Otherwise split-eligible text is split over the cells on the same row.
/// 5. Anything left is unassigned.
///
/// Assignment only appends fragments to cells; aggregation runs afterwards as
/// a separate pass over the whole arena.
pub struct MergePipeline {
    config: MergeConfig,
}

impl MergePipeline {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Normalizes both payloads and reconciles them into a document.
    #[instrument(skip_all)]
    pub fn merge(&self, cells: &CellDetection, ocr: &OcrDocument) -> DocumentResult {
        let cells = cells.to_cells();
        let extracted = ocr.extract_text_items();

        let (arena, mut report) = self.assign(cells, &extracted.items);
        report.discarded = extracted.discarded;
        self.finish(arena, report)
    }

    /// Reconciles already-normalized cells and text items into a document.
    #[instrument(skip_all, fields(cells = cells.len(), text_items = items.len()))]
    pub fn run(&self, cells: Vec<Cell>, items: &[TextItem]) -> DocumentResult {
        let (arena, report) = self.assign(cells, items);
        self.finish(arena, report)
    }

    /// Aggregates every cell, then assembles the document.
    fn finish(&self, mut arena: CellArena, report: AssignmentReport) -> DocumentResult {
        arena.aggregate();

        let result = to_document_result(arena, report);
        info!(
            total_cells = result.metadata.total_cells,
            total_text_items = result.metadata.total_text_items,
            assigned = result.metadata.assigned_text_items,
            unassigned = result.metadata.unassigned_text,
            spanning = result.metadata.spanning_text_items,
            discarded = result.metadata.discarded_text_items,
            "Merged cells and text"
        );
        result
    }

    /// Runs the assignment pass, leaving cells unaggregated.
    pub fn assign(&self, cells: Vec<Cell>, items: &[TextItem]) -> (CellArena, AssignmentReport) {
        debug!("Found {} cells and {} text items", cells.len(), items.len());
        let mut arena = CellArena::new(cells);
        let mut report = AssignmentReport {
            total_text_items: items.len(),
            ..AssignmentReport::default()
        };

        for item in items {
            let outcome = match self.assign_item(&mut arena, item) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Error processing text item {}: {}", item.id, e);
                    ItemOutcome::Unassigned
                }
            };

            match outcome {
                ItemOutcome::Skipped => report.skipped += 1,
                ItemOutcome::Single { .. } => {
                    report.assigned_ids.insert(item.id);
                }
                ItemOutcome::Spanning(spanning) => {
                    report.assigned_ids.insert(item.id);
                    report.spanning.push(spanning);
                }
                ItemOutcome::Unassigned => report.unassigned.push(UnassignedText {
                    text_id: item.id,
                    text: item.text.clone(),
                    confidence: item.confidence,
                    text_region: item.region.clone(),
                }),
            }
        }

        (arena, report)
    }

    /// Decides one item and appends its fragments to the arena.
    ///
    /// All overlaps are computed before any fragment is attached, so a
    /// geometry fault leaves the arena untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::ProcessingFault`] when the item's geometry
    /// cannot be evaluated.
    pub fn assign_item(
        &self,
        arena: &mut CellArena,
        item: &TextItem,
    ) -> Result<ItemOutcome, DocumentError> {
        if item.is_blank() {
            debug!("Skipping blank text item {}", item.id);
            return Ok(ItemOutcome::Skipped);
        }

        let overlaps = arena
            .cells()
            .iter()
            .map(|cell| box_utils::calculate_overlap(&item.region, &cell.rect))
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|source| DocumentError::ProcessingFault {
                text_id: item.id,
                source,
            })?;

        let split_eligible = self.is_split_eligible(item);

        let mut candidates: Vec<usize> = overlaps
            .iter()
            .enumerate()
            .filter(|&(_, &overlap)| overlap >= self.config.min_overlap_for_spanning)
            .map(|(slot, _)| slot)
            .collect();

        if candidates.len() > 1 && split_eligible {
            sort_left_to_right(arena, &mut candidates);
            if let Some(spanning) =
                distribute(arena, item, &candidates, &overlaps, AssignmentMethod::Overlap)
            {
                debug!(
                    "Text item {} spans cells {:?}",
                    item.id, spanning.assigned_to_cells
                );
                return Ok(ItemOutcome::Spanning(spanning));
            }
        }

        let mut best: Option<(usize, f64)> = None;
        for (slot, &overlap) in overlaps.iter().enumerate() {
            if overlap > best.map_or(0.0, |(_, best_overlap)| best_overlap) {
                best = Some((slot, overlap));
            }
        }

        if let Some((slot, overlap)) = best {
            if overlap >= self.config.overlap_threshold {
                arena.attach(
                    slot,
                    TextFragment {
                        text_id: item.id,
                        text: item.text.clone(),
                        confidence: item.confidence,
                        overlap,
                        region: item.region.clone(),
                        is_split: false,
                        is_positional: false,
                        original_text: None,
                    },
                );
                debug!(
                    "Text item {} assigned to cell slot {} (overlap {:.3})",
                    item.id, slot, overlap
                );
                return Ok(ItemOutcome::Single { slot });
            }
        }

        if split_eligible {
            let mut row: Vec<usize> = arena
                .cells()
                .iter()
                .enumerate()
                .filter(|(_, cell)| {
                    box_utils::is_row_aligned(&item.region, &cell.rect, self.config.row_tolerance)
                })
                .map(|(slot, _)| slot)
                .collect();

            if !row.is_empty() {
                sort_left_to_right(arena, &mut row);
                if let Some(spanning) =
                    distribute(arena, item, &row, &overlaps, AssignmentMethod::Positional)
                {
                    debug!(
                        "Text item {} positionally split over cells {:?}",
                        item.id, spanning.assigned_to_cells
                    );
                    return Ok(ItemOutcome::Spanning(spanning));
                }
            }
        }

        debug!("Text item {} left unassigned", item.id);
        Ok(ItemOutcome::Unassigned)
    }

    /// Text may be split when it is longer than `length_threshold` characters,
    /// or, with `split_numeric_sequences`, when it is a long enough digit run.
    fn is_split_eligible(&self, item: &TextItem) -> bool {
        item.char_len() > self.config.length_threshold
            || (self.config.split_numeric_sequences
                && item.is_numeric_sequence(self.config.numeric_min_digits))
    }
}

/// Stable sort of arena slots by the left edge of their cell.
fn sort_left_to_right(arena: &CellArena, slots: &mut [usize]) {
    let cells = arena.cells();
    slots.sort_by(|&a, &b| cells[a].rect.x1().total_cmp(&cells[b].rect.x1()));
}

/// Splits `item` over `slots` and attaches one fragment per non-empty piece.
///
/// Returns `None`, attaching nothing, when the split yields no pieces.
fn distribute(
    arena: &mut CellArena,
    item: &TextItem,
    slots: &[usize],
    overlaps: &[f64],
    method: AssignmentMethod,
) -> Option<SpanningAssignment> {
    let pieces = split_text(&item.text, slots);
    if pieces.is_empty() {
        return None;
    }

    let is_positional = method == AssignmentMethod::Positional;
    let mut assigned_to_cells = Vec::with_capacity(pieces.len());
    let mut split_texts = Vec::with_capacity(pieces.len());

    for piece in pieces {
        let overlap = if is_positional {
            0.0
        } else {
            overlaps[piece.target]
        };
        let cell_id = arena.get(piece.target).map_or(piece.target, |cell| cell.id);

        arena.attach(
            piece.target,
            TextFragment {
                text_id: item.id,
                text: piece.text.clone(),
                confidence: item.confidence,
                overlap,
                region: item.region.clone(),
                is_split: true,
                is_positional,
                original_text: Some(item.text.clone()),
            },
        );

        assigned_to_cells.push(cell_id);
        split_texts.push(piece.text);
    }

    Some(SpanningAssignment {
        text_id: item.id,
        text: item.text.clone(),
        confidence: item.confidence,
        assigned_to_cells,
        split_texts,
        assignment_method: method,
    })
}
