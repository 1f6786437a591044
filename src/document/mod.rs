pub mod analysis;
pub mod bounds;
pub mod error;
pub mod input;
pub mod table;
pub mod text_box;

pub use analysis::{to_document_result, ConfidenceSummary, DocumentResult, MergePipeline};
pub use bounds::{CellRect, TextRegion};
pub use error::DocumentError;
pub use input::{CellDetection, OcrDocument};
pub use table::{Cell, CellArena, TextFragment};
pub use text_box::TextItem;

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::utils::config::MergeConfig;

/// A pair of cell-detection and OCR payloads for the same document image.
#[derive(Debug, Clone)]
pub struct TableDocument {
    cells: CellDetection,
    ocr: OcrDocument,
    image_path: Option<String>,
}

impl TableDocument {
    /// Builds a document from already-decoded JSON payloads.
    ///
    /// Payloads of an unrecognized shape yield no cells or no text items.
    pub fn from_values(cells: Value, ocr: Value) -> Self {
        let cells = CellDetection::from_value(cells);
        let image_path = input::image_path(&cells, &ocr);
        let ocr = OcrDocument::from_value(ocr);

        Self {
            cells,
            ocr,
            image_path,
        }
    }

    /// Reads both payloads from JSON files.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InputLoad`] or [`DocumentError::InputParse`]
    /// when either file cannot be read or is not JSON.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        cells_path: P,
        ocr_path: Q,
    ) -> Result<Self, DocumentError> {
        let cells = load_json(cells_path)?;
        let ocr = load_json(ocr_path)?;
        Ok(Self::from_values(cells, ocr))
    }

    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    pub fn cells(&self) -> &CellDetection {
        &self.cells
    }

    pub fn ocr(&self) -> &OcrDocument {
        &self.ocr
    }

    /// Reconciles cells and text into a document result.
    pub fn merge(&self, config: &MergeConfig) -> DocumentResult {
        MergePipeline::new(config.clone())
            .merge(&self.cells, &self.ocr)
            .with_image_path(self.image_path.clone())
    }
}

/// Reads and decodes a JSON file.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Value, DocumentError> {
    let path = path.as_ref();
    debug!("Loading JSON file from: {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| DocumentError::InputLoad {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| DocumentError::InputParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a result as pretty-printed JSON.
pub fn save_result<P: AsRef<Path>>(result: &DocumentResult, path: P) -> Result<(), DocumentError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(result)?;

    fs::write(path, json).map_err(|source| DocumentError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Saved combined results to {}", path.display());
    Ok(())
}

/// Reads a previously saved result.
pub fn load_result<P: AsRef<Path>>(path: P) -> Result<DocumentResult, DocumentError> {
    let path = path.as_ref();
    let value = load_json(path)?;

    serde_json::from_value(value).map_err(|source| DocumentError::InputParse {
        path: path.to_path_buf(),
        source,
    })
}
