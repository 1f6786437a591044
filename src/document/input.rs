//! Normalization of raw cell-detection and OCR payloads.
//!
//! Both detectors have produced several JSON layouts over time. Each known
//! layout is a variant of [`OcrDocument`] or [`OcrRecord`]; anything else
//! degrades to zero items instead of failing the run.

use geo::Coord;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::document::bounds::{CellRect, TextRegion};
use crate::document::error::DocumentError;
use crate::document::table::Cell;
use crate::document::text_box::TextItem;

/// Cell-detection payload: `{ "boxes": [{ "coordinate": [x1, y1, x2, y2], "score": f }] }`.
///
/// Boxes are kept as raw JSON so that one malformed box only drops itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CellDetection {
    #[serde(default)]
    pub boxes: Vec<Value>,
    /// Path of the image the cells were detected on, if the detector recorded it.
    #[serde(default)]
    pub input_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCell {
    coordinate: [f64; 4],
    #[serde(default)]
    score: f64,
}

impl CellDetection {
    /// Reads a cell payload, degrading to zero cells when it has the wrong shape.
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value(value) {
            Ok(detection) => detection,
            Err(e) => {
                let error = DocumentError::UnrecognizedShape {
                    message: e.to_string(),
                };
                warn!("{}, using no cells", error);
                Self::default()
            }
        }
    }

    /// Converts the boxes into cells. The cell id is the box index.
    pub fn to_cells(&self) -> Vec<Cell> {
        self.boxes
            .iter()
            .enumerate()
            .filter_map(|(id, raw)| match RawCell::deserialize(raw) {
                Ok(cell) => Some(Cell::new(id, CellRect::from(cell.coordinate), cell.score)),
                Err(e) => {
                    warn!("Dropping malformed cell {}: {}", id, e);
                    None
                }
            })
            .collect()
    }
}

/// The known top-level layouts of an OCR payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OcrDocument {
    /// `{ "results": [...] }`
    Results { results: Vec<Value> },
    /// Legacy `{ "res": [...] }`
    Legacy { res: Vec<Value> },
    /// `{ "text_regions": [...] }`
    TextRegions { text_regions: Vec<Value> },
    /// A bare list of records.
    Bare(Vec<Value>),
    /// Anything else; yields no items.
    Unrecognized(Value),
}

/// One OCR record inside a record list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OcrRecord {
    /// Layout-analysis record: `{ "type": "text", "res": [...], "bbox": [...] }`.
    ///
    /// A `"figure"` record wraps a nested record list in `res`. Some producers
    /// put the string in `text` instead of `res`.
    Typed {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        res: Value,
        #[serde(default)]
        text: Option<String>,
        #[serde(default, alias = "box", alias = "text_region")]
        bbox: Option<RawRegion>,
        #[serde(default)]
        confidence: Option<f64>,
    },
    /// Plain record: `{ "text", "confidence", "text_region" | "box" | "bbox" }`.
    Plain {
        text: String,
        #[serde(default)]
        confidence: Option<f64>,
        #[serde(default, alias = "box", alias = "bbox")]
        text_region: Option<RawRegion>,
    },
}

/// A region as it appears in OCR output.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRegion {
    /// `[[x, y], ...]`
    Points(Vec<[f64; 2]>),
    /// `[x1, y1, x2, y2, ...]`
    Flat(Vec<f64>),
}

impl RawRegion {
    fn into_points(self) -> Result<Vec<Coord<f64>>, String> {
        match self {
            RawRegion::Points(points) => Ok(points.into_iter().map(|[x, y]| Coord { x, y }).collect()),
            RawRegion::Flat(values) => {
                if values.len() % 2 != 0 {
                    return Err(format!("odd number of coordinates ({})", values.len()));
                }
                Ok(values
                    .chunks_exact(2)
                    .map(|pair| Coord {
                        x: pair[0],
                        y: pair[1],
                    })
                    .collect())
            }
        }
    }
}

/// Text items extracted from an OCR payload.
#[derive(Debug, Clone, Default)]
pub struct ExtractedText {
    pub items: Vec<TextItem>,
    /// Records or items dropped because they had no usable region or text.
    pub discarded: usize,
}

struct Candidate {
    text: String,
    confidence: f64,
    region: Option<RawRegion>,
}

/// Accumulates candidates and counts every text record that yields none.
#[derive(Default)]
struct Collector {
    candidates: Vec<Candidate>,
    discarded: usize,
}

impl OcrDocument {
    /// Reads an OCR payload into one of the known layouts.
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value(value) {
            Ok(document) => document,
            Err(e) => {
                let error = DocumentError::UnrecognizedShape {
                    message: e.to_string(),
                };
                warn!("{}, no text items extracted", error);
                OcrDocument::Unrecognized(Value::Null)
            }
        }
    }

    /// Returns the record list of the payload; empty for an unrecognized layout.
    pub fn records(&self) -> &[Value] {
        match self {
            OcrDocument::Results { results } => {
                debug!("OCR payload has 'results' layout with {} records", results.len());
                results
            }
            OcrDocument::Legacy { res } => {
                debug!("OCR payload has legacy 'res' layout with {} records", res.len());
                res
            }
            OcrDocument::TextRegions { text_regions } => {
                debug!(
                    "OCR payload has 'text_regions' layout with {} records",
                    text_regions.len()
                );
                text_regions
            }
            OcrDocument::Bare(records) => {
                debug!("OCR payload is a bare list of {} records", records.len());
                records
            }
            OcrDocument::Unrecognized(_) => {
                warn!("Unrecognized OCR payload layout, no text items extracted");
                &[]
            }
        }
    }

    /// Extracts text items in payload order.
    ///
    /// Ids are handed out in extraction order before region validation, so an
    /// item keeps its id even when an earlier item was dropped. Every record
    /// that carries text but yields no item is counted in `discarded`.
    pub fn extract_text_items(&self) -> ExtractedText {
        let mut collector = Collector::default();

        for record in self.records() {
            match OcrRecord::deserialize(record) {
                Ok(record) => collector.collect(record, None, false),
                Err(_) => collector.discard("no recognizable text or region"),
            }
        }

        let Collector {
            candidates,
            mut discarded,
        } = collector;

        let mut items = Vec::with_capacity(candidates.len());
        for (id, candidate) in candidates.into_iter().enumerate() {
            match candidate_to_item(id, candidate) {
                Ok(item) => items.push(item),
                Err(e) => {
                    warn!("Dropping text item {}: {}", id, e);
                    discarded += 1;
                }
            }
        }

        debug!(
            "Extracted {} text items, discarded {}",
            items.len(),
            discarded
        );

        ExtractedText { items, discarded }
    }
}

impl Collector {
    fn discard(&mut self, reason: &str) {
        warn!("Dropping OCR record: {}", reason);
        self.discarded += 1;
    }

    fn push(&mut self, text: String, confidence: f64, region: Option<RawRegion>) {
        self.candidates.push(Candidate {
            text,
            confidence,
            region,
        });
    }

    /// Collects one record. `parent_region` is the bbox of an enclosing text
    /// record; nested records are never unwrapped a second time.
    fn collect(&mut self, record: OcrRecord, parent_region: Option<&RawRegion>, nested: bool) {
        match record {
            OcrRecord::Plain {
                text,
                confidence,
                text_region,
            } => self.push(
                text,
                confidence.unwrap_or(0.0),
                text_region.or_else(|| parent_region.cloned()),
            ),
            OcrRecord::Typed {
                kind,
                res,
                text,
                bbox,
                confidence,
            } => {
                let region = bbox.or_else(|| parent_region.cloned());
                match kind.as_str() {
                    "text" => self.collect_text(res, text, region, confidence, nested),
                    "figure" if !nested => match res {
                        Value::Array(records) => self.collect_nested(&records, None),
                        _ => self.discard("figure without nested records"),
                    },
                    "figure" => self.discard("figure nested inside another record"),
                    other => debug!("Skipping OCR record of type '{}'", other),
                }
            }
        }
    }

    fn collect_nested(&mut self, records: &[Value], parent_region: Option<&RawRegion>) {
        if records.is_empty() {
            self.discard("wrapper record without nested records");
            return;
        }

        for inner in records {
            match OcrRecord::deserialize(inner) {
                Ok(inner) => self.collect(inner, parent_region, true),
                Err(_) => self.discard("unreadable nested record"),
            }
        }
    }

    /// `res` is `[text, confidence]`, `[[text, confidence], ...]`, a list of
    /// plain records, or a bare string. Without `res` the record's own `text`
    /// is used.
    fn collect_text(
        &mut self,
        res: Value,
        text: Option<String>,
        region: Option<RawRegion>,
        record_confidence: Option<f64>,
        nested: bool,
    ) {
        let fallback_confidence = record_confidence.unwrap_or(0.0);

        match res {
            Value::Null => match text {
                Some(text) => self.push(text, fallback_confidence, region),
                None => self.discard("text record without 'res' or 'text'"),
            },
            Value::String(text) => self.push(text, fallback_confidence, region),
            Value::Array(entries) => match entries.first() {
                Some(Value::String(text)) => {
                    let confidence = entries
                        .get(1)
                        .and_then(Value::as_f64)
                        .unwrap_or(fallback_confidence);
                    self.push(text.clone(), confidence, region);
                }
                Some(Value::Array(_)) => {
                    for entry in &entries {
                        match entry.as_array().map(Vec::as_slice) {
                            Some([Value::String(text), confidence, ..]) => self.push(
                                text.clone(),
                                confidence.as_f64().unwrap_or(0.0),
                                region.clone(),
                            ),
                            _ => self.discard("unreadable [text, confidence] entry"),
                        }
                    }
                }
                Some(Value::Object(_)) if !nested => {
                    self.collect_nested(&entries, region.as_ref())
                }
                _ => self.discard("text record with empty or unreadable 'res'"),
            },
            _ => self.discard("text record with unreadable 'res'"),
        }
    }
}

fn candidate_to_item(id: usize, candidate: Candidate) -> Result<TextItem, DocumentError> {
    let raw = candidate
        .region
        .ok_or_else(|| DocumentError::MalformedInput {
            message: "missing text region".to_string(),
        })?;
    let points = raw
        .into_points()
        .map_err(|message| DocumentError::MalformedInput { message })?;
    let region = TextRegion::new(points).map_err(|e| DocumentError::MalformedInput {
        message: e.to_string(),
    })?;

    Ok(TextItem::new(id, candidate.text, candidate.confidence, region))
}

/// Reads the `input_path` recorded by either detector, preferring the cell payload.
pub fn image_path(cells: &CellDetection, ocr: &Value) -> Option<String> {
    cells.input_path.clone().or_else(|| {
        ocr.get("input_path")
            .and_then(Value::as_str)
            .map(str::to_string)
    })
}
