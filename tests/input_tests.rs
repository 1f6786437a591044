use serde_json::json;
use tablemerge::document::input::{image_path, CellDetection, OcrDocument};
use tablemerge::document::TableDocument;
use tablemerge::MergeConfig;

fn plain(text: &str, confidence: f64, region: serde_json::Value) -> serde_json::Value {
    json!({ "text": text, "confidence": confidence, "text_region": region })
}

#[test]
fn test_results_layout() {
    let ocr = OcrDocument::from_value(json!({
        "results": [
            plain("Name", 0.95, json!([[0, 0], [40, 0], [40, 10], [0, 10]])),
            plain("Age", 0.9, json!([[50, 0], [80, 0], [80, 10], [50, 10]])),
        ]
    }));

    let extracted = ocr.extract_text_items();

    assert_eq!(extracted.items.len(), 2);
    assert_eq!(extracted.discarded, 0);
    assert_eq!(extracted.items[0].id, 0);
    assert_eq!(extracted.items[0].text, "Name");
    assert_eq!(extracted.items[1].id, 1);
    assert!((extracted.items[1].confidence - 0.9).abs() < 1e-6);
}

#[test]
fn test_text_regions_layout_and_box_alias() {
    let ocr = OcrDocument::from_value(json!({
        "text_regions": [
            { "text": "Total", "confidence": 0.8, "box": [[0, 0], [30, 0], [30, 10], [0, 10]] }
        ]
    }));

    let extracted = ocr.extract_text_items();

    assert_eq!(extracted.items.len(), 1);
    assert_eq!(extracted.items[0].text, "Total");
    assert!((extracted.items[0].region.width() - 30.0).abs() < 1e-6);
}

#[test]
fn test_bare_list_layout() {
    let ocr = OcrDocument::from_value(json!([
        plain("a", 0.5, json!([[0, 0], [10, 10]])),
    ]));

    let extracted = ocr.extract_text_items();

    assert_eq!(extracted.items.len(), 1);
    // Two points describe the rectangle's diagonal.
    assert_eq!(extracted.items[0].region.points().len(), 4);
    assert!((extracted.items[0].region.area() - 100.0).abs() < 1e-6);
}

#[test]
fn test_legacy_layout_with_typed_records() {
    let ocr = OcrDocument::from_value(json!({
        "res": [
            { "type": "text", "bbox": [0, 0, 100, 20], "res": [["first", 0.9], ["second", 0.7]] },
            { "type": "text", "bbox": [0, 30, 100, 50], "res": ["third", 0.6] },
            { "type": "table", "bbox": [0, 60, 100, 90], "res": "<table></table>" },
        ]
    }));

    let extracted = ocr.extract_text_items();
    let texts: Vec<&str> = extracted.items.iter().map(|i| i.text.as_str()).collect();

    assert_eq!(texts, vec!["first", "second", "third"]);
    assert_eq!(extracted.discarded, 0);
    // Entries of one record share its bbox.
    assert_eq!(extracted.items[0].region, extracted.items[1].region);
    assert!((extracted.items[2].confidence - 0.6).abs() < 1e-6);
}

#[test]
fn test_typed_record_confidence_fallback() {
    let ocr = OcrDocument::from_value(json!({
        "res": [
            { "type": "text", "bbox": [0, 0, 10, 10], "res": ["with record confidence"], "confidence": 0.4 },
            { "type": "text", "bbox": [0, 0, 10, 10], "res": "bare string" },
        ]
    }));

    let extracted = ocr.extract_text_items();

    assert_eq!(extracted.items.len(), 2);
    assert!((extracted.items[0].confidence - 0.4).abs() < 1e-6);
    assert!((extracted.items[1].confidence - 0.0).abs() < 1e-6);
}

#[test]
fn test_figure_records_are_unwrapped() {
    let ocr = OcrDocument::from_value(json!({
        "res": [
            { "type": "figure", "bbox": [0, 0, 200, 200], "res": [
                { "type": "text", "bbox": [10, 10, 50, 20], "res": [["inside", 0.85]] },
                { "type": "text", "bbox": [10, 30, 50, 40], "res": ["also inside", 0.75] },
            ]},
            { "type": "text", "bbox": [0, 210, 100, 230], "res": ["caption", 0.9] },
        ]
    }));

    let extracted = ocr.extract_text_items();
    let texts: Vec<&str> = extracted.items.iter().map(|i| i.text.as_str()).collect();

    assert_eq!(texts, vec!["inside", "also inside", "caption"]);
    assert_eq!(extracted.items[2].id, 2);
}

#[test]
fn test_malformed_records_are_discarded_and_keep_ids() {
    let ocr = OcrDocument::from_value(json!({
        "results": [
            plain("ok", 0.9, json!([[0, 0], [10, 0], [10, 10], [0, 10]])),
            { "text": "no region", "confidence": 0.9 },
            plain("one point", 0.9, json!([[5, 5]])),
            plain("odd flat", 0.9, json!([0, 0, 10])),
            plain("also ok", 0.8, json!([[20, 0], [30, 0], [30, 10], [20, 10]])),
            { "neither": "text nor type" },
        ]
    }));

    let extracted = ocr.extract_text_items();

    assert_eq!(extracted.items.len(), 2);
    assert_eq!(extracted.discarded, 4);
    assert_eq!(extracted.items[0].id, 0);
    assert_eq!(extracted.items[1].id, 4);
}

#[test]
fn test_missing_confidence_defaults_to_zero() {
    let ocr = OcrDocument::from_value(json!({
        "results": [{ "text": "x", "text_region": [[0, 0], [10, 10]] }]
    }));

    let extracted = ocr.extract_text_items();

    assert!((extracted.items[0].confidence - 0.0).abs() < 1e-6);
}

#[test]
fn test_unrecognized_layout_yields_nothing() {
    for payload in [json!({ "pages": [] }), json!("text"), json!(42), json!(null)] {
        let ocr = OcrDocument::from_value(payload);
        let extracted = ocr.extract_text_items();

        assert!(extracted.items.is_empty());
        assert!(ocr.records().is_empty());
    }
}

#[test]
fn test_cells_from_boxes() {
    let detection = CellDetection::from_value(json!({
        "boxes": [
            { "coordinate": [0, 0, 50, 50], "score": 0.98 },
            { "score": 0.5 },
            { "coordinate": [50, 0, 100, 50] },
        ]
    }));

    let cells = detection.to_cells();

    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].id, 0);
    assert!((cells[0].score - 0.98).abs() < 1e-6);
    // The malformed box is dropped; ids stay the box index.
    assert_eq!(cells[1].id, 2);
    assert!((cells[1].score - 0.0).abs() < 1e-6);
    assert!((cells[1].rect.x1() - 50.0).abs() < 1e-6);
}

#[test]
fn test_unrecognized_cell_payload_yields_no_cells() {
    let detection = CellDetection::from_value(json!([1, 2, 3]));
    assert!(detection.to_cells().is_empty());

    let detection = CellDetection::from_value(json!({}));
    assert!(detection.to_cells().is_empty());
}

#[test]
fn test_image_path_prefers_cell_payload() {
    let ocr = json!({ "input_path": "ocr.png", "results": [] });

    let cells = CellDetection::from_value(json!({ "boxes": [], "input_path": "cells.png" }));
    assert_eq!(image_path(&cells, &ocr).as_deref(), Some("cells.png"));

    let cells = CellDetection::from_value(json!({ "boxes": [] }));
    assert_eq!(image_path(&cells, &ocr).as_deref(), Some("ocr.png"));
}

#[test]
fn test_discarded_records_are_counted_in_result() {
    let document = TableDocument::from_values(
        json!({ "boxes": [{ "coordinate": [0, 0, 100, 50], "score": 0.9 }] }),
        json!({ "results": [
            plain("HELLO", 0.9, json!([[10, 10], [60, 10], [60, 30], [10, 30]])),
            plain("dropped", 0.9, json!([[5, 5]])),
        ]}),
    );

    let result = document.merge(&MergeConfig::default());

    assert_eq!(result.metadata.total_text_items, 1);
    assert_eq!(result.metadata.assigned_text_items, 1);
    assert_eq!(result.metadata.unassigned_text, 0);
    assert_eq!(result.metadata.discarded_text_items, 1);
}

#[test]
fn test_legacy_text_record_with_nested_plain_records() {
    let ocr = OcrDocument::from_value(json!({
        "res": [{
            "type": "text",
            "bbox": [0, 0, 100, 20],
            "res": [
                plain("HELLO", 0.9, json!([[10, 10], [40, 10], [40, 30], [10, 30]])),
                plain("WORLD", 0.8, json!([[50, 10], [90, 10], [90, 30], [50, 30]])),
                { "text": "NO REGION", "confidence": 0.7 },
            ]
        }]
    }));

    let extracted = ocr.extract_text_items();
    let texts: Vec<&str> = extracted.items.iter().map(|i| i.text.as_str()).collect();

    assert_eq!(texts, vec!["HELLO", "WORLD", "NO REGION"]);
    assert_eq!(extracted.discarded, 0);
    assert!((extracted.items[1].region.left() - 50.0).abs() < 1e-6);
    // A nested record without its own region takes the parent bbox.
    assert!((extracted.items[2].region.width() - 100.0).abs() < 1e-6);
    assert!((extracted.items[2].region.height() - 20.0).abs() < 1e-6);
}

#[test]
fn test_typed_record_with_text_field() {
    let document = TableDocument::from_values(
        json!({ "boxes": [{ "coordinate": [0, 0, 100, 50], "score": 0.9 }] }),
        json!([{ "type": "text", "text": "HELLO", "confidence": 0.9, "bbox": [10, 10, 60, 30] }]),
    );

    let result = document.merge(&MergeConfig::default());

    assert_eq!(result.metadata.total_text_items, 1);
    assert_eq!(result.metadata.discarded_text_items, 0);
    assert_eq!(result.cells_with_text[0].text, "HELLO");
}

#[test]
fn test_every_dropped_text_record_is_counted() {
    let ocr = OcrDocument::from_value(json!({
        "res": [
            { "type": "text", "bbox": [0, 0, 10, 10] },
            { "type": "text", "bbox": [0, 0, 10, 10], "res": 42 },
            { "type": "text", "bbox": [0, 0, 10, 10], "res": [] },
            { "type": "text", "bbox": [0, 0, 10, 10], "res": [["kept", 0.9], ["no confidence"], [1, 2]] },
            { "type": "figure", "bbox": [0, 0, 10, 10], "res": [] },
            { "type": "figure", "bbox": [0, 0, 10, 10], "res": "caption" },
            { "type": "figure", "res": [{ "type": "figure", "res": [] }, 7] },
            { "type": "table", "bbox": [0, 0, 10, 10], "res": "<table></table>" },
        ]
    }));

    let extracted = ocr.extract_text_items();

    assert_eq!(extracted.items.len(), 1);
    assert_eq!(extracted.items[0].text, "kept");
    // 3 unreadable text records, 2 bad pairs, 2 figures without records, 2 bad nested records.
    assert_eq!(extracted.discarded, 9);
}
