use geo::Coord;
use tablemerge::document::bounds::{CellRect, TextRegion};
use tablemerge::utils::box_utils::{calculate_overlap, contains_region, is_row_aligned};
use tablemerge::utils::error::BoxError;

fn quad(points: &[(f64, f64)]) -> TextRegion {
    TextRegion::new(points.iter().map(|&(x, y)| Coord { x, y }).collect()).unwrap()
}

#[test]
fn test_overlap_rotated_quad() {
    // Diamond centered on the cell's right edge; half of it lies inside.
    let region = quad(&[(100.0, 10.0), (110.0, 20.0), (100.0, 30.0), (90.0, 20.0)]);
    let cell = CellRect::new(0.0, 0.0, 100.0, 50.0);

    let overlap = calculate_overlap(&region, &cell).unwrap();
    assert!((overlap - 0.5).abs() < 1e-6);
}

#[test]
fn test_overlap_uses_text_area_not_union() {
    // Text 20x10 fully inside a much larger cell.
    let region = TextRegion::from_rect(10.0, 10.0, 30.0, 20.0);
    let cell = CellRect::new(0.0, 0.0, 1000.0, 1000.0);

    let overlap = calculate_overlap(&region, &cell).unwrap();
    assert!((overlap - 1.0).abs() < 1e-6);
}

#[test]
fn test_overlap_partial_on_both_axes() {
    // Text (80,40)-(120,60), area 800; intersection (80,40)-(100,50), area 200.
    let region = TextRegion::from_rect(80.0, 40.0, 120.0, 60.0);
    let cell = CellRect::new(0.0, 0.0, 100.0, 50.0);

    let overlap = calculate_overlap(&region, &cell).unwrap();
    assert!((overlap - 0.25).abs() < 1e-6);
}

#[test]
fn test_overlap_is_bounded() {
    let cell = CellRect::new(0.0, 0.0, 100.0, 50.0);
    let regions = [
        TextRegion::from_rect(-50.0, -50.0, 200.0, 200.0),
        TextRegion::from_rect(99.0, 49.0, 101.0, 51.0),
        TextRegion::from_rect(500.0, 500.0, 510.0, 510.0),
    ];

    for region in &regions {
        let overlap = calculate_overlap(region, &cell).unwrap();
        assert!((0.0..=1.0).contains(&overlap), "overlap {} out of range", overlap);
    }
}

#[test]
fn test_overlap_non_finite_cell() {
    let region = TextRegion::from_rect(0.0, 0.0, 10.0, 10.0);
    let cell = CellRect::new(0.0, 0.0, f64::INFINITY, 10.0);

    assert!(matches!(
        calculate_overlap(&region, &cell),
        Err(BoxError::NonFiniteCoordinate)
    ));
}

#[test]
fn test_contains_region_edges_inclusive() {
    let cell = CellRect::new(0.0, 0.0, 100.0, 50.0);

    assert!(contains_region(&cell, &TextRegion::from_rect(0.0, 0.0, 100.0, 50.0)));
    assert!(!contains_region(&cell, &TextRegion::from_rect(0.0, 0.0, 100.1, 50.0)));
}

#[test]
fn test_row_alignment_scales_with_text_height() {
    let cell = CellRect::new(0.0, 100.0, 50.0, 120.0); // center y = 110
    let region = TextRegion::from_rect(200.0, 0.0, 300.0, 20.0); // center y = 10, height 20

    assert!(!is_row_aligned(&region, &cell, 2.0));
    assert!(is_row_aligned(&region, &cell, 5.0));
}

#[test]
fn test_two_point_region_expands_to_rectangle() {
    let region = quad(&[(10.0, 20.0), (30.0, 40.0)]);

    assert_eq!(region.points().len(), 4);
    assert!((region.area() - 400.0).abs() < 1e-6);
    assert!((region.left() - 10.0).abs() < 1e-6);
    assert!((region.bottom() - 40.0).abs() < 1e-6);
}

#[test]
fn test_region_requires_two_points() {
    let result = TextRegion::new(vec![Coord { x: 5.0, y: 5.0 }]);
    assert!(matches!(result, Err(BoxError::TooFewPoints { count: 1 })));

    let result: Result<TextRegion, _> = serde_json::from_str("[[5.0, 5.0]]");
    assert!(result.is_err());
}

#[test]
fn test_cell_rect_normalizes_corners() {
    let cell = CellRect::new(100.0, 50.0, 0.0, 0.0);

    assert!((cell.x1() - 0.0).abs() < 1e-6);
    assert!((cell.y2() - 50.0).abs() < 1e-6);
    assert!((cell.center_y() - 25.0).abs() < 1e-6);
    assert_eq!(cell.to_array(), [0.0, 0.0, 100.0, 50.0]);
}

#[test]
fn test_cell_rect_serializes_as_array() {
    let cell = CellRect::from([1.0, 2.0, 3.0, 4.0]);

    let json = serde_json::to_value(cell).unwrap();
    assert_eq!(json, serde_json::json!([1.0, 2.0, 3.0, 4.0]));

    let back: CellRect = serde_json::from_value(json).unwrap();
    assert_eq!(back, cell);
}
