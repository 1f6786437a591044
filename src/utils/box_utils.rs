//! Utility functions for text-region and cell overlap operations.

use geo::{Area, BooleanOps, Intersects};

use crate::document::bounds::{CellRect, TextRegion};
use crate::utils::error::BoxError;

/// Calculates the fraction of a text region's area that lies inside a cell.
///
/// This is not a symmetric IoU: the denominator is the area of the text
/// region, so the result answers "how much of this text is inside this cell".
///
/// # Arguments
///
/// * `region` - The OCR text polygon
/// * `cell` - The axis-aligned cell rectangle
///
/// # Returns
///
/// A value between 0.0 and 1.0 where:
/// - 0.0 indicates the polygons do not intersect
/// - 1.0 indicates the text lies entirely inside the cell
///
/// Returns 0.0 for a zero-area text region.
///
/// # Errors
///
/// Returns [`BoxError::NonFiniteCoordinate`] if either shape holds a NaN or
/// infinite coordinate.
pub fn calculate_overlap(region: &TextRegion, cell: &CellRect) -> Result<f64, BoxError> {
    if !region.is_finite() || !cell.to_array().iter().all(|v| v.is_finite()) {
        return Err(BoxError::NonFiniteCoordinate);
    }

    if region.is_axis_aligned_rect() {
        return Ok(rect_overlap(region, cell));
    }

    let text_polygon = region.to_polygon();
    let text_area = text_polygon.unsigned_area();

    if text_area <= 0.0 {
        return Ok(0.0);
    }

    if contains_region(cell, region) {
        return Ok(1.0);
    }

    let cell_polygon = cell.to_polygon();
    if !text_polygon.intersects(&cell_polygon) {
        return Ok(0.0);
    }

    let intersection_area = text_polygon.intersection(&cell_polygon).unsigned_area();

    Ok((intersection_area / text_area).clamp(0.0, 1.0))
}

/// Exact clip of an axis-aligned text rectangle against the cell. Boolean
/// polygon ops lose precision on sub-pixel shapes; this does not.
fn rect_overlap(region: &TextRegion, cell: &CellRect) -> f64 {
    let text_area = region.width() * region.height();
    if text_area <= 0.0 {
        return 0.0;
    }

    let overlap_w = (region.right().min(cell.x2()) - region.left().max(cell.x1())).max(0.0);
    let overlap_h = (region.bottom().min(cell.y2()) - region.top().max(cell.y1())).max(0.0);

    (overlap_w * overlap_h / text_area).clamp(0.0, 1.0)
}

/// Returns `true` when every vertex of the region lies inside or on the cell.
///
/// The cell is convex, so this implies the whole polygon is contained.
#[inline]
pub fn contains_region(cell: &CellRect, region: &TextRegion) -> bool {
    region.points().iter().all(|p| {
        p.x >= cell.x1() && p.x <= cell.x2() && p.y >= cell.y1() && p.y <= cell.y2()
    })
}

/// Determines whether a cell sits on the same table row as a text region.
///
/// The cell's vertical center must lie within `row_tolerance * height` of the
/// region's vertical center, where `height` is the region's bounding height.
/// Horizontal position is ignored.
#[inline]
pub fn is_row_aligned(region: &TextRegion, cell: &CellRect, row_tolerance: f64) -> bool {
    let y_tolerance = region.height() * row_tolerance;
    (cell.center_y() - region.center_y()).abs() <= y_tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;

    fn region(x1: f64, y1: f64, x2: f64, y2: f64) -> TextRegion {
        TextRegion::from_rect(x1, y1, x2, y2)
    }

    #[test]
    fn test_overlap_fully_contained() {
        let cell = CellRect::new(0.0, 0.0, 100.0, 50.0);
        let overlap = calculate_overlap(&region(10.0, 10.0, 40.0, 30.0), &cell).unwrap();
        assert_eq!(overlap, 1.0);
    }

    #[test]
    fn test_overlap_disjoint() {
        let cell = CellRect::new(0.0, 0.0, 10.0, 10.0);
        let overlap = calculate_overlap(&region(20.0, 20.0, 30.0, 30.0), &cell).unwrap();
        assert_eq!(overlap, 0.0);
    }

    #[test]
    fn test_overlap_half() {
        // Text 0..10 x 0..10, cell covers x 5..15: half the text is inside.
        let cell = CellRect::new(5.0, 0.0, 15.0, 10.0);
        let overlap = calculate_overlap(&region(0.0, 0.0, 10.0, 10.0), &cell).unwrap();
        assert!((overlap - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_overlap_uses_text_area_not_cell_area() {
        // A small cell inside a large text region covers 4% of the text.
        let cell = CellRect::new(0.0, 0.0, 2.0, 2.0);
        let overlap = calculate_overlap(&region(0.0, 0.0, 10.0, 10.0), &cell).unwrap();
        assert!((overlap - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_overlap_touching_edge_is_zero() {
        let cell = CellRect::new(10.0, 0.0, 20.0, 10.0);
        let overlap = calculate_overlap(&region(0.0, 0.0, 10.0, 10.0), &cell).unwrap();
        assert!(overlap.abs() < 1e-9);
    }

    #[test]
    fn test_overlap_zero_area_region() {
        let flat = TextRegion::new(vec![
            Coord { x: 0.0, y: 5.0 },
            Coord { x: 10.0, y: 5.0 },
            Coord { x: 20.0, y: 5.0 },
        ])
        .unwrap();
        let cell = CellRect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(calculate_overlap(&flat, &cell).unwrap(), 0.0);
    }

    #[test]
    fn test_overlap_non_finite_is_error() {
        let bad = TextRegion::new(vec![
            Coord { x: f64::NAN, y: 0.0 },
            Coord { x: 10.0, y: 10.0 },
        ])
        .unwrap();
        let cell = CellRect::new(0.0, 0.0, 100.0, 100.0);
        assert!(matches!(
            calculate_overlap(&bad, &cell),
            Err(BoxError::NonFiniteCoordinate)
        ));
    }

    #[test]
    fn test_row_alignment() {
        // Text is 10 high centered at y=15; tolerance 2.0 allows |dy| <= 20.
        let text = region(0.0, 10.0, 50.0, 20.0);
        assert!(is_row_aligned(&text, &CellRect::new(100.0, 0.0, 150.0, 30.0), 2.0));
        assert!(is_row_aligned(&text, &CellRect::new(100.0, 25.0, 150.0, 45.0), 2.0));
        assert!(!is_row_aligned(&text, &CellRect::new(0.0, 40.0, 50.0, 60.0), 2.0));
    }

    #[test]
    fn test_overlap_sub_pixel_rectangle() {
        // A 1e-9 square with 1% of its width inside the cell.
        let cell = CellRect::new(0.99e-9, 0.0, 1.0, 1.0);
        let overlap = calculate_overlap(&region(0.0, 0.0, 1e-9, 1e-9), &cell).unwrap();
        assert!((overlap - 0.01).abs() < 1e-6, "got {}", overlap);
    }

    #[test]
    fn test_axis_aligned_rect_detection() {
        assert!(region(0.0, 0.0, 10.0, 5.0).is_axis_aligned_rect());

        let bowtie = TextRegion::new(vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 10.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: 0.0, y: 10.0 },
        ])
        .unwrap();
        assert!(!bowtie.is_axis_aligned_rect());

        let diamond = TextRegion::new(vec![
            Coord { x: 5.0, y: 0.0 },
            Coord { x: 10.0, y: 5.0 },
            Coord { x: 5.0, y: 10.0 },
            Coord { x: 0.0, y: 5.0 },
        ])
        .unwrap();
        assert!(!diamond.is_axis_aligned_rect());
    }
}
