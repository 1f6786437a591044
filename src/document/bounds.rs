//! Canonical geometry values for text regions and table cells.
//!
//! This module provides the [`TextRegion`] polygon produced by OCR and the
//! axis-aligned [`CellRect`] produced by cell detection.

use geo::{Area, Coord, LineString, Polygon, Rect};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::error::BoxError;
use crate::utils::serialization_utils::{coord_pairs_f64, rect_array_f64};

/// The polygon bounding a recognized text string.
///
/// A region always holds at least three points. A two-point region is
/// interpreted as the diagonal of an axis-aligned rectangle and expanded to its
/// four corners on construction.
///
/// # Coordinate System
///
/// The coordinate system assumes:
/// - **X-axis**: Increases from left to right
/// - **Y-axis**: Increases from top to bottom (standard image coordinates)
///
/// # Serialization
///
/// Serializes as a list of `[x, y]` pairs:
///
/// ```json
/// [[0.0, 0.0], [100.0, 0.0], [100.0, 20.0], [0.0, 20.0]]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    points: Vec<Coord<f64>>,
}

impl TextRegion {
    /// Creates a region from an ordered point sequence.
    ///
    /// # Errors
    ///
    /// Returns [`BoxError::TooFewPoints`] when fewer than 2 points are given.
    pub fn new(points: Vec<Coord<f64>>) -> Result<Self, BoxError> {
        match points.len() {
            0 | 1 => Err(BoxError::TooFewPoints {
                count: points.len(),
            }),
            2 => {
                let (a, b) = (points[0], points[1]);
                Ok(Self {
                    points: vec![
                        Coord { x: a.x, y: a.y },
                        Coord { x: b.x, y: a.y },
                        Coord { x: b.x, y: b.y },
                        Coord { x: a.x, y: b.y },
                    ],
                })
            }
            _ => Ok(Self { points }),
        }
    }

    /// Creates an axis-aligned rectangular region from its corners.
    pub fn from_rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            points: vec![
                Coord { x: x1, y: y1 },
                Coord { x: x2, y: y1 },
                Coord { x: x2, y: y2 },
                Coord { x: x1, y: y2 },
            ],
        }
    }

    #[inline]
    pub fn points(&self) -> &[Coord<f64>] {
        &self.points
    }

    /// Returns `true` when every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|c| c.x.is_finite() && c.y.is_finite())
    }

    /// Returns `true` for a non-degenerate axis-aligned rectangle: four corners
    /// walked edge by edge, each edge horizontal or vertical.
    pub fn is_axis_aligned_rect(&self) -> bool {
        if self.points.len() != 4 || self.width() <= 0.0 || self.height() <= 0.0 {
            return false;
        }
        let (left, right, top, bottom) = (self.left(), self.right(), self.top(), self.bottom());

        let on_corners = self
            .points
            .iter()
            .all(|p| (p.x == left || p.x == right) && (p.y == top || p.y == bottom));
        let axis_edges = (0..4).all(|i| {
            let (a, b) = (self.points[i], self.points[(i + 1) % 4]);
            (a.x == b.x) != (a.y == b.y)
        });

        on_corners && axis_edges
    }

    /// Builds a closed [`Polygon`] over the region's points.
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::from(self.points.clone()), vec![])
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.points.iter().map(|c| c.x).fold(f64::INFINITY, f64::min)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.points
            .iter()
            .map(|c| c.x)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.points.iter().map(|c| c.y).fold(f64::INFINITY, f64::min)
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.points
            .iter()
            .map(|c| c.y)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Width of the axis-aligned bounding rectangle.
    #[inline]
    pub fn width(&self) -> f64 {
        self.right() - self.left()
    }

    /// Height of the axis-aligned bounding rectangle.
    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    /// Returns the arithmetic mean of the region's points.
    ///
    /// This is the mean of the vertices, not the area centroid of the polygon.
    pub fn centroid(&self) -> Coord<f64> {
        let n = self.points.len() as f64;
        let (sum_x, sum_y) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
        Coord {
            x: sum_x / n,
            y: sum_y / n,
        }
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        self.centroid().y
    }

    /// Polygon area from the shoelace formula, as an absolute value.
    pub fn area(&self) -> f64 {
        self.to_polygon().unsigned_area()
    }
}

impl Serialize for TextRegion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        coord_pairs_f64::serialize(&self.points, serializer)
    }
}

impl<'de> Deserialize<'de> for TextRegion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let points = coord_pairs_f64::deserialize(deserializer)?;
        Self::new(points).map_err(serde::de::Error::custom)
    }
}

/// An axis-aligned table-cell rectangle `(x1, y1, x2, y2)`.
///
/// Corners are normalized on construction so that `x1 <= x2` and `y1 <= y2`.
///
/// # Serialization
///
/// Serializes as `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    rect: Rect<f64>,
}

impl CellRect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            rect: Rect::new(Coord { x: x1, y: y1 }, Coord { x: x2, y: y2 }),
        }
    }

    #[inline]
    pub fn x1(&self) -> f64 {
        self.rect.min().x
    }

    #[inline]
    pub fn y1(&self) -> f64 {
        self.rect.min().y
    }

    #[inline]
    pub fn x2(&self) -> f64 {
        self.rect.max().x
    }

    #[inline]
    pub fn y2(&self) -> f64 {
        self.rect.max().y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    #[inline]
    pub fn center(&self) -> Coord<f64> {
        self.rect.center()
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        (self.y1() + self.y2()) / 2.0
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        self.rect.to_polygon()
    }

    /// Returns the corners as `[x1, y1, x2, y2]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x1(), self.y1(), self.x2(), self.y2()]
    }
}

impl From<[f64; 4]> for CellRect {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}

impl Serialize for CellRect {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rect_array_f64::serialize(self.rect.min(), self.rect.max(), serializer)
    }
}

impl<'de> Deserialize<'de> for CellRect {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (min, max) = rect_array_f64::deserialize(deserializer)?;
        Ok(Self::new(min.x, min.y, max.x, max.y))
    }
}
