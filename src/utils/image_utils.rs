//! Debug visualization of a merged document over its source image.

use std::path::Path;

use ab_glyph::FontVec;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::{debug, info};

use crate::document::analysis::result::DocumentResult;
use crate::document::bounds::CellRect;
use crate::utils::error::ImageError;

const CELL_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const SPLIT_CELL_COLOR: Rgb<u8> = Rgb([128, 0, 128]);
const EMPTY_CELL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const UNASSIGNED_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const SPANNING_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const CELL_LABEL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const SPANNING_LABEL_COLOR: Rgb<u8> = Rgb([200, 200, 0]);

const CELL_LABEL_CHARS: usize = 20;
const UNASSIGNED_LABEL_CHARS: usize = 10;
const SPANNING_LABEL_CHARS: usize = 15;

/// Font settings for the visualization. Without a font only shapes are drawn.
pub struct VisualizationStyle {
    pub font: Option<FontVec>,
    pub font_scale: f32,
}

impl Default for VisualizationStyle {
    fn default() -> Self {
        Self {
            font: None,
            font_scale: 14.0,
        }
    }
}

impl VisualizationStyle {
    pub fn with_font_path<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| ImageError::FontRead {
            path: path.display().to_string(),
            source,
        })?;
        let font = FontVec::try_from_vec(data).map_err(|source| ImageError::FontParse {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Self {
            font: Some(font),
            ..Self::default()
        })
    }

    /// Tries a few common system font locations, falling back to no font.
    pub fn with_system_font() -> Self {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];

        for path in font_paths {
            if let Ok(style) = Self::with_font_path(path) {
                info!("Loaded system font: {}", path);
                return style;
            }
        }

        debug!("No system font found, labels will be skipped");
        Self::default()
    }
}

pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RgbImage, ImageError> {
    let path = path.as_ref();
    image::open(path)
        .map(|image| image.to_rgb8())
        .map_err(|source| ImageError::Load {
            path: path.display().to_string(),
            source,
        })
}

pub fn save_image<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<(), ImageError> {
    let path = path.as_ref();
    image.save(path).map_err(|source| ImageError::Save {
        path: path.display().to_string(),
        source,
    })
}

/// Draws a merged document on top of a copy of its source image.
///
/// Cells with text are outlined in green, or purple when they hold a split
/// piece. Empty cells are outlined in red and unassigned text regions in blue.
/// Each spanning assignment gets a yellow connector through the centers of its
/// cells; cells that ended up without text are not part of the connector.
///
/// When `style` carries a font, each cell with text is labelled with its
/// truncated combined text, unassigned regions with their text, and each
/// drawn connector with the full spanning text.
pub fn render_visualization(
    image: &RgbImage,
    result: &DocumentResult,
    style: &VisualizationStyle,
) -> RgbImage {
    let mut canvas = image.clone();

    for cell in &result.cells_with_text {
        let color = if cell.has_split_text() {
            SPLIT_CELL_COLOR
        } else {
            CELL_COLOR
        };
        draw_cell(&mut canvas, &cell.coordinates, color, 2);
        draw_label(
            &mut canvas,
            style,
            (cell.coordinates.x1() + 3.0, cell.coordinates.y1() + 3.0),
            &truncate_label(&cell.text, CELL_LABEL_CHARS),
            CELL_LABEL_COLOR,
        );
    }

    for cell in &result.empty_cells {
        draw_cell(&mut canvas, &cell.coordinates, EMPTY_CELL_COLOR, 1);
    }

    for text in &result.unassigned_text {
        let points = text.text_region.points();
        for (i, start) in points.iter().enumerate() {
            let end = &points[(i + 1) % points.len()];
            draw_thick_line(
                &mut canvas,
                (start.x as f32, start.y as f32),
                (end.x as f32, end.y as f32),
                UNASSIGNED_COLOR,
            );
        }
        let label: String = text.text.chars().take(UNASSIGNED_LABEL_CHARS).collect();
        let anchor = (points[0].x, points[0].y - f64::from(style.font_scale) - 2.0);
        draw_label(&mut canvas, style, anchor, &label, UNASSIGNED_COLOR);
    }

    for spanning in &result.spanning_assignments {
        let centers: Vec<(f32, f32)> = spanning
            .assigned_to_cells
            .iter()
            .filter_map(|&id| result.cell_with_text(id))
            .map(|cell| {
                let center = cell.coordinates.center();
                (center.x as f32, center.y as f32)
            })
            .collect();

        if centers.len() < 2 {
            continue;
        }
        for pair in centers.windows(2) {
            draw_thick_line(&mut canvas, pair[0], pair[1], SPANNING_COLOR);
        }

        let (mid_x, mid_y) = centers[centers.len() / 2];
        draw_label(
            &mut canvas,
            style,
            (f64::from(mid_x) - 50.0, f64::from(mid_y) - 25.0),
            &truncate_label(&spanning.text, SPANNING_LABEL_CHARS),
            SPANNING_LABEL_COLOR,
        );
    }

    canvas
}

/// Keeps the first `max_chars` characters, marking the cut with "...".
fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut label: String = text.chars().take(max_chars).collect();
        label.push_str("...");
        label
    } else {
        text.to_string()
    }
}

fn draw_label(
    canvas: &mut RgbImage,
    style: &VisualizationStyle,
    anchor: (f64, f64),
    text: &str,
    color: Rgb<u8>,
) {
    let Some(ref font) = style.font else { return };
    if text.is_empty() {
        return;
    }

    let x = (anchor.0.round() as i32).max(0);
    let y = (anchor.1.round() as i32).max(0);
    if x < canvas.width() as i32 && y < canvas.height() as i32 {
        draw_text_mut(canvas, color, x, y, style.font_scale, font, text);
    }
}

fn draw_cell(canvas: &mut RgbImage, cell: &CellRect, color: Rgb<u8>, thickness: u32) {
    let x = cell.x1().round() as i32;
    let y = cell.y1().round() as i32;
    let width = cell.width().round().max(1.0) as u32;
    let height = cell.height().round().max(1.0) as u32;

    for inset in 0..thickness {
        if width <= 2 * inset || height <= 2 * inset {
            break;
        }
        let rect = Rect::at(x + inset as i32, y + inset as i32)
            .of_size(width - 2 * inset, height - 2 * inset);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

fn draw_thick_line(canvas: &mut RgbImage, start: (f32, f32), end: (f32, f32), color: Rgb<u8>) {
    draw_line_segment_mut(canvas, start, end, color);
    draw_line_segment_mut(
        canvas,
        (start.0 + 1.0, start.1 + 1.0),
        (end.0 + 1.0, end.1 + 1.0),
        color,
    );
}
