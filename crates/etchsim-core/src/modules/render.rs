use crate::geometry::{BoundingBox, Curve};
use std::fmt::Write;

pub const PADDING_RATIO: f64 = 0.05;
pub const POINT_RADIUS_RATIO: f64 = 0.005;
pub const FALLBACK_POINT_RADIUS: f64 = 1.0;
pub const SVG_WIDTH: u32 = 800;
pub const SVG_HEIGHT: u32 = 600;

/// View box and marker size derived from a curve's bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFrame {
    pub bounds: BoundingBox,
    pub padding: f64,
    pub view_box: [f64; 4],
    pub point_radius: f64,
}

impl RenderFrame {
    pub fn from_bounds(bounds: BoundingBox) -> Self {
        let extent = bounds.max_extent();
        let padding = extent * PADDING_RATIO;
        let radius = extent * POINT_RADIUS_RATIO;
        let point_radius = if radius == 0.0 {
            FALLBACK_POINT_RADIUS
        } else {
            radius
        };

        Self {
            bounds,
            padding,
            view_box: [
                bounds.min_x - padding,
                bounds.min_y - padding,
                bounds.width() + 2.0 * padding,
                bounds.height() + 2.0 * padding,
            ],
            point_radius,
        }
    }

    pub fn from_curve(curve: &Curve) -> Option<Self> {
        curve.bounding_box().map(Self::from_bounds)
    }
}

/// One black circle per point inside a padded view box. `None` for an empty
/// curve.
pub fn render_svg(curve: &Curve) -> Option<String> {
    let frame = RenderFrame::from_curve(curve)?;
    let [view_x, view_y, view_width, view_height] = frame.view_box;

    let mut document = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        document,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet">"#,
        view_x, view_y, view_width, view_height, SVG_WIDTH, SVG_HEIGHT
    );
    for point in curve.points() {
        let _ = writeln!(
            document,
            r#"  <circle cx="{}" cy="{}" r="{}" fill="black" stroke="none" />"#,
            point.x, point.y, frame.point_radius
        );
    }
    document.push_str("</svg>\n");

    Some(document)
}
