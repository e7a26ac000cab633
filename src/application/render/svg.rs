//! Dendrogram diagram as a standalone SVG document.

use std::fmt::Write;

use crate::application::render::page::escape_html;
use crate::config::RenderConfig;
use crate::domain::{Hierarchy, Layout};

const MARGIN: f64 = 80.0;
const TITLE_HEIGHT: f64 = 60.0;
const NODE_RADIUS: f64 = 30.0;
const NODE_FILL: &str = "lightblue";
const EDGE_COLOR: &str = "gray";

/// Maps layout units onto the drawing area, y pointing down.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    min_x: f64,
    max_y: f64,
    scale_x: f64,
    scale_y: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Viewport {
    fn fit(layout: &Layout, width: f64, height: f64) -> Self {
        let (min_x, max_x, min_y, max_y) = layout.bounds();
        let area_w = (width - 2.0 * MARGIN).max(1.0);
        let area_h = (height - 2.0 * MARGIN - TITLE_HEIGHT).max(1.0);
        let span_x = max_x - min_x;
        let span_y = max_y - min_y;

        // degenerate spans collapse onto the center of the area
        let (scale_x, offset_x) = if span_x > f64::EPSILON {
            (area_w / span_x, MARGIN)
        } else {
            (0.0, width / 2.0)
        };
        let (scale_y, offset_y) = if span_y > f64::EPSILON {
            (area_h / span_y, MARGIN + TITLE_HEIGHT)
        } else {
            (0.0, MARGIN + TITLE_HEIGHT + area_h / 2.0)
        };

        Self {
            min_x,
            max_y,
            scale_x,
            scale_y,
            offset_x,
            offset_y,
        }
    }

    fn project(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.offset_x + (x - self.min_x) * self.scale_x,
            self.offset_y + (self.max_y - y) * self.scale_y,
        )
    }
}

/// Render `hierarchy` with node coordinates from `layout`.
///
/// Edges are straight lines ending in an arrow head at the node border;
/// nodes are filled circles labelled with the person's name.
pub fn dendrogram_svg(hierarchy: &Hierarchy, layout: &Layout, render: &RenderConfig) -> String {
    let width = f64::from(render.svg_width);
    let height = f64::from(render.svg_height);
    let viewport = Viewport::fit(layout, width, height);
    let tree = hierarchy.tree();

    let mut svg = String::new();
    // writing into a String cannot fail
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="Arial, sans-serif">"#,
        w = render.svg_width,
        h = render.svg_height
    );
    let _ = writeln!(
        svg,
        r#"  <defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="8" markerHeight="8" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{EDGE_COLOR}"/></marker></defs>"#
    );
    let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16">{}</text>"#,
        width / 2.0,
        MARGIN / 2.0 + 20.0,
        escape_html(&render.title)
    );

    let _ = writeln!(svg, r#"  <g class="edges" stroke="{EDGE_COLOR}" stroke-width="2">"#);
    for (idx, node) in tree.iter() {
        let Some(parent) = node.parent else { continue };
        let (Some(from), Some(to)) = (layout.position_of(parent), layout.position_of(idx)) else {
            continue;
        };
        let (x1, y1) = viewport.project(from.x, from.y);
        let (x2, y2) = viewport.project(to.x, to.y);
        let (sx, sy) = shorten(x2, y2, x1, y1, NODE_RADIUS);
        let (ex, ey) = shorten(x1, y1, x2, y2, NODE_RADIUS);
        let _ = writeln!(
            svg,
            r#"    <line x1="{sx:.1}" y1="{sy:.1}" x2="{ex:.1}" y2="{ey:.1}" marker-end="url(#arrow)"/>"#
        );
    }
    let _ = writeln!(svg, "  </g>");

    let _ = writeln!(svg, r#"  <g class="nodes">"#);
    for position in &layout.positions {
        let (cx, cy) = viewport.project(position.x, position.y);
        let _ = writeln!(
            svg,
            r#"    <circle cx="{cx:.1}" cy="{cy:.1}" r="{NODE_RADIUS}" fill="{NODE_FILL}"/>"#
        );
        let _ = writeln!(
            svg,
            r#"    <text x="{cx:.1}" y="{:.1}" text-anchor="middle" font-size="8" font-weight="bold">{}</text>"#,
            cy + 3.0,
            escape_html(&position.name)
        );
    }
    let _ = writeln!(svg, "  </g>");
    svg.push_str("</svg>\n");
    svg
}

/// Point on the segment from `(x1, y1)` to `(x2, y2)`, `by` short of the end.
fn shorten(x1: f64, y1: f64, x2: f64, y2: f64, by: f64) -> (f64, f64) {
    let (dx, dy) = (x2 - x1, y2 - y1);
    let len = (dx * dx + dy * dy).sqrt();
    if len <= by {
        return (x2, y2);
    }
    (x2 - dx / len * by, y2 - dy / len * by)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_vertical_segment_when_shortening_then_stops_before_end() {
        let (x, y) = shorten(0.0, 0.0, 0.0, 100.0, 30.0);
        assert_eq!((x, y), (0.0, 70.0));
    }

    #[test]
    fn given_segment_shorter_than_radius_when_shortening_then_keeps_end() {
        assert_eq!(shorten(0.0, 0.0, 10.0, 0.0, 30.0), (10.0, 0.0));
    }
}
