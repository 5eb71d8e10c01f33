//! SVG output surface.
//!
//! Pure string building: every primitive is transformed into output
//! coordinates as it is recorded, so the document has no nested groups.

use glam::DAffine2;

use crate::aromaticity::Hueckel;
use crate::error::StyleError;
use crate::geometry::{Line, Point, Rect};
use crate::mol::Mol;
use crate::render::{Depictor, LineCap, LineJoin, Stroke, Surface};
use crate::rings::Sssr;
use crate::style::{Color, StyleConfig};
use crate::traits::{HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount, HasPosition2D};

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    transform: DAffine2,
    stroke: Stroke,
    color: Color,
    antialiasing: bool,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: DAffine2::IDENTITY,
            stroke: Stroke::round(1.0),
            color: Color::BLACK,
            antialiasing: true,
        }
    }
}

/// A [`Surface`] that records an SVG document.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    parts: Vec<String>,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            parts: Vec::new(),
            state: GraphicsState::default(),
            saved: Vec::new(),
        }
    }

    /// Closes the document and returns it.
    pub fn finish(self) -> String {
        let mut parts = Vec::with_capacity(self.parts.len() + 2);
        parts.push(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = fmt_num(self.width),
            h = fmt_num(self.height)
        ));
        parts.extend(self.parts);
        parts.push("</svg>".to_string());
        parts.join("\n")
    }

    fn point(&self, p: Point) -> Point {
        self.state.transform.transform_point2(p)
    }

    /// Length scale of the current transform; the driver only uses uniform scales.
    fn scale(&self) -> f64 {
        self.state.transform.matrix2.determinant().abs().sqrt()
    }

    fn rendering_attr(&self) -> &'static str {
        if self.state.antialiasing {
            ""
        } else {
            r#" shape-rendering="crispEdges""#
        }
    }
}

impl Surface for SvgSurface {
    fn save(&mut self) {
        self.saved.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn concat_transform(&mut self, transform: DAffine2) {
        self.state.transform = self.state.transform * transform;
    }

    fn set_antialiasing(&mut self, on: bool) {
        self.state.antialiasing = on;
    }

    fn set_stroke(&mut self, stroke: Stroke) {
        self.state.stroke = stroke;
    }

    fn set_color(&mut self, color: Color) {
        self.state.color = color;
    }

    fn fill_rect(&mut self, rect: Rect) {
        let r = Rect::new(self.point(rect.min), self.point(rect.max));
        self.parts.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"{} />"#,
            fmt_num(r.min.x),
            fmt_num(r.min.y),
            fmt_num(r.width()),
            fmt_num(r.height()),
            self.state.color.to_hex(),
            self.rendering_attr()
        ));
    }

    fn stroke_lines(&mut self, lines: &[Line]) {
        if lines.is_empty() {
            return;
        }
        let d: Vec<String> = lines
            .iter()
            .map(|line| {
                let start = self.point(line.start);
                let end = self.point(line.end);
                format!(
                    "M{} {} L{} {}",
                    fmt_num(start.x),
                    fmt_num(start.y),
                    fmt_num(end.x),
                    fmt_num(end.y)
                )
            })
            .collect();
        let stroke = self.state.stroke;
        self.parts.push(format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="{}" stroke-linejoin="{}"{} />"#,
            d.join(" "),
            self.state.color.to_hex(),
            fmt_num(stroke.width * self.scale()),
            line_cap(stroke.cap),
            line_join(stroke.join),
            self.rendering_attr()
        ));
    }

    fn fill_label(&mut self, text: &str, center: Point, height: f64) {
        let c = self.point(center);
        self.parts.push(format!(
            r#"<text x="{}" y="{}" font-family="sans-serif" font-size="{}" text-anchor="middle" dominant-baseline="central" fill="{}">{}</text>"#,
            fmt_num(c.x),
            fmt_num(c.y),
            fmt_num(height * self.scale()),
            self.state.color.to_hex(),
            escape_xml(text)
        ));
    }
}

fn line_cap(cap: LineCap) -> &'static str {
    match cap {
        LineCap::Butt => "butt",
        LineCap::Round => "round",
        LineCap::Square => "square",
    }
}

fn line_join(join: LineJoin) -> &'static str {
    match join {
        LineJoin::Miter => "miter",
        LineJoin::Round => "round",
        LineJoin::Bevel => "bevel",
    }
}

/// Depicts `mol` on a white `width` × `height` canvas and returns the SVG text.
pub fn render_svg<A, B>(
    mol: &Mol<A, B>,
    width: f64,
    height: f64,
    style: &StyleConfig,
) -> Result<String, StyleError>
where
    A: HasAtomicNum + HasPosition2D + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    let mut depictor: Depictor<'_, A, B, Sssr, Hueckel> = Depictor::new();
    depictor.import_settings(style.clone())?;
    depictor.set_background_color(Some(Color::WHITE));
    depictor.set_mol(mol);

    let mut surface = SvgSurface::new(width, height);
    depictor.paint(&mut surface, Rect::from_origin_size(0.0, 0.0, width, height));
    Ok(surface.finish())
}

pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Three decimals, no trailing zeros, no negative zero.
fn fmt_num(n: f64) -> String {
    let rounded = (n * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}
