use glam::{DAffine2, DVec2};

use crate::geometry::{Point, Rect};

/// Uniform scale plus translation that centres a layout perimeter inside an
/// output rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset: DVec2,
}

impl Viewport {
    /// Largest scale at which `perimeter` fits in `output`, aspect ratio kept.
    ///
    /// A perimeter with no width (or no height) is fitted on the other axis
    /// alone; with neither, the scale is `1.0`.
    pub fn fit(perimeter: Rect, output: Rect) -> Viewport {
        let ratio = |out: f64, per: f64| (per > 0.0).then(|| out / per);
        let scale = match (
            ratio(output.width(), perimeter.width()),
            ratio(output.height(), perimeter.height()),
        ) {
            (Some(sx), Some(sy)) => sx.min(sy),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => 1.0,
        };
        let scale = if scale.is_finite() { scale } else { 1.0 };

        let slack = DVec2::new(output.width(), output.height())
            - DVec2::new(perimeter.width(), perimeter.height()) * scale;
        let offset = output.min + slack * 0.5 - perimeter.min * scale;
        Viewport { scale, offset }
    }

    pub fn apply(&self, p: Point) -> Point {
        p * self.scale + self.offset
    }

    pub fn to_affine(&self) -> DAffine2 {
        DAffine2::from_translation(self.offset) * DAffine2::from_scale(DVec2::splat(self.scale))
    }
}
