//! Render driver: binds a molecule, keeps its layout current and paints it
//! onto a host [`Surface`].

use std::cell::Cell;

use glam::DAffine2;

use crate::aromaticity::{AromaticityPerception, Hueckel};
use crate::error::StyleError;
use crate::geometry::{Line, Point, Rect};
use crate::layout::Layout;
use crate::mol::Mol;
use crate::rings::{RingFinder, Sssr};
use crate::style::{Color, StyleConfig};
use crate::traits::{HasAtomicNum, HasBondOrder, HasPosition2D};
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

/// Pen used for bond lines. The width is in layout units, so it scales with
/// the viewport transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Stroke {
    pub fn round(width: f64) -> Self {
        Self {
            width,
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }
}

/// Drawing primitives the driver needs from a host canvas.
///
/// State set through `concat_transform`, `set_stroke`, `set_color` and
/// `set_antialiasing` is scoped by `save`/`restore`.
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);
    /// Post-multiplies the current transform.
    fn concat_transform(&mut self, transform: DAffine2);
    fn set_antialiasing(&mut self, on: bool);
    fn set_stroke(&mut self, stroke: Stroke);
    fn set_color(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect);
    fn stroke_lines(&mut self, lines: &[Line]);
    /// Fills `text` centred on `center`, `height` tall.
    fn fill_label(&mut self, text: &str, center: Point, height: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepictorState {
    /// No molecule bound; painting does nothing.
    Unbound,
    /// Layout is current and has not been painted since it was computed.
    LaidOut,
    /// The current layout has been painted at least once.
    Rendered,
}

/// Paints one caller-owned molecule.
///
/// The layout is recomputed eagerly whenever the molecule or the style
/// changes; [`paint`](Depictor::paint) only reads it.
///
/// # Examples
///
/// ```
/// use chemcrab_depict::{
///     Atom, Bond, BondOrder, Depictor, DepictorState, Mol, Rect, SvgSurface, WithPosition2D,
/// };
///
/// let mut mol = Mol::new();
/// let c = mol.add_atom(WithPosition2D::new(Atom::new(6), 0.0, 0.0));
/// let o = mol.add_atom(WithPosition2D::new(Atom::new(8), 1.2, 0.0));
/// mol.add_bond(c, o, Bond::new(BondOrder::Double));
///
/// let mut depictor = Depictor::new();
/// depictor.set_mol(&mol);
/// assert_eq!(depictor.state(), DepictorState::LaidOut);
///
/// let mut svg = SvgSurface::new(200.0, 100.0);
/// depictor.paint(&mut svg, Rect::from_origin_size(0.0, 0.0, 200.0, 100.0));
/// assert!(svg.finish().contains(">O</text>"));
/// ```
pub struct Depictor<'m, A, B, R = Sssr, M = Hueckel> {
    mol: Option<&'m Mol<A, B>>,
    style: StyleConfig,
    ring_finder: R,
    aromaticity: M,
    layout: Option<Layout>,
    generation: u64,
    background: Option<Color>,
    painted: Cell<bool>,
}

impl<'m, A, B> Depictor<'m, A, B> {
    pub fn new() -> Self {
        Self::with_perception(Sssr, Hueckel)
    }
}

impl<'m, A, B> Default for Depictor<'m, A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'m, A, B, R, M> Depictor<'m, A, B, R, M> {
    pub fn with_perception(ring_finder: R, aromaticity: M) -> Self {
        Self {
            mol: None,
            style: StyleConfig::default(),
            ring_finder,
            aromaticity,
            layout: None,
            generation: 0,
            background: None,
            painted: Cell::new(false),
        }
    }

    pub fn mol(&self) -> Option<&'m Mol<A, B>> {
        self.mol
    }

    pub fn export_settings(&self) -> StyleConfig {
        self.style.clone()
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn state(&self) -> DepictorState {
        match (&self.layout, self.painted.get()) {
            (None, _) => DepictorState::Unbound,
            (Some(_), false) => DepictorState::LaidOut,
            (Some(_), true) => DepictorState::Rendered,
        }
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background
    }

    /// Fill colour for the whole output rectangle; `None` leaves it untouched.
    pub fn set_background_color(&mut self, color: Option<Color>) {
        self.background = color;
    }

    /// Paints the current layout fitted into `bounds`.
    ///
    /// Does nothing when no molecule is bound. The surface state is saved
    /// on entry and restored before returning.
    pub fn paint<S: Surface>(&self, surface: &mut S, bounds: Rect) {
        let Some(layout) = &self.layout else {
            tracing::debug!("paint called with no molecule bound");
            return;
        };

        surface.save();
        surface.set_antialiasing(self.style.antialiasing);
        if let Some(background) = self.background {
            surface.set_color(background);
            surface.fill_rect(bounds);
        }

        let viewport = Viewport::fit(layout.perimeter(), bounds);
        surface.concat_transform(viewport.to_affine());

        surface.set_stroke(Stroke::round(layout.unit() * self.style.line_thickness));
        surface.set_color(Color::BLACK);
        for bond in layout.bond_shapes() {
            surface.stroke_lines(&bond.lines);
        }

        for atom in layout.atom_shapes() {
            surface.set_color(self.style.color_scheme.color_for(atom.atomic_num));
            surface.fill_label(atom.symbol(), atom.center, atom.label_height());
        }
        surface.restore();

        self.painted.set(true);
    }
}

impl<'m, A, B, R, M> Depictor<'m, A, B, R, M>
where
    A: HasAtomicNum + HasPosition2D,
    B: HasBondOrder,
    R: RingFinder<A, B>,
    M: AromaticityPerception<A, B>,
{
    /// Binds `mol` and lays it out immediately.
    pub fn set_mol(&mut self, mol: &'m Mol<A, B>) {
        self.mol = Some(mol);
        self.relayout();
    }

    /// Replaces the style and lays the bound molecule out again. Invalid
    /// settings are rejected and the previous style is kept.
    pub fn import_settings(&mut self, style: StyleConfig) -> Result<(), StyleError> {
        style.validate()?;
        self.style = style;
        self.relayout();
        Ok(())
    }

    fn relayout(&mut self) {
        let Some(mol) = self.mol else {
            return;
        };
        self.generation += 1;
        let mut layout = Layout::compute(mol, &self.style, &self.ring_finder, &self.aromaticity);
        layout.generation = self.generation;
        self.layout = Some(layout);
        self.painted.set(false);
    }
}

#[cfg(test)]
mod tests {
    use glam::dvec2;

    use super::*;
    use crate::aromaticity::AtomFlags;
    use crate::bond::BondOrder;
    use crate::fixtures::{benzene, flag_aromatic, fused_tetrasubstituted, placed, PlacedMol};
    use crate::layout::{Placement, Side};
    use crate::style::ColorScheme;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Save,
        Restore,
        Transform(DAffine2),
        Antialiasing(bool),
        Stroke(Stroke),
        Color(Color),
        FillRect(Rect),
        Lines(usize),
        Label(String, Point, f64),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Surface for Recorder {
        fn save(&mut self) {
            self.calls.push(Call::Save);
        }
        fn restore(&mut self) {
            self.calls.push(Call::Restore);
        }
        fn concat_transform(&mut self, transform: DAffine2) {
            self.calls.push(Call::Transform(transform));
        }
        fn set_antialiasing(&mut self, on: bool) {
            self.calls.push(Call::Antialiasing(on));
        }
        fn set_stroke(&mut self, stroke: Stroke) {
            self.calls.push(Call::Stroke(stroke));
        }
        fn set_color(&mut self, color: Color) {
            self.calls.push(Call::Color(color));
        }
        fn fill_rect(&mut self, rect: Rect) {
            self.calls.push(Call::FillRect(rect));
        }
        fn stroke_lines(&mut self, lines: &[Line]) {
            self.calls.push(Call::Lines(lines.len()));
        }
        fn fill_label(&mut self, text: &str, center: Point, height: f64) {
            self.calls.push(Call::Label(text.to_string(), center, height));
        }
    }

    fn bounds() -> Rect {
        Rect::from_origin_size(0.0, 0.0, 300.0, 200.0)
    }

    fn ketone() -> PlacedMol {
        placed(
            &[("C", 0.0, 0.0), ("C", 1.0, 0.0), ("O", 1.5, 0.866), ("C", 2.0, 0.0)],
            &[(0, 1, BondOrder::Single), (1, 2, BondOrder::Double), (1, 3, BondOrder::Single)],
        )
    }

    #[test]
    fn unbound_paint_is_a_no_op() {
        let depictor: Depictor<'_, crate::WithPosition2D<crate::Atom>, crate::Bond> =
            Depictor::new();
        let mut surface = Recorder::default();
        depictor.paint(&mut surface, bounds());
        assert!(surface.calls.is_empty());
        assert_eq!(depictor.state(), DepictorState::Unbound);
        assert!(depictor.layout().is_none());
        assert!(depictor.mol().is_none());
    }

    #[test]
    fn state_transitions() {
        let mol = ketone();
        let mut depictor = Depictor::new();
        assert_eq!(depictor.state(), DepictorState::Unbound);
        depictor.set_mol(&mol);
        assert_eq!(depictor.state(), DepictorState::LaidOut);
        assert_eq!(depictor.layout().unwrap().generation(), 1);

        depictor.paint(&mut Recorder::default(), bounds());
        assert_eq!(depictor.state(), DepictorState::Rendered);
        depictor.paint(&mut Recorder::default(), bounds());
        assert_eq!(depictor.state(), DepictorState::Rendered);

        depictor.import_settings(StyleConfig::default()).unwrap();
        assert_eq!(depictor.state(), DepictorState::LaidOut);
        assert_eq!(depictor.layout().unwrap().generation(), 2);
    }

    #[test]
    fn paint_call_sequence() {
        let mol = ketone();
        let mut depictor = Depictor::new();
        depictor.set_mol(&mol);
        let mut surface = Recorder::default();
        depictor.paint(&mut surface, bounds());

        let calls = &surface.calls;
        assert_eq!(calls.first(), Some(&Call::Save));
        assert_eq!(calls.last(), Some(&Call::Restore));
        assert_eq!(calls.iter().filter(|c| **c == Call::Save).count(), 1);
        assert_eq!(calls.iter().filter(|c| **c == Call::Restore).count(), 1);
        assert_eq!(calls[1], Call::Antialiasing(true));
        assert!(!calls.iter().any(|c| matches!(c, Call::FillRect(_))));

        let layout = depictor.layout().unwrap();
        let expected = Viewport::fit(layout.perimeter(), bounds()).to_affine();
        assert_eq!(calls[2], Call::Transform(expected));
        assert_eq!(calls[3], Call::Stroke(Stroke::round(layout.unit() * 0.07)));
        assert_eq!(calls[4], Call::Color(Color::BLACK));

        let lines: Vec<usize> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Lines(n) => Some(*n),
                _ => None,
            })
            .collect();
        assert_eq!(lines, vec![1, 2, 1]);

        let label = calls.iter().position(|c| matches!(c, Call::Label(..))).unwrap();
        assert_eq!(calls[label - 1], Call::Color(Color::from_hex(0xff0d0d)));
        match &calls[label] {
            Call::Label(text, center, height) => {
                assert_eq!(text, "O");
                assert_eq!(*center, layout.atom_shape(crate::fixtures::n(2)).unwrap().center);
                assert!((height - 0.35 * layout.unit()).abs() < 1e-9);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn paint_does_not_change_the_layout() {
        let mol = benzene();
        let mut depictor = Depictor::new();
        depictor.set_mol(&mol);
        let before = depictor.layout().cloned();
        depictor.paint(&mut Recorder::default(), bounds());
        depictor.paint(&mut Recorder::default(), Rect::from_origin_size(5.0, 5.0, 50.0, 900.0));
        assert_eq!(depictor.layout().cloned(), before);
    }

    #[test]
    fn background_is_filled_before_the_transform() {
        let mol = ketone();
        let mut depictor = Depictor::new();
        depictor.set_mol(&mol);
        depictor.set_background_color(Some(Color::WHITE));
        assert_eq!(depictor.background_color(), Some(Color::WHITE));
        let mut surface = Recorder::default();
        depictor.paint(&mut surface, bounds());
        assert_eq!(surface.calls[2], Call::Color(Color::WHITE));
        assert_eq!(surface.calls[3], Call::FillRect(bounds()));
        assert!(matches!(surface.calls[4], Call::Transform(_)));
    }

    #[test]
    fn import_validates_and_relayouts() {
        let mol = ketone();
        let mut depictor = Depictor::new();
        depictor.set_mol(&mol);
        let first = depictor.layout().unwrap().clone();

        let wide = StyleConfig {
            label_height: 0.8,
            antialiasing: false,
            color_scheme: ColorScheme::Monochrome(Color::rgb(0, 0, 128)),
            ..StyleConfig::default()
        };
        depictor.import_settings(wide.clone()).unwrap();
        assert_eq!(depictor.export_settings(), wide);
        let second = depictor.layout().unwrap();
        let o = crate::fixtures::n(2);
        assert!(second.atom_shape(o).unwrap().diameter > first.atom_shape(o).unwrap().diameter);

        let bad = StyleConfig {
            line_thickness: -1.0,
            ..StyleConfig::default()
        };
        assert!(depictor.import_settings(bad).is_err());
        assert_eq!(depictor.export_settings(), wide);
        assert_eq!(depictor.layout().unwrap().generation(), 2);

        let mut surface = Recorder::default();
        depictor.paint(&mut surface, bounds());
        assert_eq!(surface.calls[1], Call::Antialiasing(false));
        assert!(surface.calls.contains(&Call::Color(Color::rgb(0, 0, 128))));
    }

    #[test]
    fn settings_round_trip_bit_for_bit() {
        let mut depictor: Depictor<'_, crate::WithPosition2D<crate::Atom>, crate::Bond> =
            Depictor::new();
        let style = StyleConfig {
            label_height: 0.1 + 0.2,
            line_thickness: 1.0 / 7.0,
            line_spacing: 0.333_333_333_333_333_3,
            ..StyleConfig::default()
        };
        depictor.import_settings(style.clone()).unwrap();
        let out = depictor.export_settings();
        assert_eq!(out.label_height.to_bits(), style.label_height.to_bits());
        assert_eq!(out.line_thickness.to_bits(), style.line_thickness.to_bits());
        assert_eq!(out.line_spacing.to_bits(), style.line_spacing.to_bits());
        assert_eq!(depictor.state(), DepictorState::Unbound);
    }

    #[test]
    fn custom_perception_collaborators() {
        let mut mol = fused_tetrasubstituted();
        flag_aromatic(&mut mol, &[0, 1, 6, 7, 8, 9]);
        let mut depictor = Depictor::with_perception(Sssr, AtomFlags);
        depictor.set_mol(&mol);
        let bond = &depictor.layout().unwrap().bond_shapes()[0];
        assert_eq!(bond.placement, Placement::Offset(Side::Above));
        assert!(bond.lines[1].midpoint().x > 0.0);
        assert_eq!(dvec2(0.0, -0.5), bond.lines[0].start);
    }
}
