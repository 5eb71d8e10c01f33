//! Shape computation for a molecule with fixed 2-D coordinates.
//!
//! A [`Layout`] holds one optional [`AtomShape`] per atom (only atoms that
//! carry a label) and one [`BondShape`] per bond, both indexed by petgraph
//! index, plus the bounding perimeter used to fit the drawing to an output
//! rectangle. All lengths are in source units; the style fractions are
//! scaled by the average bond length of the molecule.

use std::collections::BTreeSet;

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::aromaticity::AromaticityPerception;
use crate::bond::BondOrder;
use crate::element::{self, CARBON};
use crate::error::PerceptionError;
use crate::geometry::{
    shorten_toward_center, signed_offset, translate_perpendicular, trim_to_rect, Line, Point,
    Rect,
};
use crate::mol::Mol;
use crate::rings::{RingFinder, RingSet};
use crate::style::StyleConfig;
use crate::traits::{HasAtomicNum, HasBondOrder, HasPosition2D};

/// Fraction of its length removed from the inner line of an offset double bond.
pub const INNER_LINE_SHORTENING: f64 = 0.25;

/// Label glyph height relative to the atom circle.
pub const LABEL_GLYPH_SCALE: f64 = 0.7;

/// Local substitution pattern of a double bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Substitution {
    Terminal,
    OneOneDisubstituted,
    OneTwoDisubstituted,
    Trisubstituted,
    Tetrasubstituted,
    /// More than two substituents on an endpoint; drawn like a terminal bond.
    Unclassified,
}

/// Classifies a double bond from the number of substituents on each end,
/// i.e. each endpoint's degree minus the bond itself.
///
/// ```
/// use chemcrab_depict::{classify, Substitution};
///
/// assert_eq!(classify(0, 1), Substitution::Terminal);
/// assert_eq!(classify(2, 0), Substitution::OneOneDisubstituted);
/// assert_eq!(classify(2, 1), Substitution::Trisubstituted);
/// ```
pub fn classify(source_substituents: usize, target_substituents: usize) -> Substitution {
    let (low, high) = if source_substituents <= target_substituents {
        (source_substituents, target_substituents)
    } else {
        (target_substituents, source_substituents)
    };
    match (low, high) {
        (0, 0) | (0, 1) => Substitution::Terminal,
        (0, _) => Substitution::OneOneDisubstituted,
        (1, 1) => Substitution::OneTwoDisubstituted,
        (1, 2) => Substitution::Trisubstituted,
        (2, 2) => Substitution::Tetrasubstituted,
        _ => Substitution::Unclassified,
    }
}

/// Side of the bond axis, as measured by [`signed_offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    Above,
    #[default]
    Below,
}

impl Side {
    fn of(offset: f64) -> Side {
        if offset > 0.0 {
            Side::Above
        } else {
            Side::Below
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            Side::Above => 1.0,
            Side::Below => -1.0,
        }
    }
}

/// Where the lines of a bond sit relative to its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Lines symmetric about the axis (or a lone line on it).
    Centered,
    /// One line on the axis, a shortened one on the given side.
    Offset(Side),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtomShape {
    pub atom: NodeIndex,
    pub atomic_num: u8,
    pub center: Point,
    pub diameter: f64,
}

impl AtomShape {
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, self.diameter, self.diameter)
    }

    pub fn symbol(&self) -> &'static str {
        element::symbol(self.atomic_num)
    }

    pub fn label_height(&self) -> f64 {
        self.diameter * LABEL_GLYPH_SCALE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BondShape {
    pub bond: EdgeIndex,
    pub order: BondOrder,
    /// Set for double bonds only.
    pub substitution: Option<Substitution>,
    pub placement: Placement,
    /// The axis line comes first.
    pub lines: Vec<Line>,
}

impl BondShape {
    pub fn bounds(&self) -> Option<Rect> {
        self.lines
            .iter()
            .map(Line::bounds)
            .reduce(|acc, r| acc.union(&r))
    }
}

/// Counts of conditions the layout recovered from instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutDiagnostics {
    /// Bonds whose endpoints coincide.
    pub degenerate_bonds: usize,
    /// Fractional-order bonds drawn with the three-line fallback.
    pub delocalized_bonds: usize,
    /// Tetrasubstituted double bonds with no usable anchor substituent.
    pub unresolved_anchors: usize,
    /// Ring or aromaticity collaborator errors.
    pub perception_failures: usize,
}

/// Shapes and perimeter for one molecule under one style.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub(crate) generation: u64,
    unit: f64,
    atoms: Vec<Option<AtomShape>>,
    bonds: Vec<BondShape>,
    perimeter: Rect,
    diagnostics: LayoutDiagnostics,
}

impl Layout {
    /// Runs a full layout pass.
    ///
    /// Ring and aromaticity perception are only invoked if a
    /// tetrasubstituted double bond needs them, and at most once each.
    pub fn compute<A, B, R, M>(
        mol: &Mol<A, B>,
        style: &StyleConfig,
        ring_finder: &R,
        aromaticity: &M,
    ) -> Layout
    where
        A: HasAtomicNum + HasPosition2D,
        B: HasBondOrder,
        R: RingFinder<A, B>,
        M: AromaticityPerception<A, B>,
    {
        if !mol.has_coordinates() {
            tracing::warn!("atoms without 2-D coordinates are drawn at the origin");
        }
        let positions = mol.screen_positions();
        let unit = average_bond_length(mol, &positions);

        let atoms: Vec<Option<AtomShape>> = mol
            .atoms()
            .map(|idx| {
                let atomic_num = mol.atom(idx).atomic_num();
                (atomic_num != CARBON).then(|| AtomShape {
                    atom: idx,
                    atomic_num,
                    center: positions[idx.index()],
                    diameter: unit * style.label_height,
                })
            })
            .collect();

        let mut pass = Pass {
            mol,
            positions: &positions,
            atoms: &atoms,
            spacing: unit * style.line_spacing,
            ring_finder,
            aromaticity,
            rings: None,
            aromatic: None,
            diagnostics: LayoutDiagnostics::default(),
        };
        let bonds: Vec<BondShape> = mol.bonds().filter_map(|e| pass.bond_shape(e)).collect();
        let diagnostics = pass.diagnostics;

        let perimeter = perimeter(&atoms, &bonds, &positions, unit * style.line_thickness);

        tracing::debug!(
            atoms = mol.atom_count(),
            bonds = mol.bond_count(),
            unit,
            ?diagnostics,
            "layout pass"
        );

        Layout {
            generation: 0,
            unit,
            atoms,
            bonds,
            perimeter,
            diagnostics,
        }
    }

    /// Incremented by the owning [`Depictor`](crate::Depictor) on every pass.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Average bond length, the unit for every style fraction.
    pub fn unit(&self) -> f64 {
        self.unit
    }

    pub fn atom_shape(&self, atom: NodeIndex) -> Option<&AtomShape> {
        self.atoms.get(atom.index()).and_then(Option::as_ref)
    }

    pub fn atom_shapes(&self) -> impl Iterator<Item = &AtomShape> + '_ {
        self.atoms.iter().flatten()
    }

    pub fn bond_shape(&self, bond: EdgeIndex) -> Option<&BondShape> {
        self.bonds.get(bond.index())
    }

    pub fn bond_shapes(&self) -> &[BondShape] {
        &self.bonds
    }

    pub fn perimeter(&self) -> Rect {
        self.perimeter
    }

    pub fn diagnostics(&self) -> LayoutDiagnostics {
        self.diagnostics
    }
}

fn average_bond_length<A, B>(mol: &Mol<A, B>, positions: &[Point]) -> f64 {
    let lengths: Vec<f64> = mol
        .bonds()
        .filter_map(|e| mol.bond_endpoints(e))
        .map(|(a, b)| positions[a.index()].distance(positions[b.index()]))
        .collect();
    if lengths.is_empty() {
        return 1.0;
    }
    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    if mean.is_finite() && mean > 0.0 {
        mean
    } else {
        1.0
    }
}

fn perimeter(
    atoms: &[Option<AtomShape>],
    bonds: &[BondShape],
    positions: &[Point],
    line_thickness: f64,
) -> Rect {
    let union = atoms
        .iter()
        .flatten()
        .map(AtomShape::bounds)
        .chain(bonds.iter().filter_map(BondShape::bounds))
        .reduce(|acc, r| acc.union(&r));
    match union {
        Some(rect) => rect.expand(0.5 * line_thickness),
        None => {
            let center = if positions.is_empty() {
                Point::ZERO
            } else {
                positions.iter().fold(Point::ZERO, |acc, p| acc + *p) / positions.len() as f64
            };
            Rect::from_center_size(center, 1.0, 1.0)
        }
    }
}

enum Anchor {
    Found(NodeIndex),
    NotInRing,
    Unresolved,
}

/// State of one layout pass, including the lazily perceived rings and
/// aromaticity flags. `None` means not yet asked; `Some(None)` means the
/// collaborator failed.
struct Pass<'a, A, B, R, M> {
    mol: &'a Mol<A, B>,
    positions: &'a [Point],
    atoms: &'a [Option<AtomShape>],
    spacing: f64,
    ring_finder: &'a R,
    aromaticity: &'a M,
    rings: Option<Option<RingSet>>,
    aromatic: Option<Option<Vec<bool>>>,
    diagnostics: LayoutDiagnostics,
}

impl<A, B, R, M> Pass<'_, A, B, R, M>
where
    B: HasBondOrder,
    R: RingFinder<A, B>,
    M: AromaticityPerception<A, B>,
{
    fn bond_shape(&mut self, bond: EdgeIndex) -> Option<BondShape> {
        let (a, b) = self.mol.bond_endpoints(bond)?;
        let axis = Line::new(self.positions[a.index()], self.positions[b.index()]);
        if axis.is_degenerate() {
            self.diagnostics.degenerate_bonds += 1;
            tracing::debug!(bond = bond.index(), "zero-length bond");
        }

        let order = self.mol.bond(bond).bond_order();
        let mut substitution = None;
        let mut placement = Placement::Centered;
        let lines = match order {
            BondOrder::Single => vec![self.trim(axis, a, b)],
            BondOrder::Double => {
                let subs_a = self.mol.substituents(a, b);
                let subs_b = self.mol.substituents(b, a);
                let pattern = classify(subs_a.len(), subs_b.len());
                substitution = Some(pattern);
                placement = self.resolve_placement(
                    pattern,
                    bond,
                    &axis,
                    (a, subs_a.as_slice()),
                    (b, subs_b.as_slice()),
                );
                self.double_lines(&axis, placement, a, b)
            }
            BondOrder::Triple | BondOrder::Aromatic => {
                if order == BondOrder::Aromatic {
                    self.diagnostics.delocalized_bonds += 1;
                    tracing::debug!(
                        bond = bond.index(),
                        order = order.value(),
                        "fractional bond order drawn as three lines"
                    );
                }
                let trimmed = self.trim(axis, a, b);
                vec![
                    trimmed,
                    self.parallel(&trimmed, self.spacing, a, b),
                    self.parallel(&trimmed, -self.spacing, a, b),
                ]
            }
        };

        Some(BondShape {
            bond,
            order,
            substitution,
            placement,
            lines,
        })
    }

    /// Offset lines are cut from the axis already trimmed at both labels, so
    /// they stop at the glyphs even when the offset exceeds the label radius.
    fn double_lines(
        &self,
        axis: &Line,
        placement: Placement,
        a: NodeIndex,
        b: NodeIndex,
    ) -> Vec<Line> {
        let trimmed = self.trim(*axis, a, b);
        match placement {
            Placement::Centered => {
                let half = 0.5 * self.spacing;
                vec![
                    self.parallel(&trimmed, half, a, b),
                    self.parallel(&trimmed, -half, a, b),
                ]
            }
            Placement::Offset(side) => {
                let inner = self.parallel(&trimmed, side.sign() * self.spacing, a, b);
                vec![trimmed, shorten_toward_center(&inner, INNER_LINE_SHORTENING)]
            }
        }
    }

    fn parallel(&self, trimmed: &Line, distance: f64, a: NodeIndex, b: NodeIndex) -> Line {
        self.trim(translate_perpendicular(trimmed, distance), a, b)
    }

    fn trim(&self, line: Line, a: NodeIndex, b: NodeIndex) -> Line {
        [a, b]
            .iter()
            .filter_map(|atom| self.atoms[atom.index()].as_ref())
            .fold(line, |line, shape| trim_to_rect(&line, &shape.bounds()))
    }

    fn side_of(&self, axis: &Line, atom: NodeIndex) -> Side {
        Side::of(signed_offset(axis, self.positions[atom.index()]))
    }

    fn resolve_placement(
        &mut self,
        pattern: Substitution,
        bond: EdgeIndex,
        axis: &Line,
        (a, subs_a): (NodeIndex, &[NodeIndex]),
        (b, subs_b): (NodeIndex, &[NodeIndex]),
    ) -> Placement {
        match pattern {
            Substitution::Terminal | Substitution::Unclassified => {
                Placement::Offset(Side::default())
            }
            Substitution::OneOneDisubstituted => Placement::Centered,
            Substitution::OneTwoDisubstituted => {
                let both_above = subs_a
                    .iter()
                    .chain(subs_b)
                    .all(|&s| self.side_of(axis, s) == Side::Above);
                Placement::Offset(if both_above { Side::Above } else { Side::Below })
            }
            Substitution::Trisubstituted => {
                let single = if subs_a.len() == 1 { subs_a[0] } else { subs_b[0] };
                Placement::Offset(self.side_of(axis, single))
            }
            Substitution::Tetrasubstituted => {
                match self.tetrasubstituted_anchor(bond, axis, (a, subs_a), (b, subs_b)) {
                    Anchor::Found(anchor) => Placement::Offset(self.side_of(axis, anchor)),
                    Anchor::NotInRing => Placement::Centered,
                    Anchor::Unresolved => {
                        self.diagnostics.unresolved_anchors += 1;
                        tracing::warn!(
                            bond = bond.index(),
                            "no anchor for tetrasubstituted double bond"
                        );
                        Placement::Centered
                    }
                }
            }
        }
    }

    /// With three ring neighbours, candidates not bonded to the acyclic end
    /// are tried first if they share a ring with the bond, then in index order.
    fn tetrasubstituted_anchor(
        &mut self,
        bond: EdgeIndex,
        axis: &Line,
        (a, subs_a): (NodeIndex, &[NodeIndex]),
        (b, subs_b): (NodeIndex, &[NodeIndex]),
    ) -> Anchor {
        self.ensure_rings();
        let Some(Some(rings)) = &self.rings else {
            return Anchor::NotInRing;
        };
        if !rings.contains_bond(bond) {
            return Anchor::NotInRing;
        }

        let mut ring_subs = BTreeSet::new();
        for end in [a, b] {
            for ring in rings.rings_containing(end) {
                for n in ring.neighbors_of(end).into_iter().flatten() {
                    if n != a && n != b {
                        ring_subs.insert(n);
                    }
                }
            }
        }

        match ring_subs.len() {
            2 => ring_subs.first().map_or(Anchor::Unresolved, |&s| Anchor::Found(s)),
            3 => {
                let acyclic: Vec<NodeIndex> = subs_a
                    .iter()
                    .chain(subs_b)
                    .copied()
                    .filter(|s| !ring_subs.contains(s))
                    .collect();
                if acyclic.len() != 1 {
                    tracing::warn!(
                        bond = bond.index(),
                        count = acyclic.len(),
                        "expected one acyclic substituent"
                    );
                }
                let acyclic_end = acyclic
                    .first()
                    .map(|s| if subs_a.contains(s) { a } else { b });
                let candidates: Vec<NodeIndex> = ring_subs
                    .iter()
                    .copied()
                    .filter(|&s| {
                        acyclic_end.map_or(true, |end| self.mol.bond_between(s, end).is_none())
                    })
                    .collect();
                let shares_ring = |s: NodeIndex| {
                    rings
                        .rings()
                        .iter()
                        .any(|r| r.contains_bond(bond) && r.contains_atom(s))
                };
                candidates
                    .iter()
                    .copied()
                    .find(|&s| shares_ring(s))
                    .or_else(|| candidates.first().copied())
                    .map_or(Anchor::Unresolved, Anchor::Found)
            }
            4 => {
                self.ensure_aromaticity();
                let (Some(Some(rings)), Some(Some(flags))) = (&self.rings, &self.aromatic) else {
                    return Anchor::Unresolved;
                };
                let qualifying: Vec<NodeIndex> = ring_subs
                    .iter()
                    .copied()
                    .filter(|s| {
                        flags[s.index()] && rings.rings_containing(*s).any(|r| r.len() == 6)
                    })
                    .collect();
                let Some(&first) = qualifying.first() else {
                    return Anchor::Unresolved;
                };
                let side = self.side_of(axis, first);
                if qualifying.iter().all(|&s| self.side_of(axis, s) == side) {
                    Anchor::Found(first)
                } else {
                    Anchor::Unresolved
                }
            }
            _ => Anchor::Unresolved,
        }
    }

    fn ensure_rings(&mut self) {
        if self.rings.is_some() {
            return;
        }
        let found = match self.ring_finder.find_rings(self.mol) {
            Ok(rings) => Some(rings),
            Err(err) => {
                self.record_failure(&err);
                None
            }
        };
        self.rings = Some(found);
    }

    fn ensure_aromaticity(&mut self) {
        if self.aromatic.is_some() {
            return;
        }
        self.ensure_rings();
        let result = match &self.rings {
            Some(Some(rings)) => Some(self.aromaticity.perceive(self.mol, rings)),
            _ => None,
        };
        let flags = match result {
            Some(Ok(flags)) if flags.len() == self.mol.atom_count() => Some(flags),
            Some(Ok(flags)) => {
                self.record_failure(&PerceptionError::AtomCountMismatch {
                    expected: self.mol.atom_count(),
                    found: flags.len(),
                });
                None
            }
            Some(Err(err)) => {
                self.record_failure(&err);
                None
            }
            None => None,
        };
        self.aromatic = Some(flags);
    }

    fn record_failure(&mut self, err: &PerceptionError) {
        self.diagnostics.perception_failures += 1;
        tracing::warn!(%err, "perception failed, using simpler bond placement");
    }
}
