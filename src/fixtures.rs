//! Hand-placed molecules shared by the unit tests.

use petgraph::graph::NodeIndex;

use crate::{Atom, Bond, BondOrder, Mol, WithPosition2D};

pub(crate) type PlacedMol = Mol<WithPosition2D<Atom>, Bond>;

pub(crate) fn n(i: usize) -> NodeIndex {
    NodeIndex::new(i)
}

/// All-carbon, single-bonded molecule with no coordinates.
pub(crate) fn topology(atoms: usize, edges: &[(usize, usize)]) -> Mol<Atom, Bond> {
    let mut mol = Mol::new();
    for _ in 0..atoms {
        mol.add_atom(Atom::new(6));
    }
    for &(a, b) in edges {
        mol.add_bond(n(a), n(b), Bond::default());
    }
    mol
}

pub(crate) fn placed(atoms: &[(&str, f64, f64)], bonds: &[(usize, usize, BondOrder)]) -> PlacedMol {
    let mut mol = Mol::new();
    for &(symbol, x, y) in atoms {
        let atom = Atom::from_symbol(symbol).unwrap();
        mol.add_atom(WithPosition2D::new(atom, x, y));
    }
    for &(a, b, order) in bonds {
        mol.add_bond(n(a), n(b), Bond::new(order));
    }
    mol
}

/// Vertices of a regular hexagon with unit edges, starting at `start_deg`
/// and walking counter-clockwise.
pub(crate) fn hexagon(cx: f64, cy: f64, start_deg: f64) -> Vec<(f64, f64)> {
    (0..6)
        .map(|k| {
            let a = (start_deg + 60.0 * k as f64).to_radians();
            (cx + a.cos(), cy + a.sin())
        })
        .collect()
}

/// Kekulé benzene, unit bond length, double bonds 0=1, 2=3, 4=5.
pub(crate) fn benzene() -> PlacedMol {
    let pts = hexagon(0.0, 0.0, 90.0);
    let atoms: Vec<(&str, f64, f64)> = pts.iter().map(|&(x, y)| ("C", x, y)).collect();
    let bonds: Vec<(usize, usize, BondOrder)> = (0..6)
        .map(|i| {
            let order = if i % 2 == 0 {
                BondOrder::Double
            } else {
                BondOrder::Single
            };
            (i, (i + 1) % 6, order)
        })
        .collect();
    placed(&atoms, &bonds)
}

/// Two six-membered rings fused on the vertical bond 0=1.
///
/// Atoms 2–5 form the left ring, 6–9 the right ring. Only bond 0=1 is
/// double; aromaticity is whatever the caller flags.
pub(crate) fn fused_tetrasubstituted() -> PlacedMol {
    let h = 3f64.sqrt() / 2.0;
    placed(
        &[
            ("C", 0.0, 0.5),
            ("C", 0.0, -0.5),
            ("C", -h, 1.0),
            ("C", -2.0 * h, 0.5),
            ("C", -2.0 * h, -0.5),
            ("C", -h, -1.0),
            ("C", h, 1.0),
            ("C", 2.0 * h, 0.5),
            ("C", 2.0 * h, -0.5),
            ("C", h, -1.0),
        ],
        &[
            (0, 1, BondOrder::Double),
            (0, 2, BondOrder::Single),
            (2, 3, BondOrder::Single),
            (3, 4, BondOrder::Single),
            (4, 5, BondOrder::Single),
            (5, 1, BondOrder::Single),
            (0, 6, BondOrder::Single),
            (6, 7, BondOrder::Single),
            (7, 8, BondOrder::Single),
            (8, 9, BondOrder::Single),
            (9, 1, BondOrder::Single),
        ],
    )
}

/// Sets the aromatic flag on the given atoms.
pub(crate) fn flag_aromatic(mol: &mut PlacedMol, atoms: &[usize]) {
    for &i in atoms {
        mol.atom_mut(n(i)).inner.is_aromatic = true;
    }
}

/// Double bond 0=1 shared by ring A (0, 2–5, 1) and carrying a methyl (10)
/// on atom 0. Ring B (1, 5–9) is fused on the 1–5 bond, so atom 1 sits at
/// the fusion point and the bond has three ring substituents: 2, 5 and 9.
pub(crate) fn fused_with_methyl() -> PlacedMol {
    let h = 3f64.sqrt() / 2.0;
    placed(
        &[
            ("C", 0.0, 0.5),
            ("C", 0.0, -0.5),
            ("C", h, 1.0),
            ("C", 2.0 * h, 0.5),
            ("C", 2.0 * h, -0.5),
            ("C", h, -1.0),
            ("C", h, -2.0),
            ("C", 0.0, -2.5),
            ("C", -h, -2.0),
            ("C", -h, -1.0),
            ("C", -h, 1.0),
        ],
        &[
            (0, 1, BondOrder::Double),
            (0, 2, BondOrder::Single),
            (2, 3, BondOrder::Single),
            (3, 4, BondOrder::Single),
            (4, 5, BondOrder::Single),
            (5, 1, BondOrder::Single),
            (5, 6, BondOrder::Single),
            (6, 7, BondOrder::Single),
            (7, 8, BondOrder::Single),
            (8, 9, BondOrder::Single),
            (9, 1, BondOrder::Single),
            (0, 10, BondOrder::Single),
        ],
    )
}

/// Two copies of `mol`, the second shifted 10 units along x.
pub(crate) fn doubled(mol: &PlacedMol) -> PlacedMol {
    let mut out = mol.clone();
    let offset = mol.atom_count();
    for a in mol.atoms() {
        let mut atom = mol.atom(a).clone();
        atom.position_2d = atom.position_2d.map(|[x, y]| [x + 10.0, y]);
        out.add_atom(atom);
    }
    for e in mol.bonds() {
        let (a, b) = mol.bond_endpoints(e).unwrap();
        out.add_bond(n(a.index() + offset), n(b.index() + offset), mol.bond(e).clone());
    }
    out
}
