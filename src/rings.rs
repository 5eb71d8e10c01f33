use std::collections::VecDeque;

use petgraph::algo::connected_components;
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::error::PerceptionError;
use crate::mol::Mol;

/// One ring: its atoms in cycle order and the bonds joining them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    atoms: Vec<NodeIndex>,
    bonds: Vec<EdgeIndex>,
}

impl Ring {
    /// Builds a ring from an atom cycle; `None` if consecutive atoms are not bonded.
    pub fn from_cycle<A, B>(mol: &Mol<A, B>, atoms: Vec<NodeIndex>) -> Option<Self> {
        if atoms.len() < 3 {
            return None;
        }
        let len = atoms.len();
        let bonds = (0..len)
            .map(|i| mol.bond_between(atoms[i], atoms[(i + 1) % len]))
            .collect::<Option<Vec<_>>>()?;
        Some(Self { atoms, bonds })
    }

    pub fn atoms(&self) -> &[NodeIndex] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[EdgeIndex] {
        &self.bonds
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains_atom(&self, atom: NodeIndex) -> bool {
        self.atoms.contains(&atom)
    }

    pub fn contains_bond(&self, bond: EdgeIndex) -> bool {
        self.bonds.contains(&bond)
    }

    /// The two atoms adjacent to `atom` along the cycle.
    pub fn neighbors_of(&self, atom: NodeIndex) -> Option<[NodeIndex; 2]> {
        let len = self.atoms.len();
        let pos = self.atoms.iter().position(|&a| a == atom)?;
        Some([self.atoms[(pos + len - 1) % len], self.atoms[(pos + 1) % len]])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingSet {
    rings: Vec<Ring>,
}

impl RingSet {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// Smallest set of smallest rings.
    pub fn sssr<A, B>(mol: &Mol<A, B>) -> Self {
        let expected = Self::expected_ring_count(mol);
        if expected == 0 {
            return Self::default();
        }

        let mut basis = CycleBasis::new(mol.bond_count());
        let mut rings = Vec::with_capacity(expected);
        for cycle in shortest_cycles(mol) {
            if rings.len() >= expected {
                break;
            }
            let Some(ring) = Ring::from_cycle(mol, cycle) else {
                continue;
            };
            if basis.insert(ring.bonds()) {
                rings.push(ring);
            }
        }
        Self { rings }
    }

    /// Cyclomatic number `E - V + C`.
    pub fn expected_ring_count<A, B>(mol: &Mol<A, B>) -> usize {
        let v = mol.atom_count();
        let e = mol.bond_count();
        let c = connected_components(mol.graph());
        (e + c).saturating_sub(v)
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn contains_bond(&self, bond: EdgeIndex) -> bool {
        self.rings.iter().any(|r| r.contains_bond(bond))
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.rings.iter().any(|r| r.contains_atom(atom))
    }

    pub fn rings_containing(&self, atom: NodeIndex) -> impl Iterator<Item = &Ring> + '_ {
        self.rings.iter().filter(move |r| r.contains_atom(atom))
    }

    pub fn smallest_ring_size(&self, atom: NodeIndex) -> Option<usize> {
        self.rings_containing(atom).map(Ring::len).min()
    }
}

/// Ring perception seam used by the layout.
pub trait RingFinder<A, B> {
    fn find_rings(&self, mol: &Mol<A, B>) -> Result<RingSet, PerceptionError>;
}

/// Finds the SSSR with [`RingSet::sssr`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sssr;

impl<A, B> RingFinder<A, B> for Sssr {
    fn find_rings(&self, mol: &Mol<A, B>) -> Result<RingSet, PerceptionError> {
        Ok(RingSet::sssr(mol))
    }
}

/// Candidate cycles: for every root atom and every bond, the two shortest
/// paths from the root to the bond's ends closed by the bond, kept when the
/// paths meet only at the root. Sorted smallest first.
fn shortest_cycles<A, B>(mol: &Mol<A, B>) -> Vec<Vec<NodeIndex>> {
    let n = mol.atom_count();
    let mut cycles = Vec::new();

    for root in mol.atoms() {
        let (dist, pred) = bfs_tree(mol, root, n);
        for bond in mol.bonds() {
            let Some((u, v)) = mol.bond_endpoints(bond) else {
                continue;
            };
            let (Some(du), Some(dv)) = (dist[u.index()], dist[v.index()]) else {
                continue;
            };
            if du + dv + 1 < 3 {
                continue;
            }
            let to_u = tree_path(&pred, root, u);
            let to_v = tree_path(&pred, root, v);
            if to_u[1..].iter().any(|a| to_v[1..].contains(a)) {
                continue;
            }
            let mut cycle = to_u;
            cycle.extend(to_v[1..].iter().rev());
            cycles.push(normalize_cycle(cycle));
        }
    }

    cycles.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    cycles.dedup();
    cycles
}

fn bfs_tree<A, B>(
    mol: &Mol<A, B>,
    root: NodeIndex,
    n: usize,
) -> (Vec<Option<usize>>, Vec<Option<NodeIndex>>) {
    let mut dist = vec![None; n];
    let mut pred = vec![None; n];
    dist[root.index()] = Some(0);
    let mut queue = VecDeque::from([(root, 0usize)]);
    while let Some((cur, d)) = queue.pop_front() {
        for nb in mol.neighbors(cur) {
            if dist[nb.index()].is_none() {
                dist[nb.index()] = Some(d + 1);
                pred[nb.index()] = Some(cur);
                queue.push_back((nb, d + 1));
            }
        }
    }
    (dist, pred)
}

/// Path root → target through the BFS predecessor tree.
fn tree_path(pred: &[Option<NodeIndex>], root: NodeIndex, target: NodeIndex) -> Vec<NodeIndex> {
    let mut path = vec![target];
    let mut cur = target;
    while cur != root {
        match pred[cur.index()] {
            Some(p) => {
                path.push(p);
                cur = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Rotates the cycle to start at its lowest index and walks toward the
/// lower of the two neighbors.
fn normalize_cycle(cycle: Vec<NodeIndex>) -> Vec<NodeIndex> {
    let len = cycle.len();
    let Some(start) = (0..len).min_by_key(|&i| cycle[i]) else {
        return cycle;
    };
    let mut out: Vec<NodeIndex> = (0..len).map(|i| cycle[(start + i) % len]).collect();
    if len > 2 && out[1] > out[len - 1] {
        out[1..].reverse();
    }
    out
}

/// Incremental GF(2) row reduction over bond-incidence vectors.
struct CycleBasis {
    words: usize,
    rows: Vec<(usize, Vec<u64>)>,
}

impl CycleBasis {
    fn new(bond_count: usize) -> Self {
        Self {
            words: bond_count.div_ceil(64).max(1),
            rows: Vec::new(),
        }
    }

    /// Adds the cycle if it is independent of those already present.
    fn insert(&mut self, bonds: &[EdgeIndex]) -> bool {
        let mut v = vec![0u64; self.words];
        for b in bonds {
            let i = b.index();
            v[i / 64] ^= 1u64 << (i % 64);
        }
        for (pivot, row) in &self.rows {
            if v[pivot / 64] & (1u64 << (pivot % 64)) != 0 {
                for (w, r) in v.iter_mut().zip(row) {
                    *w ^= r;
                }
            }
        }
        let pivot = v
            .iter()
            .enumerate()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * 64 + w.trailing_zeros() as usize);
        match pivot {
            Some(p) => {
                self.rows.push((p, v));
                true
            }
            None => false,
        }
    }
}
