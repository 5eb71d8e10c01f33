use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::element;
use crate::geometry::Point;
use crate::traits::{HasAtomicNum, HasPosition2D};

/// Molecular graph consumed by the depiction.
///
/// Atoms and bonds are addressed by petgraph's stable integer indices, which
/// the layout uses directly as keys into its shape tables.
pub struct Mol<A, B> {
    graph: UnGraph<A, B>,
}

impl<A, B> Mol<A, B> {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
        }
    }

    pub fn graph(&self) -> &UnGraph<A, B> {
        &self.graph
    }

    pub fn atom(&self, idx: NodeIndex) -> &A {
        &self.graph[idx]
    }

    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut A {
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &B {
        &self.graph[idx]
    }

    pub fn bond_mut(&mut self, idx: EdgeIndex) -> &mut B {
        &mut self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: A) -> NodeIndex {
        self.graph.add_node(atom)
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: B) -> EdgeIndex {
        self.graph.add_edge(a, b, bond)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    /// Number of bonds incident to `idx`.
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges(idx).count()
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    /// Endpoints in the order the bond was added.
    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// Neighbors of `atom` other than `partner`: the substituents `atom`
    /// carries relative to the bond `atom`–`partner`.
    pub fn substituents(&self, atom: NodeIndex, partner: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors(atom).filter(|&n| n != partner).collect()
    }
}

impl<A: HasAtomicNum, B> Mol<A, B> {
    /// Element symbol drawn for `idx`.
    pub fn symbol(&self, idx: NodeIndex) -> &'static str {
        element::symbol(self.atom(idx).atomic_num())
    }
}

impl<A: HasPosition2D, B> Mol<A, B> {
    /// Screen-space position of every atom, indexed by `NodeIndex::index()`.
    pub fn screen_positions(&self) -> Vec<Point> {
        self.atoms().map(|idx| self.atom(idx).screen_position()).collect()
    }

    /// Whether every atom has 2-D coordinates.
    pub fn has_coordinates(&self) -> bool {
        self.atoms().all(|idx| self.atom(idx).position_2d().is_some())
    }
}

impl<A: Clone, B: Clone> Clone for Mol<A, B> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
        }
    }
}

impl<A, B> Default for Mol<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: std::fmt::Debug, B: std::fmt::Debug> std::fmt::Debug for Mol<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mol")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .finish()
    }
}
