use petgraph::graph::NodeIndex;

use crate::bond::BondOrder;
use crate::error::PerceptionError;
use crate::mol::Mol;
use crate::rings::{Ring, RingSet};
use crate::traits::{
    HasAromaticity, HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount,
};

/// Aromaticity seam used by the layout: one flag per atom, indexed by
/// `NodeIndex::index()`.
pub trait AromaticityPerception<A, B> {
    fn perceive(&self, mol: &Mol<A, B>, rings: &RingSet) -> Result<Vec<bool>, PerceptionError>;
}

/// Hückel 4n+2 rule applied to each ring of the supplied ring set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hueckel;

/// Trusts the aromatic flag already stored on each atom.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomFlags;

impl<A, B> AromaticityPerception<A, B> for Hueckel
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    fn perceive(&self, mol: &Mol<A, B>, rings: &RingSet) -> Result<Vec<bool>, PerceptionError> {
        check_ring_set(mol, rings)?;
        let mut aromatic = vec![false; mol.atom_count()];
        for ring in rings.rings() {
            if is_aromatic_ring(mol, ring) {
                for &atom in ring.atoms() {
                    aromatic[atom.index()] = true;
                }
            }
        }
        Ok(aromatic)
    }
}

impl<A: HasAromaticity, B> AromaticityPerception<A, B> for AtomFlags {
    fn perceive(&self, mol: &Mol<A, B>, _rings: &RingSet) -> Result<Vec<bool>, PerceptionError> {
        Ok(mol.atoms().map(|a| mol.atom(a).is_aromatic()).collect())
    }
}

/// Rejects ring sets that refer to atoms or bonds this molecule lacks.
fn check_ring_set<A, B>(mol: &Mol<A, B>, rings: &RingSet) -> Result<(), PerceptionError> {
    for ring in rings.rings() {
        if let Some(atom) = ring.atoms().iter().find(|a| a.index() >= mol.atom_count()) {
            return Err(PerceptionError::Aromaticity(format!(
                "ring atom {} is not in the molecule",
                atom.index()
            )));
        }
        if let Some(bond) = ring.bonds().iter().find(|b| b.index() >= mol.bond_count()) {
            return Err(PerceptionError::Aromaticity(format!(
                "ring bond {} is not in the molecule",
                bond.index()
            )));
        }
    }
    Ok(())
}

const SP2_CAPABLE: [u8; 9] = [
    5,  // B
    6,  // C
    7,  // N
    8,  // O
    15, // P
    16, // S
    33, // As
    34, // Se
    52, // Te
];

fn is_aromatic_ring<A, B>(mol: &Mol<A, B>, ring: &Ring) -> bool
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    if ring.len() < 3 {
        return false;
    }
    if ring
        .atoms()
        .iter()
        .any(|&a| !SP2_CAPABLE.contains(&mol.atom(a).atomic_num()))
    {
        return false;
    }
    if ring
        .bonds()
        .iter()
        .any(|&b| mol.bond(b).bond_order() == BondOrder::Triple)
    {
        return false;
    }

    let mut total: u8 = 0;
    for &atom in ring.atoms() {
        match pi_electrons(mol, atom, ring) {
            Some(e) => total = total.saturating_add(e),
            None => return false,
        }
    }
    is_huckel(total)
}

fn pi_electrons<A, B>(mol: &Mol<A, B>, atom_idx: NodeIndex, ring: &Ring) -> Option<u8>
where
    A: HasAtomicNum + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    let atom = mol.atom(atom_idx);
    let pi_bond = mol
        .bonds_of(atom_idx)
        .any(|e| is_pi_bond(mol.bond(e).bond_order()));
    let pi_bond_in_ring = ring
        .neighbors_of(atom_idx)?
        .iter()
        .filter_map(|&nb| mol.bond_between(atom_idx, nb))
        .any(|e| is_pi_bond(mol.bond(e).bond_order()));
    let total_degree = mol.degree(atom_idx) + atom.hydrogen_count() as usize;

    match (atom.atomic_num(), atom.formal_charge()) {
        (6, 0) => pi_bond.then_some(1),
        (6, -1) => Some(2),
        (6, 1) => Some(if pi_bond { 1 } else { 0 }),
        (7, 0) | (15, 0) | (33, 0) => {
            if pi_bond {
                Some(1)
            } else if total_degree <= 3 {
                Some(2)
            } else {
                None
            }
        }
        (7, 1) => pi_bond_in_ring.then_some(1),
        (8 | 16 | 34 | 52, _) => Some(if pi_bond_in_ring { 1 } else { 2 }),
        (5, _) => Some(if pi_bond { 1 } else { 0 }),
        _ => None,
    }
}

fn is_pi_bond(order: BondOrder) -> bool {
    matches!(order, BondOrder::Double | BondOrder::Aromatic)
}

fn is_huckel(pi_electrons: u8) -> bool {
    pi_electrons >= 2 && (pi_electrons - 2) % 4 == 0
}
