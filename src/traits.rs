use crate::bond::BondOrder;
use crate::geometry::Point;

/// Element of an atom; decides whether it gets a label and which colour.
pub trait HasAtomicNum {
    fn atomic_num(&self) -> u8;
}

pub trait HasFormalCharge {
    fn formal_charge(&self) -> i8;
}

pub trait HasHydrogenCount {
    fn hydrogen_count(&self) -> u8;
}

/// Precomputed aromaticity, read by [`AtomFlags`](crate::AtomFlags).
pub trait HasAromaticity {
    fn is_aromatic(&self) -> bool;
}

/// Source 2-D coordinates, y-axis pointing up (molfile convention).
pub trait HasPosition2D {
    fn position_2d(&self) -> Option<[f64; 2]>;
    fn set_position_2d(&mut self, pos: Option<[f64; 2]>);

    /// Position on a y-down drawing surface. Atoms without coordinates sit
    /// at the origin.
    fn screen_position(&self) -> Point {
        match self.position_2d() {
            Some([x, y]) => Point::new(x, -y),
            None => Point::ZERO,
        }
    }
}

pub trait HasBondOrder {
    fn bond_order(&self) -> BondOrder;
}
