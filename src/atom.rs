/// Default atom type for a molecular graph node.
///
/// `Atom` stores the intrinsic properties read off a structural formula.
/// Coordinates are not part of it; wrap it in
/// [`WithPosition2D`](crate::WithPosition2D) to give it a place on the page.
///
/// # Examples
///
/// ```
/// use chemcrab_depict::Atom;
///
/// let oxygen = Atom::new(8);
/// assert_eq!(oxygen.atomic_num, 8);
/// assert!(!oxygen.is_aromatic);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Atom {
    /// Atomic number (1 = H, 6 = C, 7 = N, …). `0` is an unknown/dummy atom.
    pub atomic_num: u8,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Number of implicit hydrogens. Only consulted by aromaticity perception.
    pub hydrogen_count: u8,
    /// Precomputed aromaticity flag, read by [`AtomFlags`](crate::AtomFlags).
    pub is_aromatic: bool,
}

impl Atom {
    pub fn new(atomic_num: u8) -> Self {
        Self {
            atomic_num,
            ..Self::default()
        }
    }

    /// Builds an atom from an element symbol, `None` if the symbol is unknown.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        crate::element::atomic_num(symbol).map(Self::new)
    }
}

impl crate::traits::HasAtomicNum for Atom {
    fn atomic_num(&self) -> u8 {
        self.atomic_num
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i8 {
        self.formal_charge
    }
}

impl crate::traits::HasHydrogenCount for Atom {
    fn hydrogen_count(&self) -> u8 {
        self.hydrogen_count
    }
}

impl crate::traits::HasAromaticity for Atom {
    fn is_aromatic(&self) -> bool {
        self.is_aromatic
    }
}
