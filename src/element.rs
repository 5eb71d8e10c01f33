//! Element symbols for atom labels.

/// Label printed for atoms whose atomic number is outside 1–118.
pub const UNKNOWN_SYMBOL: &str = "*";

/// Atomic number of carbon, the one element drawn without a label.
pub const CARBON: u8 = 6;

/// Element symbol for `atomic_num`, or [`UNKNOWN_SYMBOL`].
pub fn symbol(atomic_num: u8) -> &'static str {
    match atomic_num {
        1..=118 => SYMBOLS[atomic_num as usize - 1],
        _ => UNKNOWN_SYMBOL,
    }
}

/// Atomic number for an exact (case-sensitive) element symbol.
pub fn atomic_num(symbol: &str) -> Option<u8> {
    SYMBOLS
        .iter()
        .position(|&s| s == symbol)
        .map(|i| i as u8 + 1)
}

static SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca",
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr",
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn",
    "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd",
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th",
    "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm",
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];
