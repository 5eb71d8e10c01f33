pub mod aromaticity;
pub mod atom;
pub mod bond;
pub mod element;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod mol;
pub mod render;
pub mod rings;
pub mod style;
pub mod svg;
pub mod traits;
pub mod viewport;
pub mod wrappers;

pub use aromaticity::{AromaticityPerception, AtomFlags, Hueckel};
pub use atom::Atom;
pub use bond::{Bond, BondOrder};
pub use error::{PerceptionError, StyleError};
pub use geometry::{
    angle, distance, shorten_toward_center, signed_offset, translate_perpendicular, trim_to_rect,
    Line, Point, Rect,
};
pub use layout::{
    classify, AtomShape, BondShape, Layout, LayoutDiagnostics, Placement, Side, Substitution,
};
pub use mol::Mol;
pub use render::{Depictor, DepictorState, LineCap, LineJoin, Stroke, Surface};
pub use rings::{Ring, RingFinder, RingSet, Sssr};
pub use style::{Color, ColorScheme, StyleConfig};
pub use svg::{render_svg, SvgSurface};
pub use traits::{
    HasAromaticity, HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount, HasPosition2D,
};
pub use viewport::Viewport;
pub use wrappers::WithPosition2D;

#[cfg(test)]
mod fixtures;
