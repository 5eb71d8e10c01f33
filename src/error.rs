use thiserror::Error;

/// Failure of a ring or aromaticity collaborator.
///
/// The layout never propagates these; it records them in
/// [`LayoutDiagnostics`](crate::LayoutDiagnostics) and falls back to a
/// simpler placement rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PerceptionError {
    #[error("ring perception failed: {0}")]
    Rings(String),
    #[error("aromaticity perception failed: {0}")]
    Aromaticity(String),
    #[error("perception result covers {found} atoms, molecule has {expected}")]
    AtomCountMismatch { expected: usize, found: usize },
}

/// Rejected style settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error("{field} must be a finite, non-negative fraction of the bond length (got {value})")]
    InvalidFraction { field: &'static str, value: f64 },
}
