use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    #[error("grid is not square: row {row} has {len} cells, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("grid side must be greater than 2, got {side}")]
    TooSmall { side: usize },

    #[error("cell ({row}, {col}) holds {value}, which is not an allowed state")]
    InvalidCell { row: usize, col: usize, value: u8 },

    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("p_alive + p_dorm must be below 1, got {p_alive} + {p_dorm}")]
    ProbabilitiesTooLarge { p_alive: f64, p_dorm: f64 },

    #[error("decay factor must lie in [0, 1], got {0}")]
    DecayFactorOutOfRange(f64),

    #[error("grid sides differ: expected {expected}, got {actual}")]
    SideMismatch { expected: usize, actual: usize },

    #[error("`{0}` is not a rule in B/S notation")]
    InvalidRule(String),
}

/// Coarse classification of an [`AutomatonError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The initial grid was malformed. Raised at construction.
    InvalidConfiguration,

    /// A rule or probability parameter was out of range. Raised before any mutation.
    InvalidArgument,
}

impl AutomatonError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotSquare { .. } | Self::TooSmall { .. } | Self::InvalidCell { .. } => {
                ErrorKind::InvalidConfiguration
            }
            Self::ProbabilityOutOfRange { .. }
            | Self::ProbabilitiesTooLarge { .. }
            | Self::DecayFactorOutOfRange(_)
            | Self::SideMismatch { .. }
            | Self::InvalidRule(_) => ErrorKind::InvalidArgument,
        }
    }
}

/// Checks that `value` is a probability, rejecting NaN along with anything outside `[0, 1]`.
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<f64, AutomatonError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(AutomatonError::ProbabilityOutOfRange { name, value })
    }
}
