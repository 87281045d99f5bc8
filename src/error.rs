//! Error types shared by the observable layer.

use thiserror::Error;

/// Failures that abort a single prediction.
///
/// A q² point outside the physical window, an integral that misses its tolerance
/// and a vanishing numerator are not errors and never show up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObservableError {
    /// An angular coefficient label outside {1s,1c,2s,2c,3,4,5,6s,6c,7,8,9}.
    #[error("angular coefficient J_{0} is not defined")]
    UnknownAngularIndex(String),

    /// P'_i only exists for i in {4, 5, 6, 8}.
    #[error("observable P'_{0} not defined")]
    UnsupportedPPrimeIndex(u8),

    /// Parameter store lookup failed.
    #[error("parameter `{0}` not found")]
    MissingParameter(String),

    /// No registry entry with that name.
    #[error("observable `{0}` is not registered")]
    UnknownObservable(String),

    /// Registry names are unique.
    #[error("observable `{0}` is already registered")]
    DuplicateObservable(String),

    /// Number of arguments does not match the declared arguments of the observable.
    #[error("observable `{name}` takes {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// F_L(1 - F_L) is not positive so P'_i has no finite value.
    #[error("P' normalisation sqrt(F_L (1 - F_L)) undefined for F_L = {0}")]
    DegeneratePolarization(f64),

    /// Raised by an amplitude provider, angular coefficient builder or mixing phase.
    #[error("collaborator failed: {0}")]
    Collaborator(String),
}

pub type Result<T> = std::result::Result<T, ObservableError>;
