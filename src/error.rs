use thiserror::Error;

/// Errors surfaced by the ballistics core.
///
/// Interpolation queries never error: out-of-range lookups clamp to the
/// nearest endpoint and lookups on an empty trajectory return `None`. The
/// only hard failure is indexed access past the end of a trajectory.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BallisticsError {
    /// Indexed access into a trajectory's point list past its end.
    #[error("trajectory point index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Relative humidity outside the accepted [0, 1] range.
    #[error("humidity must be within 0.0..=1.0, got {0}")]
    InvalidHumidity(f64),

    /// A dispersion parameter that cannot form a valid distribution,
    /// e.g. a negative standard deviation.
    #[error("invalid dispersion parameter: {0}")]
    InvalidDispersion(String),
}

pub type Result<T> = std::result::Result<T, BallisticsError>;
