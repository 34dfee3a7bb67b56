//! Error types for the stratified error calculator.

use thiserror::Error;

/// Why a set of inputs was rejected.
///
/// Every reason is detected before any division takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInputReason {
    /// Σ n_h is zero.
    NoSamples,
    /// Stratum `index` (flat, region-major) has n_h = 0.
    ZeroSampleStratum {
        /// Flat stratum index.
        index: usize,
    },
    /// Total population N is zero.
    EmptyPopulation,
    /// `n` and `N_h` have different lengths.
    LengthMismatch {
        /// Length of the sample sequence.
        samples: usize,
        /// Length of the stratum population sequence.
        populations: usize,
    },
}

impl InvalidInputReason {
    /// Stable short identifier.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoSamples => "no samples",
            Self::ZeroSampleStratum { .. } => "zero-sample stratum",
            Self::EmptyPopulation => "empty population",
            Self::LengthMismatch { .. } => "length mismatch",
        }
    }
}

/// Errors produced by the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Rejected input. Always recoverable by correcting the input.
    #[error("invalid input: {}", .0.code())]
    InvalidInput(InvalidInputReason),
}

impl CalcError {
    /// The rejection reason.
    pub const fn reason(&self) -> InvalidInputReason {
        match self {
            Self::InvalidInput(reason) => *reason,
        }
    }
}

/// Result type for calculator operations.
pub type CalcResult<T> = Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_reason_code() {
        let err = CalcError::InvalidInput(InvalidInputReason::ZeroSampleStratum { index: 3 });
        assert_eq!(err.to_string(), "invalid input: zero-sample stratum");
        assert_eq!(
            CalcError::InvalidInput(InvalidInputReason::NoSamples).to_string(),
            "invalid input: no samples"
        );
    }

    #[test]
    fn reason_round_trips() {
        let reason = InvalidInputReason::LengthMismatch {
            samples: 2,
            populations: 3,
        };
        assert_eq!(CalcError::InvalidInput(reason).reason(), reason);
    }
}
