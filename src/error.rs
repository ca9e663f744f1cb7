//! Error taxonomy for the QR decoding core.
use thiserror::Error;

/// Errors that can surface from any stage of the decode pipeline.
///
/// Mirrors the taxonomy in the QR Code specification's error-correction and
/// bitstream layers: a raw codeword count mismatch or malformed mode
/// indicator is a [`QrDecodeError::Format`] error, an uncorrectable block is
/// a [`QrDecodeError::ReedSolomon`] error, and a detector-level failure
/// (no symbol located, geometry unrecoverable) is passed through unmodified
/// as [`QrDecodeError::Detector`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QrDecodeError {
    /// Passed through verbatim from the caller's detector stage. Callers
    /// that own image acquisition/binarization/finder-pattern detection can
    /// propagate their own error type here with `?` via `From`/`#[from]`.
    #[error("detector error: {0}")]
    Detector(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// Raw codeword count, mode indicator, ECI header, or Structured Append
    /// framing didn't match what the version/format metadata promised.
    #[error("format error: {0}")]
    Format(String),

    /// A Reed-Solomon block could not be corrected: too many errors, a
    /// locator-degree mismatch, a zero Forney denominator, or an
    /// out-of-range error position.
    #[error("reed-solomon error: {0}")]
    ReedSolomon(String),

    /// An input's shape contradicts the Version/ECC metadata describing it
    /// (a codeword stream whose length isn't exactly the block layout's
    /// data+ECC total, a zero-block layout), or a polynomial/GF(256)
    /// operation was invoked on an input for which it is mathematically
    /// undefined (e.g. `log(0)`, a negative monomial degree, division by
    /// the zero polynomial).
    #[error("illegal argument: {0}")]
    IllegalArgument(String),
}

pub(crate) type Result<T> = std::result::Result<T, QrDecodeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct FakeDetectorError;

    impl fmt::Display for FakeDetectorError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "no finder patterns located")
        }
    }

    impl std::error::Error for FakeDetectorError {}

    #[test]
    fn detector_error_converts_via_from() {
        fn caller() -> Result<()> {
            let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(FakeDetectorError);
            Err(boxed)?;
            Ok(())
        }
        let err = caller().unwrap_err();
        assert_eq!(err.to_string(), "detector error: no finder patterns located");
    }
}
