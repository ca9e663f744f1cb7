//! RustQR decoder core: reconstructs a QR Code symbol's payload from a
//! rectilinear matrix of binary modules, performing Reed-Solomon error
//! correction and segmented bitstream decoding per ISO/IEC 18004.
//!
//! Image acquisition, binarization, finder-pattern detection and
//! perspective correction are external collaborators' concerns: this
//! crate consumes a completed [`matrix::QrMatrix`] (or, for callers that
//! already have raw codewords, skips straight to
//! [`decoder::Decoder::decode_codewords`]) and returns a
//! [`decoder::DecoderResult`].

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Code Page 437 decode table, for ECI ids 0/2.
pub(crate) mod cp437;
/// Debug helpers (env-driven, `QR_DEBUG=1`).
pub(crate) mod debug;
/// The orchestrator: wires de-interleaving, RS correction, and segment
/// decoding into `decode`/`decode_codewords`, including the mirrored-matrix
/// retry.
pub mod decoder;
/// Block de-interleaving: raw interleaved codewords -> per-block byte arrays.
pub mod deinterleave;
/// MSB-first bit cursor over a byte vector.
pub mod bitbuffer;
/// ECI designator parsing and the ECI-id -> charset table.
pub mod eci;
/// The core's error taxonomy.
pub mod error;
/// GF(256) arithmetic and the `GenericGFPoly` polynomial type.
pub mod gf256;
/// The bit-matrix interface consumed from the detector, plus the
/// function-pattern mask and zig-zag codeword walk.
pub mod matrix;
/// Small shared value types (data-mask patterns).
pub mod models;
/// Syndrome-based Reed-Solomon error correction over GF(256).
pub mod reed_solomon;
/// Segment decoder: dispatches QR mode indicators and accumulates text.
pub mod segment;
/// Version descriptor: dimensions, RS block layout, char-count bit widths.
pub mod version;

pub use decoder::{Decoder, DecoderResult};
pub use error::QrDecodeError;
pub use matrix::{FormatInfo, QrMatrix, SimpleMatrix};
pub use models::MaskPattern;
pub use version::{EccLevel, Mode, Version};
