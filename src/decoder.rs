//! The orchestrator: wires de-interleaving, Reed-Solomon correction, and
//! segment decoding into the single `decode` entry point, including the
//! mirrored-matrix retry fallback.
//!
//! Grounded on the teacher's `qr_decoder/payload.rs::try_decode_single`
//! (same read → deinterleave-and-correct → decode-payload pipeline), with
//! the mirror-retry loop lifted from the teacher's outer `lib.rs::detect`
//! orientation-guessing loop and narrowed to the single documented
//! transpose fallback spec.md §4.7 calls for.

use crate::debug::qr_trace;
use crate::deinterleave::BlockDeinterleaver;
use crate::error::Result;
use crate::matrix::QrMatrix;
use crate::segment::SegmentDecoder;
use crate::version::{EccLevel, Version};

/// The fully decoded result of one symbol.
#[derive(Debug, Clone)]
pub struct DecoderResult {
    pub raw_bytes: Vec<u8>,
    pub text: String,
    pub version: Version,
    pub ecc_level: EccLevel,
    /// -1 if the symbol carried no Structured Append segment.
    pub structured_append_sequence: i32,
    /// -1 if the symbol carried no Structured Append segment.
    pub structured_append_parity: i32,
}

/// Decodes a finished bit matrix (or a raw codeword stream directly) into
/// a [`DecoderResult`].
pub struct Decoder;

impl Decoder {
    /// Runs the de-interleave → correct → segment-decode pipeline directly
    /// on a raw codeword stream, bypassing matrix/mask concerns. The
    /// primary entry point for testing the core pipeline in isolation.
    pub fn decode_codewords(
        raw: &[u8],
        version: Version,
        ecc_level: EccLevel,
    ) -> Result<DecoderResult> {
        let layout = version.block_layout(ecc_level);
        let blocks = BlockDeinterleaver::split(raw, &layout)?;
        let joined = BlockDeinterleaver::correct_and_join(&blocks)?;

        let mut bits = crate::bitbuffer::BitBuffer::new(joined.clone());
        let segments = SegmentDecoder::decode(&mut bits, version)?;

        Ok(DecoderResult {
            raw_bytes: joined,
            text: segments.text,
            version,
            ecc_level,
            structured_append_sequence: segments.structured_append_sequence,
            structured_append_parity: segments.structured_append_parity,
        })
    }

    /// Full pipeline: reads codewords off `matrix`, decodes them, and
    /// retries once against a mirrored (transposed) reading of `matrix` if
    /// the first attempt fails anywhere from codeword read onward. On a
    /// second failure, the original (non-mirrored) error is surfaced.
    pub fn decode(matrix: &mut dyn QrMatrix) -> Result<DecoderResult> {
        match Self::try_decode(matrix) {
            Ok(result) => Ok(result),
            Err(original_err) => {
                qr_trace!("decode: first attempt failed ({original_err}), retrying mirrored");
                matrix.set_mirror(!matrix.mirror());
                match Self::try_decode(matrix) {
                    Ok(result) => Ok(result),
                    Err(mirrored_err) => {
                        qr_trace!("decode: mirrored attempt also failed ({mirrored_err}), surfacing original error");
                        Err(original_err)
                    }
                }
            }
        }
    }

    fn try_decode(matrix: &dyn QrMatrix) -> Result<DecoderResult> {
        let format_info = matrix.format_info();
        let version = matrix.version();
        let codewords = matrix.read_codewords()?;
        Self::decode_codewords(&codewords, version, format_info.ecc_level)
    }
}
