//! Block de-interleaving and reassembly.
//!
//! QR codewords are read off the matrix already interleaved round-robin
//! across RS blocks (data bytes first, then ECC bytes), per spec.md §4.4.
//! Grounded on the teacher's `qr_decoder/payload.rs::deinterleave_and_correct`
//! (same round-robin gather, generalized to the explicit group layout
//! [`crate::version::BlockLayout`] exposes instead of a single uniform
//! block size).

use crate::debug::qr_trace;
use crate::error::{QrDecodeError, Result};
use crate::reed_solomon::ReedSolomonDecoder;
use crate::version::BlockLayout;

/// One RS block's data and ECC codewords, read straight off the matrix
/// (not yet error-corrected).
#[derive(Debug, Clone)]
pub struct Block {
    pub data: Vec<u8>,
    pub ecc: Vec<u8>,
}

/// Splits interleaved codewords into blocks and reassembles corrected data.
pub struct BlockDeinterleaver;

impl BlockDeinterleaver {
    /// Splits `codewords` (raw, interleaved, matrix-order) into per-block
    /// `Block`s according to `layout`.
    ///
    /// Codewords are interleaved in two passes: first all data codewords,
    /// round-robin across blocks in ascending order (short blocks only
    /// contribute through their own length, long blocks keep going one
    /// extra round), then all ECC codewords, round-robin the same way.
    pub fn split(codewords: &[u8], layout: &BlockLayout) -> Result<Vec<Block>> {
        let num_blocks = layout.num_blocks();
        if num_blocks == 0 {
            return Err(QrDecodeError::IllegalArgument(
                "block layout has zero blocks".into(),
            ));
        }

        let block_data_lens: Vec<usize> = layout
            .groups
            .iter()
            .flat_map(|g| std::iter::repeat(g.data_codewords_per_block).take(g.block_count))
            .collect();
        let max_data_len = *block_data_lens.iter().max().unwrap();
        let ecc_len = layout.ecc_codewords_per_block;

        let total_data: usize = block_data_lens.iter().sum();
        let total_ecc = ecc_len * num_blocks;
        if codewords.len() != total_data + total_ecc {
            return Err(QrDecodeError::IllegalArgument(format!(
                "expected {} codewords, got {}",
                total_data + total_ecc,
                codewords.len()
            )));
        }

        let mut blocks: Vec<Block> = block_data_lens
            .iter()
            .map(|&len| Block {
                data: Vec::with_capacity(len),
                ecc: Vec::with_capacity(ecc_len),
            })
            .collect();

        let mut cursor = 0;
        for round in 0..max_data_len {
            for (b, &len) in block_data_lens.iter().enumerate() {
                if round < len {
                    blocks[b].data.push(codewords[cursor]);
                    cursor += 1;
                }
            }
        }
        for _ in 0..ecc_len {
            for block in blocks.iter_mut() {
                block.ecc.push(codewords[cursor]);
                cursor += 1;
            }
        }

        Ok(blocks)
    }

    /// Error-corrects every block and concatenates their data codewords in
    /// block order, producing the symbol's flat data-codeword stream.
    pub fn correct_and_join(blocks: &[Block]) -> Result<Vec<u8>> {
        let mut joined = Vec::new();
        for (i, block) in blocks.iter().enumerate() {
            let mut combined = block.data.clone();
            combined.extend_from_slice(&block.ecc);
            let corrected = ReedSolomonDecoder::decode(&combined, block.ecc.len()).map_err(|e| {
                qr_trace!("deinterleave: block {i} failed RS correction: {e}");
                e
            })?;
            joined.extend_from_slice(&corrected[..block.data.len()]);
        }
        Ok(joined)
    }
}
