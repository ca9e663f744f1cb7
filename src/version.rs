//! Version descriptor: symbol size, total codewords, RS block layout, and
//! per-mode character-count bit widths.
//!
//! Grounded on the teacher's `decoder::tables::ec_block_info` (same
//! `ECC_CODEWORDS_PER_BLOCK` / `NUM_ERROR_CORRECTION_BLOCKS` tables, sourced
//! from the Nayuki QR Code generator's tables per the teacher's own
//! comment), but generalized to expose the explicit `(group_count,
//! data_codewords_per_block)` groups spec.md's de-interleave algorithm
//! (§4.4) needs rather than only a single uniform `(num_blocks,
//! ecc_per_block)` pair — real QR layouts mix "short" and "long" blocks
//! within a single version/level.

use crate::error::{QrDecodeError, Result};

/// Error correction level, one of L/M/Q/H (teacher's `models::qr_code::ECLevel`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EccLevel {
    /// ~7% recovery capacity.
    L,
    /// ~15% recovery capacity.
    M,
    /// ~25% recovery capacity.
    Q,
    /// ~30% recovery capacity.
    H,
}

impl EccLevel {
    /// From the 2-bit format-info field (00=L, 01=M, 10=Q, 11=H).
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0b11 {
            0 => Some(EccLevel::L),
            1 => Some(EccLevel::M),
            2 => Some(EccLevel::Q),
            3 => Some(EccLevel::H),
            _ => None,
        }
    }

    fn table_index(self) -> usize {
        match self {
            EccLevel::L => 0,
            EccLevel::M => 1,
            EccLevel::Q => 2,
            EccLevel::H => 3,
        }
    }
}

/// A QR symbol version, 1..=40.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version(u8);

impl Version {
    /// Builds a `Version`, rejecting numbers outside `1..=40`.
    pub fn new(number: u8) -> Result<Self> {
        if !(1..=40).contains(&number) {
            return Err(QrDecodeError::IllegalArgument(format!(
                "version {number} is out of range 1..=40"
            )));
        }
        Ok(Self(number))
    }

    /// The version number, 1..=40.
    pub fn number(self) -> u8 {
        self.0
    }

    /// Symbol dimension in modules: `17 + 4 * version`.
    pub fn dimension(self) -> usize {
        17 + 4 * self.0 as usize
    }

    /// Total codewords (data + ECC, across all blocks) for this version.
    pub fn total_codewords(self) -> usize {
        TOTAL_CODEWORDS[self.0 as usize - 1]
    }

    /// The RS block layout for `(self, ecc_level)`: ECC codewords per block,
    /// plus the ordered groups of `(block_count, data_codewords_per_block)`.
    pub fn block_layout(self, ecc_level: EccLevel) -> BlockLayout {
        let idx = ecc_level.table_index();
        let v = self.0 as usize;
        let ecc_per_block = ECC_CODEWORDS_PER_BLOCK[idx][v] as usize;
        let num_blocks = NUM_ERROR_CORRECTION_BLOCKS[idx][v] as usize;
        let total = self.total_codewords();
        let total_data = total - ecc_per_block * num_blocks;

        let short_len = total_data / num_blocks;
        let num_long = total_data % num_blocks;
        let num_short = num_blocks - num_long;

        let mut groups = Vec::new();
        if num_short > 0 {
            groups.push(BlockGroup {
                block_count: num_short,
                data_codewords_per_block: short_len,
            });
        }
        if num_long > 0 {
            groups.push(BlockGroup {
                block_count: num_long,
                data_codewords_per_block: short_len + 1,
            });
        }

        BlockLayout {
            ecc_codewords_per_block: ecc_per_block,
            groups,
        }
    }

    /// Character-count indicator width (bits) for `mode` at this version,
    /// per spec.md §4.6's table.
    pub fn char_count_bits(self, mode: Mode) -> usize {
        let band = match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match mode {
            Mode::Numeric => [10, 12, 14][band],
            Mode::Alphanumeric => [9, 11, 13][band],
            Mode::Byte => [8, 16, 16][band],
            Mode::Kanji => [8, 10, 12][band],
        }
    }
}

/// The four modes that carry a character-count indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
}

/// One group of identically-sized RS blocks within a version/level's layout.
#[derive(Debug, Clone, Copy)]
pub struct BlockGroup {
    pub block_count: usize,
    pub data_codewords_per_block: usize,
}

/// The full RS block layout for a `(version, ecc_level)` pair.
#[derive(Debug, Clone)]
pub struct BlockLayout {
    pub ecc_codewords_per_block: usize,
    pub groups: Vec<BlockGroup>,
}

impl BlockLayout {
    /// Total number of blocks across all groups.
    pub fn num_blocks(&self) -> usize {
        self.groups.iter().map(|g| g.block_count).sum()
    }
}

// Tables from the QR Code specification (Model 2), index [ec_level][version].
// Index 0 is unused padding (versions are 1-based).
const ECC_CODEWORDS_PER_BLOCK: [[i16; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

const NUM_ERROR_CORRECTION_BLOCKS: [[i16; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

// Total codewords per version, versions 1..=40 (index 0 is version 1).
const TOTAL_CODEWORDS: [usize; 40] = [
    26, 44, 70, 100, 134, 172, 196, 242, 292, 346, 404, 466, 532, 581, 655, 733, 815, 901, 991,
    1085, 1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185, 2323, 2465, 2611, 2761, 2876,
    3034, 3196, 3362, 3532, 3706,
];
