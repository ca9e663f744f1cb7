//! Small shared value types: the eight QR data-mask patterns.
//!
//! Ported verbatim from the teacher's `models::qr_code::MaskPattern` — the
//! mask formulas are fixed by the QR Code specification and don't change
//! under this rework.

/// One of the eight data-mask patterns a QR symbol may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskPattern {
    /// (i + j) % 2 == 0
    Pattern0 = 0,
    /// i % 2 == 0
    Pattern1 = 1,
    /// j % 3 == 0
    Pattern2 = 2,
    /// (i + j) % 3 == 0
    Pattern3 = 3,
    /// (i/2 + j/3) % 2 == 0
    Pattern4 = 4,
    /// (i*j)%2 + (i*j)%3 == 0
    Pattern5 = 5,
    /// ((i*j)%2 + (i*j)%3) % 2 == 0
    Pattern6 = 6,
    /// ((i+j)%2 + (i*j)%3) % 2 == 0
    Pattern7 = 7,
}

impl MaskPattern {
    /// Parses the 3-bit mask-pattern field from format info.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x07 {
            0 => Some(MaskPattern::Pattern0),
            1 => Some(MaskPattern::Pattern1),
            2 => Some(MaskPattern::Pattern2),
            3 => Some(MaskPattern::Pattern3),
            4 => Some(MaskPattern::Pattern4),
            5 => Some(MaskPattern::Pattern5),
            6 => Some(MaskPattern::Pattern6),
            7 => Some(MaskPattern::Pattern7),
            _ => None,
        }
    }

    /// True if the module at (row `i`, column `j`) should be flipped.
    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (i + j) % 2 == 0,
            MaskPattern::Pattern1 => i % 2 == 0,
            MaskPattern::Pattern2 => j % 3 == 0,
            MaskPattern::Pattern3 => (i + j) % 3 == 0,
            MaskPattern::Pattern4 => (i / 2 + j / 3) % 2 == 0,
            MaskPattern::Pattern5 => ((i * j) % 2 + (i * j) % 3) == 0,
            MaskPattern::Pattern6 => (((i * j) % 2) + ((i * j) % 3)) % 2 == 0,
            MaskPattern::Pattern7 => (((i + j) % 2) + ((i * j) % 3)) % 2 == 0,
        }
    }
}
