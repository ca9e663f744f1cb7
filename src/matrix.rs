//! The bit-matrix interface the detector hands to the core, plus the
//! function-pattern mask and zig-zag codeword walk used to read it.
//!
//! `FunctionMask` is ported from the teacher's `decoder::function_mask`
//! (identical finder/timing/alignment/format/version region marking).
//! The zig-zag walk and inline unmasking are grounded on the teacher's
//! `decoder::bitstream::BitstreamExtractor` and `decoder::unmask::unmask`,
//! merged into one pass that both unmasks and packs codewords, per
//! spec.md §4.7/§6's `readCodewords()` contract.

use crate::error::{QrDecodeError, Result};
use crate::models::MaskPattern;
use crate::version::{EccLevel, Version};

/// Resolved format-information fields: ECC level and data-mask pattern.
#[derive(Debug, Clone, Copy)]
pub struct FormatInfo {
    pub ecc_level: EccLevel,
    pub mask_pattern: MaskPattern,
}

/// The input contract the core consumes from the detector: a located,
/// geometry-corrected bit matrix plus resolved version/format metadata.
pub trait QrMatrix {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Module value at column `x`, row `y`. Out-of-range access is a
    /// detector bug and may panic.
    fn get(&self, x: usize, y: usize) -> bool;
    fn version(&self) -> Version;
    fn format_info(&self) -> FormatInfo;
    /// Toggles the coordinate-transpose used by the orchestrator's mirror
    /// fallback.
    fn set_mirror(&mut self, flag: bool);
    fn mirror(&self) -> bool;

    /// Walks the zig-zag data-region order, applying the data mask inline,
    /// and packs the result MSB-first into whole bytes.
    fn read_codewords(&self) -> Result<Vec<u8>> {
        let dimension = self.width();
        let func = FunctionMask::new(self.version());
        let mask = self.format_info().mask_pattern;

        let mut bits = Vec::with_capacity(dimension * dimension);
        let mut upward = true;
        let mut col = dimension as isize - 1;

        while col > 0 {
            if col == 6 {
                col -= 1;
                continue;
            }

            let row_range: Box<dyn Iterator<Item = usize>> = if upward {
                Box::new((0..dimension).rev())
            } else {
                Box::new(0..dimension)
            };

            for row in row_range {
                for &c in &[col, col - 1] {
                    if c < 0 {
                        continue;
                    }
                    let c = c as usize;
                    if func.is_function(c, row) {
                        continue;
                    }
                    let raw = self.get(c, row);
                    let value = if mask.is_masked(row, c) { !raw } else { raw };
                    bits.push(value);
                }
            }

            upward = !upward;
            col -= 2;
        }

        Ok(pack_bits_msb_first(&bits))
    }
}

fn pack_bits_msb_first(bits: &[bool]) -> Vec<u8> {
    let mut codewords = Vec::with_capacity(bits.len() / 8);
    let mut idx = 0;
    while idx + 8 <= bits.len() {
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | (bits[idx] as u8);
            idx += 1;
        }
        codewords.push(byte);
    }
    codewords
}

/// Marks which modules belong to function patterns (finders, timing,
/// alignment, format/version info, the dark module) rather than data.
pub struct FunctionMask {
    is_function: Vec<bool>,
    size: usize,
}

impl FunctionMask {
    pub fn new(version: Version) -> Self {
        let size = version.dimension();
        let mut mask = vec![false; size * size];
        let mut set = |x: usize, y: usize| {
            if x < size && y < size {
                mask[y * size + x] = true;
            }
        };

        Self::mark_finder_area(&mut set, 0, 0, size);
        Self::mark_finder_area(&mut set, size - 7, 0, size);
        Self::mark_finder_area(&mut set, 0, size - 7, size);

        for i in 0..size {
            set(6, i);
            set(i, 6);
        }

        let align = alignment_pattern_positions(version.number());
        for &cx in &align {
            for &cy in &align {
                let in_tl = cx <= 8 && cy <= 8;
                let in_tr = cx >= size - 9 && cy <= 8;
                let in_bl = cx <= 8 && cy >= size - 9;
                if in_tl || in_tr || in_bl {
                    continue;
                }
                for dy in 0..5 {
                    for dx in 0..5 {
                        let x = cx.saturating_sub(2) + dx;
                        let y = cy.saturating_sub(2) + dy;
                        set(x, y);
                    }
                }
            }
        }

        for i in 0..9 {
            if i != 6 {
                set(8, i);
                set(i, 8);
            }
        }
        for i in 0..8 {
            set(size - 1 - i, 8);
            set(8, size - 1 - i);
        }

        set(8, size - 8);

        if version.number() >= 7 {
            for dy in 0..6 {
                for dx in 0..3 {
                    set(size - 11 + dx, dy);
                    set(dx, size - 11 + dy);
                }
            }
        }

        Self {
            is_function: mask,
            size,
        }
    }

    pub fn is_function(&self, x: usize, y: usize) -> bool {
        if x >= self.size || y >= self.size {
            return true;
        }
        self.is_function[y * self.size + x]
    }

    fn mark_finder_area(set: &mut impl FnMut(usize, usize), x: usize, y: usize, size: usize) {
        let start_x = x.saturating_sub(1);
        let start_y = y.saturating_sub(1);
        let end_x = (x + 7 + 1).min(size);
        let end_y = (y + 7 + 1).min(size);
        for yy in start_y..end_y {
            for xx in start_x..end_x {
                set(xx, yy);
            }
        }
    }
}

/// Alignment pattern center coordinates for `version`, per ISO/IEC 18004.
pub fn alignment_pattern_positions(version: u8) -> Vec<usize> {
    if version == 1 {
        return Vec::new();
    }
    let num_align = (version / 7) + 2;
    let size = 17 + 4 * version as usize;
    let step = if version == 32 {
        26
    } else {
        let numerator = version as usize * 4 + num_align as usize * 2 + 1;
        let denom = (num_align as usize * 2).saturating_sub(2);
        numerator.div_ceil(denom) * 2
    };

    let mut positions = vec![0usize; num_align as usize];
    positions[0] = 6;
    let mut pos = size as isize - 7;
    for i in (1..num_align).rev() {
        positions[i as usize] = pos as usize;
        pos -= step as isize;
    }
    positions
}

/// A concrete, owned [`QrMatrix`]: a flat `Vec<bool>` of modules plus the
/// resolved version/format metadata the detector would have produced.
#[derive(Debug, Clone)]
pub struct SimpleMatrix {
    size: usize,
    modules: Vec<bool>,
    version: Version,
    format_info: FormatInfo,
    mirrored: bool,
}

impl SimpleMatrix {
    pub fn new(version: Version, format_info: FormatInfo, modules: Vec<bool>) -> Result<Self> {
        let size = version.dimension();
        if modules.len() != size * size {
            return Err(QrDecodeError::IllegalArgument(format!(
                "expected {} modules for version {}, got {}",
                size * size,
                version.number(),
                modules.len()
            )));
        }
        Ok(Self {
            size,
            modules,
            version,
            format_info,
            mirrored: false,
        })
    }
}

impl QrMatrix for SimpleMatrix {
    fn width(&self) -> usize {
        self.size
    }

    fn height(&self) -> usize {
        self.size
    }

    fn get(&self, x: usize, y: usize) -> bool {
        let (x, y) = if self.mirrored { (y, x) } else { (x, y) };
        self.modules[y * self.size + x]
    }

    fn version(&self) -> Version {
        self.version
    }

    fn format_info(&self) -> FormatInfo {
        self.format_info
    }

    fn set_mirror(&mut self, flag: bool) {
        self.mirrored = flag;
    }

    fn mirror(&self) -> bool {
        self.mirrored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_mask_marks_finder_and_timing() {
        let v1 = Version::new(1).unwrap();
        let func = FunctionMask::new(v1);
        assert!(func.is_function(0, 0));
        assert!(func.is_function(6, 10));
        assert!(func.is_function(10, 6));
        assert!(!func.is_function(10, 10));
    }

    #[test]
    fn simple_matrix_rejects_wrong_module_count() {
        let v1 = Version::new(1).unwrap();
        let fmt = FormatInfo {
            ecc_level: EccLevel::L,
            mask_pattern: MaskPattern::Pattern0,
        };
        assert!(SimpleMatrix::new(v1, fmt, vec![false; 10]).is_err());
    }

    #[test]
    fn mirror_transposes_coordinates() {
        let v1 = Version::new(1).unwrap();
        let fmt = FormatInfo {
            ecc_level: EccLevel::L,
            mask_pattern: MaskPattern::Pattern0,
        };
        let size = v1.dimension();
        let mut modules = vec![false; size * size];
        modules[1 * size + 0] = true; // (x=0, y=1)
        let mut matrix = SimpleMatrix::new(v1, fmt, modules).unwrap();
        assert!(matrix.get(0, 1));
        assert!(!matrix.get(1, 0));
        matrix.set_mirror(true);
        assert!(matrix.get(1, 0));
        assert!(!matrix.get(0, 1));
    }
}
