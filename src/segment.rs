//! Segment decoder: dispatches the 4-bit mode indicator and accumulates
//! the decoded text and raw data bytes across the whole bitstream.
//!
//! Grounded on the teacher's `qr_decoder/payload.rs::decode_payload_from_bits`
//! (same per-mode match arms and `BitReader`), generalized to a real ECI
//! charset table (instead of "parse and ignore"), Structured Append, and
//! FNC1 handling, and rebuilt on [`BitBuffer`] instead of a pre-expanded
//! `Vec<bool>`.

use encoding_rs::{SHIFT_JIS, WINDOWS_1252};

use crate::bitbuffer::BitBuffer;
use crate::debug::qr_trace;
use crate::eci::EciDesignator;
use crate::error::{QrDecodeError, Result};
use crate::version::{Mode, Version};

const ALPHANUMERIC_TABLE: [u8; 45] = *b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Accumulated result of decoding one symbol's data-codeword stream.
#[derive(Debug, Clone, Default)]
pub struct SegmentDecodeResult {
    pub text: String,
    /// -1 if no Structured Append segment was seen.
    pub structured_append_sequence: i32,
    /// -1 if no Structured Append segment was seen.
    pub structured_append_parity: i32,
}

/// Dispatches QR mode indicators against a [`BitBuffer`], building up text.
pub struct SegmentDecoder;

impl SegmentDecoder {
    /// Decodes every segment in `bits` until the terminator or bit-exhaustion.
    pub fn decode(bits: &mut BitBuffer, version: Version) -> Result<SegmentDecodeResult> {
        let mut result = SegmentDecodeResult {
            structured_append_sequence: -1,
            structured_append_parity: -1,
            ..Default::default()
        };
        let mut current_charset: Option<&'static str> = None;

        while bits.available() >= 4 {
            let mode_bits = bits.read(4)?;
            qr_trace!("segment: dispatching mode 0b{mode_bits:04b}");
            match mode_bits {
                0b0000 => break, // TERMINATOR
                0b0001 => Self::decode_numeric(bits, version, &mut result)?,
                0b0010 => Self::decode_alphanumeric(bits, version, &mut result)?,
                0b0011 => {
                    if bits.available() < 16 {
                        return Err(QrDecodeError::Format(
                            "truncated Structured Append segment".into(),
                        ));
                    }
                    result.structured_append_sequence = bits.read(8)? as i32;
                    result.structured_append_parity = bits.read(8)? as i32;
                }
                0b0100 => Self::decode_byte(bits, version, &mut result, &mut current_charset)?,
                0b0101 | 0b1001 => {
                    // FNC1 (first/second position): markers are preserved as
                    // inert, payload decoding proceeds unchanged.
                }
                0b0111 => {
                    let eci = EciDesignator::parse(bits)?;
                    current_charset = eci.charset;
                }
                0b1000 => Self::decode_kanji(bits, version, &mut result)?,
                other => {
                    return Err(QrDecodeError::Format(format!(
                        "unsupported or invalid mode indicator 0b{other:04b}"
                    )))
                }
            }
        }

        Ok(result)
    }

    fn decode_numeric(
        bits: &mut BitBuffer,
        version: Version,
        result: &mut SegmentDecodeResult,
    ) -> Result<()> {
        let count_bits = version.char_count_bits(Mode::Numeric);
        let mut remaining = bits.read(count_bits)? as usize;
        while remaining > 0 {
            let group = remaining.min(3);
            let width = match group {
                3 => 10,
                2 => 7,
                1 => 4,
                _ => unreachable!(),
            };
            let value = bits.read(width)?;
            let digits = match group {
                3 => format!("{value:03}"),
                2 => format!("{value:02}"),
                1 => format!("{value}"),
                _ => unreachable!(),
            };
            result.text.push_str(&digits);
            remaining -= group;
        }
        Ok(())
    }

    fn decode_alphanumeric(
        bits: &mut BitBuffer,
        version: Version,
        result: &mut SegmentDecodeResult,
    ) -> Result<()> {
        let count_bits = version.char_count_bits(Mode::Alphanumeric);
        let mut remaining = bits.read(count_bits)? as usize;
        while remaining >= 2 {
            let value = bits.read(11)?;
            let first = (value / 45) as usize;
            let second = (value % 45) as usize;
            Self::push_alphanumeric(result, first)?;
            Self::push_alphanumeric(result, second)?;
            remaining -= 2;
        }
        if remaining == 1 {
            let value = bits.read(6)? as usize;
            Self::push_alphanumeric(result, value)?;
        }
        Ok(())
    }

    fn push_alphanumeric(result: &mut SegmentDecodeResult, index: usize) -> Result<()> {
        if index >= ALPHANUMERIC_TABLE.len() {
            return Err(QrDecodeError::Format(format!(
                "alphanumeric value {index} outside the 45-character table"
            )));
        }
        let c = ALPHANUMERIC_TABLE[index];
        result.text.push(c as char);
        Ok(())
    }

    fn decode_byte(
        bits: &mut BitBuffer,
        version: Version,
        result: &mut SegmentDecodeResult,
        current_charset: &mut Option<&'static str>,
    ) -> Result<()> {
        let count_bits = version.char_count_bits(Mode::Byte);
        let count = bits.read(count_bits)? as usize;
        let mut raw_bytes = Vec::with_capacity(count);
        for _ in 0..count {
            raw_bytes.push(bits.read(8)? as u8);
        }

        let text = decode_byte_segment(&raw_bytes, *current_charset);
        result.text.push_str(&text);
        *current_charset = None;
        Ok(())
    }

    fn decode_kanji(
        bits: &mut BitBuffer,
        version: Version,
        result: &mut SegmentDecodeResult,
    ) -> Result<()> {
        let count_bits = version.char_count_bits(Mode::Kanji);
        let count = bits.read(count_bits)? as usize;
        let mut sjis_bytes = Vec::with_capacity(count * 2);
        for _ in 0..count {
            let unit = bits.read(13)?;
            let (b1, b2) = if unit < 0x1F00 {
                ((unit / 0xC0) + 0x81, (unit % 0xC0) + 0x40)
            } else {
                (
                    ((unit - 0x1F00) / 0xC0) + 0xE0,
                    ((unit - 0x1F00) % 0xC0) + 0x40,
                )
            };
            sjis_bytes.push(b1 as u8);
            sjis_bytes.push(b2 as u8);
        }
        let (decoded, _, _) = SHIFT_JIS.decode(&sjis_bytes);
        result.text.push_str(&decoded);
        Ok(())
    }
}

/// Decodes a Byte segment's raw bytes into text, honoring an explicit ECI
/// charset when present and otherwise voting among {UTF-8, Shift_JIS,
/// ISO-8859-1}, per spec.md §9's charset-detection note.
fn decode_byte_segment(raw: &[u8], charset: Option<&'static str>) -> String {
    match charset {
        Some("UTF-8") => String::from_utf8_lossy(raw).into_owned(),
        Some("Shift_JIS") => SHIFT_JIS.decode(raw).0.into_owned(),
        Some("ISO-8859-1") => WINDOWS_1252.decode(raw).0.into_owned(),
        Some("CP437") => crate::cp437::decode(raw),
        Some(_) | None => detect_and_decode(raw),
    }
}

fn detect_and_decode(raw: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(raw) {
        return s.to_string();
    }
    let (sjis_decoded, _, sjis_had_errors) = SHIFT_JIS.decode(raw);
    if !sjis_had_errors {
        return sjis_decoded.into_owned();
    }
    WINDOWS_1252.decode(raw).0.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitbuffer_from_bits(bits: &[u8]) -> BitBuffer {
        let mut bytes = vec![0u8; bits.len().div_ceil(8)];
        for (i, &b) in bits.iter().enumerate() {
            if b != 0 {
                bytes[i / 8] |= 1 << (7 - (i % 8));
            }
        }
        BitBuffer::new(bytes)
    }

    fn bits_for(value: u32, width: usize) -> Vec<u8> {
        (0..width)
            .rev()
            .map(|i| ((value >> i) & 1) as u8)
            .collect()
    }

    #[test]
    fn decodes_numeric_segment() {
        let v1 = Version::new(1).unwrap();
        let mut bit_vec = vec![0, 0, 0, 1]; // mode NUMERIC
        bit_vec.extend(bits_for(8, v1.char_count_bits(Mode::Numeric))); // count=8
        bit_vec.extend(bits_for(12, 10)); // "012"
        bit_vec.extend(bits_for(345, 10)); // "345"
        bit_vec.extend(bits_for(67, 7)); // "67"
        bit_vec.extend([0, 0, 0, 0]); // terminator
        let mut bits = bitbuffer_from_bits(&bit_vec);
        let result = SegmentDecoder::decode(&mut bits, v1).unwrap();
        assert_eq!(result.text, "01234567");
        assert_eq!(result.structured_append_sequence, -1);
    }

    #[test]
    fn decodes_alphanumeric_segment_with_odd_length() {
        let v1 = Version::new(1).unwrap();
        let mut bit_vec = vec![0, 0, 1, 0]; // mode ALPHANUMERIC
        bit_vec.extend(bits_for(5, v1.char_count_bits(Mode::Alphanumeric))); // count=5 ("AC-42")
                                                                              // "AC" -> 10*45+12 = 462
        bit_vec.extend(bits_for(462, 11));
        // "-4" -> 41*45+4 = 1849
        bit_vec.extend(bits_for(1849, 11));
        // "2" -> single char, index 2
        bit_vec.extend(bits_for(2, 6));
        let mut bits = bitbuffer_from_bits(&bit_vec);
        let result = SegmentDecoder::decode(&mut bits, v1).unwrap();
        assert_eq!(result.text, "AC-42");
    }

    #[test]
    fn decodes_structured_append_then_numeric() {
        let v1 = Version::new(1).unwrap();
        let mut bit_vec = vec![0, 0, 1, 1]; // STRUCTURED_APPEND
        bit_vec.extend(bits_for(0x13, 8));
        bit_vec.extend(bits_for(0xAB, 8));
        bit_vec.extend([0, 0, 0, 1]); // NUMERIC
        bit_vec.extend(bits_for(2, v1.char_count_bits(Mode::Numeric)));
        bit_vec.extend(bits_for(42, 7));
        let mut bits = bitbuffer_from_bits(&bit_vec);
        let result = SegmentDecoder::decode(&mut bits, v1).unwrap();
        assert_eq!(result.text, "42");
        assert_eq!(result.structured_append_sequence, 0x13);
        assert_eq!(result.structured_append_parity, 0xAB);
    }

    #[test]
    fn decodes_byte_segment_with_eci_utf8() {
        let v1 = Version::new(1).unwrap();
        let payload = "h\u{e9}llo".as_bytes().to_vec(); // "héllo"
        let mut bit_vec = vec![0, 1, 1, 1]; // ECI
        bit_vec.extend(bits_for(26, 8)); // id 26 = UTF-8, 1-byte form
        bit_vec.extend([0, 1, 0, 0]); // BYTE
        bit_vec.extend(bits_for(payload.len() as u32, v1.char_count_bits(Mode::Byte)));
        for b in &payload {
            bit_vec.extend(bits_for(*b as u32, 8));
        }
        let mut bits = bitbuffer_from_bits(&bit_vec);
        let result = SegmentDecoder::decode(&mut bits, v1).unwrap();
        assert_eq!(result.text, "h\u{e9}llo");
    }

    #[test]
    fn rejects_unknown_mode_indicator() {
        let v1 = Version::new(1).unwrap();
        let bit_vec = vec![1, 1, 0, 1]; // 0b1101: Hanzi, unsupported
        let mut bits = bitbuffer_from_bits(&bit_vec);
        assert!(SegmentDecoder::decode(&mut bits, v1).is_err());
    }

    #[test]
    fn fnc1_markers_are_inert() {
        let v1 = Version::new(1).unwrap();
        let mut bit_vec = vec![0, 1, 0, 1]; // FNC1_FIRST
        bit_vec.extend([0, 0, 0, 1]); // NUMERIC
        bit_vec.extend(bits_for(1, v1.char_count_bits(Mode::Numeric)));
        bit_vec.extend(bits_for(7, 4));
        let mut bits = bitbuffer_from_bits(&bit_vec);
        let result = SegmentDecoder::decode(&mut bits, v1).unwrap();
        assert_eq!(result.text, "7");
    }
}
