//! Code Page 437 (the original IBM PC OEM charset), used by ECI ids 0 and 2
//! (`src/eci.rs`). `encoding_rs` only ships Unicode-era encodings, not DOS
//! code pages, so the upper half of the table (0x80-0xFF) is transcribed
//! here directly from the IBM CP437 standard; 0x00-0x7F is plain ASCII.

const UPPER_HALF: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', 'É', 'æ', 'Æ',
    'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ', 'á', 'í', 'ó', 'ú', 'ñ', 'Ñ',
    'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»', '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕',
    '╣', '║', '╗', '╝', '╜', '╛', '┐', '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦',
    '╠', '═', '╬', '╧', '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐',
    '▀', 'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩', '≡', '±',
    '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{00A0}',
];

/// Decodes `raw` as CP437, one byte per character. Every byte has a mapping
/// (CP437 has no undefined code points), so this never falls back or loses
/// data the way UTF-8/Shift_JIS decoding can.
pub fn decode(raw: &[u8]) -> String {
    raw.iter()
        .map(|&b| {
            if b < 0x80 {
                b as char
            } else {
                UPPER_HALF[(b - 0x80) as usize]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_range_is_identity() {
        assert_eq!(decode(b"QR code"), "QR code");
    }

    #[test]
    fn high_bytes_map_to_cp437_glyphs() {
        // 0x80 is C-cedilla, 0xFB is a square-root sign in CP437 -- neither
        // matches their Windows-1252/ISO-8859-1 codepoints for the same byte.
        assert_eq!(decode(&[0x80]), "Ç");
        assert_eq!(decode(&[0xFB]), "√");
    }

    #[test]
    fn every_byte_decodes_without_panic() {
        let all_bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(decode(&all_bytes).chars().count(), 256);
    }
}
