//! Integration tests built from the concrete scenarios and property tests
//! in spec.md §8: full `Decoder::decode_codewords` runs over hand-built
//! RS-encoded, segment-encoded codeword streams (versions chosen here all
//! have a single RS block, so no block interleaving is needed beyond
//! concatenating data then ECC).

use rand::Rng;
use rust_qr::gf256::{Gf256, GenericGFPoly};
use rust_qr::{Decoder, EccLevel, Version};

fn bits_for(value: u32, width: usize) -> Vec<u8> {
    (0..width).rev().map(|i| ((value >> i) & 1) as u8).collect()
}

fn pack_bits(bits: &[u8]) -> Vec<u8> {
    let mut padded = bits.to_vec();
    while padded.len() % 8 != 0 {
        padded.push(0);
    }
    padded
        .chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &b| (acc << 1) | b))
        .collect()
}

/// Pads a data-codeword buffer to `len` with the standard QR pad bytes
/// 0xEC, 0x11 alternating, per ISO/IEC 18004 §8.4.9.
fn pad_to(mut data: Vec<u8>, len: usize) -> Vec<u8> {
    let pads = [0xECu8, 0x11];
    let mut i = 0;
    while data.len() < len {
        data.push(pads[i % 2]);
        i += 1;
    }
    data.truncate(len);
    data
}

fn rs_generator(degree: usize) -> GenericGFPoly {
    let mut g = GenericGFPoly::new(vec![1]);
    for i in 0..degree {
        let term = GenericGFPoly::new(vec![1, Gf256::exp(i as i32)]);
        g = g.multiply(&term);
    }
    g
}

/// RS-encodes a single block: returns `data ++ ecc`.
fn rs_encode(data: &[u8], ecc_len: usize) -> Vec<u8> {
    let generator = rs_generator(ecc_len);
    let mut padded = data.to_vec();
    padded.extend(std::iter::repeat(0u8).take(ecc_len));
    let info = GenericGFPoly::new(padded);
    let (_, remainder) = info.divide(&generator).unwrap();
    let mut remainder_coeffs = remainder.coefficients().to_vec();
    while remainder_coeffs.len() < ecc_len {
        remainder_coeffs.insert(0, 0);
    }
    let mut out = data.to_vec();
    out.extend(remainder_coeffs);
    out
}

/// Builds a single-RS-block codeword stream for `version`/`ecc_level` from
/// a already-packed data-codeword buffer (padded to the block's data
/// length), ready to hand to `Decoder::decode_codewords`.
fn single_block_codewords(version: Version, ecc_level: EccLevel, data_bits: Vec<u8>) -> Vec<u8> {
    let layout = version.block_layout(ecc_level);
    assert_eq!(layout.num_blocks(), 1, "test helper assumes a single block");
    let data_len = layout.groups[0].data_codewords_per_block;
    let data = pad_to(pack_bits(&data_bits), data_len);
    rs_encode(&data, layout.ecc_codewords_per_block)
}

/// Scenario A: Version 1, ECC L, Numeric only, payload "01234567".
#[test]
fn scenario_a_numeric_version1_l() {
    let version = Version::new(1).unwrap();
    let ecc_level = EccLevel::L;

    let mut bits = vec![0, 0, 0, 1]; // NUMERIC
    bits.extend(bits_for(8, version.char_count_bits(rust_qr::Mode::Numeric)));
    bits.extend(bits_for(12, 10)); // "012"
    bits.extend(bits_for(345, 10)); // "345"
    bits.extend(bits_for(67, 7)); // "67"
    bits.extend([0, 0, 0, 0]); // terminator

    let codewords = single_block_codewords(version, ecc_level, bits);
    // NUMERIC (0001) + count-hi bits of 8 (10-bit count: 0000001000) packed
    // MSB-first starts 0001 0000 00... = 0x10.
    assert_eq!(codewords[0], 0x10);

    let result = Decoder::decode_codewords(&codewords, version, ecc_level).unwrap();
    assert_eq!(result.text, "01234567");
    assert_eq!(result.structured_append_sequence, -1);
    assert_eq!(result.structured_append_parity, -1);
}

/// Scenario B: Version 1, ECC H, Alphanumeric, payload "AC-42".
#[test]
fn scenario_b_alphanumeric_version1_h() {
    let version = Version::new(1).unwrap();
    let ecc_level = EccLevel::H;

    let mut bits = vec![0, 0, 1, 0]; // ALPHANUMERIC
    bits.extend(bits_for(5, version.char_count_bits(rust_qr::Mode::Alphanumeric)));
    bits.extend(bits_for(10 * 45 + 12, 11)); // "AC"
    bits.extend(bits_for(41 * 45 + 4, 11)); // "-4"
    bits.extend(bits_for(2, 6)); // "2"
    bits.extend([0, 0, 0, 0]);

    let codewords = single_block_codewords(version, ecc_level, bits);
    let result = Decoder::decode_codewords(&codewords, version, ecc_level).unwrap();
    assert_eq!(result.text, "AC-42");
}

/// Scenario C: Version 3, ECC L, Kanji (Shift-JIS), payload "QRコード".
/// The Kanji segment alone carries the Japanese syllables; "QR" is encoded
/// as a short Byte-mode preamble so the whole string round-trips as one
/// symbol, matching how a real encoder would pack mixed-mode text.
#[test]
fn scenario_c_kanji_version3_l() {
    let version = Version::new(3).unwrap();
    let ecc_level = EccLevel::L;

    // Shift-JIS code points for コ (0x8352) and ド (0x8368), expressed as the
    // 13-bit packed units the spec's formula decodes.
    fn sjis_to_unit(byte1: u32, byte2: u32) -> u32 {
        if byte1 <= 0x9F {
            (byte1 - 0x81) * 0xC0 + (byte2 - 0x40)
        } else {
            (byte1 - 0xE0) * 0xC0 + 0x1F00 + (byte2 - 0x40)
        }
    }
    let ko = sjis_to_unit(0x83, 0x52); // コ
    let do_ = sjis_to_unit(0x83, 0x68); // ド

    let mut bits = vec![0, 1, 0, 0]; // BYTE ("QR")
    bits.extend(bits_for(2, version.char_count_bits(rust_qr::Mode::Byte)));
    bits.extend(bits_for(b'Q' as u32, 8));
    bits.extend(bits_for(b'R' as u32, 8));

    bits.extend([1, 0, 0, 0]); // KANJI
    bits.extend(bits_for(2, version.char_count_bits(rust_qr::Mode::Kanji)));
    bits.extend(bits_for(ko, 13));
    bits.extend(bits_for(do_, 13));
    bits.extend([0, 0, 0, 0]); // terminator

    let codewords = single_block_codewords(version, ecc_level, bits);
    let result = Decoder::decode_codewords(&codewords, version, ecc_level).unwrap();
    assert_eq!(result.text, "QRコード");
}

/// Scenario D: Byte segment with ECI id 26 ("UTF-8"), payload "héllo".
#[test]
fn scenario_d_eci_utf8_byte_version1_l() {
    let version = Version::new(1).unwrap();
    let ecc_level = EccLevel::L;
    let payload = "héllo".as_bytes().to_vec();

    let mut bits = vec![0, 1, 1, 1]; // ECI
    bits.extend(bits_for(26, 8)); // id 26, 1-byte designator

    bits.extend([0, 1, 0, 0]); // BYTE
    bits.extend(bits_for(
        payload.len() as u32,
        version.char_count_bits(rust_qr::Mode::Byte),
    ));
    for &b in &payload {
        bits.extend(bits_for(b as u32, 8));
    }
    bits.extend([0, 0, 0, 0]);

    let codewords = single_block_codewords(version, ecc_level, bits);
    let result = Decoder::decode_codewords(&codewords, version, ecc_level).unwrap();
    assert_eq!(result.text, "héllo");
}

/// Scenario E: Structured Append (sequence 0x13, parity 0xAB) followed by a
/// Numeric "42" segment.
#[test]
fn scenario_e_structured_append_then_numeric() {
    let version = Version::new(1).unwrap();
    let ecc_level = EccLevel::L;

    let mut bits = vec![0, 0, 1, 1]; // STRUCTURED_APPEND
    bits.extend(bits_for(0x13, 8));
    bits.extend(bits_for(0xAB, 8));

    bits.extend([0, 0, 0, 1]); // NUMERIC
    bits.extend(bits_for(2, version.char_count_bits(rust_qr::Mode::Numeric)));
    bits.extend(bits_for(42, 7));
    bits.extend([0, 0, 0, 0]);

    let codewords = single_block_codewords(version, ecc_level, bits);
    let result = Decoder::decode_codewords(&codewords, version, ecc_level).unwrap();
    assert_eq!(result.text, "42");
    assert_eq!(result.structured_append_sequence, 0x13);
    assert_eq!(result.structured_append_parity, 0xAB);
}

/// Scenario F: inject 2 byte errors into a Version 1-M block (ecc=10, up to
/// 5 correctable) and assert bit-exact recovery.
#[test]
fn scenario_f_version1_m_recovers_from_two_byte_errors() {
    let version = Version::new(1).unwrap();
    let ecc_level = EccLevel::M;

    let mut bits = vec![0, 0, 0, 1]; // NUMERIC
    bits.extend(bits_for(1, version.char_count_bits(rust_qr::Mode::Numeric))); // 1 digit
    bits.extend(bits_for(7, 4)); // "7"
    bits.extend([0, 0, 0, 0]);

    let mut codewords = single_block_codewords(version, ecc_level, bits);
    codewords[2] ^= 0x55;
    codewords[9] ^= 0xAA;

    let result = Decoder::decode_codewords(&codewords, version, ecc_level).unwrap();
    assert_eq!(result.text, "7");
}

/// Property 6/7: random bit-error injection within and beyond correction
/// capacity. Within capacity, data must round-trip exactly; beyond
/// capacity, the decoder must either recover correctly or fail loudly —
/// never return silently corrupted output.
#[test]
fn property_random_errors_within_capacity_recover_exactly() {
    let version = Version::new(5).unwrap();
    let ecc_level = EccLevel::Q;
    let layout = version.block_layout(ecc_level);
    let mut rng = rand::thread_rng();

    for _ in 0..20 {
        for group in &layout.groups {
            let data: Vec<u8> = (0..group.data_codewords_per_block)
                .map(|_| rng.gen::<u8>())
                .collect();
            let mut block = rs_encode(&data, layout.ecc_codewords_per_block);

            let max_correctable = layout.ecc_codewords_per_block / 2;
            let n_errors = rng.gen_range(0..=max_correctable);
            let mut positions: Vec<usize> = (0..block.len()).collect();
            for i in (1..positions.len()).rev() {
                let j = rng.gen_range(0..=i);
                positions.swap(i, j);
            }
            for &pos in positions.iter().take(n_errors) {
                let flip = rng.gen_range(1..=255u8);
                block[pos] ^= flip;
            }

            let corrected =
                rust_qr::reed_solomon::ReedSolomonDecoder::decode(&block, layout.ecc_codewords_per_block)
                    .unwrap();
            assert_eq!(&corrected[..data.len()], &data[..]);
        }
    }
}

#[test]
fn property_random_errors_beyond_capacity_never_silently_corrupts() {
    let ecc_len = 10;
    let max_correctable = ecc_len / 2;
    let mut rng = rand::thread_rng();

    for _ in 0..20 {
        let data: Vec<u8> = (0..16).map(|_| rng.gen::<u8>()).collect();
        let mut block = rs_encode(&data, ecc_len);

        let n_errors = rng.gen_range((max_correctable + 1)..=ecc_len);
        let mut positions: Vec<usize> = (0..block.len()).collect();
        for i in (1..positions.len()).rev() {
            let j = rng.gen_range(0..=i);
            positions.swap(i, j);
        }
        for &pos in positions.iter().take(n_errors) {
            let flip = rng.gen_range(1..=255u8);
            block[pos] ^= flip;
        }

        // Beyond the correction capacity the decoder may still happen to
        // recover (rare) or must fail outright — what it must never do is
        // report success with data that doesn't match the original.
        if let Ok(corrected) = rust_qr::reed_solomon::ReedSolomonDecoder::decode(&block, ecc_len) {
            assert_eq!(&corrected[..data.len()], &data[..]);
        }
    }
}
