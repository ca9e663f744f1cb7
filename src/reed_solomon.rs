//! Syndrome-based Reed-Solomon error correction over GF(256).
//!
//! Implements the Peterson-Gorenstein-Zierler algorithm via the extended
//! Euclidean algorithm, Chien search, and Forney's formula — the same
//! structure ZXing's `ReedSolomonDecoder` uses, built on [`GenericGFPoly`]
//! rather than the teacher repo's inline Berlekamp-Massey arrays
//! (`decoder::reed_solomon::ReedSolomonDecoder`).

use crate::error::{QrDecodeError, Result};
use crate::gf256::{Gf256, GenericGFPoly};

/// Corrects up to `twoS / 2` byte errors in `received` in place.
pub struct ReedSolomonDecoder;

impl ReedSolomonDecoder {
    /// Attempts to correct `received` using `two_s` ECC codewords.
    ///
    /// Returns the corrected codewords (same length as `received`). If the
    /// syndrome is already all-zero, `received` is returned unchanged
    /// without running the correction machinery.
    pub fn decode(received: &[u8], two_s: usize) -> Result<Vec<u8>> {
        let n = received.len();
        let poly = GenericGFPoly::new(received.to_vec());

        let mut syndrome_coefficients = vec![0u8; two_s];
        let mut has_error = false;
        for i in 0..two_s {
            let eval = poly.evaluate_at(Gf256::exp(i as i32));
            syndrome_coefficients[two_s - 1 - i] = eval;
            if eval != 0 {
                has_error = true;
            }
        }
        if !has_error {
            return Ok(received.to_vec());
        }

        let syndrome = GenericGFPoly::new(syndrome_coefficients);
        let monomial = Gf256::build_monomial(two_s, 1);
        let (sigma, omega) = Self::run_euclidean_algorithm(&monomial, &syndrome, two_s)?;

        let error_locations = Self::find_error_locations(&sigma)?;
        let error_magnitudes = Self::find_error_magnitudes(&omega, &sigma, &error_locations)?;

        let mut corrected = received.to_vec();
        for (i, &location) in error_locations.iter().enumerate() {
            let log = Gf256::log(location)? as isize;
            let position = n as isize - 1 - log;
            if !(0..n as isize).contains(&position) {
                return Err(QrDecodeError::ReedSolomon(
                    "error position out of range".into(),
                ));
            }
            corrected[position as usize] ^= error_magnitudes[i];
        }

        Ok(corrected)
    }

    /// Extended Euclidean algorithm on `(x^twoS, syndromePoly)`, stopping
    /// once the remainder's degree drops below `twoS / 2`. Returns
    /// `(sigma, omega)` normalized so that `sigma(0) == 1`.
    fn run_euclidean_algorithm(
        a: &GenericGFPoly,
        b: &GenericGFPoly,
        two_s: usize,
    ) -> Result<(GenericGFPoly, GenericGFPoly)> {
        let (mut r_last, mut r) = if a.degree() < b.degree() {
            (b.clone(), a.clone())
        } else {
            (a.clone(), b.clone())
        };

        let mut t_last = GenericGFPoly::zero();
        let mut t = GenericGFPoly::new(vec![1]);

        while r.degree() >= two_s / 2 {
            let r_last_last = r_last;
            let t_last_last = t_last;
            r_last = r;
            t_last = t;

            if r_last.is_zero() {
                return Err(QrDecodeError::ReedSolomon(
                    "r_last is zero during Euclidean algorithm".into(),
                ));
            }

            r = r_last_last;
            let mut q = GenericGFPoly::zero();
            let denominator_leading_term = r_last.coefficient(r_last.degree());
            let dlt_inverse = Gf256::inverse(denominator_leading_term)?;

            while r.degree() >= r_last.degree() && !r.is_zero() {
                let degree_diff = r.degree() - r_last.degree();
                let scale = Gf256::multiply(r.coefficient(r.degree()), dlt_inverse);
                q = q.add_or_subtract(&Gf256::build_monomial(degree_diff, scale));
                r = r.add_or_subtract(&r_last.multiply_by_monomial(degree_diff, scale)?);
            }

            t = q
                .multiply(&t_last)
                .add_or_subtract(&t_last_last);

            if r.degree() >= r_last.degree() {
                return Err(QrDecodeError::ReedSolomon(
                    "division algorithm failed to reduce polynomial degree".into(),
                ));
            }
        }

        let sigma_tilde_at_zero = t.coefficient(0);
        if sigma_tilde_at_zero == 0 {
            return Err(QrDecodeError::ReedSolomon(
                "sigma tilde(0) was zero".into(),
            ));
        }

        let inverse = Gf256::inverse(sigma_tilde_at_zero)?;
        let sigma = t.multiply_int(inverse);
        let omega = r.multiply_int(inverse);
        Ok((sigma, omega))
    }

    /// Chien search: roots of sigma(x) give error locations (as `log(1/x)`,
    /// not yet converted to byte positions).
    fn find_error_locations(sigma: &GenericGFPoly) -> Result<Vec<u8>> {
        let num_errors = sigma.degree();
        if num_errors == 1 {
            return Ok(vec![sigma.coefficient(1)]);
        }

        let mut result = Vec::with_capacity(num_errors);
        let mut found = 0;
        let mut i = 1;
        while i < 256 && found < num_errors {
            if sigma.evaluate_at(i as u8) == 0 {
                result.push(Gf256::inverse(i as u8)?);
                found += 1;
            }
            i += 1;
        }
        if found != num_errors {
            return Err(QrDecodeError::ReedSolomon(
                "wrong number of error locations found".into(),
            ));
        }
        Ok(result)
    }

    /// Forney's formula: magnitude = Omega(x^-1) / sigma'(x^-1).
    fn find_error_magnitudes(
        omega: &GenericGFPoly,
        sigma: &GenericGFPoly,
        error_locations: &[u8],
    ) -> Result<Vec<u8>> {
        let s = error_locations.len();
        let mut result = Vec::with_capacity(s);

        for &location in error_locations {
            let xi_inverse = Gf256::inverse(location)?;

            // Formal derivative in characteristic 2: keep only odd-degree terms.
            let degree = sigma.degree();
            let mut coefficients = vec![0u8; degree.max(1)];
            for j in 1..=degree {
                if j % 2 == 1 {
                    coefficients[degree - j] = sigma.coefficient(j);
                }
            }
            let formal_derivative = GenericGFPoly::new(coefficients);

            let denominator = formal_derivative.evaluate_at(xi_inverse);
            if denominator == 0 {
                return Err(QrDecodeError::ReedSolomon(
                    "zero Forney denominator".into(),
                ));
            }

            let numerator = omega.evaluate_at(xi_inverse);
            let magnitude = Gf256::multiply(numerator, Gf256::inverse(denominator)?);
            result.push(magnitude);
        }

        Ok(result)
    }
}
