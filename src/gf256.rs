//! GF(256) finite-field arithmetic and polynomials over it.
//!
//! QR Code Reed-Solomon correction works in GF(256) with the primitive
//! polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x011D) and generator 2, per
//! ISO/IEC 18004. The log/exp tables below are the same tables the teacher
//! repo's `decoder::reed_solomon::Gf256` built at compile time.

use crate::error::{QrDecodeError, Result};

const MODULUS: u16 = 0x011D;

const fn build_tables() -> ([u8; 256], [u8; 256]) {
    let mut exp = [0u8; 256];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= MODULUS;
        }
        x &= 0xFF;
        i += 1;
    }
    exp[255] = exp[0];
    i = 0;
    while i < 255 {
        log[exp[i] as usize] = i as u8;
        i += 1;
    }
    (exp, log)
}

const TABLES: ([u8; 256], [u8; 256]) = build_tables();
static EXP_TABLE: [u8; 256] = TABLES.0;
static LOG_TABLE: [u8; 256] = TABLES.1;

/// GF(256) arithmetic primitives (add, multiply, inverse, exp, log).
pub struct Gf256;

impl Gf256 {
    /// `a XOR b`. Also doubles as subtraction: the field has characteristic 2.
    #[inline]
    pub fn add(a: u8, b: u8) -> u8 {
        a ^ b
    }

    /// `exp[(log[a] + log[b]) mod 255]`, or 0 if either operand is 0.
    #[inline]
    pub fn multiply(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
        EXP_TABLE[sum % 255]
    }

    /// Multiplicative inverse. Undefined (and rejected) for `a == 0`.
    pub fn inverse(a: u8) -> Result<u8> {
        if a == 0 {
            return Err(QrDecodeError::IllegalArgument(
                "GF(256) inverse of 0 is undefined".into(),
            ));
        }
        Ok(EXP_TABLE[255 - LOG_TABLE[a as usize] as usize])
    }

    /// `expTable[i mod 255]`.
    #[inline]
    pub fn exp(i: i32) -> u8 {
        EXP_TABLE[i.rem_euclid(255) as usize]
    }

    /// Discrete log base 2. Undefined (and rejected) for `i == 0`.
    pub fn log(i: u8) -> Result<u8> {
        if i == 0 {
            return Err(QrDecodeError::IllegalArgument(
                "GF(256) log of 0 is undefined".into(),
            ));
        }
        Ok(LOG_TABLE[i as usize])
    }

    /// `coefficient * x^degree` as a [`GenericGFPoly`].
    pub fn build_monomial(degree: usize, coefficient: u8) -> GenericGFPoly {
        if coefficient == 0 {
            return GenericGFPoly::zero();
        }
        let mut coeffs = vec![0u8; degree + 1];
        coeffs[0] = coefficient;
        GenericGFPoly::new(coeffs)
    }
}

/// An immutable polynomial over GF(256), coefficients most-significant-first.
///
/// Canonical form (enforced at every construction site): either the first
/// coefficient is non-zero, or the polynomial is exactly `[0]`. This makes
/// `is_zero()` and `degree()` simple field reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericGFPoly {
    coefficients: Vec<u8>,
}

impl GenericGFPoly {
    /// Builds a polynomial from MSB-first coefficients, stripping leading
    /// zeros. An all-zero input collapses to the canonical `[0]`.
    pub fn new(coefficients: Vec<u8>) -> Self {
        if coefficients.is_empty() {
            return Self { coefficients: vec![0] };
        }
        let first_nonzero = coefficients.iter().position(|&c| c != 0);
        match first_nonzero {
            None => Self { coefficients: vec![0] },
            Some(0) => Self { coefficients },
            Some(idx) => Self {
                coefficients: coefficients[idx..].to_vec(),
            },
        }
    }

    /// The constant zero polynomial `[0]`.
    pub fn zero() -> Self {
        Self { coefficients: vec![0] }
    }

    /// `len(coeffs) - 1`.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// True iff this is the canonical zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    /// Coefficient of `x^degree`; 0 if `degree` is out of range.
    pub fn coefficient(&self, degree: usize) -> u8 {
        if degree > self.degree() {
            return 0;
        }
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    /// Coefficients, most-significant-first.
    pub fn coefficients(&self) -> &[u8] {
        &self.coefficients
    }

    /// Horner's-rule evaluation at `x`, with fast paths for 0 and 1.
    pub fn evaluate_at(&self, x: u8) -> u8 {
        if x == 0 {
            return self.coefficient(0);
        }
        if x == 1 {
            return self.coefficients.iter().fold(0u8, |acc, &c| acc ^ c);
        }
        let mut result = self.coefficients[0];
        for &c in &self.coefficients[1..] {
            result = Gf256::multiply(result, x) ^ c;
        }
        result
    }

    /// Polynomial multiplication (convolution with XOR accumulation).
    pub fn multiply(&self, other: &GenericGFPoly) -> GenericGFPoly {
        if self.is_zero() || other.is_zero() {
            return GenericGFPoly::zero();
        }
        let mut product = vec![0u8; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, &a) in self.coefficients.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in other.coefficients.iter().enumerate() {
                product[i + j] ^= Gf256::multiply(a, b);
            }
        }
        GenericGFPoly::new(product)
    }

    /// Scale every coefficient by `scalar`. `0` yields zero, `1` is the identity.
    pub fn multiply_int(&self, scalar: u8) -> GenericGFPoly {
        if scalar == 0 {
            return GenericGFPoly::zero();
        }
        if scalar == 1 {
            return self.clone();
        }
        let scaled: Vec<u8> = self
            .coefficients
            .iter()
            .map(|&c| Gf256::multiply(c, scalar))
            .collect();
        GenericGFPoly::new(scaled)
    }

    /// `self * coefficient * x^degree`.
    pub fn multiply_by_monomial(&self, degree: usize, coefficient: u8) -> Result<GenericGFPoly> {
        if coefficient == 0 {
            return Ok(GenericGFPoly::zero());
        }
        let mut product = vec![0u8; self.coefficients.len() + degree];
        for (i, &c) in self.coefficients.iter().enumerate() {
            product[i] = Gf256::multiply(c, coefficient);
        }
        Ok(GenericGFPoly::new(product))
    }

    /// XOR the overlapping tail after aligning by degree (characteristic-2 add/subtract).
    pub fn add_or_subtract(&self, other: &GenericGFPoly) -> GenericGFPoly {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }

        let (smaller, larger) = if self.coefficients.len() <= other.coefficients.len() {
            (&self.coefficients, &other.coefficients)
        } else {
            (&other.coefficients, &self.coefficients)
        };

        let mut sum = larger.clone();
        let offset = larger.len() - smaller.len();
        for (i, &c) in smaller.iter().enumerate() {
            sum[i + offset] ^= c;
        }
        GenericGFPoly::new(sum)
    }

    /// Long division in GF(256): returns `(quotient, remainder)`.
    pub fn divide(&self, other: &GenericGFPoly) -> Result<(GenericGFPoly, GenericGFPoly)> {
        if other.is_zero() {
            return Err(QrDecodeError::IllegalArgument(
                "division by the zero polynomial".into(),
            ));
        }

        let mut quotient = GenericGFPoly::zero();
        let mut remainder = self.clone();

        let denominator_leading_term = other.coefficient(other.degree());
        let inverse_denominator_leading_term = Gf256::inverse(denominator_leading_term)?;

        while !remainder.is_zero() && remainder.degree() >= other.degree() {
            let degree_diff = remainder.degree() - other.degree();
            let scale = Gf256::multiply(
                remainder.coefficient(remainder.degree()),
                inverse_denominator_leading_term,
            );
            let term = Gf256::build_monomial(degree_diff, scale);
            quotient = quotient.add_or_subtract(&term);
            let iteration_term = other.multiply_by_monomial(degree_diff, scale)?;
            remainder = remainder.add_or_subtract(&iteration_term);
        }

        Ok((quotient, remainder))
    }

    /// `self mod other`: repeated reduction until degree drops below `other`'s.
    pub fn modulo(&self, other: &GenericGFPoly) -> Result<GenericGFPoly> {
        let (_, remainder) = self.divide(other)?;
        Ok(remainder)
    }
}
