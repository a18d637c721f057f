//! Random polynomials over GF(256) and Lagrange interpolation
//!
//! Each secret byte becomes the constant term of its own random polynomial
//! of degree threshold-1; shares are evaluations at x = 1..=n, and recovery
//! interpolates the constant term back at x = 0.

use rand::RngCore;
use zeroize::Zeroizing;

use crate::gf256;
use crate::{Error, Result};

/// A polynomial over GF(256), constant term first.
///
/// Coefficients are secret material (the constant term *is* a secret byte)
/// and are zeroized on drop.
pub(crate) struct Polynomial {
    coefficients: Zeroizing<Vec<u8>>,
}

impl Polynomial {
    /// Build a random polynomial with the given constant term.
    ///
    /// The `degree` non-constant coefficients are drawn from `rng`, which
    /// must be cryptographically secure in production use.
    pub fn random<R: RngCore>(intercept: u8, degree: u8, rng: &mut R) -> Self {
        let mut coefficients = Zeroizing::new(vec![0u8; degree as usize + 1]);
        coefficients[0] = intercept;
        rng.fill_bytes(&mut coefficients[1..]);
        Self { coefficients }
    }

    /// Evaluate at `x` using Horner's method.
    pub fn evaluate(&self, x: u8) -> u8 {
        let mut acc = 0u8;
        for &coefficient in self.coefficients.iter().rev() {
            acc = gf256::add(gf256::mul(acc, x), coefficient);
        }
        acc
    }
}

/// Lagrange interpolation of the constant term from (x, y) points.
///
/// Exact over the field; duplicate x-coordinates are rejected rather than
/// silently biasing the result.
pub(crate) fn interpolate_at_zero(points: &[(u8, u8)]) -> Result<u8> {
    let mut secret = 0u8;

    for (i, &(xi, yi)) in points.iter().enumerate() {
        let mut numerator = 1u8;
        let mut denominator = 1u8;

        for (j, &(xj, _)) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            if xi == xj {
                return Err(Error::DuplicateShareIndex { index: xi });
            }
            // numerator *= (0 - xj) = xj (negation is identity in GF(2^n))
            numerator = gf256::mul(numerator, xj);
            denominator = gf256::mul(denominator, gf256::sub(xi, xj));
        }

        // Basis polynomial Li(0), then accumulate yi * Li(0)
        let li = gf256::div(numerator, denominator)?;
        secret = gf256::add(secret, gf256::mul(yi, li));
    }

    Ok(secret)
}
