//! Galois field GF(256) arithmetic for Shamir's Secret Sharing
//!
//! Uses the irreducible polynomial x^8 + x^4 + x^3 + x + 1 (0x11B), the
//! same field as AES. Log/exp tables are built at compile time from the
//! generator 0x03, so every operation is a pair of table lookups.

use crate::{Error, Result};

struct Tables {
    /// log[x] = discrete log of x base 0x03 (log[0] is unused)
    log: [u8; 256],
    /// exp[i] = 0x03^i, doubled so `exp[log a + log b]` needs no reduction
    exp: [u8; 510],
}

impl Tables {
    const fn build() -> Self {
        let mut log = [0u8; 256];
        let mut exp = [0u8; 510];
        let mut x: u16 = 1;
        let mut i = 0;
        while i < 255 {
            exp[i] = x as u8;
            exp[i + 255] = x as u8;
            log[x as usize] = i as u8;
            // Multiply by the generator 0x03: x*3 = (x << 1) ^ x,
            // reduced mod 0x11B when it overflows 8 bits.
            x = (x << 1) ^ x;
            if x & 0x100 != 0 {
                x ^= 0x11B;
            }
            i += 1;
        }
        Self { log, exp }
    }
}

static TABLES: Tables = Tables::build();

/// Add two elements in GF(256) (XOR)
#[inline]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Subtract two elements in GF(256) (same as add in characteristic 2)
#[inline]
pub fn sub(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiply two elements in GF(256)
#[inline]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_a = TABLES.log[a as usize] as usize;
    let log_b = TABLES.log[b as usize] as usize;
    TABLES.exp[log_a + log_b]
}

/// Divide two elements in GF(256)
///
/// Division by zero is a `DivisionByZero` error. It is unreachable from the
/// public split/recover paths (x-coordinates are distinct and non-zero) and
/// treated as an internal invariant violation rather than a panic.
#[inline]
pub fn div(a: u8, b: u8) -> Result<u8> {
    if b == 0 {
        return Err(Error::DivisionByZero);
    }
    if a == 0 {
        return Ok(0);
    }
    let log_a = TABLES.log[a as usize] as usize;
    let log_b = TABLES.log[b as usize] as usize;
    // Add 255 so the exponent difference never goes negative
    Ok(TABLES.exp[log_a + 255 - log_b])
}

/// Compute the multiplicative inverse of an element in GF(256)
#[inline]
pub fn inv(a: u8) -> Result<u8> {
    if a == 0 {
        return Err(Error::DivisionByZero);
    }
    Ok(TABLES.exp[255 - TABLES.log[a as usize] as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        assert_eq!(add(0x53, 0xCA), 0x99);
        assert_eq!(add(0, 0x53), 0x53);
        assert_eq!(add(0x53, 0x53), 0); // a + a = 0 in GF(2^n)
    }

    #[test]
    fn test_mul() {
        assert_eq!(mul(0, 0x53), 0);
        assert_eq!(mul(1, 0x53), 0x53);
        assert_eq!(mul(2, 2), 4);
        // AES known vector: 0x53 * 0xCA = 0x01 under 0x11B
        assert_eq!(mul(0x53, 0xCA), 0x01);
        // 0x80 * 2 = 0x100, reduced mod 0x11B = 0x1B
        assert_eq!(mul(0x80, 2), 0x1B);
    }

    #[test]
    fn test_mul_commutative_associative() {
        for a in [1u8, 3, 7, 0x53, 0xCA, 0xFF] {
            for b in [2u8, 5, 0x11, 0x80, 0xFE] {
                assert_eq!(mul(a, b), mul(b, a));
                assert_eq!(mul(mul(a, b), 0x1D), mul(a, mul(b, 0x1D)));
            }
        }
    }

    #[test]
    fn test_div() {
        assert_eq!(div(0x53, 0x53).unwrap(), 1);
        assert_eq!(div(0, 0x53).unwrap(), 0);
        assert_eq!(div(1, 0), Err(Error::DivisionByZero));
        // (a / b) * b = a
        let a = 0x53u8;
        let b = 0xCAu8;
        assert_eq!(mul(div(a, b).unwrap(), b), a);
    }

    #[test]
    fn test_inv() {
        assert_eq!(inv(0), Err(Error::DivisionByZero));
        // a * inv(a) = 1 for every non-zero element
        for a in 1..=255u8 {
            assert_eq!(mul(a, inv(a).unwrap()), 1, "failed for a={}", a);
        }
    }

    #[test]
    fn test_distributive() {
        for a in [1u8, 2, 0x35, 0xFF] {
            for b in [0u8, 9, 0x53] {
                for c in [1u8, 0x80, 0xCA] {
                    assert_eq!(mul(a, add(b, c)), add(mul(a, b), mul(a, c)));
                }
            }
        }
    }
}
