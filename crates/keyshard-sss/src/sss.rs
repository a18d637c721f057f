//! Split and recover secrets (raw variant, no envelope)
//!
//! Split: validate parameters, build one random polynomial per secret byte,
//! evaluate at x = 1..=n, optionally sign the session's share set, encode.
//! Recover reverses the pipeline: decode, cross-share consistency checks,
//! optional signature verification, interpolate, reassemble.

use std::collections::{BTreeMap, BTreeSet};

use rand::{CryptoRng, RngCore};

use crate::merkle;
use crate::poly::{interpolate_at_zero, Polynomial};
use crate::share::Share;
use crate::{Error, Result};

/// Practical minimum for both threshold and share count.
pub const MIN_SHARES: u8 = 2;

/// Upper bound on the secret size.
pub const MAX_SECRET_SIZE: usize = 64 * 1024;

/// Convert a host-supplied integer into a threshold.
///
/// This is the boundary check a host wrapper performs on untyped input:
/// anything outside the absolute 0..=255 range is `InvalidThreshold`.
/// Whether the value is large enough is `split_secret`'s concern.
pub fn parse_threshold(raw: i64) -> Result<u8> {
    u8::try_from(raw).map_err(|_| Error::InvalidThreshold(raw))
}

/// Convert a host-supplied integer into a shares count.
pub fn parse_shares_count(raw: i64) -> Result<u8> {
    u8::try_from(raw).map_err(|_| Error::InvalidSharesCount(raw))
}

pub(crate) fn validate_split_parameters(
    threshold: u8,
    shares_count: u8,
    secret: &[u8],
) -> Result<()> {
    // Threshold before shares count, matching the order callers supply them
    if threshold < MIN_SHARES {
        return Err(Error::ThresholdTooSmall(threshold));
    }
    if shares_count < MIN_SHARES || shares_count < threshold {
        return Err(Error::SharesCountTooSmall {
            count: shares_count,
            threshold,
        });
    }
    if secret.is_empty() {
        return Err(Error::EmptySecret);
    }
    if secret.len() > MAX_SECRET_SIZE {
        return Err(Error::SecretTooLarge {
            size: secret.len(),
            max: MAX_SECRET_SIZE,
        });
    }
    Ok(())
}

/// Split `secret` into `shares_count` shares, any `threshold` of which
/// reconstruct it. With `sign`, every share additionally embeds a Merkle
/// commitment binding it to this specific split session.
///
/// Shares are returned as compact ASCII strings (see [`crate::share`]).
pub fn split_secret(
    threshold: u8,
    shares_count: u8,
    secret: &[u8],
    sign: bool,
) -> Result<Vec<String>> {
    split_secret_with_rng(threshold, shares_count, secret, sign, &mut rand::thread_rng())
}

/// [`split_secret`] with an injected random source.
///
/// Production use should go through [`split_secret`]; this entry point
/// exists so tests can reproduce a split from a fixed seed. All parameter
/// validation happens before the first byte of randomness is drawn.
pub fn split_secret_with_rng<R: RngCore + CryptoRng>(
    threshold: u8,
    shares_count: u8,
    secret: &[u8],
    sign: bool,
    rng: &mut R,
) -> Result<Vec<String>> {
    validate_split_parameters(threshold, shares_count, secret)?;
    split_validated(threshold, shares_count, secret, sign, rng)
}

/// Generation pipeline, after validation has already passed.
///
/// The wrapped variant validates against the raw secret but splits the
/// (slightly longer) envelope bytes, so validation and generation are
/// separate steps.
pub(crate) fn split_validated<R: RngCore + CryptoRng>(
    threshold: u8,
    shares_count: u8,
    secret: &[u8],
    sign: bool,
    rng: &mut R,
) -> Result<Vec<String>> {
    log::debug!(
        "splitting {} byte secret into {}-of-{} shares (signed: {})",
        secret.len(),
        threshold,
        shares_count,
        sign
    );

    let mut shares: Vec<Share> = (1..=shares_count)
        .map(|index| Share {
            threshold,
            index,
            payload: Vec::with_capacity(secret.len()),
            signature: None,
        })
        .collect();

    // One degree-(k-1) polynomial per secret byte, evaluated at every index
    for &secret_byte in secret {
        let poly = Polynomial::random(secret_byte, threshold - 1, rng);
        for share in &mut shares {
            share.payload.push(poly.evaluate(share.index));
        }
    }

    if sign {
        merkle::sign_shares(&mut shares);
    }

    Ok(shares.iter().map(Share::to_string).collect())
}

/// Recover a secret from share strings.
///
/// The whole supplied set is decoded and checked for consistency (and, when
/// `verify_signatures` is set, verified against the embedded commitments)
/// before any interpolation happens; only the first `threshold` shares are
/// then actually interpolated. Order and choice of the k-subset do not
/// matter. Signed shares recovered with `verify_signatures = false` still
/// reconstruct; the commitment data is simply not checked.
pub fn recover_secret<S: AsRef<str>>(shares: &[S], verify_signatures: bool) -> Result<Vec<u8>> {
    let shares = decode_and_check(shares, verify_signatures)?;
    let threshold = shares[0].threshold as usize;

    log::debug!(
        "recovering {} byte secret from {} of {} supplied shares",
        shares[0].payload.len(),
        threshold,
        shares.len()
    );

    let subset = &shares[..threshold];
    let mut secret = Vec::with_capacity(subset[0].payload.len());
    for byte_index in 0..subset[0].payload.len() {
        let points: Vec<(u8, u8)> = subset
            .iter()
            .map(|s| (s.index, s.payload[byte_index]))
            .collect();
        secret.push(interpolate_at_zero(&points)?);
    }

    Ok(secret)
}

/// Decode all supplied shares and run every cross-share check.
///
/// Returns the decoded set, guaranteed non-empty, mutually compatible, and
/// at least `threshold` strong.
pub(crate) fn decode_and_check<S: AsRef<str>>(
    shares: &[S],
    verify_signatures: bool,
) -> Result<Vec<Share>> {
    if shares.is_empty() {
        return Err(Error::NoShares);
    }

    let shares: Vec<Share> = shares
        .iter()
        .map(|s| s.as_ref().parse())
        .collect::<Result<_>>()?;

    let mut seen = BTreeSet::new();
    for share in &shares {
        if !seen.insert(share.index) {
            return Err(Error::DuplicateShareIndex { index: share.index });
        }
    }

    // Group by what a share claims about its session: threshold, payload
    // structure, and (when signed) the commitment root. More than one group
    // means the shares cannot all come from the same split.
    let mut groups: BTreeMap<_, BTreeSet<u8>> = BTreeMap::new();
    for share in &shares {
        let key = (
            share.threshold,
            share.payload.len(),
            share.signature.as_ref().map(|s| s.root),
        );
        groups.entry(key).or_default().insert(share.index);
    }
    if groups.len() > 1 {
        return Err(Error::ShareGroupMismatch {
            groups: groups.into_values().collect(),
        });
    }

    if verify_signatures {
        merkle::verify_shares(&shares)?;
    }

    let threshold = shares[0].threshold;
    if shares.len() < threshold as usize {
        return Err(Error::NotEnoughShares {
            provided: shares.len() as u8,
            required: threshold,
        });
    }

    Ok(shares)
}
