//! Split and recover secrets wrapped in a versioned envelope
//!
//! The envelope carries a format version and an optional MIME-type tag next
//! to the secret bytes. It is serialized to a small binary layout and the
//! resulting buffer is what actually gets split, so the tag rides inside
//! every share and is reproduced verbatim on recovery:
//!
//! ```text
//! [version u8][tag_len u16 BE][tag bytes][secret ...]
//! ```
//!
//! The tag has no bearing on threshold or share-count validation.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::sss;
use crate::{Error, Result};

/// Envelope format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Version {
    InitialRelease,
}

impl Version {
    fn to_byte(self) -> u8 {
        match self {
            Version::InitialRelease => 0,
        }
    }

    fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(Version::InitialRelease),
            other => Err(malformed(format!("unsupported envelope version {other}"))),
        }
    }
}

/// A recovered secret together with its envelope metadata.
///
/// The secret bytes are zeroized when this value is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct RecoveredSecret {
    /// Envelope format that produced this secret
    #[zeroize(skip)]
    pub version: Version,
    /// The MIME-type tag supplied at split time, verbatim, or `None`
    #[zeroize(skip)]
    pub mime_type: Option<String>,
    /// The reconstructed secret, byte for byte
    pub secret: Vec<u8>,
}

fn malformed(reason: impl Into<String>) -> Error {
    Error::MalformedEnvelope {
        reason: reason.into(),
    }
}

fn wrap(secret: &[u8], mime_type: Option<&str>) -> Result<Zeroizing<Vec<u8>>> {
    let tag = mime_type.unwrap_or("").as_bytes();
    let tag_len =
        u16::try_from(tag.len()).map_err(|_| malformed("metadata tag too large"))?;

    let mut envelope = Zeroizing::new(Vec::with_capacity(3 + tag.len() + secret.len()));
    envelope.push(Version::InitialRelease.to_byte());
    envelope.extend_from_slice(&tag_len.to_be_bytes());
    envelope.extend_from_slice(tag);
    envelope.extend_from_slice(secret);
    Ok(envelope)
}

fn unwrap(envelope: &[u8]) -> Result<RecoveredSecret> {
    if envelope.len() < 3 {
        return Err(malformed("envelope too short"));
    }
    let version = Version::from_byte(envelope[0])?;
    let tag_len = u16::from_be_bytes([envelope[1], envelope[2]]) as usize;

    let secret_start = 3 + tag_len;
    if envelope.len() < secret_start {
        return Err(malformed("truncated metadata tag"));
    }
    let mime_type = if tag_len == 0 {
        None
    } else {
        let tag = std::str::from_utf8(&envelope[3..secret_start])
            .map_err(|_| malformed("metadata tag is not valid UTF-8"))?;
        Some(tag.to_string())
    };

    let secret = envelope[secret_start..].to_vec();
    if secret.is_empty() {
        return Err(malformed("envelope carries no secret"));
    }

    Ok(RecoveredSecret {
        version,
        mime_type,
        secret,
    })
}

/// Split `secret` with an optional MIME-type tag riding along.
///
/// Parameter validation is identical to [`sss::split_secret`] and runs
/// against the raw secret; the tag's presence or length changes nothing
/// about which `(threshold, shares_count)` pairs are accepted.
pub fn split_secret(
    threshold: u8,
    shares_count: u8,
    secret: &[u8],
    mime_type: Option<&str>,
    sign: bool,
) -> Result<Vec<String>> {
    split_secret_with_rng(
        threshold,
        shares_count,
        secret,
        mime_type,
        sign,
        &mut rand::thread_rng(),
    )
}

/// [`split_secret`] with an injected random source, for deterministic tests.
pub fn split_secret_with_rng<R: RngCore + CryptoRng>(
    threshold: u8,
    shares_count: u8,
    secret: &[u8],
    mime_type: Option<&str>,
    sign: bool,
    rng: &mut R,
) -> Result<Vec<String>> {
    sss::validate_split_parameters(threshold, shares_count, secret)?;
    let envelope = wrap(secret, mime_type)?;
    sss::split_validated(threshold, shares_count, &envelope, sign, rng)
}

/// Recover an enveloped secret and its metadata from share strings.
///
/// Share handling is identical to [`sss::recover_secret`]; on success the
/// envelope is parsed back into version, tag, and secret.
pub fn recover_secret<S: AsRef<str>>(
    shares: &[S],
    verify_signatures: bool,
) -> Result<RecoveredSecret> {
    let envelope = Zeroizing::new(sss::recover_secret(shares, verify_signatures)?);
    unwrap(&envelope)
}
