//! Share type and its textual codec
//!
//! A share travels as a compact, copy-paste-safe ASCII string:
//!
//! ```text
//! <threshold>-<index>-<base64 body>
//! ```
//!
//! The base64 alphabet contains no `-`, so the three fields stay
//! unambiguous. The body is a small hand-rolled binary layout:
//!
//! ```text
//! [flag u8]                                   0x00 unsigned, 0x01 signed
//! if signed: [root 32B][proof_len u8][proof_len x 32B siblings]
//! [payload ...]                               one byte per secret byte
//! ```
//!
//! Decoding validates structure only; cross-share consistency (same
//! session, enough shares, signatures) is the orchestrator's job.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::merkle::{Hash, HASH_LEN};
use crate::{Error, Result};

const FLAG_UNSIGNED: u8 = 0x00;
const FLAG_SIGNED: u8 = 0x01;

/// Merkle commitment data embedded in a signed share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSignature {
    /// Root of the session's share tree
    pub root: Hash,
    /// Sibling path from this share's leaf up to the root
    pub proof: Vec<Hash>,
}

/// A single share of a split secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Threshold (k) needed for reconstruction, 2..=255
    pub threshold: u8,
    /// Share index (1..=n, never 0)
    pub index: u8,
    /// One GF(256) evaluation per secret byte
    pub payload: Vec<u8>,
    /// Commitment root + membership proof, present iff the split was signed
    pub signature: Option<ShareSignature>,
}

fn malformed(reason: impl Into<String>) -> Error {
    Error::MalformedShare {
        reason: reason.into(),
    }
}

impl Share {
    fn body_bytes(&self) -> Vec<u8> {
        match &self.signature {
            None => {
                let mut body = Vec::with_capacity(1 + self.payload.len());
                body.push(FLAG_UNSIGNED);
                body.extend_from_slice(&self.payload);
                body
            }
            Some(signature) => {
                let mut body = Vec::with_capacity(
                    2 + HASH_LEN * (1 + signature.proof.len()) + self.payload.len(),
                );
                body.push(FLAG_SIGNED);
                body.extend_from_slice(&signature.root);
                body.push(signature.proof.len() as u8);
                for sibling in &signature.proof {
                    body.extend_from_slice(sibling);
                }
                body.extend_from_slice(&self.payload);
                body
            }
        }
    }

    fn parse_body(body: &[u8]) -> Result<(Option<ShareSignature>, Vec<u8>)> {
        let (&flag, rest) = body
            .split_first()
            .ok_or_else(|| malformed("empty share body"))?;

        match flag {
            FLAG_UNSIGNED => {
                if rest.is_empty() {
                    return Err(malformed("empty share payload"));
                }
                Ok((None, rest.to_vec()))
            }
            FLAG_SIGNED => {
                if rest.len() < HASH_LEN + 1 {
                    return Err(malformed("truncated signature data"));
                }
                let mut root = [0u8; HASH_LEN];
                root.copy_from_slice(&rest[..HASH_LEN]);

                let proof_len = rest[HASH_LEN] as usize;
                let proof_end = HASH_LEN + 1 + proof_len * HASH_LEN;
                if rest.len() < proof_end {
                    return Err(malformed("truncated membership proof"));
                }
                let proof: Vec<Hash> = rest[HASH_LEN + 1..proof_end]
                    .chunks_exact(HASH_LEN)
                    .map(|chunk| {
                        let mut hash = [0u8; HASH_LEN];
                        hash.copy_from_slice(chunk);
                        hash
                    })
                    .collect();

                let payload = rest[proof_end..].to_vec();
                if payload.is_empty() {
                    return Err(malformed("empty share payload"));
                }
                Ok((Some(ShareSignature { root, proof }), payload))
            }
            other => Err(malformed(format!("unknown share body flag {other:#04x}"))),
        }
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.threshold,
            self.index,
            BASE64.encode(self.body_bytes())
        )
    }
}

impl FromStr for Share {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut fields = s.split('-');
        let (threshold_field, index_field, body_field) =
            match (fields.next(), fields.next(), fields.next(), fields.next()) {
                (Some(t), Some(i), Some(b), None) => (t, i, b),
                _ => return Err(malformed("expected 3 dash-delimited fields")),
            };

        let threshold: u32 = threshold_field
            .parse()
            .map_err(|_| malformed("threshold is not a number"))?;
        if threshold > 255 {
            return Err(malformed("threshold out of range"));
        }
        if threshold < 2 {
            return Err(Error::InvalidThreshold(threshold as i64));
        }

        let index: u32 = index_field
            .parse()
            .map_err(|_| malformed("share index is not a number"))?;
        if index == 0 {
            return Err(malformed("share index cannot be zero"));
        }
        if index > 255 {
            return Err(malformed("share index out of range"));
        }

        let body = BASE64
            .decode(body_field)
            .map_err(|_| malformed("share body is not valid base64"))?;
        let (signature, payload) = Share::parse_body(&body)?;

        Ok(Share {
            threshold: threshold as u8,
            index: index as u8,
            payload,
            signature,
        })
    }
}
