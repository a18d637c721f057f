//! Keyshard SSS Module
//!
//! Split a secret into N shares where any M can reconstruct it, using
//! Shamir's Secret Sharing over GF(256).
//!
//! # Two Paths
//!
//! ## Raw (`sss`)
//! - Split/recover opaque secret bytes
//! - Compact text shares: `<threshold>-<index>-<base64 payload>`
//! - Optional Merkle signing binds all shares of one split together
//!
//! ## Wrapped (`wrapped`)
//! - Same scheme, plus a versioned envelope around the secret
//! - Carries an optional MIME-type tag, reproduced verbatim on recovery
//!
//! # Example: Split a secret
//!
//! ```
//! use keyshard_sss::sss::{split_secret, recover_secret};
//!
//! // Split into 2-of-3 shares
//! let shares = split_secret(2, 3, b"correct horse battery staple", false).unwrap();
//! assert_eq!(shares.len(), 3);
//!
//! // Recover with any 2 shares
//! let secret = recover_secret(&shares[1..3], false).unwrap();
//! assert_eq!(secret, b"correct horse battery staple");
//! ```

pub mod gf256;
mod merkle;
mod poly;
pub mod share;
pub mod sss;
pub mod wrapped;

// Re-exports
pub use share::Share;
pub use wrapped::{RecoveredSecret, Version};

use std::collections::BTreeSet;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(i64),
    #[error("Threshold is too small: {0} (minimum is 2)")]
    ThresholdTooSmall(u8),
    #[error("Invalid shares count: {0}")]
    InvalidSharesCount(i64),
    #[error("Number of shares is too small: {count} (threshold is {threshold})")]
    SharesCountTooSmall { count: u8, threshold: u8 },
    #[error("The secret cannot be empty")]
    EmptySecret,
    #[error("The secret is too large: {size} bytes (maximum is {max})")]
    SecretTooLarge { size: usize, max: usize },
    #[error("Malformed share: {reason}")]
    MalformedShare { reason: String },
    #[error("No shares were provided")]
    NoShares,
    #[error("Not enough shares: {provided} provided, {required} required")]
    NotEnoughShares { provided: u8, required: u8 },
    #[error("Duplicate share index: {index}")]
    DuplicateShareIndex { index: u8 },
    #[error("Shares belong to {} different split sessions", groups.len())]
    ShareGroupMismatch {
        /// Share indices partitioned by the session they appear to come from.
        groups: Vec<BTreeSet<u8>>,
    },
    #[error("Invalid signature on share {index}")]
    InvalidSignature { index: u8 },
    #[error("Share {index} carries no signature but verification was requested")]
    SignatureModeMismatch { index: u8 },
    #[error("Malformed envelope: {reason}")]
    MalformedEnvelope { reason: String },
    #[error("Division by zero in GF(256)")]
    DivisionByZero,
}
