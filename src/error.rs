//! Library-wide error and result types.

use std::fmt;

/// Result alias used throughout cipherkit.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Error messages are kept intentionally terse; callers that need richer
/// context should wrap `Error` in their own type.
///
/// Note what is *not* here: key-length problems (keys are silently truncated
/// or padded to 16 bytes, see [`crate::keys::normalize_key`]) and degenerate
/// curve parameters (generation retries internally until it has a
/// non-singular curve, see [`crate::ecdh::generate_curve_params`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A decrypted message ended with a malformed PKCS#7 pad: the pad byte
    /// was outside `1..=16`, exceeded the message length, or the trailing
    /// bytes were not uniform.
    InvalidPadding,
    /// A ciphertext was shorter than the 16-byte IV prefix.
    ShortCiphertext,
    /// A ciphertext body (after the IV prefix) was empty or not a multiple
    /// of the 16-byte block size.
    RaggedCiphertext,
    /// A modular inverse was requested for a value sharing a nontrivial
    /// common factor with the modulus. Fatal to the current key-exchange
    /// attempt.
    NoModularInverse,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPadding => write!(f, "invalid PKCS#7 padding"),
            Error::ShortCiphertext => write!(f, "ciphertext shorter than the IV prefix"),
            Error::RaggedCiphertext => write!(f, "ciphertext body is not a multiple of 16 bytes"),
            Error::NoModularInverse => write!(f, "no modular inverse exists"),
        }
    }
}

impl std::error::Error for Error {}
