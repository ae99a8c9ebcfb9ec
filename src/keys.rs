//! Cipher-key normalization and derivation.
//!
//! Two ways a 16-byte AES key comes to exist:
//!
//! * A caller-supplied passphrase, coerced to exactly 16 bytes by
//!   [`normalize_key`]. Length problems are never errors - the coercion is
//!   a deliberate leniency, not an omission.
//! * The ECDH shared secret, squeezed to 128 bits by [`derive_key`]. This
//!   is the glue between [`crate::ecdh`] and [`crate::aes`]; what travels
//!   over the wire (curve parameters, public points) is the transport
//!   layer's problem.

use num_bigint::BigInt;
use rand::Rng;

/// Coerce a text key to exactly 16 bytes.
///
/// Longer input is truncated; shorter input is padded with random ASCII
/// alphanumeric filler. The filler is random, so two normalizations of the
/// same short passphrase yield different keys - short keys are best
/// normalized once and the result shared.
pub fn normalize_key(input: &str) -> [u8; 16] {
    const FILLER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let bytes = input.as_bytes();
    let mut key = [0u8; 16];
    if bytes.len() >= 16 {
        key.copy_from_slice(&bytes[..16]);
    } else {
        key[..bytes.len()].copy_from_slice(bytes);
        let mut rng = rand::thread_rng();
        for slot in key[bytes.len()..].iter_mut() {
            *slot = FILLER[rng.gen_range(0..FILLER.len())];
        }
    }
    key
}

/// Derive a 16-byte cipher key from an ECDH shared secret.
///
/// Takes the 128 most-significant bits of the secret's binary expansion;
/// a secret shorter than 128 bits is left-padded with zero bits.
pub fn derive_key(shared: &BigInt) -> [u8; 16] {
    let bits = shared.bits();
    let value = if bits > 128 {
        shared >> (bits - 128)
    } else {
        shared.clone()
    };

    let (_, bytes) = value.to_bytes_be();
    let mut key = [0u8; 16];
    key[16 - bytes.len()..].copy_from_slice(&bytes);
    key
}
