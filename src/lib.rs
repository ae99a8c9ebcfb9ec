//! **cipherkit** - a from-scratch AES-128 with CBC/CTR modes and
//! elliptic-curve Diffie-Hellman key agreement.
//!
//! Everything is built from primitive bit/byte operations - no library
//! cipher calls. The implementation is correct (verified against FIPS-197
//! vectors) but deliberately *not* hardened: table lookups and big-integer
//! arithmetic are not constant-time, and curve parameters are randomly
//! generated rather than standardized. Treat it as study material, not as a
//! production cryptosystem.
//!
//! # Modules
//! | Module | Purpose |
//! |--------|---------|
//! | [`gf`]    | GF(2^8) arithmetic, S-boxes, mix matrices, round constants |
//! | [`aes`]   | AES-128 key schedule and block encrypt/decrypt |
//! | [`modes`] | PKCS#7 padding, CBC chaining, thread-per-block CTR |
//! | [`ecdh`]  | Random short-Weierstrass curves and scalar multiplication |
//! | [`keys`]  | Passphrase normalization and shared-secret key derivation |
//!
//! # Typical flow
//! ```
//! use cipherkit::{aes::Aes128, ecdh, keys, modes};
//!
//! // Alice and Bob agree on a curve and exchange public points.
//! let params = ecdh::generate_curve_params(128);
//! let (ka, kb) = (ecdh::generate_private_key(128), ecdh::generate_private_key(128));
//! let (pub_a, pub_b) = (
//!     ecdh::public_key(&ka, &params).unwrap(),
//!     ecdh::public_key(&kb, &params).unwrap(),
//! );
//!
//! // Both sides derive the same 16-byte cipher key.
//! let secret = ecdh::shared_secret(&ka, &pub_b, &params).unwrap();
//! assert_eq!(secret, ecdh::shared_secret(&kb, &pub_a, &params).unwrap());
//! let cipher = Aes128::new(&keys::derive_key(&secret));
//!
//! // Bulk data moves under CBC (or CTR, same shape).
//! let wire = modes::cbc_encrypt(&cipher, modes::random_iv(), b"We need picnicc");
//! assert_eq!(modes::cbc_decrypt(&cipher, &wire).unwrap(), b"We need picnicc");
//! ```

pub mod aes;
pub mod ecdh;
pub mod error;
pub mod gf;
pub mod keys;
pub mod modes;

pub use error::{Error, Result};
