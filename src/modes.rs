//! Block-cipher modes of operation: CBC and CTR over padded messages.
//!
//! Both modes consume arbitrary-length plaintext, pad it to a multiple of
//! 16 bytes with PKCS#7, and emit `IV ‖ ciphertext` as raw bytes. The IV is
//! caller-random (or produced by [`random_iv`]) and travels with the
//! ciphertext; it is not secret, it only has to be fresh.
//!
//! * **CBC** chains blocks - each plaintext block is XORed with the previous
//!   ciphertext block before the block transform. Chaining makes the mode
//!   inherently sequential.
//! * **CTR** turns the block cipher into a stream cipher - the keystream is
//!   the *forward* block transform of successive counter values `IV + i`,
//!   XORed with the data. Blocks are independent, so encryption and
//!   decryption fan out one worker per block.
//!
//! CTR would not need padding, but the reference wire format pads both
//! modes identically; that is preserved here so either side can swap modes
//! without renegotiating framing.
//!
//! <https://en.wikipedia.org/wiki/Block_cipher_mode_of_operation>

use std::thread;

use rand::Rng;

use crate::aes::{Aes128, Block};
use crate::{Error, Result};

/// Cipher block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Generate a random 128-bit IV / initial counter.
pub fn random_iv() -> Block {
    rand::thread_rng().r#gen()
}

/// Pad `data` to a multiple of [`BLOCK_SIZE`] bytes, PKCS#7 style.
///
/// The pad length is `16 - (len mod 16)` and every pad byte holds that
/// value. A length that is already a multiple of 16 still gains a full
/// 16-byte pad block of 0x10 - otherwise unpadding would be ambiguous.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    out.resize(data.len() + pad_len, pad_len as u8);
    out
}

/// Strip PKCS#7 padding from decrypted output.
///
/// The last byte is read as the pad length; a value outside `1..=16`, a pad
/// longer than the message, or a non-uniform tail is reported as
/// [`Error::InvalidPadding`] rather than silently mis-truncating.
pub fn unpad(data: &[u8]) -> Result<Vec<u8>> {
    let pad_len = *data.last().ok_or(Error::InvalidPadding)? as usize;
    if pad_len == 0 || pad_len > BLOCK_SIZE || pad_len > data.len() {
        return Err(Error::InvalidPadding);
    }
    let (body, tail) = data.split_at(data.len() - pad_len);
    if tail.iter().any(|&b| b as usize != pad_len) {
        return Err(Error::InvalidPadding);
    }
    Ok(body.to_vec())
}

// Counter for block i: the IV interpreted as an unsigned big-endian 128-bit
// integer plus i, wrapping at 2^128.
fn counter_block(iv: Block, index: u128) -> Block {
    u128::from_be_bytes(iv).wrapping_add(index).to_be_bytes()
}

// Split a received `IV ‖ ciphertext` message into its two parts, checking
// the framing invariants shared by both modes.
fn split_iv(data: &[u8]) -> Result<(Block, &[u8])> {
    if data.len() < BLOCK_SIZE {
        return Err(Error::ShortCiphertext);
    }
    let (iv, body) = data.split_at(BLOCK_SIZE);
    if body.is_empty() || body.len() % BLOCK_SIZE != 0 {
        // padding always produces at least one block, so an empty body is
        // just as malformed as a ragged one
        return Err(Error::RaggedCiphertext);
    }
    let mut iv_block = [0u8; BLOCK_SIZE];
    iv_block.copy_from_slice(iv);
    Ok((iv_block, body))
}

/// Encrypt `plaintext` in CBC mode, returning `IV ‖ ciphertext`.
///
/// Block 0 is XORed with `iv` before the block transform; every later block
/// is XORed with the previous ciphertext block. Strictly sequential - the
/// chaining dependency forbids block-level parallelism.
pub fn cbc_encrypt(cipher: &Aes128, iv: Block, plaintext: &[u8]) -> Vec<u8> {
    let padded = pad(plaintext);
    let mut out = Vec::with_capacity(BLOCK_SIZE + padded.len());
    out.extend_from_slice(&iv);

    let mut chain = iv;
    for chunk in padded.chunks_exact(BLOCK_SIZE) {
        let mut block = chain;
        for (b, p) in block.iter_mut().zip(chunk.iter()) {
            *b ^= p;
        }
        chain = cipher.encrypt_block(block);
        out.extend_from_slice(&chain);
    }
    out
}

/// Decrypt a CBC message produced by [`cbc_encrypt`] and strip the padding.
pub fn cbc_decrypt(cipher: &Aes128, data: &[u8]) -> Result<Vec<u8>> {
    let (iv, body) = split_iv(data)?;
    let mut out = Vec::with_capacity(body.len());

    let mut chain = iv;
    for chunk in body.chunks_exact(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);
        let mut plain = cipher.decrypt_block(block);
        for (p, c) in plain.iter_mut().zip(chain.iter()) {
            *p ^= c;
        }
        chain = block;
        out.extend_from_slice(&plain);
    }
    unpad(&out)
}

/// Encrypt `plaintext` in CTR mode, returning `IV ‖ ciphertext` where the
/// IV is the initial counter value.
pub fn ctr_encrypt(cipher: &Aes128, iv: Block, plaintext: &[u8]) -> Vec<u8> {
    let padded = pad(plaintext);
    let mut body = vec![0u8; padded.len()];
    ctr_apply(cipher, iv, &padded, &mut body);

    let mut out = Vec::with_capacity(BLOCK_SIZE + body.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&body);
    out
}

/// Decrypt a CTR message produced by [`ctr_encrypt`] and strip the padding.
///
/// CTR decryption is the same keystream XOR as encryption - the block
/// transform only ever runs in the forward direction.
pub fn ctr_decrypt(cipher: &Aes128, data: &[u8]) -> Result<Vec<u8>> {
    let (iv, body) = split_iv(data)?;
    let mut out = vec![0u8; body.len()];
    ctr_apply(cipher, iv, body, &mut out);
    unpad(&out)
}

// XOR `input` with the CTR keystream into `output`, one worker per block.
//
// Each worker owns its counter value, precomputed from the block index
// before dispatch, and writes into a distinct 16-byte slot of the output
// buffer; slot order (not completion order) fixes the final byte order, and
// the scope join guarantees every worker finished before the caller reads
// `output`. The expanded round keys inside `cipher` are shared read-only.
fn ctr_apply(cipher: &Aes128, iv: Block, input: &[u8], output: &mut [u8]) {
    debug_assert_eq!(input.len(), output.len());
    debug_assert_eq!(input.len() % BLOCK_SIZE, 0);

    thread::scope(|scope| {
        let chunks = input
            .chunks_exact(BLOCK_SIZE)
            .zip(output.chunks_exact_mut(BLOCK_SIZE));
        for (index, (src, dst)) in chunks.enumerate() {
            let counter = counter_block(iv, index as u128);
            scope.spawn(move || {
                let keystream = cipher.encrypt_block(counter);
                for (d, (s, k)) in dst.iter_mut().zip(src.iter().zip(keystream.iter())) {
                    *d = s ^ k;
                }
            });
        }
    });
}
