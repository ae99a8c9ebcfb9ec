//! AES-128 key schedule and block transform.
//!
//! The cipher operates on a 4x4 matrix of bytes called the "state", stored
//! here as a flat 16-byte array in column-major order: bytes `[0..4]` are
//! column 0, bytes `[4..8]` are column 1, and so on. Because byte *i* of a
//! 128-bit value maps to row *i* mod 4, column *i* div 4, the flat index of
//! that cell is `4 * (i / 4) + (i % 4) = i` - the column-major state *is*
//! the linear byte order. Both sides of a conversation must agree on this
//! ordering or encrypt and decrypt will not interoperate.
//!
//! <https://en.wikipedia.org/wiki/Advanced_Encryption_Standard#Description_of_the_cipher>

use crate::gf::{INV_MIX, INV_SBOX, MIX, RCON, SBOX, gf_mul};

/// One 128-bit cipher block / state, column-major.
pub type Block = [u8; 16];

/// Number of rounds in AES-128.
pub const ROUNDS: usize = 10;

// SubBytes: replace each byte of the state with its S-box entry. The only
// non-linear step in the cipher.
fn sub_bytes(s: &mut Block) {
    for b in s.iter_mut() {
        *b = SBOX[*b as usize];
    }
}

fn inv_sub_bytes(s: &mut Block) {
    for b in s.iter_mut() {
        *b = INV_SBOX[*b as usize];
    }
}

// ShiftRows: cyclically rotate row i of the state left by i positions.
// In column-major storage row i is the bytes at indices {i, i+4, i+8, i+12}.
// Together with MixColumns this spreads every input byte across the whole
// state within two rounds.
fn shift_rows(s: &mut Block) {
    for row in 1..4 {
        let mut r = [s[row], s[row + 4], s[row + 8], s[row + 12]];
        r.rotate_left(row);
        [s[row], s[row + 4], s[row + 8], s[row + 12]] = r;
    }
}

// InvShiftRows: rotate row i right by i positions, undoing ShiftRows.
fn inv_shift_rows(s: &mut Block) {
    for row in 1..4 {
        let mut r = [s[row], s[row + 4], s[row + 8], s[row + 12]];
        r.rotate_right(row);
        [s[row], s[row + 4], s[row + 8], s[row + 12]] = r;
    }
}

// MixColumns / InvMixColumns: multiply each state column by a fixed 4x4
// matrix over GF(2^8). The forward and inverse variants differ only in the
// matrix used.
fn mul_columns(s: &mut Block, matrix: &[[u8; 4]; 4]) {
    for col in 0..4 {
        let base = col * 4;
        let mut out = [0u8; 4];
        for (row, cell) in out.iter_mut().enumerate() {
            for k in 0..4 {
                *cell ^= gf_mul(matrix[row][k], s[base + k]);
            }
        }
        s[base..base + 4].copy_from_slice(&out);
    }
}

fn mix_columns(s: &mut Block) {
    mul_columns(s, &MIX);
}

fn inv_mix_columns(s: &mut Block) {
    mul_columns(s, &INV_MIX);
}

// AddRoundKey: XOR the state with the round key, cell-wise. The only step
// that touches key material; XOR is its own inverse, so encryption and
// decryption share it unchanged.
fn add_round_key(s: &mut Block, round_key: &Block) {
    for (b, k) in s.iter_mut().zip(round_key.iter()) {
        *b ^= k;
    }
}

/// An AES-128 cipher instance: a 16-byte key expanded into its eleven
/// 128-bit round keys.
///
/// Expansion happens once in [`Aes128::new`]; the round keys are immutable
/// afterwards and the instance can be shared read-only across threads
/// (`&Aes128` is all the CTR workers in [`crate::modes`] ever hold).
pub struct Aes128 {
    round_keys: [Block; ROUNDS + 1],
}

impl Aes128 {
    /// Expand `key` into round keys (the AES-128 key schedule).
    ///
    /// Round key 0 is the key itself. For each later round the previous
    /// round key is treated as four 32-bit words `w0..w3`; the g-function
    /// (RotWord, SubWord, XOR with the round constant in the high byte) of
    /// `w3` seeds a new chain of four words, each XORed with its
    /// predecessor from the previous round. Deterministic and pure - any
    /// 16-byte input is a valid key.
    ///
    /// <https://en.wikipedia.org/wiki/AES_key_schedule>
    pub fn new(key: &[u8; 16]) -> Self {
        let mut round_keys = [[0u8; 16]; ROUNDS + 1];
        round_keys[0] = *key;

        for round in 1..=ROUNDS {
            let prev = round_keys[round - 1];

            // g(w3): rotate the word left one byte, substitute each byte
            // through the S-box, XOR the round constant into the high byte.
            // The rotation makes every byte of w3 influence the next round
            // key; the round constant breaks the symmetry between rounds.
            let mut g = [prev[13], prev[14], prev[15], prev[12]];
            for b in g.iter_mut() {
                *b = SBOX[*b as usize];
            }
            g[0] ^= RCON[round - 1];

            let mut next = [0u8; 16];
            for word in 0..4 {
                for j in 0..4 {
                    let carry = if word == 0 {
                        g[j]
                    } else {
                        next[(word - 1) * 4 + j]
                    };
                    next[word * 4 + j] = prev[word * 4 + j] ^ carry;
                }
            }
            round_keys[round] = next;
        }

        Self { round_keys }
    }

    /// Borrow the expanded round keys (round 0 first).
    pub fn round_keys(&self) -> &[Block; ROUNDS + 1] {
        &self.round_keys
    }

    /// Encrypt a single 16-byte block.
    ///
    /// One initial AddRoundKey (key whitening), then ten rounds of
    /// SubBytes, ShiftRows, MixColumns and AddRoundKey. The final round
    /// omits MixColumns, which keeps the inverse cipher structurally
    /// symmetric with the forward one.
    pub fn encrypt_block(&self, block: Block) -> Block {
        let mut s = block;
        add_round_key(&mut s, &self.round_keys[0]);
        for round in 1..=ROUNDS {
            sub_bytes(&mut s);
            shift_rows(&mut s);
            if round != ROUNDS {
                mix_columns(&mut s);
            }
            add_round_key(&mut s, &self.round_keys[round]);
        }
        s
    }

    /// Decrypt a single 16-byte block.
    ///
    /// The exact algebraic inverse of [`Aes128::encrypt_block`], applied in
    /// reverse order: undo the final AddRoundKey, then for each round
    /// (descending) InvShiftRows, InvSubBytes, AddRoundKey and
    /// InvMixColumns. The mixing step is skipped when undoing round 1,
    /// mirroring the forward pass skipping it in round 10.
    pub fn decrypt_block(&self, block: Block) -> Block {
        let mut s = block;
        add_round_key(&mut s, &self.round_keys[ROUNDS]);
        for round in (1..=ROUNDS).rev() {
            inv_shift_rows(&mut s);
            inv_sub_bytes(&mut s);
            add_round_key(&mut s, &self.round_keys[round - 1]);
            if round != 1 {
                inv_mix_columns(&mut s);
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(hex_str: &str) -> Block {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn fips197_appendix_c1_known_answer() {
        let key = block("000102030405060708090a0b0c0d0e0f");
        let cipher = Aes128::new(&key);
        let pt = block("00112233445566778899aabbccddeeff");
        let ct = cipher.encrypt_block(pt);
        assert_eq!(hex::encode(ct), "69c4e0d86a7b0430d8cdb78070b4c55a");
        assert_eq!(cipher.decrypt_block(ct), pt);
    }

    #[test]
    fn picnic_block_known_answer() {
        // 15-byte message, one 0x01 pad byte appended to fill the block.
        let cipher = Aes128::new(b"BUET CSE20 Batch");
        let pt: Block = *b"We need picnicc\x01";
        let ct = cipher.encrypt_block(pt);
        assert_eq!(hex::encode(ct), "b74f755de030097ad52fc069bd8faf1e");
        assert_eq!(cipher.decrypt_block(ct), pt);
    }

    #[test]
    fn key_schedule_fixtures() {
        let cipher = Aes128::new(b"BUET CSE20 Batch");
        let rk = cipher.round_keys();
        assert_eq!(rk[0], *b"BUET CSE20 Batch");
        assert_eq!(hex::encode(rk[1]), "d1ae00bbf1ed53fec3dd73bca2a910d4");
        assert_eq!(hex::encode(rk[10]), "e4babc03bb04f59630222058548aec67");
    }

    #[test]
    fn key_schedule_is_deterministic() {
        let key = *b"0123456789abcdef";
        let a = Aes128::new(&key);
        let b = Aes128::new(&key);
        assert_eq!(a.round_keys(), b.round_keys());
    }

    #[test]
    fn round_primitives_invert_each_other() {
        let original: Block = core::array::from_fn(|i| (i as u8).wrapping_mul(37).wrapping_add(5));

        let mut s = original;
        sub_bytes(&mut s);
        inv_sub_bytes(&mut s);
        assert_eq!(s, original);

        shift_rows(&mut s);
        inv_shift_rows(&mut s);
        assert_eq!(s, original);

        mix_columns(&mut s);
        inv_mix_columns(&mut s);
        assert_eq!(s, original);
    }

    #[test]
    fn shift_rows_moves_rows_not_columns() {
        // State with byte value = flat index; row i (indices i, i+4, i+8,
        // i+12) must rotate left by i.
        let mut s: Block = core::array::from_fn(|i| i as u8);
        shift_rows(&mut s);
        assert_eq!(s[0], 0); // row 0 untouched
        assert_eq!([s[1], s[5], s[9], s[13]], [5, 9, 13, 1]);
        assert_eq!([s[2], s[6], s[10], s[14]], [10, 14, 2, 6]);
        assert_eq!([s[3], s[7], s[11], s[15]], [15, 3, 7, 11]);
    }

    #[test]
    fn encrypt_decrypt_round_trip_random_blocks() {
        let cipher = Aes128::new(b"sixteen byte key");
        let mut block = [0x5Au8; 16];
        for _ in 0..64 {
            // cheap LCG-ish churn so each iteration sees a different block
            for b in block.iter_mut() {
                *b = b.wrapping_mul(167).wrapping_add(13);
            }
            assert_eq!(cipher.decrypt_block(cipher.encrypt_block(block)), block);
        }
    }
}
