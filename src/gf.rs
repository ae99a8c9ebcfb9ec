//! GF(2^8) arithmetic and the constant tables AES is built from.
//!
//! GF(2^8) is a finite field with 256 elements where addition is XOR and
//! multiplication is carry-less polynomial multiplication followed by
//! reduction modulo an irreducible polynomial. Rijndael fixes that polynomial
//! as x^8+x^4+x^3+x+1 (bit pattern `1_0001_1011`, 0x11B); a different choice
//! would give a different field and an incompatible cipher.
//!
//! <https://en.wikipedia.org/wiki/Finite_field_arithmetic#Rijndael's_(AES)_finite_field>

/// The Rijndael reduction polynomial x^8+x^4+x^3+x+1.
///
/// Only the low 8 bits (0x1B) are ever XORed in during reduction - the x^8
/// term is the bit that was just shifted out.
pub const POLY: u16 = 0x11B;

/// Multiply two bytes in GF(2^8) modulo [`POLY`].
///
/// Russian-peasant style: walk the bits of `b`, adding (XOR) a copy of `a`
/// for each set bit and reducing `a` whenever multiplying it by x overflows
/// 8 bits. Pure function, no failure modes.
#[inline]
pub fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    for _ in 0..8 {
        if b & 1 != 0 {
            product ^= a;
        }
        let overflow = a & 0x80 != 0;
        a <<= 1;
        if overflow {
            a ^= POLY as u8; // drop the x^8 term, XOR in the low 8 bits
        }
        b >>= 1;
    }
    product
}

// The round constants rc_1..rc_10 of the AES key schedule are successive
// doublings in GF(2^8) starting from 0x01, reduced by 0x11B whenever the
// high bit overflows. Each constant occupies the high byte of a 32-bit word
// (rc || 00 || 00 || 00); only the byte is stored here.
const fn make_rcon() -> [u8; 10] {
    let mut rcon = [0u8; 10];
    let mut rc: u16 = 0x01;
    let mut i = 0;
    while i < 10 {
        rcon[i] = rc as u8;
        rc <<= 1;
        if rc & 0x100 != 0 {
            rc ^= POLY;
        }
        i += 1;
    }
    rcon
}

/// Key-schedule round constants, one per AES-128 round.
pub const RCON: [u8; 10] = make_rcon();

/// The MixColumns matrix: rows are cyclic shifts of `[02, 03, 01, 01]`.
///
/// Each state column is multiplied by this matrix in GF(2^8). It is an MDS
/// matrix, so any change in one input byte of a column affects all four
/// output bytes - the diffusion half of AES.
///
/// <https://en.wikipedia.org/wiki/Rijndael_MixColumns>
pub const MIX: [[u8; 4]; 4] = [
    [0x02, 0x03, 0x01, 0x01],
    [0x01, 0x02, 0x03, 0x01],
    [0x01, 0x01, 0x02, 0x03],
    [0x03, 0x01, 0x01, 0x02],
];

/// The inverse MixColumns matrix: rows are cyclic shifts of
/// `[0E, 0B, 0D, 09]`. `INV_MIX * MIX` is the identity over GF(2^8).
pub const INV_MIX: [[u8; 4]; 4] = [
    [0x0E, 0x0B, 0x0D, 0x09],
    [0x09, 0x0E, 0x0B, 0x0D],
    [0x0D, 0x09, 0x0E, 0x0B],
    [0x0B, 0x0D, 0x09, 0x0E],
];

// The AES S-box: the multiplicative inverse of each byte in GF(2^8) (with 0
// mapped to 0) followed by a fixed affine transformation over GF(2). It is
// the only non-linear step in the cipher and is stored as a literal table -
// substitution is a lookup, never a recomputation, and the table values are
// themselves test-critical fixtures.
// https://en.wikipedia.org/wiki/Rijndael_S-box
#[rustfmt::skip]
pub const SBOX: [u8; 256] = [
    0x63, 0x7C, 0x77, 0x7B, 0xF2, 0x6B, 0x6F, 0xC5, 0x30, 0x01, 0x67, 0x2B, 0xFE, 0xD7, 0xAB, 0x76,
    0xCA, 0x82, 0xC9, 0x7D, 0xFA, 0x59, 0x47, 0xF0, 0xAD, 0xD4, 0xA2, 0xAF, 0x9C, 0xA4, 0x72, 0xC0,
    0xB7, 0xFD, 0x93, 0x26, 0x36, 0x3F, 0xF7, 0xCC, 0x34, 0xA5, 0xE5, 0xF1, 0x71, 0xD8, 0x31, 0x15,
    0x04, 0xC7, 0x23, 0xC3, 0x18, 0x96, 0x05, 0x9A, 0x07, 0x12, 0x80, 0xE2, 0xEB, 0x27, 0xB2, 0x75,
    0x09, 0x83, 0x2C, 0x1A, 0x1B, 0x6E, 0x5A, 0xA0, 0x52, 0x3B, 0xD6, 0xB3, 0x29, 0xE3, 0x2F, 0x84,
    0x53, 0xD1, 0x00, 0xED, 0x20, 0xFC, 0xB1, 0x5B, 0x6A, 0xCB, 0xBE, 0x39, 0x4A, 0x4C, 0x58, 0xCF,
    0xD0, 0xEF, 0xAA, 0xFB, 0x43, 0x4D, 0x33, 0x85, 0x45, 0xF9, 0x02, 0x7F, 0x50, 0x3C, 0x9F, 0xA8,
    0x51, 0xA3, 0x40, 0x8F, 0x92, 0x9D, 0x38, 0xF5, 0xBC, 0xB6, 0xDA, 0x21, 0x10, 0xFF, 0xF3, 0xD2,
    0xCD, 0x0C, 0x13, 0xEC, 0x5F, 0x97, 0x44, 0x17, 0xC4, 0xA7, 0x7E, 0x3D, 0x64, 0x5D, 0x19, 0x73,
    0x60, 0x81, 0x4F, 0xDC, 0x22, 0x2A, 0x90, 0x88, 0x46, 0xEE, 0xB8, 0x14, 0xDE, 0x5E, 0x0B, 0xDB,
    0xE0, 0x32, 0x3A, 0x0A, 0x49, 0x06, 0x24, 0x5C, 0xC2, 0xD3, 0xAC, 0x62, 0x91, 0x95, 0xE4, 0x79,
    0xE7, 0xC8, 0x37, 0x6D, 0x8D, 0xD5, 0x4E, 0xA9, 0x6C, 0x56, 0xF4, 0xEA, 0x65, 0x7A, 0xAE, 0x08,
    0xBA, 0x78, 0x25, 0x2E, 0x1C, 0xA6, 0xB4, 0xC6, 0xE8, 0xDD, 0x74, 0x1F, 0x4B, 0xBD, 0x8B, 0x8A,
    0x70, 0x3E, 0xB5, 0x66, 0x48, 0x03, 0xF6, 0x0E, 0x61, 0x35, 0x57, 0xB9, 0x86, 0xC1, 0x1D, 0x9E,
    0xE1, 0xF8, 0x98, 0x11, 0x69, 0xD9, 0x8E, 0x94, 0x9B, 0x1E, 0x87, 0xE9, 0xCE, 0x55, 0x28, 0xDF,
    0x8C, 0xA1, 0x89, 0x0D, 0xBF, 0xE6, 0x42, 0x68, 0x41, 0x99, 0x2D, 0x0F, 0xB0, 0x54, 0xBB, 0x16,
];

// The inverse S-box: the exact inverse permutation of SBOX, so
// INV_SBOX[SBOX[x]] == x for every byte value.
// https://en.wikipedia.org/wiki/Rijndael_S-box#Inverse_S-box
#[rustfmt::skip]
pub const INV_SBOX: [u8; 256] = [
    0x52, 0x09, 0x6A, 0xD5, 0x30, 0x36, 0xA5, 0x38, 0xBF, 0x40, 0xA3, 0x9E, 0x81, 0xF3, 0xD7, 0xFB,
    0x7C, 0xE3, 0x39, 0x82, 0x9B, 0x2F, 0xFF, 0x87, 0x34, 0x8E, 0x43, 0x44, 0xC4, 0xDE, 0xE9, 0xCB,
    0x54, 0x7B, 0x94, 0x32, 0xA6, 0xC2, 0x23, 0x3D, 0xEE, 0x4C, 0x95, 0x0B, 0x42, 0xFA, 0xC3, 0x4E,
    0x08, 0x2E, 0xA1, 0x66, 0x28, 0xD9, 0x24, 0xB2, 0x76, 0x5B, 0xA2, 0x49, 0x6D, 0x8B, 0xD1, 0x25,
    0x72, 0xF8, 0xF6, 0x64, 0x86, 0x68, 0x98, 0x16, 0xD4, 0xA4, 0x5C, 0xCC, 0x5D, 0x65, 0xB6, 0x92,
    0x6C, 0x70, 0x48, 0x50, 0xFD, 0xED, 0xB9, 0xDA, 0x5E, 0x15, 0x46, 0x57, 0xA7, 0x8D, 0x9D, 0x84,
    0x90, 0xD8, 0xAB, 0x00, 0x8C, 0xBC, 0xD3, 0x0A, 0xF7, 0xE4, 0x58, 0x05, 0xB8, 0xB3, 0x45, 0x06,
    0xD0, 0x2C, 0x1E, 0x8F, 0xCA, 0x3F, 0x0F, 0x02, 0xC1, 0xAF, 0xBD, 0x03, 0x01, 0x13, 0x8A, 0x6B,
    0x3A, 0x91, 0x11, 0x41, 0x4F, 0x67, 0xDC, 0xEA, 0x97, 0xF2, 0xCF, 0xCE, 0xF0, 0xB4, 0xE6, 0x73,
    0x96, 0xAC, 0x74, 0x22, 0xE7, 0xAD, 0x35, 0x85, 0xE2, 0xF9, 0x37, 0xE8, 0x1C, 0x75, 0xDF, 0x6E,
    0x47, 0xF1, 0x1A, 0x71, 0x1D, 0x29, 0xC5, 0x89, 0x6F, 0xB7, 0x62, 0x0E, 0xAA, 0x18, 0xBE, 0x1B,
    0xFC, 0x56, 0x3E, 0x4B, 0xC6, 0xD2, 0x79, 0x20, 0x9A, 0xDB, 0xC0, 0xFE, 0x78, 0xCD, 0x5A, 0xF4,
    0x1F, 0xDD, 0xA8, 0x33, 0x88, 0x07, 0xC7, 0x31, 0xB1, 0x12, 0x10, 0x59, 0x27, 0x80, 0xEC, 0x5F,
    0x60, 0x51, 0x7F, 0xA9, 0x19, 0xB5, 0x4A, 0x0D, 0x2D, 0xE5, 0x7A, 0x9F, 0x93, 0xC9, 0x9C, 0xEF,
    0xA0, 0xE0, 0x3B, 0x4D, 0xAE, 0x2A, 0xF5, 0xB0, 0xC8, 0xEB, 0xBB, 0x3C, 0x83, 0x53, 0x99, 0x61,
    0x17, 0x2B, 0x04, 0x7E, 0xBA, 0x77, 0xD6, 0x26, 0xE1, 0x69, 0x14, 0x63, 0x55, 0x21, 0x0C, 0x7D,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gf_mul_known_products() {
        // The worked example from FIPS-197 §4.2: {57} x {83} = {C1}.
        assert_eq!(gf_mul(0x57, 0x83), 0xC1);
        // {57} x {02} = xtime({57}) = {AE}, and {57} x {04} = {47}.
        assert_eq!(gf_mul(0x57, 0x02), 0xAE);
        assert_eq!(gf_mul(0x57, 0x04), 0x47);
    }

    #[test]
    fn gf_mul_identity_and_zero() {
        for x in 0..=255u8 {
            assert_eq!(gf_mul(x, 0x01), x);
            assert_eq!(gf_mul(0x01, x), x);
            assert_eq!(gf_mul(x, 0x00), 0);
        }
    }

    #[test]
    fn gf_mul_commutes() {
        for a in (0..=255u8).step_by(7) {
            for b in (0..=255u8).step_by(11) {
                assert_eq!(gf_mul(a, b), gf_mul(b, a));
            }
        }
    }

    #[test]
    fn rcon_matches_doubling_sequence() {
        assert_eq!(
            RCON,
            [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1B, 0x36]
        );
    }

    #[test]
    fn sbox_spot_values() {
        assert_eq!(SBOX[0x00], 0x63);
        assert_eq!(SBOX[0x01], 0x7C);
        assert_eq!(SBOX[0x53], 0xED);
        assert_eq!(SBOX[0xFF], 0x16);
    }

    #[test]
    fn sbox_is_a_permutation_with_exact_inverse() {
        let mut seen = [false; 256];
        for x in 0..=255u8 {
            let s = SBOX[x as usize];
            assert!(!seen[s as usize], "S-box value {s:#04x} repeated");
            seen[s as usize] = true;
            assert_eq!(INV_SBOX[s as usize], x);
            assert_eq!(SBOX[INV_SBOX[x as usize] as usize], x);
        }
    }

    #[test]
    fn mix_matrices_are_inverses() {
        // INV_MIX * MIX over GF(2^8) must be the identity matrix.
        for i in 0..4 {
            for j in 0..4 {
                let mut cell = 0u8;
                for k in 0..4 {
                    cell ^= gf_mul(INV_MIX[i][k], MIX[k][j]);
                }
                assert_eq!(cell, u8::from(i == j));
            }
        }
    }
}
