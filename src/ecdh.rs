//! Elliptic-curve Diffie-Hellman over randomly generated short-Weierstrass
//! curves.
//!
//! Curves are of the form `y^2 = x^3 + ax + b (mod p)` with `b` *derived*
//! from a randomly sampled base point rather than chosen, which forces the
//! point onto the curve by construction. Both parties then agree on a secret
//! via commuting scalar multiplications:
//! `ka * (kb * G) == kb * (ka * G)`.
//!
//! ## Security caveats
//!
//! This module reproduces a reference key-exchange design for
//! interoperability and study, and deliberately keeps its known gaps rather
//! than silently repairing them:
//!
//! * `p` comes from a probabilistic prime sampler; the group order of the
//!   resulting curve is never computed, so nothing guarantees a large prime
//!   subgroup. Real ECDH uses standardized curves for exactly this reason.
//! * Scalar multiplication guards its add step with an accumulator
//!   equality check against the base point instead of a point-at-infinity
//!   check. The guard is correct for the common case (skipping the add on
//!   the leading bit) but misbehaves if the accumulator legitimately
//!   re-equals the base point mid-run.
//! * Arithmetic is not constant-time.
//!
//! Do not use this for anything that needs to stay secret.

use num_bigint::{BigInt, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::thread_rng;

use crate::{Error, Result};

/// An affine point on a curve.
///
/// The point at infinity (the group's neutral element) has no explicit
/// representation; it only ever arises as the pre-seed state of the
/// scalar-multiplication accumulator, which models it as [`None`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    pub x: BigInt,
    pub y: BigInt,
}

/// Parameters of one generated curve: `y^2 = x^3 + ax + b (mod p)` with
/// base point `g`.
#[derive(Debug, Clone)]
pub struct CurveParams {
    pub a: BigInt,
    pub b: BigInt,
    pub g: Point,
    pub p: BigInt,
}

/// Modular exponentiation `base^exp mod m` by square-and-multiply.
pub fn mod_pow(base: &BigInt, exp: &BigInt, m: &BigInt) -> BigInt {
    base.mod_floor(m).modpow(exp, m)
}

/// Modular inverse via Fermat's little theorem: `v^(m-2) mod m`, valid for
/// prime `m`.
///
/// A value sharing a nontrivial factor with the modulus has no inverse;
/// that surfaces as [`Error::NoModularInverse`] instead of being coerced to
/// a wrong answer.
pub fn mod_inverse(v: &BigInt, m: &BigInt) -> Result<BigInt> {
    let v = v.mod_floor(m);
    if v.gcd(m) != BigInt::one() {
        return Err(Error::NoModularInverse);
    }
    Ok(v.modpow(&(m - 2), m))
}

/// Double a point: the tangent-line rule of the affine group law.
///
/// Fails with [`Error::NoModularInverse`] when the tangent is vertical
/// (`2y` not invertible), i.e. the doubling would land on the point at
/// infinity.
pub fn point_double(point: &Point, a: &BigInt, p: &BigInt) -> Result<Point> {
    let three = BigInt::from(3);
    let two = BigInt::from(2);
    let slope =
        ((&three * &point.x * &point.x + a) * mod_inverse(&(&two * &point.y), p)?).mod_floor(p);
    let x3 = (&slope * &slope - &two * &point.x).mod_floor(p);
    let y3 = (&slope * (&point.x - &x3) - &point.y).mod_floor(p);
    Ok(Point { x: x3, y: y3 })
}

/// Add two distinct points: the chord-line rule of the affine group law.
///
/// Fails with [`Error::NoModularInverse`] when the chord is vertical
/// (`x2 - x1` not invertible), which includes the doubling case `p1 == p2`;
/// callers use [`point_double`] for that.
pub fn point_add(p1: &Point, p2: &Point, p: &BigInt) -> Result<Point> {
    let slope = ((&p2.y - &p1.y) * mod_inverse(&(&p2.x - &p1.x), p)?).mod_floor(p);
    let x3 = (&slope * &slope - &p1.x - &p2.x).mod_floor(p);
    let y3 = (&slope * (&p1.x - &x3) - &p1.y).mod_floor(p);
    Ok(Point { x: x3, y: y3 })
}

/// Compute `k * point` by MSB-first double-and-add.
///
/// The accumulator is seeded with `point` on the leading bit (every
/// positive scalar's leading bit is 1), doubled on each subsequent bit, and
/// `point` is added whenever the current bit is set *and the accumulator is
/// not exactly `point`*. That guard is what skips the redundant add on the
/// leading bit; see the module docs for why it is also a known correctness
/// gap. `k = 0` is treated as a single zero bit and returns `point`
/// unchanged, matching the reference behavior.
pub fn scalar_multiply(k: &BigInt, point: &Point, a: &BigInt, p: &BigInt) -> Result<Point> {
    let bits = k.bits().max(1);
    let mut acc = point.clone();
    let mut seeded = false;
    for i in (0..bits).rev() {
        if seeded {
            acc = point_double(&acc, a, p)?;
        } else {
            seeded = true;
        }
        if k.bit(i) && acc != *point {
            acc = point_add(&acc, point, p)?;
        }
    }
    Ok(acc)
}

/// Generate curve parameters of the requested bit length.
///
/// `a` and the base point coordinates are random n-bit integers, `p` is a
/// probable prime of the same length, and `b` is solved from the curve
/// equation so that `G` lies on the curve by construction. Parameter sets
/// whose discriminant `4a^3 + 27b^2` vanishes mod `p` describe a singular
/// curve and are thrown away; generation retries with fresh randomness
/// until it has a non-singular curve, so callers never observe a degenerate
/// set.
pub fn generate_curve_params(bits: u64) -> CurveParams {
    let mut rng = thread_rng();
    loop {
        let a: BigInt = random_nbit(&mut rng, bits);
        let gx: BigInt = random_nbit(&mut rng, bits);
        let gy: BigInt = random_nbit(&mut rng, bits);
        let p = generate_prime(&mut rng, bits);

        let b = (&gy * &gy - &gx * &gx * &gx - &a * &gx).mod_floor(&p);
        let discriminant =
            (BigInt::from(4) * &a * &a * &a + BigInt::from(27) * &b * &b).mod_floor(&p);
        if !discriminant.is_zero() {
            return CurveParams {
                a,
                b,
                g: Point { x: gx, y: gy },
                p,
            };
        }
    }
}

/// Generate a random private key in `[0, 2^bits)`.
pub fn generate_private_key(bits: u64) -> BigInt {
    thread_rng().gen_biguint(bits).into()
}

/// Compute the public point `private * G` for a curve.
pub fn public_key(private: &BigInt, params: &CurveParams) -> Result<Point> {
    scalar_multiply(private, &params.g, &params.a, &params.p)
}

/// Compute the shared secret: the x-coordinate of `private * peer_public`.
///
/// By commutativity of scalar multiplication both parties arrive at the
/// same integer.
pub fn shared_secret(private: &BigInt, peer_public: &Point, params: &CurveParams) -> Result<BigInt> {
    Ok(scalar_multiply(private, peer_public, &params.a, &params.p)?.x)
}

// A random integer of exactly `bits` bits (top bit forced to 1).
fn random_nbit(rng: &mut impl RandBigInt, bits: u64) -> BigInt {
    let mut v = rng.gen_biguint(bits);
    v.set_bit(bits - 1, true);
    v.into()
}

// Sample odd n-bit candidates until one passes Miller-Rabin. 40 rounds puts
// the false-positive probability below 4^-40.
fn generate_prime(rng: &mut impl RandBigInt, bits: u64) -> BigInt {
    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);
        let candidate: BigInt = candidate.into();
        if is_probable_prime(&candidate, 40, rng) {
            return candidate;
        }
    }
}

// Miller-Rabin with random bases, preceded by trial division against small
// primes to throw out the bulk of composites cheaply.
fn is_probable_prime(n: &BigInt, rounds: usize, rng: &mut impl RandBigInt) -> bool {
    const SMALL_PRIMES: [u32; 25] = [
        2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83,
        89, 97,
    ];

    let two = BigInt::from(2);
    if n < &two {
        return false;
    }
    for &sp in SMALL_PRIMES.iter() {
        let sp = BigInt::from(sp);
        if *n == sp {
            return true;
        }
        if n.mod_floor(&sp).is_zero() {
            return false;
        }
    }

    // write n-1 as 2^r * d with d odd
    let n_minus_1 = n - BigInt::one();
    let r = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> r;

    'witness: for _ in 0..rounds {
        let a = rng.gen_bigint_range(&two, &n_minus_1);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue;
        }
        for _ in 1..r {
            x = (&x * &x).mod_floor(n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    // Small enough to keep the test fast, large enough that degenerate
    // curves and inverse failures are vanishingly unlikely.
    const TEST_BITS: u64 = 64;

    fn assert_on_curve(point: &Point, params: &CurveParams) {
        let lhs = (&point.y * &point.y).mod_floor(&params.p);
        let rhs = (&point.x * &point.x * &point.x + &params.a * &point.x + &params.b)
            .mod_floor(&params.p);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn mod_pow_matches_known_values() {
        let m = BigInt::from(1000000007u64);
        assert_eq!(
            mod_pow(&BigInt::from(2), &BigInt::from(100), &m),
            BigInt::from(976371285u64)
        );
        assert_eq!(mod_pow(&BigInt::from(5), &BigInt::zero(), &m), BigInt::one());
    }

    #[test]
    fn mod_inverse_round_trips() {
        let p = BigInt::from(104729); // prime
        for v in [2u32, 3, 1000, 104728] {
            let v = BigInt::from(v);
            let inv = mod_inverse(&v, &p).unwrap();
            assert_eq!((v * inv).mod_floor(&p), BigInt::one());
        }
    }

    #[test]
    fn mod_inverse_reports_shared_factor() {
        // 6 and 15 share the factor 3
        assert_eq!(
            mod_inverse(&BigInt::from(6), &BigInt::from(15)),
            Err(Error::NoModularInverse)
        );
        assert_eq!(
            mod_inverse(&BigInt::zero(), &BigInt::from(7)),
            Err(Error::NoModularInverse)
        );
    }

    #[test]
    fn miller_rabin_agrees_with_known_classification() {
        let mut rng = thread_rng();
        for p in [2u64, 3, 5, 97, 7919, 2147483647, 67280421310721] {
            assert!(
                is_probable_prime(&BigInt::from(p), 20, &mut rng),
                "{p} should test prime"
            );
        }
        // includes Carmichael numbers 561 and 41041
        for c in [1u64, 4, 100, 561, 41041, 7917, 2147483649] {
            assert!(
                !is_probable_prime(&BigInt::from(c), 20, &mut rng),
                "{c} should test composite"
            );
        }
    }

    #[test]
    fn generated_base_point_is_on_the_curve() {
        let params = generate_curve_params(TEST_BITS);
        assert_on_curve(&params.g, &params);
        // discriminant must be non-zero mod p
        let disc = (BigInt::from(4) * &params.a * &params.a * &params.a
            + BigInt::from(27) * &params.b * &params.b)
            .mod_floor(&params.p);
        assert!(!disc.is_zero());
    }

    #[test]
    fn doubling_and_adding_stay_on_the_curve() {
        let params = generate_curve_params(TEST_BITS);
        let doubled = point_double(&params.g, &params.a, &params.p).unwrap();
        assert_on_curve(&doubled, &params);
        let tripled = point_add(&doubled, &params.g, &params.p).unwrap();
        assert_on_curve(&tripled, &params);
    }

    #[test]
    fn small_scalars_match_repeated_addition() {
        let params = generate_curve_params(TEST_BITS);
        let g = &params.g;
        let two_g = point_double(g, &params.a, &params.p).unwrap();
        let three_g = point_add(&two_g, g, &params.p).unwrap();
        let four_g = point_double(&two_g, &params.a, &params.p).unwrap();

        assert_eq!(
            scalar_multiply(&BigInt::from(2), g, &params.a, &params.p).unwrap(),
            two_g
        );
        assert_eq!(
            scalar_multiply(&BigInt::from(3), g, &params.a, &params.p).unwrap(),
            three_g
        );
        assert_eq!(
            scalar_multiply(&BigInt::from(4), g, &params.a, &params.p).unwrap(),
            four_g
        );
    }

    #[test]
    fn ecdh_commutes() {
        let params = generate_curve_params(TEST_BITS);
        let ka = generate_private_key(TEST_BITS);
        let kb = generate_private_key(TEST_BITS);

        let pub_a = public_key(&ka, &params).unwrap();
        let pub_b = public_key(&kb, &params).unwrap();

        let secret_a = shared_secret(&ka, &pub_b, &params).unwrap();
        let secret_b = shared_secret(&kb, &pub_a, &params).unwrap();
        assert_eq!(secret_a, secret_b);
    }
}
