// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Primes used to reject most composites before any Miller-Rabin round
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97,
];

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// 10^exp
pub fn pow10(exp: u32) -> RsaBigInt {
    from_u64(10).pow(exp)
}

/// Parse an unsigned decimal integer made of ASCII digits only
///
/// Stricter than `BigUint::from_str`, which also takes a `+` sign and `_`
/// separators.
pub fn parse_decimal(token: &str) -> Option<RsaBigInt> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    RsaBigInt::parse_bytes(token.as_bytes(), 10)
}

/// Modular exponentiation: base^exp mod modulus
///
/// Panics if `modulus` is zero, like any reduction by zero.
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }
    base.modpow(exp, modulus)
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_x = &old_x - &quotient * &x;
        old_x = std::mem::replace(&mut x, next_x);

        let next_y = &old_y - &quotient * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    (old_r, old_x, old_y)
}

/// Compute modular inverse: a^(-1) mod m, reduced into [0, m)
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let m_signed = BigInt::from(m.clone());
    let (gcd, x, _) = extended_gcd(&BigInt::from(a.clone()), &m_signed);

    if !gcd.is_one() {
        return None;
    }

    x.mod_floor(&m_signed).to_biguint()
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Draw a uniformly random integer in [0, bound)
///
/// `bound` must be non-zero.
pub fn random_below<R: Rng + ?Sized>(rng: &mut R, bound: &RsaBigInt) -> RsaBigInt {
    rng.gen_biguint_below(bound)
}

/// Probabilistic primality test: trial division by small primes, then
/// `rounds` Miller-Rabin rounds with witnesses drawn from `rng`.
/// A composite survives with probability at most 4^-rounds.
pub fn is_probable_prime<R: Rng + ?Sized>(n: &RsaBigInt, rounds: u32, rng: &mut R) -> bool {
    if n < &from_u64(2) {
        return false;
    }

    for &small in SMALL_PRIMES.iter() {
        let small = RsaBigInt::from(small);
        if *n == small {
            return true;
        }
        if (n % &small).is_zero() {
            return false;
        }
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;
    let two = from_u64(2);

    'witness: for _ in 0..rounds {
        // n > 97 here, so [2, n-1) is never empty
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = mod_pow(&a, &d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }

        return false;
    }

    true
}
