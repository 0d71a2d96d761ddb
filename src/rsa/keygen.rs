// RSA Key Generation
// Derives the public and private exponents from two primes

use rand::Rng;
use tracing::{debug, info};

use super::bigint::{from_u64, gcd, mod_inverse, random_below, RsaBigInt};
use super::ciphertext::Ciphertext;
use super::prime::{generate_distinct_primes, PrimeSearch};
use crate::error::{RsaError, RsaResult};

/// Exponent candidates drawn before giving up
pub const DEFAULT_MAX_EXPONENT_ATTEMPTS: u64 = 10_000;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt, // Modulus
    pub e: RsaBigInt, // Public exponent
}

/// RSA Private Key
///
/// The totient is not retained; `d` only makes sense together with the
/// public key generated in the same run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: RsaBigInt, // Modulus (same as public)
    pub d: RsaBigInt, // Private exponent
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
}

/// Knobs for a full key generation run
#[derive(Debug, Clone, Default)]
pub struct KeygenParams {
    pub primes: PrimeSearch,
    pub max_exponent_attempts: Option<u64>,
}

impl RsaPublicKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Encrypt a message using this public key
    pub fn encrypt(&self, plaintext: &str, block_size: usize) -> RsaResult<Ciphertext> {
        use super::encrypt::encrypt_text;
        encrypt_text(plaintext, self, block_size)
    }
}

impl RsaPrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Decrypt a ciphertext using this private key
    pub fn decrypt(&self, ciphertext: &Ciphertext, block_size: usize) -> RsaResult<String> {
        use super::decrypt::decrypt_text;
        decrypt_text(ciphertext, self, block_size)
    }
}

impl RsaKeyPair {
    /// Get the bit length of the key
    pub fn bit_length(&self) -> u64 {
        self.public_key.bit_length()
    }
}

/// Pick e: draw r from [0, totient), shift it by 2 so it never lands on 0
/// or 1, and accept it once gcd(r, totient) == 1.
pub fn choose_exponent<R: Rng + ?Sized>(
    rng: &mut R,
    totient: &RsaBigInt,
    max_attempts: u64,
) -> RsaResult<RsaBigInt> {
    let one = from_u64(1);

    for attempt in 1..=max_attempts {
        let e = random_below(rng, totient) + 2u8;
        if gcd(&e, totient) == one {
            debug!(attempt, "chose public exponent");
            return Ok(e);
        }
    }

    Err(RsaError::ExponentSearchExhausted {
        attempts: max_attempts,
    })
}

/// Build both keys from the primes p and q
pub fn derive_keys<R: Rng + ?Sized>(
    rng: &mut R,
    p: &RsaBigInt,
    q: &RsaBigInt,
    max_exponent_attempts: u64,
) -> RsaResult<RsaKeyPair> {
    let two = from_u64(2);
    if p < &two || q < &two {
        return Err(RsaError::InvalidConfig(
            "key derivation needs primes of at least 2".to_string(),
        ));
    }

    // Step 1: Compute n = p * q
    let n = p * q;

    // Step 2: Compute φ(n) = (p-1)(q-1)
    let totient = (p - 1u8) * (q - 1u8);

    // Step 3: Pick e coprime with φ(n)
    let e = choose_exponent(rng, &totient, max_exponent_attempts)?;

    // Step 4: Compute d = e^(-1) mod φ(n)
    let d = mod_inverse(&e, &totient).ok_or(RsaError::ModularInverseNotFound)?;

    Ok(RsaKeyPair {
        public_key: RsaPublicKey { n: n.clone(), e },
        private_key: RsaPrivateKey { n, d },
    })
}

/// Generate p and q, then derive a key pair from them
pub fn generate_keypair<R: Rng + ?Sized>(
    rng: &mut R,
    params: &KeygenParams,
) -> RsaResult<RsaKeyPair> {
    let (p, q) = generate_distinct_primes(rng, &params.primes)?;
    let keypair = derive_keys(
        rng,
        &p,
        &q,
        params
            .max_exponent_attempts
            .unwrap_or(DEFAULT_MAX_EXPONENT_ATTEMPTS),
    )?;

    info!(bits = keypair.bit_length(), "generated RSA key pair");
    Ok(keypair)
}
