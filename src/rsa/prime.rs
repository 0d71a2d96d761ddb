// Probable prime search between two bounds

use rand::Rng;
use tracing::debug;

use super::bigint::{is_probable_prime, pow10, random_below, RsaBigInt};
use crate::error::{RsaError, RsaResult};

/// Decimal exponent of the exclusive lower bound for p and q
pub const DEFAULT_LOWER_EXPONENT: u32 = 75;
/// Decimal exponent of the exclusive upper bound for p and q
pub const DEFAULT_UPPER_EXPONENT: u32 = 100;
/// Miller-Rabin rounds per candidate
pub const DEFAULT_PRIMALITY_ROUNDS: u32 = 10;
/// Candidates drawn before a search gives up
pub const DEFAULT_MAX_PRIME_ATTEMPTS: u64 = 1_000_000;

/// Parameters of one generate-and-test prime search
#[derive(Debug, Clone, PartialEq)]
pub struct PrimeSearch {
    /// Candidates must be strictly greater than this
    pub lower: RsaBigInt,
    /// Candidates are drawn from [0, upper)
    pub upper: RsaBigInt,
    pub rounds: u32,
    pub max_attempts: u64,
}

impl Default for PrimeSearch {
    fn default() -> Self {
        Self {
            lower: pow10(DEFAULT_LOWER_EXPONENT),
            upper: pow10(DEFAULT_UPPER_EXPONENT),
            rounds: DEFAULT_PRIMALITY_ROUNDS,
            max_attempts: DEFAULT_MAX_PRIME_ATTEMPTS,
        }
    }
}

impl PrimeSearch {
    /// Search over (10^lower_exp, 10^upper_exp)
    pub fn with_decimal_bounds(lower_exp: u32, upper_exp: u32) -> Self {
        Self {
            lower: pow10(lower_exp),
            upper: pow10(upper_exp),
            ..Self::default()
        }
    }

    fn validate(&self) -> RsaResult<()> {
        // The open interval (lower, upper) has to contain at least one integer
        if &self.lower + 1u8 >= self.upper {
            return Err(RsaError::InvalidConfig(format!(
                "prime bounds are empty: lower {} must be below upper {} - 1",
                self.lower, self.upper
            )));
        }
        if self.rounds == 0 {
            return Err(RsaError::InvalidConfig(
                "primality rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Draw uniformly from [0, upper) until a candidate exceeds `lower` and
/// passes the primality test.
pub fn generate_prime<R: Rng + ?Sized>(rng: &mut R, search: &PrimeSearch) -> RsaResult<RsaBigInt> {
    search.validate()?;

    let mut below_lower = 0u64;
    for attempt in 1..=search.max_attempts {
        let candidate = random_below(rng, &search.upper);

        if candidate <= search.lower {
            below_lower += 1;
            continue;
        }

        if is_probable_prime(&candidate, search.rounds, rng) {
            debug!(attempt, below_lower, bits = candidate.bits(), "found probable prime");
            return Ok(candidate);
        }
    }

    Err(RsaError::PrimeSearchExhausted {
        attempts: search.max_attempts,
    })
}

/// Generate p and q with q != p, redrawing q on a collision
///
/// Redraws share the `max_attempts` budget, so a range holding a single
/// prime fails with `PrimeSearchExhausted` instead of spinning.
pub fn generate_distinct_primes<R: Rng + ?Sized>(
    rng: &mut R,
    search: &PrimeSearch,
) -> RsaResult<(RsaBigInt, RsaBigInt)> {
    let p = generate_prime(rng, search)?;

    for redraw in 1..=search.max_attempts {
        let q = generate_prime(rng, search)?;
        if q != p {
            return Ok((p, q));
        }
        debug!(redraw, "q collided with p, redrawing");
    }

    Err(RsaError::PrimeSearchExhausted {
        attempts: search.max_attempts,
    })
}
