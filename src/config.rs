// Configuration file (rsa-text.toml)
// Key paths, block size, keygen bounds and logging

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RsaError, RsaResult};
use crate::rsa::blocks::{check_block_size, DEFAULT_BLOCK_SIZE};
use crate::rsa::keyfile::{KeyPaths, DEFAULT_PRIVATE_KEY_PATH, DEFAULT_PUBLIC_KEY_PATH};
use crate::rsa::keygen::{KeygenParams, DEFAULT_MAX_EXPONENT_ATTEMPTS};
use crate::rsa::prime::{
    PrimeSearch, DEFAULT_LOWER_EXPONENT, DEFAULT_MAX_PRIME_ATTEMPTS, DEFAULT_PRIMALITY_ROUNDS,
    DEFAULT_UPPER_EXPONENT,
};

/// Top-level configuration (loaded from rsa-text.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RsaTextConfig {
    pub keys: KeysConfig,
    pub cipher: CipherConfig,
    pub keygen: KeygenConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    /// Public key file (default: ./public.txt)
    pub public_key: PathBuf,
    /// Private key file (default: ./private.txt)
    pub private_key: PathBuf,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            public_key: PathBuf::from(DEFAULT_PUBLIC_KEY_PATH),
            private_key: PathBuf::from(DEFAULT_PRIVATE_KEY_PATH),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    /// Characters packed into one block (default: 2)
    pub block_size: usize,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeygenConfig {
    /// Primes are greater than 10^lower_exponent (default: 75)
    pub lower_exponent: u32,
    /// Primes are less than 10^upper_exponent (default: 100)
    pub upper_exponent: u32,
    /// Miller-Rabin rounds per candidate (default: 10)
    pub primality_rounds: u32,
    pub max_prime_attempts: u64,
    pub max_exponent_attempts: u64,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        Self {
            lower_exponent: DEFAULT_LOWER_EXPONENT,
            upper_exponent: DEFAULT_UPPER_EXPONENT,
            primality_rounds: DEFAULT_PRIMALITY_ROUNDS,
            max_prime_attempts: DEFAULT_MAX_PRIME_ATTEMPTS,
            max_exponent_attempts: DEFAULT_MAX_EXPONENT_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level or EnvFilter directive (default: info)
    pub level: String,
    /// Log format: "text" or "json"
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl RsaTextConfig {
    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> RsaResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| RsaError::io(path, e))?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            RsaError::InvalidConfig(format!("parsing {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RsaResult<()> {
        check_block_size(self.cipher.block_size)?;

        if self.keygen.lower_exponent >= self.keygen.upper_exponent {
            return Err(RsaError::InvalidConfig(format!(
                "keygen.lower_exponent ({}) must be below keygen.upper_exponent ({})",
                self.keygen.lower_exponent, self.keygen.upper_exponent
            )));
        }
        // Blocks stay below 1000^block_size = 10^(3 * block_size), and n is
        // above 10^(2 * lower_exponent) since both primes exceed 10^lower_exponent
        if 3 * self.cipher.block_size as u64 > 2 * u64::from(self.keygen.lower_exponent) {
            return Err(RsaError::InvalidConfig(format!(
                "cipher.block_size ({}) is too large for keygen.lower_exponent ({}): \
                 3 * block_size must not exceed 2 * lower_exponent",
                self.cipher.block_size, self.keygen.lower_exponent
            )));
        }
        if self.keygen.primality_rounds == 0 {
            return Err(RsaError::InvalidConfig(
                "keygen.primality_rounds must be at least 1".to_string(),
            ));
        }
        if self.keygen.max_prime_attempts == 0 || self.keygen.max_exponent_attempts == 0 {
            return Err(RsaError::InvalidConfig(
                "keygen attempt limits must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn key_paths(&self) -> KeyPaths {
        KeyPaths {
            public_key: self.keys.public_key.clone(),
            private_key: self.keys.private_key.clone(),
        }
    }

    pub fn keygen_params(&self) -> KeygenParams {
        KeygenParams {
            primes: PrimeSearch {
                rounds: self.keygen.primality_rounds,
                max_attempts: self.keygen.max_prime_attempts,
                ..PrimeSearch::with_decimal_bounds(
                    self.keygen.lower_exponent,
                    self.keygen.upper_exponent,
                )
            },
            max_exponent_attempts: Some(self.keygen.max_exponent_attempts),
        }
    }
}
