// Key files: one "<modulus>,<exponent>" line per key, both in decimal

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use num_traits::Zero;
use tracing::info;

use super::bigint::{parse_decimal, RsaBigInt};
use super::keygen::{RsaKeyPair, RsaPrivateKey, RsaPublicKey};
use crate::error::{RsaError, RsaResult};
use crate::util::file_ops::{read_first_line, write_line};

pub const DEFAULT_PUBLIC_KEY_PATH: &str = "./public.txt";
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "./private.txt";

/// Where the two halves of a key pair live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPaths {
    pub public_key: PathBuf,
    pub private_key: PathBuf,
}

impl Default for KeyPaths {
    fn default() -> Self {
        Self {
            public_key: PathBuf::from(DEFAULT_PUBLIC_KEY_PATH),
            private_key: PathBuf::from(DEFAULT_PRIVATE_KEY_PATH),
        }
    }
}

impl fmt::Display for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.n, self.e)
    }
}

impl fmt::Display for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.n, self.d)
    }
}

/// Split a key line into (modulus, exponent); the error is a reason string
fn parse_key_line(line: &str) -> Result<(RsaBigInt, RsaBigInt), String> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != 2 {
        return Err(format!(
            "expected 2 comma-separated integers, found {} field(s)",
            fields.len()
        ));
    }

    Ok((
        parse_field("modulus", fields[0])?,
        parse_field("exponent", fields[1])?,
    ))
}

fn parse_field(name: &str, token: &str) -> Result<RsaBigInt, String> {
    let value = parse_decimal(token.trim())
        .ok_or_else(|| format!("{} is not a decimal integer: {:?}", name, token))?;
    if value.is_zero() {
        return Err(format!("{} must be positive", name));
    }
    Ok(value)
}

impl FromStr for RsaPublicKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (n, e) = parse_key_line(s)?;
        Ok(RsaPublicKey { n, e })
    }
}

impl FromStr for RsaPrivateKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (n, d) = parse_key_line(s)?;
        Ok(RsaPrivateKey { n, d })
    }
}

/// Read the first line of a key file and parse it
fn load_key<K>(path: &Path) -> RsaResult<K>
where
    K: FromStr<Err = String>,
{
    let line = read_first_line(path)
        .map_err(|source| RsaError::KeyFileUnreadable {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| RsaError::malformed_key(path, "file is empty"))?;

    line.parse().map_err(|reason| RsaError::malformed_key(path, reason))
}

pub fn load_public_key(path: &Path) -> RsaResult<RsaPublicKey> {
    let key: RsaPublicKey = load_key(path)?;
    info!(path = %path.display(), bits = key.bit_length(), "loaded public key");
    Ok(key)
}

pub fn load_private_key(path: &Path) -> RsaResult<RsaPrivateKey> {
    let key: RsaPrivateKey = load_key(path)?;
    info!(path = %path.display(), bits = key.bit_length(), "loaded private key");
    Ok(key)
}

/// Load both keys. The moduli are not compared; a mismatched pair simply
/// fails to round-trip.
pub fn load_keypair(paths: &KeyPaths) -> RsaResult<RsaKeyPair> {
    Ok(RsaKeyPair {
        public_key: load_public_key(&paths.public_key)?,
        private_key: load_private_key(&paths.private_key)?,
    })
}

/// Write each key to its own file, public key first
pub fn save_keypair(keypair: &RsaKeyPair, paths: &KeyPaths) -> RsaResult<()> {
    write_line(&paths.public_key, &keypair.public_key.to_string())
        .map_err(|e| RsaError::io(&paths.public_key, e))?;
    write_line(&paths.private_key, &keypair.private_key.to_string())
        .map_err(|e| RsaError::io(&paths.private_key, e))?;

    info!(
        public_key = %paths.public_key.display(),
        private_key = %paths.private_key.display(),
        "saved key pair"
    );
    Ok(())
}
