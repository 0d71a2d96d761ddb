// Error types shared by the key, block and cipher layers

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for RSA operations
pub type RsaResult<T> = Result<T, RsaError>;

#[derive(Debug, Error)]
pub enum RsaError {
    #[error("cannot read key file {path}: {source}")]
    KeyFileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed key file {path}: {reason}")]
    KeyFileMalformed { path: PathBuf, reason: String },

    #[error("ciphertext token #{index} is not a decimal integer: {token:?}")]
    CiphertextTokenMalformed { index: usize, token: String },

    #[error("ciphertext file {path} contains no line")]
    CiphertextFileEmpty { path: PathBuf },

    #[error("character {ch:?} at position {position} has code point {code_point}, outside 1..{radix}")]
    CodePointOutOfRange {
        ch: char,
        position: usize,
        code_point: u32,
        radix: u32,
    },

    #[error("block #{index} does not unpack into {block_size} characters")]
    BlockOutOfRange { index: usize, block_size: usize },

    #[error("padding sentinel found inside block #{index}")]
    MisplacedPadding { index: usize },

    #[error("block size must be in 1..={max}, got {got}")]
    InvalidBlockSize { got: usize, max: usize },

    #[error("no modular inverse of the public exponent modulo the totient")]
    ModularInverseNotFound,

    #[error("no probable prime found after {attempts} attempts")]
    PrimeSearchExhausted { attempts: u64 },

    #[error("no exponent coprime with the totient found after {attempts} attempts")]
    ExponentSearchExhausted { attempts: u64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RsaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RsaError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed_key(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        RsaError::KeyFileMalformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
