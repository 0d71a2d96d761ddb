// Ciphertext: ordered encrypted blocks and their decimal text form

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use super::bigint::{parse_decimal, RsaBigInt};
use crate::error::{RsaError, RsaResult};
use crate::util::file_ops::{read_first_line, write_line};

/// Encrypted blocks in plaintext order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ciphertext(Vec<RsaBigInt>);

impl Ciphertext {
    pub fn new(blocks: Vec<RsaBigInt>) -> Self {
        Self(blocks)
    }

    pub fn blocks(&self) -> &[RsaBigInt] {
        &self.0
    }

    pub fn into_blocks(self) -> Vec<RsaBigInt> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<RsaBigInt>> for Ciphertext {
    fn from(blocks: Vec<RsaBigInt>) -> Self {
        Self(blocks)
    }
}

/// Space-separated decimal tokens, one per block
impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", block)?;
        }
        Ok(())
    }
}

impl FromStr for Ciphertext {
    type Err = RsaError;

    /// Any whitespace separates tokens; blank input is an empty ciphertext
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .enumerate()
            .map(|(index, token)| {
                parse_decimal(token).ok_or_else(|| RsaError::CiphertextTokenMalformed {
                    index,
                    token: token.to_string(),
                })
            })
            .collect::<RsaResult<Vec<_>>>()
            .map(Ciphertext)
    }
}

/// Store the ciphertext as a single line
pub fn write_ciphertext_file(path: &Path, ciphertext: &Ciphertext) -> RsaResult<()> {
    write_line(path, &ciphertext.to_string()).map_err(|e| RsaError::io(path, e))?;
    info!(path = %path.display(), blocks = ciphertext.len(), "wrote ciphertext");
    Ok(())
}

/// Read the first line of a ciphertext file
pub fn read_ciphertext_file(path: &Path) -> RsaResult<Ciphertext> {
    let line = read_first_line(path)
        .map_err(|e| RsaError::io(path, e))?
        .ok_or_else(|| RsaError::CiphertextFileEmpty {
            path: path.to_path_buf(),
        })?;
    line.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;

    #[test]
    fn test_display() {
        let ciphertext = Ciphertext::new(vec![from_u64(12), from_u64(0), from_u64(345)]);
        assert_eq!(ciphertext.to_string(), "12 0 345");
        assert_eq!(Ciphertext::default().to_string(), "");
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let ciphertext: Ciphertext = "  12   345 \t 6 ".parse().unwrap();
        assert_eq!(
            ciphertext.blocks(),
            &[from_u64(12), from_u64(345), from_u64(6)]
        );

        let empty: Ciphertext = " \n".parse().unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_parse_malformed_token() {
        match "12 3x4 5".parse::<Ciphertext>() {
            Err(RsaError::CiphertextTokenMalformed { index, token }) => {
                assert_eq!(index, 1);
                assert_eq!(token, "3x4");
            }
            other => panic!("expected malformed token, got {other:?}"),
        }
        assert!("-5".parse::<Ciphertext>().is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cipher.txt");
        let ciphertext = Ciphertext::new(vec![from_u64(98_765), from_u64(4_321)]);

        write_ciphertext_file(&path, &ciphertext).unwrap();
        assert_eq!(read_ciphertext_file(&path).unwrap(), ciphertext);
    }

    #[test]
    fn test_empty_ciphertext_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cipher.txt");

        write_ciphertext_file(&path, &Ciphertext::default()).unwrap();
        assert!(read_ciphertext_file(&path).unwrap().is_empty());
    }

    #[test]
    fn test_file_without_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cipher.txt");
        std::fs::write(&path, "").unwrap();

        assert!(matches!(
            read_ciphertext_file(&path),
            Err(RsaError::CiphertextFileEmpty { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_ciphertext_file(&dir.path().join("absent.txt")),
            Err(RsaError::Io { .. })
        ));
    }
}
