// RSA Encryption Implementation
// Textbook RSA, one modular exponentiation per block, no padding

use tracing::debug;

use super::bigint::{mod_pow, RsaBigInt};
use super::blocks::encode_blocks;
use super::ciphertext::Ciphertext;
use super::keygen::RsaPublicKey;
use crate::error::RsaResult;

/// c = m^e mod n for every block, order preserved.
///
/// Each block must be below the modulus; larger values do not survive the
/// round trip and are not checked here.
pub fn encrypt_blocks(blocks: &[RsaBigInt], public_key: &RsaPublicKey) -> Vec<RsaBigInt> {
    blocks
        .iter()
        .map(|m| mod_pow(m, &public_key.e, &public_key.n))
        .collect()
}

/// Encode `plaintext` into blocks and encrypt them
pub fn encrypt_text(
    plaintext: &str,
    public_key: &RsaPublicKey,
    block_size: usize,
) -> RsaResult<Ciphertext> {
    let blocks = encode_blocks(plaintext, block_size)?;
    debug!(blocks = blocks.len(), block_size, "encrypting");
    Ok(Ciphertext::new(encrypt_blocks(&blocks, public_key)))
}
