// RSA Decryption Implementation
// m = c^d mod n per block, then the blocks are unpacked back into text

use tracing::debug;

use super::bigint::{mod_pow, RsaBigInt};
use super::blocks::decode_blocks;
use super::ciphertext::Ciphertext;
use super::keygen::RsaPrivateKey;
use crate::error::RsaResult;

/// m = c^d mod n for every block, order preserved
pub fn decrypt_blocks(blocks: &[RsaBigInt], private_key: &RsaPrivateKey) -> Vec<RsaBigInt> {
    blocks
        .iter()
        .map(|c| mod_pow(c, &private_key.d, &private_key.n))
        .collect()
}

/// Decrypt every block and decode the result into text
pub fn decrypt_text(
    ciphertext: &Ciphertext,
    private_key: &RsaPrivateKey,
    block_size: usize,
) -> RsaResult<String> {
    debug!(blocks = ciphertext.len(), block_size, "decrypting");
    let blocks = decrypt_blocks(ciphertext.blocks(), private_key);
    decode_blocks(&blocks, block_size)
}

/// Parse space-separated decimal tokens and decrypt them
pub fn decrypt_tokens(
    tokens: &str,
    private_key: &RsaPrivateKey,
    block_size: usize,
) -> RsaResult<String> {
    let ciphertext: Ciphertext = tokens.parse()?;
    decrypt_text(&ciphertext, private_key, block_size)
}
