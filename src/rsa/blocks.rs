// Block codec: packs characters into radix-1000 integers and back
//
// A block holds `block_size` code points, most significant first. A final
// group shorter than `block_size` is filled with the sentinel code point 0,
// so 0 itself is not accepted as plaintext.

use num_traits::{ToPrimitive, Zero};

use super::bigint::RsaBigInt;
use crate::error::{RsaError, RsaResult};

/// Each character occupies one base-1000 digit
pub const RADIX: u32 = 1000;

/// Characters per block
pub const DEFAULT_BLOCK_SIZE: usize = 2;

/// 1000^50 = 10^150, below any modulus built from two primes above 10^75.
/// Narrower prime bounds need narrower blocks, see `RsaTextConfig::validate`.
pub const MAX_BLOCK_SIZE: usize = 50;

/// Code point used to fill a short final block
const PADDING: u32 = 0;

pub fn check_block_size(block_size: usize) -> RsaResult<()> {
    if block_size == 0 || block_size > MAX_BLOCK_SIZE {
        return Err(RsaError::InvalidBlockSize {
            got: block_size,
            max: MAX_BLOCK_SIZE,
        });
    }
    Ok(())
}

/// Exclusive upper bound of a block value: RADIX^block_size
pub fn block_limit(block_size: usize) -> RsaBigInt {
    // block_size <= MAX_BLOCK_SIZE keeps the cast lossless
    RsaBigInt::from(RADIX).pow(block_size as u32)
}

/// Validate a character and return its code point
fn code_point(ch: char, position: usize) -> RsaResult<u32> {
    let cp = u32::from(ch);
    if cp == PADDING || cp >= RADIX {
        return Err(RsaError::CodePointOutOfRange {
            ch,
            position,
            code_point: cp,
            radix: RADIX,
        });
    }
    Ok(cp)
}

/// Pack `text` into blocks of `block_size` characters
pub fn encode_blocks(text: &str, block_size: usize) -> RsaResult<Vec<RsaBigInt>> {
    check_block_size(block_size)?;

    let code_points = text
        .chars()
        .enumerate()
        .map(|(position, ch)| code_point(ch, position))
        .collect::<RsaResult<Vec<u32>>>()?;

    let blocks = code_points
        .chunks(block_size)
        .map(|group| {
            let mut block = RsaBigInt::zero();
            for &cp in group {
                block = block * RADIX + cp;
            }
            for _ in group.len()..block_size {
                block = block * RADIX + PADDING;
            }
            block
        })
        .collect();

    Ok(blocks)
}

/// Unpack one block into exactly `block_size` code points, most significant first
fn unpack(block: &RsaBigInt, block_size: usize, index: usize) -> RsaResult<Vec<u32>> {
    if *block >= block_limit(block_size) {
        return Err(RsaError::BlockOutOfRange { index, block_size });
    }

    let mut value = block.clone();
    let mut digits = Vec::with_capacity(block_size);
    for _ in 0..block_size {
        let digit = (&value % RADIX)
            .to_u32()
            .ok_or(RsaError::BlockOutOfRange { index, block_size })?;
        digits.push(digit);
        value /= RADIX;
    }
    digits.reverse();

    Ok(digits)
}

/// Reverse `encode_blocks`
pub fn decode_blocks(blocks: &[RsaBigInt], block_size: usize) -> RsaResult<String> {
    check_block_size(block_size)?;

    let mut text = String::with_capacity(blocks.len() * block_size);
    for (index, block) in blocks.iter().enumerate() {
        let digits = unpack(block, block_size, index)?;

        // Padding may only trail the final block, and never fill it entirely
        let filled = digits
            .iter()
            .position(|&d| d == PADDING)
            .unwrap_or(block_size);
        let is_last = index + 1 == blocks.len();
        let padding_ok = filled == block_size
            || (is_last && filled > 0 && digits[filled..].iter().all(|&d| d == PADDING));
        if !padding_ok {
            return Err(RsaError::MisplacedPadding { index });
        }

        for &cp in &digits[..filled] {
            let ch = char::from_u32(cp).ok_or(RsaError::BlockOutOfRange { index, block_size })?;
            text.push(ch);
        }
    }

    Ok(text)
}
