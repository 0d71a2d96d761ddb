//! rsa_text: textbook RSA over radix-1000 character blocks
//!
//! Pipeline:
//! ```text
//! generate_distinct_primes -> derive_keys -> save_keypair / load_keypair
//! text -> encode_blocks -> encrypt_blocks -> Ciphertext ("c1 c2 ...")
//! Ciphertext -> decrypt_blocks -> decode_blocks -> text
//! ```
//!
//! No padding scheme is applied: equal blocks encrypt to equal ciphertext
//! and the scheme is malleable. Nothing here is constant-time.

pub mod config;
pub mod error;
pub mod rsa;
pub mod util;

pub use error::{RsaError, RsaResult};
