// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod blocks;
pub mod ciphertext;
pub mod decrypt;
pub mod encrypt;
pub mod keyfile;
pub mod keygen;
pub mod prime;

pub use blocks::{decode_blocks, encode_blocks, DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE, RADIX};
pub use ciphertext::{read_ciphertext_file, write_ciphertext_file, Ciphertext};
pub use decrypt::{decrypt_blocks, decrypt_text, decrypt_tokens};
pub use encrypt::{encrypt_blocks, encrypt_text};
pub use keyfile::{load_keypair, load_private_key, load_public_key, save_keypair, KeyPaths};
pub use keygen::{
    choose_exponent, derive_keys, generate_keypair, KeygenParams, RsaKeyPair, RsaPrivateKey,
    RsaPublicKey,
};
pub use prime::{generate_distinct_primes, generate_prime, PrimeSearch};
