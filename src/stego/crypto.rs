// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Password-derived key material and the AES-256-CBC adapter.
//!
//! Key derivation is an iterated SHA-256 chain over a fixed salt and the
//! password:
//!
//! ```text
//! salted  = SALT || password [|| HEADER_SUFFIX]
//! hash_0  = salted
//! hash_i+1 = SHA-256(hash_i || salted || i)      for i in 0..256
//! key     = hash_256
//! iv      = SHA-256(key)[10..26]
//! ```
//!
//! Two derivations are made per call: the **payload** context (password
//! alone) and the **header** context (password + [`HEADER_SUFFIX`]). The
//! header IV also seeds the scatter engine, so brute-forcing the header
//! alone never yields the payload key.
//!
//! The cipher is AES-256-CBC with PKCS#7 padding and no authentication tag.
//! Integrity is checked implicitly: a wrong key almost always fails the
//! padding check, and whatever slips through fails decompression.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::stego::error::StegoError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;
/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// CBC IV length in bytes.
pub const IV_LEN: usize = 16;

/// Number of chained SHA-256 rounds.
const HASH_ROUNDS: usize = 256;

/// Fixed 16-byte salt: `((4 - 2*(i & 1)) << (i >> 2)) ^ 42`.
const SALT: [u8; 16] = [46, 40, 46, 40, 34, 46, 34, 46, 58, 34, 58, 34, 10, 58, 10, 58];

/// Suffix appended to the password for the header derivation context
/// (`".l"` repeated 42 times).
pub const HEADER_SUFFIX: &str = ".l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l.l";

/// Derived AES key and IV for one context.
pub struct KeyMaterial {
    pub key: Zeroizing<[u8; KEY_LEN]>,
    pub iv: Zeroizing<[u8; IV_LEN]>,
}

impl KeyMaterial {
    /// The IV read as four little-endian `u32` words (scatter engine seed).
    pub fn seed_words(&self) -> [u32; 4] {
        let mut words = [0u32; 4];
        for (w, chunk) in words.iter_mut().zip(self.iv.chunks_exact(4)) {
            *w = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        words
    }
}

/// Derive key material for the payload context.
pub fn derive_payload_key(password: &str) -> KeyMaterial {
    derive(password.as_bytes(), None)
}

/// Derive key material for the header context.
pub fn derive_header_key(password: &str) -> KeyMaterial {
    derive(password.as_bytes(), Some(HEADER_SUFFIX.as_bytes()))
}

fn derive(password: &[u8], suffix: Option<&[u8]>) -> KeyMaterial {
    let suffix = suffix.unwrap_or_default();
    let mut salted = Zeroizing::new(Vec::with_capacity(SALT.len() + password.len() + suffix.len()));
    salted.extend_from_slice(&SALT);
    salted.extend_from_slice(password);
    salted.extend_from_slice(suffix);

    let mut hash: Zeroizing<[u8; KEY_LEN]> = Zeroizing::new(Sha256::new()
        .chain_update(&*salted)
        .chain_update(&*salted)
        .chain_update([0u8])
        .finalize()
        .into());
    for round in 1..HASH_ROUNDS {
        *hash = Sha256::new()
            .chain_update(&*hash)
            .chain_update(&*salted)
            .chain_update([round as u8])
            .finalize()
            .into();
    }
    let key = hash;

    let digest: [u8; 32] = Sha256::digest(&*key).into();
    let mut iv = Zeroizing::new([0u8; IV_LEN]);
    iv.copy_from_slice(&digest[10..26]);

    KeyMaterial { key, iv }
}

/// Encrypt with AES-256-CBC + PKCS#7. Output length is the next multiple of
/// 16 strictly greater than the input length.
pub fn encrypt(plaintext: &[u8], km: &KeyMaterial) -> Vec<u8> {
    Aes256CbcEnc::new(&(*km.key).into(), &(*km.iv).into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypt AES-256-CBC + PKCS#7.
///
/// Returns [`StegoError::DecodeFailed`] on a ragged length or bad padding.
pub fn decrypt(ciphertext: &[u8], km: &KeyMaterial) -> Result<Vec<u8>, StegoError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(StegoError::DecodeFailed);
    }
    Aes256CbcDec::new(&(*km.key).into(), &(*km.iv).into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| StegoError::DecodeFailed)
}

/// Ciphertext length produced by [`encrypt`] for a `len`-byte plaintext.
pub fn ciphertext_len(len: usize) -> usize {
    (len / BLOCK_LEN + 1) * BLOCK_LEN
}
