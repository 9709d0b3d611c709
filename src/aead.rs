//! Authenticated encryption of bulk payloads.
//!
//! Sealed blobs are nonce-prefixed: nonce(12) || ciphertext || tag(16), no
//! associated data. Nonces come from the operating system's CSPRNG and are
//! never reused for a given key; the hybrid layer derives a fresh key per
//! message anyway.

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::Aead;
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::err::{Error, Result};

/// Size of the random nonce prefixed to every sealed blob.
pub const NONCE_BYTES: usize = 12;

/// Size of the authentication tag appended to every sealed blob.
pub const TAG_BYTES: usize = 16;

type Aes192Gcm = AesGcm<Aes192, U12>;

enum Cipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl Cipher {
    fn new(key: &[u8]) -> Result<Self> {
        let invalid = |_| Error::InvalidKeySize(key.len());
        match key.len() {
            16 => Ok(Self::Aes128(Aes128Gcm::new_from_slice(key).map_err(invalid)?)),
            24 => Ok(Self::Aes192(Aes192Gcm::new_from_slice(key).map_err(invalid)?)),
            32 => Ok(Self::Aes256(Aes256Gcm::new_from_slice(key).map_err(invalid)?)),
            n => Err(Error::InvalidKeySize(n)),
        }
    }

    fn encrypt(&self, nonce: &[u8; NONCE_BYTES], plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        match self {
            Self::Aes128(c) => c.encrypt(nonce, plaintext),
            Self::Aes192(c) => c.encrypt(nonce, plaintext),
            Self::Aes256(c) => c.encrypt(nonce, plaintext),
        }
        .map_err(|_| Error::InvalidInput("plaintext too large for AES-GCM"))
    }

    fn decrypt(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        match self {
            Self::Aes128(c) => c.decrypt(nonce, ciphertext),
            Self::Aes192(c) => c.decrypt(nonce, ciphertext),
            Self::Aes256(c) => c.decrypt(nonce, ciphertext),
        }
        .map_err(|_| Error::AuthFailure)
    }
}

/// Seals `plaintext` under `key` (16, 24 or 32 bytes), returning the
/// nonce-prefixed blob. The nonce is drawn fresh from the OS CSPRNG.
pub fn seal(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let mut nonce = [0u8; NONCE_BYTES];
    OsRng.try_fill_bytes(&mut nonce)?;
    seal_inner(&nonce, plaintext, key)
}

/// Seals with a caller-chosen nonce. Deterministic fixtures only; a fixed
/// nonce under a reused key breaks AES-GCM completely.
#[cfg(test)]
pub(crate) fn seal_with_nonce(
    nonce: &[u8; NONCE_BYTES],
    plaintext: &[u8],
    key: &[u8],
) -> Result<Vec<u8>> {
    seal_inner(nonce, plaintext, key)
}

fn seal_inner(nonce: &[u8; NONCE_BYTES], plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let ciphertext = Cipher::new(key)?.encrypt(nonce, plaintext)?;
    let mut blob = Vec::with_capacity(NONCE_BYTES + ciphertext.len());
    blob.extend_from_slice(nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Opens a sealed blob. Any tampering with nonce, ciphertext or tag yields
/// [`Error::AuthFailure`] and no plaintext.
pub fn open(blob: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if blob.len() < NONCE_BYTES {
        return Err(Error::InvalidEncoding(
            "sealed blob shorter than its nonce".into(),
        ));
    }
    let (nonce, ciphertext) = blob.split_at(NONCE_BYTES);
    Cipher::new(key)?.decrypt(nonce, ciphertext)
}
