use aead::consts::U16;
use aead::generic_array::GenericArray;
use aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;

use crate::error::{Error, Result};
use crate::randutil::random_bytes;
use crate::types::SharedKey;

/// AES-256-GCM with a 16-byte nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

pub const NONCE_BYTES: usize = 16;
pub const TAG_BYTES: usize = 16;

/// Seals `plaintext` into `nonce || tag || ciphertext`.
pub fn encrypt(key: &SharedKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm16::new_from_slice(key.as_ref()).map_err(|_| Error::Encryption)?;
    let nonce = random_bytes::<NONCE_BYTES>()?;

    // aes-gcm appends the tag to the ciphertext
    let sealed = cipher
        .encrypt(GenericArray::from_slice(&nonce), plaintext)
        .map_err(|_| Error::Encryption)?;
    let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_BYTES);

    let mut out = Vec::with_capacity(NONCE_BYTES + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(tag);
    out.extend_from_slice(ciphertext);
    Ok(out)
}

pub fn decrypt(key: &SharedKey, envelope: &[u8]) -> Result<Vec<u8>> {
    if envelope.len() < NONCE_BYTES + TAG_BYTES {
        return Err(Error::InvalidLength {
            object: "envelope",
            expected: NONCE_BYTES + TAG_BYTES,
            actual: envelope.len(),
        });
    }
    let (nonce, rest) = envelope.split_at(NONCE_BYTES);
    let (tag, ciphertext) = rest.split_at(TAG_BYTES);

    let mut sealed = Vec::with_capacity(rest.len());
    sealed.extend_from_slice(ciphertext);
    sealed.extend_from_slice(tag);

    let cipher = Aes256Gcm16::new_from_slice(key.as_ref()).map_err(|_| Error::Decryption)?;
    cipher
        .decrypt(GenericArray::from_slice(nonce), sealed.as_slice())
        .map_err(|_| Error::Decryption)
}
