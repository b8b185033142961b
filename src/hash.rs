use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::{Error, Result};
use crate::group::{Point, Scalar};
use crate::types::SharedKey;

type Blake2b256 = Blake2b<U32>;

/// Masks for the leading digest byte, indexed by `bitlen(order) % 8`.
const LEADING_BYTE_MASK: [u8; 8] = [0xff, 0x01, 0x03, 0x07, 0x0f, 0x1f, 0x3f, 0x7f];

/// Domain separation constant XORed into the second digest byte.
const DOMAIN_SEPARATOR: u8 = 0x42;

/// Hash-to-scalar input assembled by appending fixed-length encodings.
/// The order of calls is part of the protocol: both sides must append the
/// same values in the same order.
#[derive(Clone, Default)]
pub struct HashBuilder {
    inner_state: Blake2b256,
}

impl HashBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point(mut self, p: &Point) -> Self {
        self.inner_state.update(p.to_bytes());
        self
    }

    pub fn points<'a, I>(self, items: I) -> Self
    where
        I: IntoIterator<Item = &'a Point>,
    {
        items.into_iter().fold(self, |b, p| b.point(p))
    }

    pub fn scalar(mut self, s: &Scalar) -> Self {
        self.inner_state.update(s.to_bytes());
        self
    }

    pub fn bytes(mut self, data: impl AsRef<[u8]>) -> Self {
        self.inner_state.update(data);
        self
    }

    pub fn finalize(self) -> Result<Scalar> {
        let digest: [u8; 32] = self.inner_state.finalize().into();
        digest_to_scalar(digest)
    }
}

/// Single-attempt reduction of a digest into a scalar. Values at or above
/// the group order are an error, never re-hashed.
fn digest_to_scalar(mut digest: [u8; 32]) -> Result<Scalar> {
    digest[0] &= LEADING_BYTE_MASK[Scalar::ORDER_BITS % 8];
    digest[1] ^= DOMAIN_SEPARATOR;
    Scalar::from_bytes(&digest).map_err(|_| Error::HashOutOfRange)
}

/// Hash-to-scalar over a raw byte string.
pub fn hash_to_scalar(data: &[u8]) -> Result<Scalar> {
    HashBuilder::new().bytes(data).finalize()
}

/// Hash of the concatenated encodings of `points`.
pub fn hash_points(points: &[&Point]) -> Result<Scalar> {
    HashBuilder::new().points(points.iter().copied()).finalize()
}

/// HKDF-SHA256 over the zero-padded affine coordinates of `p`.
pub fn kdf(p: &Point) -> Result<SharedKey> {
    let hk = Hkdf::<Sha256>::new(None, &p.coordinates());
    let mut okm = [0u8; SharedKey::BYTES];
    hk.expand(&[], &mut okm).map_err(|_| Error::Kdf)?;
    Ok(SharedKey::new(okm))
}
