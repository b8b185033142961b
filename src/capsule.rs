use tracing::warn;

use crate::error::{Error, Result};
use crate::group::{Point, Scalar};
use crate::hash::hash_points;

/// Encapsulated-key envelope produced by `protocol::encapsulate`.
///
/// `s = u + r * H(E, V)` binds `E = g^r` and `V = g^u` together, so anyone can
/// check a capsule without holding a private key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capsule {
    pub(crate) e: Point,
    pub(crate) v: Point,
    pub(crate) s: Scalar,
}

impl Capsule {
    /// Length of the encoding written by `to_bytes`.
    pub const BYTES: usize = 2 * Point::BYTES + Scalar::BYTES;

    pub fn e(&self) -> &Point {
        &self.e
    }

    pub fn v(&self) -> &Point {
        &self.v
    }

    /// Checks `g^s == E^H(E, V) + V`.
    pub fn verify(&self) -> bool {
        match hash_points(&[&self.e, &self.v]) {
            Ok(h) => Point::generator() * self.s == self.e * h + self.v,
            Err(_) => false,
        }
    }

    /// `E || V || s`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::BYTES);
        out.extend_from_slice(&self.e.to_bytes());
        out.extend_from_slice(&self.v.to_bytes());
        out.extend_from_slice(&self.s.to_bytes());
        out
    }

    /// Decodes and verifies a capsule. `s` is the tail field and may be given
    /// without leading zero bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let points_len = 2 * Point::BYTES;
        if bytes.len() <= points_len || bytes.len() > Self::BYTES {
            return Err(Error::InvalidLength {
                object: "capsule",
                expected: Self::BYTES,
                actual: bytes.len(),
            });
        }
        let e = Point::from_bytes(&bytes[..Point::BYTES])?;
        let v = Point::from_bytes(&bytes[Point::BYTES..points_len])?;

        let tail = &bytes[points_len..];
        let mut s_bytes = [0u8; Scalar::BYTES];
        s_bytes[Scalar::BYTES - tail.len()..].copy_from_slice(tail);
        let s = Scalar::from_bytes(&s_bytes)?;

        let capsule = Capsule { e, v, s };
        if !capsule.verify() {
            warn!("decoded capsule failed verification");
            return Err(Error::CapsuleVerification);
        }
        Ok(capsule)
    }
}

impl_serde_via_bytes!(Capsule, "capsule bytes");
