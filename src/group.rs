use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use k256::elliptic_curve::PrimeField;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::Group;
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// An integer modulo the secp256k1 group order.
#[derive(Copy, Clone, PartialEq, Eq, Zeroize)]
pub struct Scalar(pub(crate) k256::Scalar);

impl Scalar {
    /// Length of the fixed-width big-endian encoding.
    pub const BYTES: usize = 32;

    /// Bit length of the group order.
    pub const ORDER_BITS: usize = 256;

    pub const ZERO: Scalar = Scalar(k256::Scalar::ZERO);
    pub const ONE: Scalar = Scalar(k256::Scalar::ONE);

    pub fn from_u64(x: u64) -> Self {
        Scalar(k256::Scalar::from(x))
    }

    /// Decodes a big-endian scalar, rejecting values not below the group order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::BYTES {
            return Err(Error::InvalidLength {
                object: "scalar",
                expected: Self::BYTES,
                actual: bytes.len(),
            });
        }
        let repr = k256::FieldBytes::clone_from_slice(bytes);
        Option::<k256::Scalar>::from(k256::Scalar::from_repr(repr))
            .map(Scalar)
            .ok_or(Error::MalformedScalar)
    }

    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_bytes().into()
    }

    /// Modular inverse; fails only for zero.
    pub fn invert(&self) -> Result<Self> {
        Option::<k256::Scalar>::from(self.0.invert())
            .map(Scalar)
            .ok_or(Error::NotInvertible)
    }

    pub fn is_zero(&self) -> bool {
        bool::from(self.0.is_zero())
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar({})", hex::encode(self.to_bytes()))
    }
}

impl Add for Scalar {
    type Output = Scalar;

    fn add(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 + rhs.0)
    }
}

impl Sub for Scalar {
    type Output = Scalar;

    fn sub(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 - rhs.0)
    }
}

impl Mul for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 * rhs.0)
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        Scalar(-self.0)
    }
}

/// A secp256k1 point, encoded as 65-byte SEC1 uncompressed (`0x04 || X || Y`).
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Point(pub(crate) k256::ProjectivePoint);

impl Point {
    pub const BYTES: usize = 65;

    const UNCOMPRESSED_TAG: u8 = 0x04;

    pub fn generator() -> Self {
        Point(k256::ProjectivePoint::GENERATOR)
    }

    /// Decodes an uncompressed point. The tag must be `0x04`, both coordinates
    /// must be below the field prime and the point must lie on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::BYTES {
            return Err(Error::InvalidLength {
                object: "point",
                expected: Self::BYTES,
                actual: bytes.len(),
            });
        }
        if bytes[0] != Self::UNCOMPRESSED_TAG {
            return Err(Error::MalformedPoint("expected uncompressed tag 0x04"));
        }
        let encoded = k256::EncodedPoint::from_bytes(bytes)
            .map_err(|_| Error::MalformedPoint("invalid sec1 encoding"))?;
        Option::<k256::AffinePoint>::from(k256::AffinePoint::from_encoded_point(&encoded))
            .map(|p| Point(p.into()))
            .ok_or(Error::MalformedPoint("coordinates out of range or not on curve"))
    }

    /// The identity has no uncompressed form and encodes as all zeroes, which
    /// `from_bytes` rejects.
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        let mut out = [0u8; Self::BYTES];
        let encoded = self.0.to_affine().to_encoded_point(false);
        if encoded.len() == Self::BYTES {
            out.copy_from_slice(encoded.as_bytes());
        }
        out
    }

    /// Zero-padded `X || Y`, without the tag byte.
    pub fn coordinates(&self) -> [u8; Self::BYTES - 1] {
        let mut out = [0u8; Self::BYTES - 1];
        out.copy_from_slice(&self.to_bytes()[1..]);
        out
    }

    pub fn is_identity(&self) -> bool {
        bool::from(self.0.is_identity())
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({})", hex::encode(self.to_bytes()))
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl Mul<Scalar> for Point {
    type Output = Point;

    fn mul(self, rhs: Scalar) -> Point {
        Point(self.0 * rhs.0)
    }
}
