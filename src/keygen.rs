use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Result;
use crate::group::{Point, Scalar};
use crate::randutil::random_scalar;
use crate::types::Params;

/// Auxiliary generator `U`, fixed for the whole scheme.
const U_POINT_HEX: &str = "04fd69424254b879cecca99180f42aa9687b2d33fb3c4824c18f88ceaaff637cb1\
                           45fdf0f656e0028f0918f4faefe38e8b01f686f5b31f9665b9c8876ec4787767";

/// Default scheme parameters.
pub fn setup() -> Params {
    let bytes = hex::decode(U_POINT_HEX).expect("U_POINT_HEX is valid hex");
    Params::with_u(&bytes).expect("U_POINT_HEX is a valid secp256k1 point")
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    scalar: Scalar,
}

impl SecretKey {
    pub fn random() -> Result<Self> {
        Ok(SecretKey {
            scalar: random_scalar()?,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(SecretKey {
            scalar: Scalar::from_bytes(bytes)?,
        })
    }

    pub fn to_bytes(&self) -> [u8; Scalar::BYTES] {
        self.scalar.to_bytes()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            point: Point::generator() * self.scalar,
        }
    }

    pub(crate) fn scalar(&self) -> Scalar {
        self.scalar
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    point: Point,
}

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(PublicKey {
            point: Point::from_bytes(bytes)?,
        })
    }

    pub fn to_bytes(&self) -> [u8; Point::BYTES] {
        self.point.to_bytes()
    }

    pub fn point(&self) -> &Point {
        &self.point
    }
}

impl_serde_via_bytes!(PublicKey, "uncompressed secp256k1 public key");

/// A secret scalar together with its public point.
#[derive(Clone)]
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl KeyPair {
    pub fn random() -> Result<Self> {
        let secret = SecretKey::random()?;
        let public = secret.public_key();
        Ok(KeyPair { secret, public })
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    pub fn secret(&self) -> &SecretKey {
        &self.secret
    }
}
