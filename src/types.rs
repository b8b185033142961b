use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};
use crate::group::Point;

/// Scheme-wide configuration.
///
/// `u` is the auxiliary generator used for share commitments and the
/// re-encryption proof. It must be independent of the curve's base point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Params {
    pub u: Point,
}

impl Params {
    /// Parameters with an alternate auxiliary generator, given in uncompressed form.
    pub fn with_u(bytes: &[u8]) -> Result<Self> {
        let u = Point::from_bytes(bytes)?;
        if u == Point::generator() {
            return Err(Error::MalformedPoint("auxiliary generator equals the base point"));
        }
        Ok(Params { u })
    }
}

/// Symmetric key recovered by every decapsulation path.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SharedKey([u8; 32]);

impl SharedKey {
    pub const BYTES: usize = 32;

    pub(crate) fn new(xs: [u8; 32]) -> Self {
        SharedKey(xs)
    }
}

impl Deref for SharedKey {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0[..]
    }
}

impl AsRef<[u8]> for SharedKey {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}
