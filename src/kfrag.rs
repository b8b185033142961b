#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::group::{Point, Scalar};
use crate::hash::{hash_points, HashBuilder};
use crate::keygen::{PublicKey, SecretKey};
use crate::randutil::random_scalar;
use crate::shamir::{sample_poly_with_constant, to_invertible, Poly};
use crate::types::Params;

/// One Shamir share of a delegation from Alice to Bob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyFragment {
    pub(crate) id: Scalar,
    pub(crate) rk: Scalar,
    pub(crate) xa: Point,
    pub(crate) z1: Scalar,
    pub(crate) z2: Scalar,
    pub(crate) u: Point,
}

/// Polynomial evaluation point of a fragment, `H(id || D)`.
pub(crate) fn evaluation_point(id: &Scalar, dh: &Scalar) -> Result<Scalar> {
    HashBuilder::new().scalar(id).scalar(dh).finalize()
}

/// Schnorr challenge `H(Y, id, alicePub, bobPub, U, XA)`.
fn binding_challenge(
    y: &Point,
    id: &Scalar,
    alice_pk: &Point,
    bob_pk: &Point,
    u: &Point,
    xa: &Point,
) -> Result<Scalar> {
    HashBuilder::new()
        .point(y)
        .scalar(id)
        .point(alice_pk)
        .point(bob_pk)
        .point(u)
        .point(xa)
        .finalize()
}

/// Everything shared by the fragments of a single delegation.
struct Delegation<'a> {
    par: &'a Params,
    a: Scalar,
    alice_pk: Point,
    bob_pk: Point,
    xa: Point,
    dh: Scalar,
    poly: Poly,
}

impl Delegation<'_> {
    fn fragment(&self) -> Result<KeyFragment> {
        let y = random_scalar()?;
        let y_pub = Point::generator() * y;
        let id = random_scalar()?;

        let sx = evaluation_point(&id, &self.dh)?;
        let rk = self.poly.eval(sx);
        let u = self.par.u * rk;

        let z1 = binding_challenge(&y_pub, &id, &self.alice_pk, &self.bob_pk, &u, &self.xa)?;
        let z2 = y - self.a * z1;

        Ok(KeyFragment {
            id,
            rk,
            xa: self.xa,
            z1,
            z2,
            u,
        })
    }
}

/// Split the re-encryption capability from `alice_sk` to `bob_pk` into `n`
/// fragments, any `t` of which are enough to rebuild it.
pub fn generate(
    par: &Params,
    alice_sk: &SecretKey,
    bob_pk: &PublicKey,
    n: usize,
    t: usize,
) -> Result<Vec<KeyFragment>> {
    if t == 0 || t > n {
        return Err(Error::InvalidThreshold {
            threshold: t,
            shares: n,
        });
    }
    debug!(shares = n, threshold = t, "generating key fragments");

    let a = alice_sk.scalar();
    let alice_pk = *alice_sk.public_key().point();
    let bob_pk = *bob_pk.point();

    // ephemeral delegation key, d = H(X, B, B^x)
    let x = random_scalar()?;
    let xa = Point::generator() * x;
    let d = hash_points(&[&xa, &bob_pk, &(bob_pk * x)])?;

    let f0 = a * to_invertible(&d)?.invert()?;
    let poly = sample_poly_with_constant(t - 1, f0)?;

    // D = H(A, B, B^a), recomputable by Bob as H(A, B, A^b)
    let dh = hash_points(&[&alice_pk, &bob_pk, &(bob_pk * a)])?;

    let delegation = Delegation {
        par,
        a,
        alice_pk,
        bob_pk,
        xa,
        dh,
        poly,
    };

    #[cfg(feature = "parallel")]
    let kfrags = (0..n)
        .into_par_iter()
        .map(|_| delegation.fragment())
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let kfrags = (0..n)
        .map(|_| delegation.fragment())
        .collect::<Result<Vec<_>>>()?;

    Ok(kfrags)
}

impl KeyFragment {
    /// Current encoding version tag.
    pub const VERSION: u8 = 0x01;

    /// `VERSION || id || rk || z1 || U || XA || z2`.
    pub const BYTES: usize = 1 + 4 * Scalar::BYTES + 2 * Point::BYTES;

    pub fn id(&self) -> &Scalar {
        &self.id
    }

    /// The public ephemeral point `XA` shared by all fragments of a delegation.
    pub fn delegating_point(&self) -> &Point {
        &self.xa
    }

    /// Checks that the fragment was issued by the holder of `alice_pk` for
    /// `bob_pk`, and that the commitment `U` matches the share.
    ///
    /// Recovers `Y = g^z2 + alicePub^z1` and recomputes the Schnorr challenge.
    pub fn verify(&self, par: &Params, alice_pk: &PublicKey, bob_pk: &PublicKey) -> bool {
        let y = Point::generator() * self.z2 + *alice_pk.point() * self.z1;
        let z1 = match binding_challenge(
            &y,
            &self.id,
            alice_pk.point(),
            bob_pk.point(),
            &self.u,
            &self.xa,
        ) {
            Ok(z1) => z1,
            Err(_) => return false,
        };
        (z1 == self.z1) & (par.u * self.rk == self.u)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::BYTES);
        out.push(Self::VERSION);
        out.extend_from_slice(&self.id.to_bytes());
        out.extend_from_slice(&self.rk.to_bytes());
        out.extend_from_slice(&self.z1.to_bytes());
        out.extend_from_slice(&self.u.to_bytes());
        out.extend_from_slice(&self.xa.to_bytes());
        out.extend_from_slice(&self.z2.to_bytes());
        out
    }

    /// Decodes the fixed-width encoding. The length-prefixed variant is
    /// rejected by its leading byte.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.first() {
            Some(&Self::VERSION) => {}
            Some(&other) => return Err(Error::UnsupportedVersion(other)),
            None => {
                return Err(Error::InvalidLength {
                    object: "key fragment",
                    expected: Self::BYTES,
                    actual: 0,
                })
            }
        }
        if bytes.len() != Self::BYTES {
            return Err(Error::InvalidLength {
                object: "key fragment",
                expected: Self::BYTES,
                actual: bytes.len(),
            });
        }

        let (s, p) = (Scalar::BYTES, Point::BYTES);
        let id = Scalar::from_bytes(&bytes[1..1 + s])?;
        let rk = Scalar::from_bytes(&bytes[1 + s..1 + 2 * s])?;
        let z1 = Scalar::from_bytes(&bytes[1 + 2 * s..1 + 3 * s])?;
        let u = Point::from_bytes(&bytes[1 + 3 * s..1 + 3 * s + p])?;
        let xa = Point::from_bytes(&bytes[1 + 3 * s + p..1 + 3 * s + 2 * p])?;
        let z2 = Scalar::from_bytes(&bytes[1 + 3 * s + 2 * p..])?;

        Ok(KeyFragment {
            id,
            rk,
            xa,
            z1,
            z2,
            u,
        })
    }
}

impl_serde_via_bytes!(KeyFragment, "versioned key fragment bytes");
