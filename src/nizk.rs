use crate::error::{Error, Result};
use crate::group::{Point, Scalar};
use crate::hash::HashBuilder;
use crate::randutil::random_scalar;
use crate::types::Params;

/// Proof that `E1 = E^rk`, `V1 = V^rk` and `U1 = U^rk` share one exponent.
///
/// `aux` is caller context folded into the challenge, so a proof cannot be
/// replayed under a different session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    pub(crate) e2: Point,
    pub(crate) v2: Point,
    pub(crate) u1: Point,
    pub(crate) u2: Point,
    pub(crate) rho: Scalar,
    pub(crate) aux: Vec<u8>,
}

/// Fiat-Shamir challenge `H(E, E1, E2, V, V1, V2, U, U1, U2, aux)`.
#[allow(clippy::too_many_arguments)]
fn challenge(
    par: &Params,
    e: &Point,
    e1: &Point,
    e2: &Point,
    v: &Point,
    v1: &Point,
    v2: &Point,
    u1: &Point,
    u2: &Point,
    aux: &[u8],
) -> Result<Scalar> {
    HashBuilder::new()
        .points([e, e1, e2, v, v1, v2, &par.u, u1, u2])
        .bytes(aux)
        .finalize()
}

/// Prove `(E1, V1, U1) = (E, V, U)^rk`.
#[allow(clippy::too_many_arguments)]
pub fn prove(
    par: &Params,
    e: &Point,
    v: &Point,
    e1: &Point,
    v1: &Point,
    u1: &Point,
    rk: &Scalar,
    aux: &[u8],
) -> Result<Proof> {
    let t = random_scalar()?;
    let e2 = *e * t;
    let v2 = *v * t;
    let u2 = par.u * t;

    let h = challenge(par, e, e1, &e2, v, v1, &v2, u1, &u2, aux)?;
    let rho = t + h * *rk;

    Ok(Proof {
        e2,
        v2,
        u1: *u1,
        u2,
        rho,
        aux: aux.to_vec(),
    })
}

/// Accepts iff all three relations hold:
/// `E^rho == E2 + E1^h`, `V^rho == V2 + V1^h`, `U^rho == U2 + U1^h`.
pub fn verify(par: &Params, e: &Point, v: &Point, e1: &Point, v1: &Point, proof: &Proof) -> bool {
    let h = match challenge(
        par, e, e1, &proof.e2, v, v1, &proof.v2, &proof.u1, &proof.u2, &proof.aux,
    ) {
        Ok(h) => h,
        Err(_) => return false,
    };

    let ok_e = *e * proof.rho == proof.e2 + *e1 * h;
    let ok_v = *v * proof.rho == proof.v2 + *v1 * h;
    let ok_u = par.u * proof.rho == proof.u2 + proof.u1 * h;
    ok_e & ok_v & ok_u
}

impl Proof {
    /// Length of the proof without `aux`.
    pub const FIXED_BYTES: usize = 4 * Point::BYTES + Scalar::BYTES;

    pub fn aux(&self) -> &[u8] {
        &self.aux
    }

    /// `E2 || V2 || U1 || U2 || rho || aux`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::FIXED_BYTES + self.aux.len());
        for p in [&self.e2, &self.v2, &self.u1, &self.u2] {
            out.extend_from_slice(&p.to_bytes());
        }
        out.extend_from_slice(&self.rho.to_bytes());
        out.extend_from_slice(&self.aux);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::FIXED_BYTES {
            return Err(Error::InvalidLength {
                object: "proof",
                expected: Self::FIXED_BYTES,
                actual: bytes.len(),
            });
        }
        let mut chunks = bytes[..4 * Point::BYTES].chunks_exact(Point::BYTES);
        let mut next_point = || -> Result<Point> {
            let chunk = chunks.next().ok_or(Error::MalformedPoint("missing proof point"))?;
            Point::from_bytes(chunk)
        };
        let e2 = next_point()?;
        let v2 = next_point()?;
        let u1 = next_point()?;
        let u2 = next_point()?;
        let rho = Scalar::from_bytes(&bytes[4 * Point::BYTES..Self::FIXED_BYTES])?;

        Ok(Proof {
            e2,
            v2,
            u1,
            u2,
            rho,
            aux: bytes[Self::FIXED_BYTES..].to_vec(),
        })
    }
}
