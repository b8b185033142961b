use crate::error::{Error, Result};
use crate::group::{Point, Scalar};
use crate::nizk::{self, Proof};
use crate::types::Params;

/// A capsule re-blinded by one key fragment: `E1 = E^rk`, `V1 = V^rk`.
///
/// Fragments decoded from the base encoding carry no proof and never verify.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapsuleFrag {
    pub(crate) id: Scalar,
    pub(crate) e1: Point,
    pub(crate) v1: Point,
    pub(crate) xa: Point,
    pub(crate) proof: Option<Proof>,
}

impl CapsuleFrag {
    /// `id || E1 || V1 || XA`.
    pub const BASE_BYTES: usize = Scalar::BYTES + 3 * Point::BYTES;

    pub fn id(&self) -> &Scalar {
        &self.id
    }

    pub fn e1(&self) -> &Point {
        &self.e1
    }

    pub fn v1(&self) -> &Point {
        &self.v1
    }

    pub fn delegating_point(&self) -> &Point {
        &self.xa
    }

    pub fn proof(&self) -> Option<&Proof> {
        self.proof.as_ref()
    }

    /// Checks the re-encryption proof against the capsule points `e` and `v`.
    pub fn verify(&self, par: &Params, e: &Point, v: &Point) -> bool {
        match &self.proof {
            Some(proof) => nizk::verify(par, e, v, &self.e1, &self.v1, proof),
            None => false,
        }
    }

    /// The base encoding, without the proof.
    pub fn to_base_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::BASE_BYTES);
        out.extend_from_slice(&self.id.to_bytes());
        out.extend_from_slice(&self.e1.to_bytes());
        out.extend_from_slice(&self.v1.to_bytes());
        out.extend_from_slice(&self.xa.to_bytes());
        out
    }

    /// The base encoding followed by the proof, when there is one.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.to_base_bytes();
        if let Some(proof) = &self.proof {
            out.extend_from_slice(&proof.to_bytes());
        }
        out
    }

    /// Accepts both encodings; anything past the base fields must be a proof.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::BASE_BYTES {
            return Err(Error::InvalidLength {
                object: "capsule fragment",
                expected: Self::BASE_BYTES,
                actual: bytes.len(),
            });
        }
        let (s, p) = (Scalar::BYTES, Point::BYTES);
        let id = Scalar::from_bytes(&bytes[..s])?;
        let e1 = Point::from_bytes(&bytes[s..s + p])?;
        let v1 = Point::from_bytes(&bytes[s + p..s + 2 * p])?;
        let xa = Point::from_bytes(&bytes[s + 2 * p..Self::BASE_BYTES])?;

        let proof = match &bytes[Self::BASE_BYTES..] {
            [] => None,
            rest => Some(Proof::from_bytes(rest)?),
        };

        Ok(CapsuleFrag {
            id,
            e1,
            v1,
            xa,
            proof,
        })
    }
}

impl_serde_via_bytes!(CapsuleFrag, "capsule fragment bytes");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capsule::Capsule;
    use crate::keygen::{setup, KeyPair};
    use crate::protocol::{encapsulate, generate_key_fragments, re_encapsulate};

    fn cfrag(aux: &[u8]) -> (Params, Capsule, CapsuleFrag) {
        let par = setup();
        let alice = KeyPair::random().unwrap();
        let bob = KeyPair::random().unwrap();
        let (_, capsule) = encapsulate(alice.public()).unwrap();
        let kfrags = generate_key_fragments(&par, alice.secret(), bob.public(), 2, 2).unwrap();
        let cfrag = re_encapsulate(&par, &kfrags[0], &capsule, aux).unwrap();
        (par, capsule, cfrag)
    }

    #[test]
    fn base_encoding_drops_proof() {
        let (par, capsule, cfrag) = cfrag(b"");
        let bytes = cfrag.to_base_bytes();
        assert_eq!(bytes.len(), CapsuleFrag::BASE_BYTES);

        let decoded = CapsuleFrag::from_bytes(&bytes).unwrap();
        assert!(decoded.proof().is_none());
        assert_eq!(decoded.e1(), cfrag.e1());
        assert!(!decoded.verify(&par, capsule.e(), capsule.v()));
    }

    #[test]
    fn full_encoding_keeps_proof() {
        let (par, capsule, cfrag) = cfrag(b"session-7");
        let decoded = CapsuleFrag::from_bytes(&cfrag.to_bytes()).unwrap();
        assert_eq!(decoded, cfrag);
        assert_eq!(decoded.proof().unwrap().aux(), b"session-7");
        assert!(decoded.verify(&par, capsule.e(), capsule.v()));
    }

    #[test]
    fn truncated_proof_is_rejected() {
        let (_, _, cfrag) = cfrag(b"");
        let bytes = cfrag.to_bytes();
        assert!(matches!(
            CapsuleFrag::from_bytes(&bytes[..bytes.len() - 1]),
            Err(Error::InvalidLength { .. })
        ));
    }

    #[test]
    fn tampered_rho_fails_verification() {
        let (par, capsule, mut cfrag) = cfrag(b"");
        if let Some(proof) = cfrag.proof.as_mut() {
            proof.rho = proof.rho + Scalar::ONE;
        }
        assert!(!cfrag.verify(&par, capsule.e(), capsule.v()));
    }

    #[test]
    fn tampered_proof_points_fail_verification() {
        let (par, capsule, cfrag) = cfrag(b"");
        let other = Point::generator() * Scalar::from_u64(5);
        for field in 0..4 {
            let mut forged = cfrag.clone();
            if let Some(proof) = forged.proof.as_mut() {
                let target = match field {
                    0 => &mut proof.e2,
                    1 => &mut proof.v2,
                    2 => &mut proof.u1,
                    _ => &mut proof.u2,
                };
                *target = *target + other;
            }
            assert!(!forged.verify(&par, capsule.e(), capsule.v()), "field {field}");
        }
    }

    #[test]
    fn proof_is_bound_to_capsule() {
        let (par, _, cfrag) = cfrag(b"");
        let alice = KeyPair::random().unwrap();
        let (_, other) = encapsulate(alice.public()).unwrap();
        assert!(!cfrag.verify(&par, other.e(), other.v()));
    }
}
