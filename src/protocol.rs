use tracing::{debug, warn};

use crate::capsule::Capsule;
use crate::cfrag::CapsuleFrag;
use crate::error::{Error, Result};
use crate::group::{Point, Scalar};
use crate::hash::{hash_points, kdf};
use crate::keygen::{PublicKey, SecretKey};
use crate::kfrag::{self, evaluation_point, KeyFragment};
use crate::nizk;
use crate::randutil::random_scalar;
use crate::shamir::{lagrange_coeff, to_invertible};
use crate::symmetric;
use crate::types::{Params, SharedKey};

/// Encapsulate:
/// - sample r, u and set E = g^r, V = g^u
/// - s = u + r * H(E, V)
/// - key = KDF(alicePub^(r + u))
pub fn encapsulate(alice_pk: &PublicKey) -> Result<(SharedKey, Capsule)> {
    let r = random_scalar()?;
    let u = random_scalar()?;
    let e = Point::generator() * r;
    let v = Point::generator() * u;

    let h = hash_points(&[&e, &v])?;
    let s = u + r * h;

    let key = kdf(&(*alice_pk.point() * (r + u)))?;
    debug!("encapsulated a fresh key");
    Ok((key, Capsule { e, v, s }))
}

/// DecapsulateOriginal: key = KDF((E + V)^a).
pub fn decapsulate_original(alice_sk: &SecretKey, capsule: &Capsule) -> Result<SharedKey> {
    if !capsule.verify() {
        warn!("refusing to decapsulate an invalid capsule");
        return Err(Error::CapsuleVerification);
    }
    kdf(&((capsule.e + capsule.v) * alice_sk.scalar()))
}

/// GenerateKeyFragments: `n` fragments of the delegation from Alice to Bob,
/// `t` of which are needed for reconstruction.
pub fn generate_key_fragments(
    par: &Params,
    alice_sk: &SecretKey,
    bob_pk: &PublicKey,
    n: usize,
    t: usize,
) -> Result<Vec<KeyFragment>> {
    kfrag::generate(par, alice_sk, bob_pk, n, t)
}

/// ReEncapsulate: E1 = E^rk, V1 = V^rk, plus a proof that the same rk was
/// used for E1, V1 and the fragment's commitment U1.
/// The proof is checked before the fragment is handed out.
pub fn re_encapsulate(
    par: &Params,
    kfrag: &KeyFragment,
    capsule: &Capsule,
    aux: &[u8],
) -> Result<CapsuleFrag> {
    if !capsule.verify() {
        warn!("refusing to re-encapsulate an invalid capsule");
        return Err(Error::CapsuleVerification);
    }

    let e1 = capsule.e * kfrag.rk;
    let v1 = capsule.v * kfrag.rk;
    let proof = nizk::prove(par, &capsule.e, &capsule.v, &e1, &v1, &kfrag.u, &kfrag.rk, aux)?;

    let cfrag = CapsuleFrag {
        id: kfrag.id,
        e1,
        v1,
        xa: kfrag.xa,
        proof: Some(proof),
    };
    if !cfrag.verify(par, &capsule.e, &capsule.v) {
        return Err(Error::ProofConstruction);
    }
    debug!(aux_len = aux.len(), "re-encapsulated capsule");
    Ok(cfrag)
}

/// DecapsulateFragments:
/// - D = H(A, B, A^b), x_i = H(id_i || D)
/// - P = Σ λ_i (E1_i + V1_i), λ_i the Lagrange coefficients at zero
/// - d = H(XA, B, XA^b), key = KDF(P^d')
///
/// Fewer than the delegation's threshold yields a key that does not match;
/// this cannot be told apart here.
pub fn decapsulate_fragments(
    bob_sk: &SecretKey,
    alice_pk: &PublicKey,
    cfrags: &[CapsuleFrag],
) -> Result<SharedKey> {
    let first = cfrags.first().ok_or(Error::NoFragments)?;
    let xa = first.xa;
    if cfrags.iter().any(|c| c.xa != xa) {
        warn!("capsule fragments come from different delegations");
        return Err(Error::CFragVerification);
    }
    debug!(fragments = cfrags.len(), "combining capsule fragments");

    let b = bob_sk.scalar();
    let bob_pk = bob_sk.public_key();
    let alice = *alice_pk.point();

    let dh = hash_points(&[&alice, bob_pk.point(), &(alice * b)])?;
    let xs = cfrags
        .iter()
        .map(|c| evaluation_point(&c.id, &dh))
        .collect::<Result<Vec<Scalar>>>()?;

    let combined = cfrags
        .iter()
        .enumerate()
        .map(|(i, c)| -> Result<Point> { Ok((c.e1 + c.v1) * lagrange_coeff(i, &xs)?) })
        .collect::<Result<Vec<Point>>>()?
        .into_iter()
        .reduce(|acc, p| acc + p)
        .ok_or(Error::NoFragments)?;

    let d = hash_points(&[&xa, bob_pk.point(), &(xa * b)])?;
    kdf(&(combined * to_invertible(&d)?))
}

/// Encapsulate a fresh key for `alice_pk` and seal `plaintext` under it.
pub fn encrypt(alice_pk: &PublicKey, plaintext: &[u8]) -> Result<(Capsule, Vec<u8>)> {
    let (key, capsule) = encapsulate(alice_pk)?;
    let envelope = symmetric::encrypt(&key, plaintext)?;
    Ok((capsule, envelope))
}

pub fn decrypt_original(alice_sk: &SecretKey, capsule: &Capsule, envelope: &[u8]) -> Result<Vec<u8>> {
    let key = decapsulate_original(alice_sk, capsule)?;
    symmetric::decrypt(&key, envelope)
}

/// Opens an envelope with a key rebuilt from capsule fragments. Too few
/// fragments show up as `Error::Decryption`.
pub fn decrypt_reencrypted(
    bob_sk: &SecretKey,
    alice_pk: &PublicKey,
    cfrags: &[CapsuleFrag],
    envelope: &[u8],
) -> Result<Vec<u8>> {
    let key = decapsulate_fragments(bob_sk, alice_pk, cfrags)?;
    symmetric::decrypt(&key, envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::{setup, KeyPair};

    #[test]
    fn decapsulate_original_matches_encapsulate() {
        let alice = KeyPair::random().unwrap();
        let (key, capsule) = encapsulate(alice.public()).unwrap();
        assert_eq!(decapsulate_original(alice.secret(), &capsule).unwrap(), key);

        let eve = KeyPair::random().unwrap();
        assert_ne!(decapsulate_original(eve.secret(), &capsule).unwrap(), key);
    }

    #[test]
    fn invalid_capsule_is_refused() {
        let par = setup();
        let alice = KeyPair::random().unwrap();
        let bob = KeyPair::random().unwrap();
        let (_, mut capsule) = encapsulate(alice.public()).unwrap();
        capsule.s = capsule.s + Scalar::ONE;

        assert_eq!(
            decapsulate_original(alice.secret(), &capsule),
            Err(Error::CapsuleVerification)
        );
        let kfrags = generate_key_fragments(&par, alice.secret(), bob.public(), 1, 1).unwrap();
        assert_eq!(
            re_encapsulate(&par, &kfrags[0], &capsule, b""),
            Err(Error::CapsuleVerification)
        );
    }

    #[test]
    fn single_fragment_threshold() {
        let par = setup();
        let alice = KeyPair::random().unwrap();
        let bob = KeyPair::random().unwrap();
        let (key, capsule) = encapsulate(alice.public()).unwrap();
        let kfrags = generate_key_fragments(&par, alice.secret(), bob.public(), 3, 1).unwrap();

        for kfrag in &kfrags {
            let cfrag = re_encapsulate(&par, kfrag, &capsule, b"").unwrap();
            let recovered = decapsulate_fragments(bob.secret(), alice.public(), &[cfrag]).unwrap();
            assert_eq!(recovered, key);
        }
    }

    #[test]
    fn empty_fragment_set_is_rejected() {
        let alice = KeyPair::random().unwrap();
        let bob = KeyPair::random().unwrap();
        assert_eq!(
            decapsulate_fragments(bob.secret(), alice.public(), &[]),
            Err(Error::NoFragments)
        );
    }

    #[test]
    fn duplicate_fragments_are_rejected() {
        let par = setup();
        let alice = KeyPair::random().unwrap();
        let bob = KeyPair::random().unwrap();
        let (_, capsule) = encapsulate(alice.public()).unwrap();
        let kfrags = generate_key_fragments(&par, alice.secret(), bob.public(), 3, 2).unwrap();
        let cfrag = re_encapsulate(&par, &kfrags[0], &capsule, b"").unwrap();

        assert_eq!(
            decapsulate_fragments(bob.secret(), alice.public(), &[cfrag.clone(), cfrag]),
            Err(Error::DuplicateFragment)
        );
    }

    #[test]
    fn mixed_delegations_are_rejected() {
        let par = setup();
        let alice = KeyPair::random().unwrap();
        let bob = KeyPair::random().unwrap();
        let (_, capsule) = encapsulate(alice.public()).unwrap();
        let first = generate_key_fragments(&par, alice.secret(), bob.public(), 2, 2).unwrap();
        let second = generate_key_fragments(&par, alice.secret(), bob.public(), 2, 2).unwrap();

        let cfrags = [
            re_encapsulate(&par, &first[0], &capsule, b"").unwrap(),
            re_encapsulate(&par, &second[1], &capsule, b"").unwrap(),
        ];
        assert_eq!(
            decapsulate_fragments(bob.secret(), alice.public(), &cfrags),
            Err(Error::CFragVerification)
        );
    }

    #[test]
    fn hybrid_round_trip() {
        let alice = KeyPair::random().unwrap();
        let (capsule, envelope) = encrypt(alice.public(), b"hello world").unwrap();
        assert_eq!(
            decrypt_original(alice.secret(), &capsule, &envelope).unwrap(),
            b"hello world"
        );
    }
}
