use std::sync::OnceLock;

use proptest::prelude::*;
use threshold_pre::{
    decapsulate_fragments, decapsulate_original, decrypt_reencrypted, encapsulate, encrypt,
    generate_key_fragments, re_encapsulate, setup, Capsule, CapsuleFrag, Error, KeyFragment,
    KeyPair, PublicKey,
};

const N: usize = 7;
const T: usize = 5;

#[test]
fn encapsulate_decapsulate() {
    let alice = KeyPair::random().unwrap();
    let (k_e, cap) = encapsulate(alice.public()).unwrap();

    let k_d = decapsulate_original(alice.secret(), &cap).unwrap();
    assert_eq!(k_e, k_d);
    assert_eq!(k_e.len(), 32);
}

#[test]
fn delegate_five_of_seven() {
    let par = setup();
    let alice = KeyPair::random().unwrap();
    let bob = KeyPair::random().unwrap();

    let (key_alice, capsule) = encapsulate(alice.public()).unwrap();
    let kfrags = generate_key_fragments(&par, alice.secret(), bob.public(), N, T).unwrap();

    // any five will do, take the last ones
    let cfrags: Vec<CapsuleFrag> = kfrags[N - T..]
        .iter()
        .map(|k| re_encapsulate(&par, k, &capsule, b"tx-42").unwrap())
        .collect();
    for cfrag in &cfrags {
        assert!(cfrag.verify(&par, capsule.e(), capsule.v()));
    }

    let key_bob = decapsulate_fragments(bob.secret(), alice.public(), &cfrags).unwrap();
    assert_eq!(key_bob, key_alice);
}

#[test]
fn more_than_threshold_also_works() {
    let par = setup();
    let alice = KeyPair::random().unwrap();
    let bob = KeyPair::random().unwrap();

    let (key_alice, capsule) = encapsulate(alice.public()).unwrap();
    let kfrags = generate_key_fragments(&par, alice.secret(), bob.public(), N, T).unwrap();
    let cfrags: Vec<CapsuleFrag> = kfrags
        .iter()
        .map(|k| re_encapsulate(&par, k, &capsule, b"").unwrap())
        .collect();

    assert_eq!(
        decapsulate_fragments(bob.secret(), alice.public(), &cfrags).unwrap(),
        key_alice
    );
}

#[test]
fn below_threshold_recovers_wrong_key() {
    let par = setup();
    let alice = KeyPair::random().unwrap();
    let bob = KeyPair::random().unwrap();

    let (capsule, envelope) = encrypt(alice.public(), b"hello world").unwrap();
    let key_alice = decapsulate_original(alice.secret(), &capsule).unwrap();
    let kfrags = generate_key_fragments(&par, alice.secret(), bob.public(), N, T).unwrap();
    let cfrags: Vec<CapsuleFrag> = kfrags[..T - 1]
        .iter()
        .map(|k| re_encapsulate(&par, k, &capsule, b"").unwrap())
        .collect();

    let key_bob = decapsulate_fragments(bob.secret(), alice.public(), &cfrags).unwrap();
    assert_ne!(key_bob, key_alice);
    assert_eq!(
        decrypt_reencrypted(bob.secret(), alice.public(), &cfrags, &envelope),
        Err(Error::Decryption)
    );
}

#[test]
fn hybrid_delegation_over_the_wire() {
    let par = setup();
    let alice = KeyPair::random().unwrap();
    let bob = KeyPair::random().unwrap();
    let plaintext = b"hello world".to_vec();

    let (capsule, envelope) = encrypt(alice.public(), &plaintext).unwrap();
    let capsule = Capsule::from_bytes(&capsule.to_bytes()).unwrap();

    let kfrags = generate_key_fragments(&par, alice.secret(), bob.public(), N, T).unwrap();
    let cfrags: Vec<CapsuleFrag> = kfrags
        .iter()
        .take(T)
        .map(|k| KeyFragment::from_bytes(&k.to_bytes()).unwrap())
        .map(|k| re_encapsulate(&par, &k, &capsule, b"").unwrap())
        // proxies ship the base encoding only
        .map(|c| CapsuleFrag::from_bytes(&c.to_base_bytes()).unwrap())
        .collect();

    let opened = decrypt_reencrypted(bob.secret(), alice.public(), &cfrags, &envelope).unwrap();
    assert_eq!(opened, plaintext);
}

#[test]
fn serde_round_trip() {
    let par = setup();
    let alice = KeyPair::random().unwrap();
    let bob = KeyPair::random().unwrap();
    let (_, capsule) = encapsulate(alice.public()).unwrap();
    let kfrags = generate_key_fragments(&par, alice.secret(), bob.public(), 2, 2).unwrap();
    let cfrag = re_encapsulate(&par, &kfrags[0], &capsule, b"aux").unwrap();

    let capsule2: Capsule = bincode::deserialize(&bincode::serialize(&capsule).unwrap()).unwrap();
    assert_eq!(capsule2, capsule);

    let kfrag2: KeyFragment = bincode::deserialize(&bincode::serialize(&kfrags[0]).unwrap()).unwrap();
    assert_eq!(kfrag2, kfrags[0]);

    let cfrag2: CapsuleFrag = bincode::deserialize(&bincode::serialize(&cfrag).unwrap()).unwrap();
    assert_eq!(cfrag2, cfrag);
    assert!(cfrag2.verify(&par, capsule.e(), capsule.v()));

    let pk: PublicKey = bincode::deserialize(&bincode::serialize(alice.public()).unwrap()).unwrap();
    assert_eq!(&pk, alice.public());
}

#[test]
fn serde_rejects_forged_capsule() {
    let alice = KeyPair::random().unwrap();
    let (_, capsule) = encapsulate(alice.public()).unwrap();
    let mut bytes = bincode::serialize(&capsule).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    assert!(bincode::deserialize::<Capsule>(&bytes).is_err());
}

fn shared_capsule() -> &'static Vec<u8> {
    static BYTES: OnceLock<Vec<u8>> = OnceLock::new();
    BYTES.get_or_init(|| {
        let alice = KeyPair::random().unwrap();
        encapsulate(alice.public()).unwrap().1.to_bytes()
    })
}

proptest! {
    #[test]
    fn any_single_byte_change_breaks_capsule(idx in 0..Capsule::BYTES, flip in 1u8..=255) {
        let mut bytes = shared_capsule().clone();
        bytes[idx] ^= flip;
        prop_assert!(Capsule::from_bytes(&bytes).is_err());
    }
}
