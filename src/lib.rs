//! Threshold proxy re-encryption over secp256k1.
//!
//! Alice encapsulates a symmetric key under her public key and gets back the
//! key and a capsule:
//!
//! ```text
//!     E = g^r, V = g^u, s = u + r * H(E, V)
//!     k = kdf((g^a)^(r + u))
//! ```
//!
//! To delegate to Bob she splits `a / d` (with `d` derived from an ephemeral
//! Diffie-Hellman exchange with Bob) into `n` Shamir shares `rk_i`. A proxy
//! holding share `i` turns the capsule into `(E^rk_i, V^rk_i)` together with a
//! proof that it used the committed share. Bob interpolates any `t` of those
//! fragments in the exponent, multiplies by `d` and recovers `k`.

#[macro_use]
mod macros;

pub mod capsule;
pub mod cfrag;
pub mod error;
pub mod group;
pub mod hash;
pub mod keygen;
pub mod kfrag;
pub mod nizk;
pub mod protocol;
pub mod randutil;
pub mod shamir;
pub mod symmetric;
pub mod types;

pub use capsule::Capsule;
pub use cfrag::CapsuleFrag;
pub use error::{Error, Result};
pub use keygen::{setup, KeyPair, PublicKey, SecretKey};
pub use kfrag::KeyFragment;
pub use nizk::Proof;
pub use protocol::{
    decapsulate_fragments, decapsulate_original, decrypt_original, decrypt_reencrypted,
    encapsulate, encrypt, generate_key_fragments, re_encapsulate,
};
pub use types::{Params, SharedKey};
