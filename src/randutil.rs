use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::error::{Error, Result};
use crate::group::Scalar;

/// Uniform non-zero scalar from the operating system RNG.
pub fn random_scalar() -> Result<Scalar> {
    let mut rng = OsRng;
    loop {
        let mut bytes = [0u8; Scalar::BYTES];
        rng.try_fill_bytes(&mut bytes).map_err(|_| Error::Rng)?;
        // rejection sampling keeps the distribution uniform below the order
        if let Ok(s) = Scalar::from_bytes(&bytes) {
            if !s.is_zero() {
                return Ok(s);
            }
        }
    }
}

pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng.try_fill_bytes(&mut bytes).map_err(|_| Error::Rng)?;
    Ok(bytes)
}
