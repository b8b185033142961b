use num_bigint::BigUint;
use num_traits::One;

use crate::error::{Error, Result};
use crate::group::Scalar;
use crate::randutil::random_scalar;

/// Polynomial over the scalar field, coefficients `[c0, c1, ..., c_deg]`.
#[derive(Clone, Debug)]
pub struct Poly {
    pub coeffs: Vec<Scalar>,
}

impl Poly {
    /// Horner evaluation.
    pub fn eval(&self, x: Scalar) -> Scalar {
        self.coeffs
            .iter()
            .rev()
            .fold(Scalar::ZERO, |acc, c| acc * x + *c)
    }
}

/// Sample a random polynomial of the given degree with chosen constant term.
pub fn sample_poly_with_constant(degree: usize, c0: Scalar) -> Result<Poly> {
    let mut coeffs = Vec::with_capacity(degree + 1);
    coeffs.push(c0);
    for _ in 0..degree {
        coeffs.push(random_scalar()?);
    }
    Ok(Poly { coeffs })
}

/// Lagrange coefficient at zero for `xs[i]`: `Π_{k≠i} x_k / (x_k - x_i)`.
/// Repeated evaluation points make the denominator vanish.
pub fn lagrange_coeff(i: usize, xs: &[Scalar]) -> Result<Scalar> {
    let x_i = xs[i];
    let mut num = Scalar::ONE;
    let mut den = Scalar::ONE;
    for (k, &x_k) in xs.iter().enumerate() {
        if k == i {
            continue;
        }
        num = num * x_k;
        den = den * (x_k - x_i);
    }
    let den_inv = den.invert().map_err(|_| Error::DuplicateFragment)?;
    Ok(num * den_inv)
}

/// Maps `d` into `[1, order - 1]` as `1 + (d mod (order - 1))`.
pub fn to_invertible(d: &Scalar) -> Result<Scalar> {
    let order_minus_one = BigUint::from_bytes_be(&(-Scalar::ONE).to_bytes());
    let mapped = BigUint::from_bytes_be(&d.to_bytes()) % order_minus_one + BigUint::one();

    let raw = mapped.to_bytes_be();
    let mut bytes = [0u8; Scalar::BYTES];
    bytes[Scalar::BYTES - raw.len()..].copy_from_slice(&raw);
    Scalar::from_bytes(&bytes)
}
