//! Adapter over the arkworks BN254 backend.
//!
//! Everything the scheme needs from the pairing library funnels through
//! here: generators, the pairing, target-group arithmetic, uniform sampling
//! and the canonical byte encodings. All deserializers validate canonical
//! form and, for the curve groups, prime-subgroup membership.

use ark_bn254::{Bn254, Fq12, Fr, G1Affine, G2Affine};
use ark_ec::pairing::Pairing;
use ark_ec::AffineRepr;
use ark_ff::{Field, One, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::UniformRand;
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use crate::err::{Error, Result};

/// Size of a compressed G1 group element.
pub const G1_BYTES: usize = 32;

/// Size of a compressed G2 group element.
pub const G2_BYTES: usize = 64;

/// Size of an uncompressed ("raw") G2 group element.
pub const G2_RAW_BYTES: usize = 128;

/// Size of a target group element.
pub const GT_BYTES: usize = 384;

/// Maximum size of a serialized scalar (minimal big-endian form).
pub const SCALAR_BYTES: usize = 32;

/// Element of the target group GT, written multiplicatively.
pub type Gt = Fq12;

/// Scalar of the prime-order subgroups.
pub type Scalar = Fr;

/// The canonical generators of G1 and G2.
pub fn generators() -> (G1Affine, G2Affine) {
    (G1Affine::generator(), G2Affine::generator())
}

/// The bilinear pairing e: G1 x G2 -> GT.
pub fn pairing(p: &G1Affine, q: &G2Affine) -> Gt {
    Bn254::pairing(*p, *q).0
}

/// Exponentiation in the target group.
pub fn gt_exp(base: &Gt, exp: &Scalar) -> Gt {
    base.pow(exp.into_bigint())
}

/// Division in the target group. `None` for a zero divisor, which no
/// element of the prime-order subgroup is.
pub fn gt_div(a: &Gt, b: &Gt) -> Option<Gt> {
    b.inverse().map(|inv| *a * inv)
}

/// Whether `x` is the identity of the target group.
pub fn gt_is_identity(x: &Gt) -> bool {
    x.is_one()
}

/// The order r of the prime subgroups, as an unreduced integer.
pub fn scalar_order() -> BigUint {
    Fr::MODULUS.into()
}

/// Samples a scalar uniformly from [0, r).
pub fn rand_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    Fr::rand(rng)
}

/// Samples a scalar uniformly from [1, r-1].
pub fn rand_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let s = Fr::rand(rng);
        if !s.is_zero() {
            return s;
        }
    }
}

/// Samples an element of the subgroup generated by `z`, uniformly.
pub fn rand_gt<R: RngCore + CryptoRng>(z: &Gt, rng: &mut R) -> Gt {
    gt_exp(z, &rand_scalar(rng))
}

/// The scalar as an unreduced integer.
pub fn scalar_to_biguint(s: &Scalar) -> BigUint {
    s.into_bigint().into()
}

/// Parses an unreduced integer as a scalar, rejecting values at or above r.
pub fn scalar_from_biguint(n: &BigUint) -> Result<Scalar> {
    if *n >= scalar_order() {
        return Err(Error::ScalarOutOfRange);
    }
    Ok(Fr::from_be_bytes_mod_order(&n.to_bytes_be()))
}

/// Minimal big-endian encoding of a scalar. The zero scalar encodes to a
/// single zero byte.
pub fn scalar_to_bytes(s: &Scalar) -> Vec<u8> {
    scalar_to_biguint(s).to_bytes_be()
}

/// Parses a minimal (or padded) big-endian scalar, rejecting values at or
/// above r.
pub fn scalar_from_bytes(bytes: &[u8]) -> Result<Scalar> {
    scalar_from_biguint(&BigUint::from_bytes_be(bytes))
}

/// Minimal lowercase hex form of a scalar, as `big.Int`-style encoders
/// print it: no `0x` prefix, no leading zero digits.
pub fn scalar_to_hex(s: &Scalar) -> String {
    scalar_to_biguint(s).to_str_radix(16)
}

/// Parses a hex scalar. Leading zero digits are accepted and canonicalized
/// away; values at or above r are rejected.
pub fn scalar_from_hex(hex: &str) -> Result<Scalar> {
    let n = BigUint::parse_bytes(hex.as_bytes(), 16)
        .ok_or_else(|| Error::InvalidEncoding(format!("malformed hex scalar {hex:?}")))?;
    scalar_from_biguint(&n)
}

/// Canonical compressed encoding of a G1 element.
pub fn g1_to_bytes(p: &G1Affine) -> [u8; G1_BYTES] {
    let mut buf = [0u8; G1_BYTES];
    p.serialize_compressed(&mut buf[..])
        .expect("G1 fits its canonical size");
    buf
}

/// Decodes a compressed G1 element. Exactly [`G1_BYTES`] bytes; validates
/// curve and subgroup membership.
pub fn g1_from_bytes(bytes: &[u8]) -> Result<G1Affine> {
    if bytes.len() != G1_BYTES {
        return Err(Error::InvalidEncoding(format!(
            "G1 element must be {G1_BYTES} bytes, got {}",
            bytes.len()
        )));
    }
    G1Affine::deserialize_compressed(bytes)
        .map_err(|_| Error::InvalidEncoding("malformed G1 element".into()))
}

/// Canonical compressed encoding of a G2 element.
pub fn g2_to_bytes(p: &G2Affine) -> [u8; G2_BYTES] {
    let mut buf = [0u8; G2_BYTES];
    p.serialize_compressed(&mut buf[..])
        .expect("G2 fits its canonical size");
    buf
}

/// Raw (uncompressed) encoding of a G2 element.
pub fn g2_raw_bytes(p: &G2Affine) -> [u8; G2_RAW_BYTES] {
    let mut buf = [0u8; G2_RAW_BYTES];
    p.serialize_uncompressed(&mut buf[..])
        .expect("G2 fits its raw size");
    buf
}

/// Decodes a G2 element from either the compressed ([`G2_BYTES`]) or raw
/// ([`G2_RAW_BYTES`]) form; validates curve and subgroup membership.
pub fn g2_from_bytes(bytes: &[u8]) -> Result<G2Affine> {
    match bytes.len() {
        G2_BYTES => G2Affine::deserialize_compressed(bytes)
            .map_err(|_| Error::InvalidEncoding("malformed G2 element".into())),
        G2_RAW_BYTES => G2Affine::deserialize_uncompressed(bytes)
            .map_err(|_| Error::InvalidEncoding("malformed G2 element".into())),
        n => Err(Error::InvalidEncoding(format!(
            "G2 element must be {G2_BYTES} or {G2_RAW_BYTES} bytes, got {n}"
        ))),
    }
}

/// Canonical encoding of a target group element.
pub fn gt_to_bytes(x: &Gt) -> [u8; GT_BYTES] {
    let mut buf = [0u8; GT_BYTES];
    x.serialize_compressed(&mut buf[..])
        .expect("GT fits its canonical size");
    buf
}

/// Decodes a target group element. Exactly [`GT_BYTES`] bytes; validates
/// that every coefficient is a canonical field element.
pub fn gt_from_bytes(bytes: &[u8]) -> Result<Gt> {
    if bytes.len() != GT_BYTES {
        return Err(Error::InvalidEncoding(format!(
            "GT element must be {GT_BYTES} bytes, got {}",
            bytes.len()
        )));
    }
    Gt::deserialize_compressed(bytes)
        .map_err(|_| Error::InvalidEncoding("malformed GT element".into()))
}
