//! Wrapped-key artifacts and their canonical byte forms.
//!
//! Every artifact serializes as a plain concatenation of canonical group
//! encodings, no framing. Decoders are strict about length and reject any
//! malformed element.

use ark_bn254::{G1Affine, G2Affine};
use arrayref::{array_refs, mut_array_refs};

use crate::curve::{
    g1_from_bytes, g1_to_bytes, g2_from_bytes, g2_raw_bytes, gt_from_bytes, gt_to_bytes, Gt,
    G1_BYTES, G2_RAW_BYTES, GT_BYTES,
};
use crate::err::{Error, Result};

/// Serialized size of a [`SecondLevelKey`]: compressed G1 followed by GT.
pub const SECOND_LEVEL_KEY_BYTES: usize = G1_BYTES + GT_BYTES;

/// Serialized size of a [`FirstLevelKey`]: two GT elements.
pub const FIRST_LEVEL_KEY_BYTES: usize = 2 * GT_BYTES;

/// Wrapped symmetric key produced by second-level encryption:
/// (g1^k, m * Z^(a1*k)).
///
/// Decryptable by the original encryptor directly, or by a delegatee after
/// the proxy transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecondLevelKey {
    /// g1^k.
    pub first: G1Affine,
    /// m * Z^(a1*k).
    pub second: Gt,
}

impl SecondLevelKey {
    /// Canonical encoding, [`SECOND_LEVEL_KEY_BYTES`] bytes.
    pub fn to_bytes(&self) -> [u8; SECOND_LEVEL_KEY_BYTES] {
        let mut res = [0u8; SECOND_LEVEL_KEY_BYTES];
        let (first, second) = mut_array_refs![&mut res, G1_BYTES, GT_BYTES];
        *first = g1_to_bytes(&self.first);
        *second = gt_to_bytes(&self.second);
        res
    }

    /// Strict decode: exactly [`SECOND_LEVEL_KEY_BYTES`] bytes, compressed
    /// G1 in the first slot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SECOND_LEVEL_KEY_BYTES {
            return Err(Error::InvalidEncoding(format!(
                "second-level key must be {SECOND_LEVEL_KEY_BYTES} bytes, got {}",
                bytes.len()
            )));
        }
        let bytes: &[u8; SECOND_LEVEL_KEY_BYTES] = bytes.try_into().unwrap();
        let (first, second) = array_refs![bytes, G1_BYTES, GT_BYTES];
        Ok(SecondLevelKey {
            first: g1_from_bytes(first)?,
            second: gt_from_bytes(second)?,
        })
    }
}

/// Wrapped symmetric key after the proxy transform:
/// (e(C1, R), C2) = (Z^(a1*k*b2), m * Z^(a1*k)).
///
/// Decryptable by the delegatee alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FirstLevelKey {
    /// Z^(a1*k*b2).
    pub first: Gt,
    /// m * Z^(a1*k), carried over unchanged from the second-level key.
    pub second: Gt,
}

impl FirstLevelKey {
    /// Canonical encoding, [`FIRST_LEVEL_KEY_BYTES`] bytes.
    pub fn to_bytes(&self) -> [u8; FIRST_LEVEL_KEY_BYTES] {
        let mut res = [0u8; FIRST_LEVEL_KEY_BYTES];
        let (first, second) = mut_array_refs![&mut res, GT_BYTES, GT_BYTES];
        *first = gt_to_bytes(&self.first);
        *second = gt_to_bytes(&self.second);
        res
    }

    /// Strict decode: exactly [`FIRST_LEVEL_KEY_BYTES`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != FIRST_LEVEL_KEY_BYTES {
            return Err(Error::InvalidEncoding(format!(
                "first-level key must be {FIRST_LEVEL_KEY_BYTES} bytes, got {}",
                bytes.len()
            )));
        }
        let bytes: &[u8; FIRST_LEVEL_KEY_BYTES] = bytes.try_into().unwrap();
        let (first, second) = array_refs![bytes, GT_BYTES, GT_BYTES];
        Ok(FirstLevelKey {
            first: gt_from_bytes(first)?,
            second: gt_from_bytes(second)?,
        })
    }
}

/// Delegation token for one ordered A -> B relation:
/// (g2^(b2))^(a1) in G2.
///
/// Held by the proxy; reveals neither party's secret key on its own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReEncryptionKey(pub G2Affine);

impl ReEncryptionKey {
    /// Canonical encoding: the raw (uncompressed) G2 form,
    /// [`G2_RAW_BYTES`] bytes.
    pub fn to_bytes(&self) -> [u8; G2_RAW_BYTES] {
        g2_raw_bytes(&self.0)
    }

    /// Decodes from the compressed or raw G2 form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        g2_from_bytes(bytes).map(ReEncryptionKey)
    }
}
