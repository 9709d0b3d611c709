//! Symmetric key derivation from target group elements.
//!
//! The pairing-level scheme transports a random GT element; its HKDF-SHA256
//! digest is the key for the AEAD layer. Both sides of the exchange derive
//! the same key from the same element, so the derivation is a pure function
//! of the element's canonical encoding.

use hkdf::Hkdf;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::curve::{gt_is_identity, gt_to_bytes, rand_gt, Gt};
use crate::err::{Error, Result};

/// Key lengths accepted by the derivation and sealing layers, matching
/// AES-128/192/256. High-level callers always use 32.
pub const KEY_SIZES: [usize; 3] = [16, 24, 32];

// Domain separation labels for the HKDF extract and expand steps.
const DERIVE_SALT: &[u8] = b"PRE_derive_key";
const DERIVE_INFO: &[u8] = b"PRE_symmetric_key";

/// Derives a symmetric key of `len` bytes from a target group element.
///
/// Deterministic in the canonical encoding of `gt`. Rejects lengths outside
/// [`KEY_SIZES`] and the identity element, which an encapsulated key never
/// is.
pub fn derive_key_from_gt(gt: &Gt, len: usize) -> Result<Zeroizing<Vec<u8>>> {
    if !KEY_SIZES.contains(&len) {
        return Err(Error::InvalidKeySize(len));
    }
    if gt_is_identity(gt) {
        return Err(Error::InvalidInput("target group identity"));
    }

    let ikm = gt_to_bytes(gt);
    let hk = Hkdf::<Sha256>::new(Some(DERIVE_SALT), &ikm);
    let mut okm = Zeroizing::new(vec![0u8; len]);
    hk.expand(DERIVE_INFO, okm.as_mut_slice())
        .map_err(|_| Error::InvalidKeySize(len))?;
    Ok(okm)
}

/// Samples a fresh element of the subgroup generated by `z` and derives a
/// symmetric key of `len` bytes from it. The element is what gets
/// encapsulated under the pairing-level scheme; the key seals the payload.
pub fn random_symmetric_key_from_gt<R: RngCore + CryptoRng>(
    z: &Gt,
    len: usize,
    rng: &mut R,
) -> Result<(Gt, Zeroizing<Vec<u8>>)> {
    let m = loop {
        let m = rand_gt(z, rng);
        if !gt_is_identity(&m) {
            break m;
        }
    };
    let key = derive_key_from_gt(&m, len)?;
    Ok((m, key))
}
