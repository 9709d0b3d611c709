//! The proxy's re-encryption transform.

use crate::cipher::{FirstLevelKey, ReEncryptionKey, SecondLevelKey};
use crate::curve;

/// Transforms a second-level wrapped key into a first-level one decryptable
/// by the delegatee named in `rekey`: (e(C1, R), C2).
///
/// Pure and deterministic: the same inputs always produce the same bytes.
/// The proxy sees neither the plaintext nor the symmetric key, and its
/// inputs reveal neither party's secret key.
pub fn re_encrypt(key: &SecondLevelKey, rekey: &ReEncryptionKey) -> FirstLevelKey {
    FirstLevelKey {
        first: curve::pairing(&key.first, &rekey.0),
        second: key.second,
    }
}
