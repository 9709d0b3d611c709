//! Delegator and delegatee operations.
//!
//! The client side of the scheme: producing delegation tokens, second-level
//! encryption, and both decryption paths. All operations are synchronous,
//! CPU-bound and safe to call from multiple threads with distinct inputs.

use ark_bn254::{G1Projective, G2Projective};
use ark_ec::CurveGroup;
use ark_ff::{Field, Zero};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::aead;
use crate::cipher::{FirstLevelKey, ReEncryptionKey, SecondLevelKey};
use crate::curve;
use crate::err::{Error, Result};
use crate::kdf;
use crate::keys::{PublicKey, SecretKey, SystemParams};

/// Symmetric key size used by the hybrid layer (AES-256).
const SYMMETRIC_KEY_BYTES: usize = 32;

/// Encryptor/decryptor bound to a set of system parameters at construction.
#[derive(Clone, Copy, Debug)]
pub struct Client {
    params: SystemParams,
}

impl Client {
    /// Creates a client over the given parameters.
    pub fn new(params: SystemParams) -> Self {
        Client { params }
    }

    /// The parameters this client operates under.
    pub fn params(&self) -> &SystemParams {
        &self.params
    }

    /// Produces the delegation token for the A -> B relation:
    /// R = (pk_B.second)^(a1_A). Deterministic; one token per ordered pair.
    pub fn generate_reencryption_key(
        &self,
        secret_a: &SecretKey,
        public_b: &PublicKey,
    ) -> ReEncryptionKey {
        ReEncryptionKey((G2Projective::from(public_b.second) * secret_a.first).into_affine())
    }

    /// Encrypts `plaintext` under the caller's secret key so that the caller
    /// can decrypt it directly and any delegatee can decrypt it after the
    /// proxy transform.
    ///
    /// `k` must lie in [1, r-1] and be fresh for every call; reuse across
    /// messages voids the scheme's security. A fresh target group element is
    /// sampled internally as the encapsulated key.
    pub fn second_level_encrypt<R: RngCore + CryptoRng>(
        &self,
        secret_a: &SecretKey,
        plaintext: &[u8],
        k: &BigUint,
        rng: &mut R,
    ) -> Result<(SecondLevelKey, Vec<u8>)> {
        let k = curve::scalar_from_biguint(k)?;
        if k.is_zero() {
            return Err(Error::ScalarOutOfRange);
        }

        let (m, key) =
            kdf::random_symmetric_key_from_gt(&self.params.z, SYMMETRIC_KEY_BYTES, rng)?;
        let blob = aead::seal(plaintext, &key)?;
        drop(key);

        // C1 = g1^k, C2 = m * (Z^a1)^k.
        let first = (G1Projective::from(self.params.g1) * k).into_affine();
        let z_a1 = curve::gt_exp(&self.params.z, &secret_a.first);
        let second = m * curve::gt_exp(&z_a1, &k);

        Ok((SecondLevelKey { first, second }, blob))
    }

    /// Decrypts a transformed (first-level) wrapped key and its sealed
    /// payload with the delegatee's secret key.
    pub fn decrypt_first_level(
        &self,
        key: &FirstLevelKey,
        blob: &[u8],
        secret_b: &SecretKey,
    ) -> Result<Vec<u8>> {
        let sym = self.first_level_symmetric_key(key, secret_b)?;
        aead::open(blob, &sym)
    }

    /// Decrypts a second-level wrapped key and its sealed payload as the
    /// original encryptor.
    pub fn decrypt_second_level(
        &self,
        key: &SecondLevelKey,
        blob: &[u8],
        secret_a: &SecretKey,
    ) -> Result<Vec<u8>> {
        let sym = self.second_level_symmetric_key(key, secret_a)?;
        aead::open(blob, &sym)
    }

    // D1 = Z^(a1*k*b2), so D1^(b2^-1) is the masking factor Z^(a1*k).
    fn first_level_symmetric_key(
        &self,
        key: &FirstLevelKey,
        secret_b: &SecretKey,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let inv = secret_b
            .second
            .inverse()
            .ok_or(Error::ModInverseUndefined)?;
        let mask = curve::gt_exp(&key.first, &inv);
        let m = curve::gt_div(&key.second, &mask)
            .ok_or(Error::InvalidInput("degenerate wrapped key"))?;
        kdf::derive_key_from_gt(&m, SYMMETRIC_KEY_BYTES)
    }

    // e(C1, g2) = Z^k, so raising it to a1 recovers the masking factor.
    fn second_level_symmetric_key(
        &self,
        key: &SecondLevelKey,
        secret_a: &SecretKey,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let z_k = curve::pairing(&key.first, &self.params.g2);
        let mask = curve::gt_exp(&z_k, &secret_a.first);
        let m = curve::gt_div(&key.second, &mask)
            .ok_or(Error::InvalidInput("degenerate wrapped key"))?;
        kdf::derive_key_from_gt(&m, SYMMETRIC_KEY_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, system_params, KeyPair};
    use crate::proxy::re_encrypt;

    const MESSAGE: &[u8] =
        b"Life is full of unexpected moments that shape who we become. Each day \
          brings new opportunities to learn, grow, and discover something new.";

    fn fixture_keypair(first_hex: &str, second_hex: &str) -> KeyPair {
        let params = *system_params();
        let secret = SecretKey {
            first: curve::scalar_from_hex(first_hex).unwrap(),
            second: curve::scalar_from_hex(second_hex).unwrap(),
        };
        KeyPair {
            public: crate::keys::secret_to_public(&secret, &params),
            secret,
        }
    }

    fn rand_k(rng: &mut (impl RngCore + CryptoRng)) -> BigUint {
        curve::scalar_to_biguint(&curve::rand_nonzero_scalar(rng))
    }

    #[test]
    fn round_trip_self() {
        let mut rng = rand::thread_rng();
        let client = Client::new(*system_params());
        let alice = generate_keypair(client.params(), &mut rng);

        let k = rand_k(&mut rng);
        let (wrapped, sealed) = client
            .second_level_encrypt(&alice.secret, MESSAGE, &k, &mut rng)
            .unwrap();

        let plaintext = client
            .decrypt_second_level(&wrapped, &sealed, &alice.secret)
            .unwrap();
        assert_eq!(plaintext, MESSAGE);
    }

    #[test]
    fn round_trip_delegated() {
        let mut rng = rand::thread_rng();
        let client = Client::new(*system_params());
        let alice = generate_keypair(client.params(), &mut rng);
        let bob = generate_keypair(client.params(), &mut rng);

        let token = client.generate_reencryption_key(&alice.secret, &bob.public);
        let k = rand_k(&mut rng);
        let (wrapped, sealed) = client
            .second_level_encrypt(&alice.secret, MESSAGE, &k, &mut rng)
            .unwrap();

        let transformed = re_encrypt(&wrapped, &token);
        let plaintext = client
            .decrypt_first_level(&transformed, &sealed, &bob.secret)
            .unwrap();
        assert_eq!(plaintext, MESSAGE);
    }

    #[test]
    fn delegated_flow_with_fixture_keys() {
        let mut rng = rand::thread_rng();
        let client = Client::new(*system_params());
        let alice = fixture_keypair(
            "1b3c4f2629e642f076a6f9da84d8dba47176d88659e2027193d1a9710d790a45",
            "12b4bd11710ac1a327c74386d0229500352339a20bb33c685723791c700fb253",
        );
        let bob = fixture_keypair(
            "216a7093d8bb565a0e1a5ab57a861a9fd8d9f79dcae7e9a2cfeaafaa4f4c0a2d",
            "0e9fdba3fd7cd06b2e58c4cfa6b2827935ab2d1a4ab08b86c92ee1452dbfba29",
        );

        let token = client.generate_reencryption_key(&alice.secret, &bob.public);
        assert_eq!(token.to_bytes().len(), 128);
        // The token is a pure function of the two keys.
        assert_eq!(
            token,
            client.generate_reencryption_key(&alice.secret, &bob.public)
        );

        let k = BigUint::parse_bytes(
            b"0b2d1a4ab08b86c92ee1452dbfba2935ab2d1a4ab08b86c92ee1452dbfba29aa",
            16,
        )
        .unwrap();
        let (wrapped, sealed) = client
            .second_level_encrypt(&alice.secret, MESSAGE, &k, &mut rng)
            .unwrap();

        let transformed = re_encrypt(&wrapped, &token);
        assert_eq!(
            client
                .decrypt_first_level(&transformed, &sealed, &bob.secret)
                .unwrap(),
            MESSAGE
        );
        assert_eq!(
            client
                .decrypt_second_level(&wrapped, &sealed, &alice.secret)
                .unwrap(),
            MESSAGE
        );
    }

    #[test]
    fn scalar_range_is_enforced() {
        let mut rng = rand::thread_rng();
        let client = Client::new(*system_params());
        let alice = generate_keypair(client.params(), &mut rng);
        let r = curve::scalar_order();

        for k in [r.clone(), r + 1u8, BigUint::from(0u8)] {
            assert!(matches!(
                client.second_level_encrypt(&alice.secret, MESSAGE, &k, &mut rng),
                Err(Error::ScalarOutOfRange)
            ));
        }
    }

    #[test]
    fn wrong_key_never_recovers_the_message() {
        let mut rng = rand::thread_rng();
        let client = Client::new(*system_params());
        let alice = generate_keypair(client.params(), &mut rng);
        let bob = generate_keypair(client.params(), &mut rng);
        let mallory = generate_keypair(client.params(), &mut rng);

        let token = client.generate_reencryption_key(&alice.secret, &bob.public);
        let k = rand_k(&mut rng);
        let (wrapped, sealed) = client
            .second_level_encrypt(&alice.secret, MESSAGE, &k, &mut rng)
            .unwrap();
        let transformed = re_encrypt(&wrapped, &token);

        match client.decrypt_first_level(&transformed, &sealed, &mallory.secret) {
            Err(Error::AuthFailure) => {}
            Ok(plaintext) => assert_ne!(plaintext, MESSAGE),
            Err(other) => panic!("unexpected error: {other}"),
        }

        match client.decrypt_second_level(&wrapped, &sealed, &mallory.secret) {
            Err(Error::AuthFailure) => {}
            Ok(plaintext) => assert_ne!(plaintext, MESSAGE),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tampered_payload_fails_authentication() {
        let mut rng = rand::thread_rng();
        let client = Client::new(*system_params());
        let alice = generate_keypair(client.params(), &mut rng);
        let bob = generate_keypair(client.params(), &mut rng);

        let token = client.generate_reencryption_key(&alice.secret, &bob.public);
        let k = rand_k(&mut rng);
        let (wrapped, mut sealed) = client
            .second_level_encrypt(&alice.secret, MESSAGE, &k, &mut rng)
            .unwrap();
        let transformed = re_encrypt(&wrapped, &token);

        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(matches!(
            client.decrypt_first_level(&transformed, &sealed, &bob.secret),
            Err(Error::AuthFailure)
        ));
    }

    #[test]
    fn zero_second_component_has_no_inverse() {
        let mut rng = rand::thread_rng();
        let client = Client::new(*system_params());
        let alice = generate_keypair(client.params(), &mut rng);
        let bob = generate_keypair(client.params(), &mut rng);
        let degenerate = SecretKey {
            first: bob.secret.first,
            second: curve::Scalar::from(0u64),
        };

        let token = client.generate_reencryption_key(&alice.secret, &bob.public);
        let k = rand_k(&mut rng);
        let (wrapped, sealed) = client
            .second_level_encrypt(&alice.secret, MESSAGE, &k, &mut rng)
            .unwrap();
        let transformed = re_encrypt(&wrapped, &token);

        assert!(matches!(
            client.decrypt_first_level(&transformed, &sealed, &degenerate),
            Err(Error::ModInverseUndefined)
        ));
    }

    #[test]
    fn fresh_randomness_per_encryption() {
        let mut rng = rand::thread_rng();
        let client = Client::new(*system_params());
        let alice = generate_keypair(client.params(), &mut rng);

        let k = rand_k(&mut rng);
        let (w1, b1) = client
            .second_level_encrypt(&alice.secret, MESSAGE, &k, &mut rng)
            .unwrap();
        let (w2, b2) = client
            .second_level_encrypt(&alice.secret, MESSAGE, &k, &mut rng)
            .unwrap();

        // Same k, but a fresh encapsulated element and nonce every time.
        assert_eq!(w1.first, w2.first);
        assert_ne!(w1.second, w2.second);
        assert_ne!(b1, b2);
    }
}
