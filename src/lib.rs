//! Proxy re-encryption (PRE) on the [BN254 pairing-friendly elliptic curve](https://docs.rs/ark-bn254).
//!
//! A delegator encrypts data so that a semi-trusted proxy, holding only a
//! delegation token, can transform the ciphertext for a designated
//! delegatee without ever seeing the plaintext or either party's secret
//! key. The pairing-level scheme transports a random target-group element;
//! its HKDF-SHA256 digest keys an AES-GCM layer that seals the actual
//! payload (KEM/DEM).
//!
//! The crate covers the full pipeline: system parameters and keypairs
//! ([`keys`]), second-level encryption and both decryption paths
//! ([`client`]), the proxy transform ([`proxy`]), canonical byte forms of
//! every wire artifact ([`cipher`]), and a thread-safe store that
//! re-encrypts on read ([`store`]). An HTTP/JSON binding for the store is
//! available behind the `server` feature.
//!
//! # Example
//!
//! ```
//! use pre::client::Client;
//! use pre::curve::{rand_nonzero_scalar, scalar_to_biguint};
//! use pre::keys::{generate_keypair, system_params};
//! use pre::proxy::re_encrypt;
//!
//! # fn main() -> pre::Result<()> {
//! let mut rng = rand::thread_rng();
//! let params = *system_params();
//!
//! let alice = generate_keypair(&params, &mut rng);
//! let bob = generate_keypair(&params, &mut rng);
//!
//! // Alice delegates to Bob and encrypts.
//! let client = Client::new(params);
//! let token = client.generate_reencryption_key(&alice.secret, &bob.public);
//! let k = scalar_to_biguint(&rand_nonzero_scalar(&mut rng));
//! let (wrapped, sealed) =
//!     client.second_level_encrypt(&alice.secret, b"delegated secret", &k, &mut rng)?;
//!
//! // The proxy transforms the wrapped key; Bob decrypts.
//! let transformed = re_encrypt(&wrapped, &token);
//! let plaintext = client.decrypt_first_level(&transformed, &sealed, &bob.secret)?;
//! assert_eq!(plaintext, b"delegated secret".to_vec());
//! # Ok(()) }
//! ```

#![deny(missing_debug_implementations, rust_2018_idioms, missing_docs)]
#![forbid(unsafe_code)]

pub mod aead;
pub mod cipher;
pub mod client;
pub mod curve;
mod err;
pub mod kdf;
pub mod keys;
pub mod proxy;
#[cfg(feature = "server")]
pub mod server;
pub mod store;

pub use err::{Error, Result};
