//! System parameters and user keypairs.

use std::fs;
use std::path::Path;

use ark_bn254::{G1Affine, G2Affine, G2Projective};
use ark_ec::CurveGroup;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use once_cell::sync::Lazy;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::curve::{self, Gt, Scalar};
use crate::err::{Error, Result};

/// Fixed parameters shared by every participant: the canonical generators
/// of G1 and G2 and Z = e(g1, g2), which generates the target group.
///
/// These are constants of the curve. Compute them once per process (see
/// [`system_params`]) and share them immutably.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SystemParams {
    /// Generator of G1.
    pub g1: G1Affine,
    /// Generator of G2.
    pub g2: G2Affine,
    /// Pairing of the two generators.
    pub z: Gt,
}

impl SystemParams {
    /// Derives the parameters from the curve's canonical generators.
    /// Deterministic: every call returns the same values.
    pub fn generate() -> Self {
        let (g1, g2) = curve::generators();
        let z = curve::pairing(&g1, &g2);
        SystemParams { g1, g2, z }
    }
}

static PARAMS: Lazy<SystemParams> = Lazy::new(SystemParams::generate);

/// Process-wide shared parameters, computed on first use.
pub fn system_params() -> &'static SystemParams {
    &PARAMS
}

/// Secret half of a keypair: two independent scalars in [1, r-1].
///
/// Never leaves its owner. `first` masks encrypted keys and produces
/// delegation tokens; `second` unwraps transformed keys.
#[derive(Clone, Debug, PartialEq)]
pub struct SecretKey {
    /// Exponent of Z in the public key.
    pub first: Scalar,
    /// Multiplier of g2 in the public key.
    pub second: Scalar,
}

/// Public half of a keypair: (Z^a1, g2^a2). Fully determined by the secret
/// half, see [`secret_to_public`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PublicKey {
    /// Z^a1.
    pub first: Gt,
    /// g2^a2.
    pub second: G2Affine,
}

/// A user keypair.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyPair {
    /// Public half.
    pub public: PublicKey,
    /// Secret half.
    pub secret: SecretKey,
}

/// Computes the public key of a secret key. Pure; also used to verify
/// deserialized keypairs.
pub fn secret_to_public(secret: &SecretKey, params: &SystemParams) -> PublicKey {
    PublicKey {
        first: curve::gt_exp(&params.z, &secret.first),
        second: (G2Projective::from(params.g2) * secret.second).into_affine(),
    }
}

/// Generates a fresh keypair, both secret components drawn uniformly from
/// [1, r-1] by the supplied CSPRNG.
pub fn generate_keypair<R: RngCore + CryptoRng>(params: &SystemParams, rng: &mut R) -> KeyPair {
    let secret = SecretKey {
        first: curve::rand_nonzero_scalar(rng),
        second: curve::rand_nonzero_scalar(rng),
    };
    let public = secret_to_public(&secret, params);
    KeyPair { public, secret }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct KeyPairRecord {
    public_key: PublicKeyRecord,
    secret_key: SecretKeyRecord,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PublicKeyRecord {
    first: String,
    second: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SecretKeyRecord {
    first: String,
    second: String,
}

impl KeyPair {
    /// Serializes to the interchange JSON form: base64 public components
    /// (GT, then raw G2), minimal lowercase hex secret components.
    pub fn to_json(&self) -> String {
        let record = KeyPairRecord {
            public_key: PublicKeyRecord {
                first: BASE64.encode(curve::gt_to_bytes(&self.public.first)),
                second: BASE64.encode(curve::g2_raw_bytes(&self.public.second)),
            },
            secret_key: SecretKeyRecord {
                first: curve::scalar_to_hex(&self.secret.first),
                second: curve::scalar_to_hex(&self.secret.second),
            },
        };
        serde_json::to_string_pretty(&record).expect("keypair record serializes")
    }

    /// Parses the interchange JSON form, rejecting records whose public half
    /// does not match the secret half.
    pub fn from_json(json: &str, params: &SystemParams) -> Result<Self> {
        let record: KeyPairRecord = serde_json::from_str(json)
            .map_err(|e| Error::InvalidEncoding(format!("malformed keypair record: {e}")))?;

        let public = PublicKey {
            first: curve::gt_from_bytes(&decode_base64(&record.public_key.first)?)?,
            second: curve::g2_from_bytes(&decode_base64(&record.public_key.second)?)?,
        };
        let secret = SecretKey {
            first: curve::scalar_from_hex(&record.secret_key.first)?,
            second: curve::scalar_from_hex(&record.secret_key.second)?,
        };

        if secret_to_public(&secret, params) != public {
            return Err(Error::InvalidEncoding(
                "public key does not match secret key".into(),
            ));
        }
        Ok(KeyPair { public, secret })
    }
}

fn decode_base64(value: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(value)
        .map_err(|e| Error::InvalidEncoding(format!("malformed base64: {e}")))
}

/// Writes a keypair to `path` in the interchange JSON form.
pub fn save_keypair(pair: &KeyPair, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, pair.to_json())?;
    Ok(())
}

/// Loads a keypair from `path`, verifying public/secret consistency.
pub fn load_keypair(path: impl AsRef<Path>, params: &SystemParams) -> Result<KeyPair> {
    let json = fs::read_to_string(path)?;
    KeyPair::from_json(&json, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_self_consistent() {
        let params = SystemParams::generate();
        assert_eq!(params, SystemParams::generate());
        assert_eq!(params, *system_params());

        // Z is derived from the generators, never an independent input.
        let paired = curve::pairing(&params.g1, &params.g2);
        assert_eq!(curve::gt_to_bytes(&paired), curve::gt_to_bytes(&params.z));
    }

    #[test]
    fn public_key_is_recomputable() {
        let mut rng = rand::thread_rng();
        let params = *system_params();
        let pair = generate_keypair(&params, &mut rng);

        assert_eq!(
            pair.public.first,
            curve::gt_exp(&params.z, &pair.secret.first)
        );
        assert_eq!(
            pair.public.second,
            (G2Projective::from(params.g2) * pair.secret.second).into_affine()
        );
        assert_eq!(secret_to_public(&pair.secret, &params), pair.public);
    }

    #[test]
    fn json_round_trip() {
        let mut rng = rand::thread_rng();
        let params = *system_params();
        let pair = generate_keypair(&params, &mut rng);

        let json = pair.to_json();
        let loaded = KeyPair::from_json(&json, &params).unwrap();
        assert_eq!(loaded, pair);
    }

    #[test]
    fn json_fixture_keys() {
        let params = *system_params();
        let secret = SecretKey {
            first: curve::scalar_from_hex(
                "1b3c4f2629e642f076a6f9da84d8dba47176d88659e2027193d1a9710d790a45",
            )
            .unwrap(),
            second: curve::scalar_from_hex(
                "12b4bd11710ac1a327c74386d0229500352339a20bb33c685723791c700fb253",
            )
            .unwrap(),
        };
        let pair = KeyPair {
            public: secret_to_public(&secret, &params),
            secret,
        };

        let json = pair.to_json();
        assert!(json.contains("1b3c4f2629e642f076a6f9da84d8dba47176d88659e2027193d1a9710d790a45"));
        let loaded = KeyPair::from_json(&json, &params).unwrap();
        assert_eq!(loaded, pair);
    }

    #[test]
    fn mismatched_public_half_is_rejected() {
        let mut rng = rand::thread_rng();
        let params = *system_params();
        let pair = generate_keypair(&params, &mut rng);
        let other = generate_keypair(&params, &mut rng);

        let forged = KeyPair {
            public: other.public,
            secret: pair.secret,
        };
        assert!(matches!(
            KeyPair::from_json(&forged.to_json(), &params),
            Err(Error::InvalidEncoding(_))
        ));
    }

    #[test]
    fn file_round_trip() {
        let mut rng = rand::thread_rng();
        let params = *system_params();
        let pair = generate_keypair(&params, &mut rng);

        let dir = std::env::temp_dir().join("pre-keypair-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("keypair-{}.json", std::process::id()));

        save_keypair(&pair, &path).unwrap();
        let loaded = load_keypair(&path, &params).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, pair);
    }

    #[test]
    fn missing_file_is_io_error() {
        let params = *system_params();
        assert!(matches!(
            load_keypair("/nonexistent/keypair.json", &params),
            Err(Error::Io(_))
        ));
    }
}
