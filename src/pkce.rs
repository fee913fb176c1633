//! Proof Key for Code Exchange (PKCE) secret material.
//!
//! Every authorization attempt generates a fresh code verifier. Only its
//! S256 challenge travels to the authorization endpoint; the verifier itself
//! is sent once, to the token endpoint, when the authorization code is
//! exchanged.
//!
//! # Example
//!
//! ```rust
//! use tuneshelf::pkce::{self, Sha256Hasher};
//!
//! let verifier = pkce::generate_verifier(pkce::VERIFIER_LENGTH);
//! let challenge = pkce::derive_challenge(&Sha256Hasher, &verifier);
//! assert_eq!(challenge.len(), 43);
//! ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

/// Length of the verifier generated for each authorization attempt.
pub const VERIFIER_LENGTH: usize = 128;

/// The characters a verifier is drawn from.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Computes SHA-256 digests for the host environment.
pub trait Hasher {
    fn sha256(&self, data: &[u8]) -> [u8; 32];
}

/// [`Hasher`] backed by the `sha2` crate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }
}

/// Generates a verifier of exactly `length` alphanumeric characters.
///
/// Uses a fast, non-cryptographic generator: the verifier is single-use
/// and only ever sent over TLS.
#[must_use]
pub fn generate_verifier(length: usize) -> String {
    (0..length)
        .map(|_| char::from(ALPHABET[fastrand::usize(..ALPHABET.len())]))
        .collect()
}

/// Derives the S256 code challenge: the unpadded base64url encoding of the
/// SHA-256 digest of `verifier`.
#[must_use]
pub fn derive_challenge<H>(hasher: &H, verifier: &str) -> String
where
    H: Hasher + ?Sized,
{
    URL_SAFE_NO_PAD.encode(hasher.sha256(verifier.as_bytes()))
}
