//! Salted one-way hashing of client identities.
//!
//! The ledger never stores a raw address. Each normalized identity is run
//! through HMAC-SHA256 keyed with an operator-provided secret, producing a
//! fixed-width [`IdentityToken`]. The same identity and secret always give
//! the same token; rotating the secret makes every existing token
//! unreachable.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use voteweb_types::IdentityToken;
use zeroize::Zeroizing;

use crate::CryptoError;

type HmacSha256 = Hmac<Sha256>;

/// The identity hash secret. Zeroed on drop, redacted in `Debug`.
#[derive(Clone)]
pub struct HashSecret(Zeroizing<Vec<u8>>);

impl HashSecret {
    /// Wrap an operator-provided secret. Blank secrets are rejected.
    pub fn new(secret: impl Into<String>) -> Result<Self, CryptoError> {
        let secret: String = secret.into();
        if secret.trim().is_empty() {
            return Err(CryptoError::EmptySecret);
        }
        Ok(Self(Zeroizing::new(secret.into_bytes())))
    }

    fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for HashSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashSecret(<redacted>)")
    }
}

/// Deterministic keyed hasher from identity string to [`IdentityToken`].
///
/// The keyed HMAC state is built once; each call clones it.
#[derive(Clone)]
pub struct IdentityHasher {
    keyed: HmacSha256,
}

impl IdentityHasher {
    pub fn new(secret: &HashSecret) -> Result<Self, CryptoError> {
        let keyed = HmacSha256::new_from_slice(secret.expose())
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self { keyed })
    }

    /// Hash a normalized identity into its token.
    pub fn hash_identity(&self, identity: &str) -> IdentityToken {
        let mut mac = self.keyed.clone();
        mac.update(identity.as_bytes());
        let digest = mac.finalize().into_bytes();
        let mut output = [0u8; 32];
        output.copy_from_slice(&digest);
        IdentityToken::new(output)
    }
}

impl fmt::Debug for IdentityHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentityHasher")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher(secret: &str) -> IdentityHasher {
        IdentityHasher::new(&HashSecret::new(secret).unwrap()).unwrap()
    }

    #[test]
    fn same_identity_same_token() {
        let h = hasher("test-salt-for-hashing");
        assert_eq!(h.hash_identity("192.168.1.1"), h.hash_identity("192.168.1.1"));
    }

    #[test]
    fn different_identities_different_tokens() {
        let h = hasher("test-salt-for-hashing");
        assert_ne!(h.hash_identity("192.168.1.1"), h.hash_identity("192.168.1.2"));
    }

    #[test]
    fn ipv6_identity_is_stable() {
        let h = hasher("test-salt-for-hashing");
        let ip = "2001:0db8:85a3:0000:0000:8a2e:0370:7334";
        assert_eq!(h.hash_identity(ip), h.hash_identity(ip));
    }

    #[test]
    fn different_salts_different_tokens() {
        let ip = "192.168.1.1";
        assert_ne!(hasher("salt1").hash_identity(ip), hasher("salt2").hash_identity(ip));
    }

    #[test]
    fn matches_rfc4231_hmac_sha256() {
        // RFC 4231 test case 2.
        let h = hasher("Jefe");
        let token = h.hash_identity("what do ya want for nothing?");
        assert_eq!(
            token.to_string(),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn blank_secret_is_rejected() {
        assert!(matches!(HashSecret::new(""), Err(CryptoError::EmptySecret)));
        assert!(matches!(HashSecret::new("   "), Err(CryptoError::EmptySecret)));
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = HashSecret::new("hunter2").unwrap();
        assert!(!format!("{:?}", secret).contains("hunter2"));
    }
}
