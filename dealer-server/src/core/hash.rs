//! Domain-Separated Hashing
//!
//! SHA-256 helpers shared by player identity derivation and password
//! digests. Every use site passes its own domain tag so digests from one
//! purpose can never collide with another.

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type Hash32 = [u8; 32];

/// Domain tag for player identities.
pub const PLAYER_ID_DOMAIN: &[u8] = b"dealer-player:";

/// Domain tag for password digests.
pub const PASSWORD_DOMAIN: &[u8] = b"dealer-password:";

/// Hash a sequence of byte strings with a domain separator.
pub fn hash_parts(domain: &[u8], parts: &[&[u8]]) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Compute hash with domain separator.
pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Hash32 {
    hash_parts(domain, &[data])
}

/// Compare two digests without exiting early on the first mismatch.
pub fn digests_equal(a: &Hash32, b: &Hash32) -> bool {
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_separation() {
        let data = b"https://twitter.com/PacktPub";
        assert_ne!(
            hash_with_domain(PLAYER_ID_DOMAIN, data),
            hash_with_domain(PASSWORD_DOMAIN, data),
        );
    }

    #[test]
    fn test_parts_match_concatenation() {
        let joined = hash_with_domain(PASSWORD_DOMAIN, b"saltsecret");
        let split = hash_parts(PASSWORD_DOMAIN, &[b"salt", b"secret"]);
        assert_eq!(joined, split);
    }

    #[test]
    fn test_digests_equal() {
        let a = hash_with_domain(PASSWORD_DOMAIN, b"one");
        let b = hash_with_domain(PASSWORD_DOMAIN, b"two");
        assert!(digests_equal(&a, &a));
        assert!(!digests_equal(&a, &b));

        let mut c = a;
        c[31] ^= 1;
        assert!(!digests_equal(&a, &c));
    }
}
