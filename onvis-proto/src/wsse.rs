//! Jeton WS-Security UsernameToken (profil PasswordDigest).
//!
//! Le mot de passe n'est jamais transmis en clair : la caméra reçoit
//! `base64(SHA1(nonce ‖ created ‖ secret))` accompagné du nonce et de
//! l'horodatage utilisés, et recalcule le digest de son côté.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use rand::RngCore;
use sha1::{Digest, Sha1};

/// Credential éphémère généré pour chaque requête.
///
/// Un jeton ne doit jamais être réutilisé : la plupart des caméras
/// rejettent un couple nonce/horodatage déjà vu ou trop ancien.
#[derive(Debug, Clone)]
pub struct DigestToken {
    /// `base64(SHA1(nonce ‖ created ‖ secret))`
    pub digest: String,

    /// Nonce encodé en Base64, tel qu'émis dans l'en-tête Security
    pub nonce: String,

    /// Horodatage UTC RFC3339 à la milliseconde, suffixe `Z` littéral
    pub created: String,
}

impl DigestToken {
    /// Génère un jeton frais pour `secret`.
    pub fn generate(secret: &str) -> Self {
        let mut nonce_bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let created = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
        Self::from_parts(&nonce_bytes, &created, secret)
    }

    // Coeur déterministe, séparé pour que les tests fixent nonce et horloge.
    fn from_parts(nonce_bytes: &[u8], created: &str, secret: &str) -> Self {
        let mut sha = Sha1::new();
        sha.update(nonce_bytes);
        sha.update(created.as_bytes());
        sha.update(secret.as_bytes());

        DigestToken {
            digest: BASE64.encode(sha.finalize()),
            nonce: BASE64.encode(nonce_bytes),
            created: created.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATED: &str = "2024-03-01T10:15:30.123Z";

    #[test]
    fn test_digest_deterministic() {
        let a = DigestToken::from_parts(b"0123456789abcdef", CREATED, "s3cret");
        let b = DigestToken::from_parts(b"0123456789abcdef", CREATED, "s3cret");
        assert_eq!(a.digest, b.digest);
        assert_eq!(a.nonce, b.nonce);
        assert_eq!(a.created, b.created);
    }

    #[test]
    fn test_digest_sensitive_to_every_input() {
        let base = DigestToken::from_parts(b"0123456789abcdef", CREATED, "s3cret");
        let other_nonce = DigestToken::from_parts(b"0123456789abcdeX", CREATED, "s3cret");
        let other_created =
            DigestToken::from_parts(b"0123456789abcdef", "2024-03-01T10:15:30.124Z", "s3cret");
        let other_secret = DigestToken::from_parts(b"0123456789abcdef", CREATED, "s3cre7");

        assert_ne!(base.digest, other_nonce.digest);
        assert_ne!(base.digest, other_created.digest);
        assert_ne!(base.digest, other_secret.digest);
    }

    #[test]
    fn test_generate_is_fresh_per_call() {
        let a = DigestToken::generate("s3cret");
        let b = DigestToken::generate("s3cret");
        assert_ne!(a.nonce, b.nonce);
    }

    #[test]
    fn test_created_format() {
        let token = DigestToken::generate("s3cret");
        // 2024-03-01T10:15:30.123Z : millisecondes et Z littéral
        assert_eq!(token.created.len(), "2024-03-01T10:15:30.123Z".len());
        assert!(token.created.ends_with('Z'));
        assert_eq!(token.created.as_bytes()[19], b'.');
    }
}
