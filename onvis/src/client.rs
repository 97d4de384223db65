//! Client ONVIF authentifié.

use std::time::Duration;

use onvis_proto::soap::{build_envelope, classify};
use onvis_proto::wsse::DigestToken;
use tracing::debug;

use crate::errors::ClientError;
use crate::transport::{self, DEFAULT_TIMEOUT, TransportError};

/// Client porteur des credentials et de la configuration transport.
///
/// Aucun état entre les appels : chaque requête génère un jeton digest
/// frais et ouvre sa propre connexion. Clonable et utilisable depuis
/// plusieurs threads sans verrou.
#[derive(Debug, Clone)]
pub struct CameraClient {
    username: String,
    password: String,
    timeout: Duration,
    insecure_tls: bool,
}

impl CameraClient {
    /// Crée un client. Un `username` vide signifie accès anonyme :
    /// aucun en-tête Security ne sera émis.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        CameraClient {
            username: username.into(),
            password: password.into(),
            timeout: DEFAULT_TIMEOUT,
            insecure_tls: false,
        }
    }

    /// Timeout de l'aller-retour HTTP complet.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accepte les certificats TLS invalides (caméras auto-signées).
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.insecure_tls = accept;
        self
    }

    /// Enveloppe un fragment de body, le poste et retourne le corps de
    /// la réponse, prêt pour le parseur.
    ///
    /// Un statut HTTP d'erreur accompagné d'un corps sans fault (page
    /// HTML d'un reverse proxy par exemple) est rapporté comme échec
    /// transport avec son statut, pas comme trou de décodage.
    pub fn send_soap_request(
        &self,
        endpoint: &str,
        action: &str,
        fragment: &str,
    ) -> Result<String, ClientError> {
        // Jeton frais à chaque requête : nonce et horodatage réutilisés
        // seraient rejetés comme rejeu par la plupart des devices.
        let envelope = if self.username.is_empty() {
            build_envelope(fragment, None)
        } else {
            let token = DigestToken::generate(&self.password);
            build_envelope(fragment, Some((&self.username, &token)))
        };

        let reply =
            transport::post_envelope(endpoint, action, &envelope, self.timeout, self.insecure_tls)?;

        if reply.status >= 400 && classify(&reply.body).is_none() {
            debug!("HTTP {} from {} without a classifiable fault", reply.status, endpoint);
            return Err(ClientError::Transport(TransportError::HttpStatus(reply.status)));
        }

        Ok(reply.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_defaults() {
        let client = CameraClient::new("admin", "pass");
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
        assert!(!client.insecure_tls);
    }

    #[test]
    fn test_builder_configuration() {
        let client = CameraClient::new("admin", "pass")
            .with_timeout(Duration::from_secs(2))
            .accept_invalid_certs(true);
        assert_eq!(client.timeout, Duration::from_secs(2));
        assert!(client.insecure_tls);
    }
}
