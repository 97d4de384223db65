//! Transport HTTP des enveloppes SOAP.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace};
use ureq::Agent;
use ureq::tls::TlsConfig;

/// Timeout par défaut d'un aller-retour complet quand l'appelant ne
/// le configure pas.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Échec au niveau transport : rien à classifier côté protocole.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Statut d'erreur HTTP avec un corps vide : certaines caméras
    /// signalent un refus d'authentification par le statut seul.
    #[error("HTTP {0} with empty response")]
    HttpStatus(u16),

    /// Résolution, connexion, timeout, lecture du corps.
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),
}

/// Réponse brute d'un POST SOAP : statut et corps, tels quels.
#[derive(Debug, Clone)]
pub struct SoapReply {
    pub status: u16,
    pub body: String,
}

/// Poste une enveloppe sur un endpoint de service.
///
/// Le corps est retourné même sur un statut 4xx/5xx dès lors qu'il est
/// non vide : beaucoup de devices renvoient leur SOAP Fault avec un
/// statut d'erreur, et l'appelant doit pouvoir l'inspecter. Un statut
/// d'erreur sans corps est un échec transport pur.
pub fn post_envelope(
    endpoint: &str,
    action: &str,
    envelope: &str,
    timeout: Duration,
    insecure_tls: bool,
) -> Result<SoapReply, TransportError> {
    // Agent par appel : les statuts 4xx/5xx ne doivent pas
    // court-circuiter, on veut lire le corps du fault.
    let mut config = Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(timeout));

    if insecure_tls {
        // Opt-in explicite pour les certificats auto-signés des
        // caméras, jamais par défaut.
        config = config.tls_config(TlsConfig::builder().disable_verification(true).build());
    }

    let agent: Agent = config.build().into();

    trace!("POST {} (action {})", endpoint, action);
    let mut response = agent
        .post(endpoint)
        .header("Content-Type", "application/soap+xml; charset=utf-8")
        .header("SOAPAction", action)
        .send(envelope)?;

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string()?;

    if status >= 400 && body.is_empty() {
        debug!("HTTP {} from {} with empty body", status, endpoint);
        return Err(TransportError::HttpStatus(status));
    }

    Ok(SoapReply { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    // Mini serveur HTTP d'un seul échange, sur loopback.
    fn one_shot_server(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 8192];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/onvif/device_service")
    }

    #[test]
    fn test_error_status_with_empty_body_is_transport_failure() {
        // Scénario : 401 sans corps, rien à donner au classifieur
        let url = one_shot_server("HTTP/1.1 401 Unauthorized\r\nContent-Length: 0\r\n\r\n");
        let err = post_envelope(&url, "act", "<x/>", Duration::from_secs(5), false).unwrap_err();
        match err {
            TransportError::HttpStatus(status) => assert_eq!(status, 401),
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_error_status_with_body_is_returned_for_inspection() {
        let url = one_shot_server(
            "HTTP/1.1 400 Bad Request\r\nContent-Length: 10\r\n\r\n<s:Fault/>",
        );
        let reply = post_envelope(&url, "act", "<x/>", Duration::from_secs(5), false).unwrap();
        assert_eq!(reply.status, 400);
        assert!(reply.body.contains("Fault"));
    }

    #[test]
    fn test_success_returns_body() {
        let url = one_shot_server("HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\n<ok/>");
        let reply = post_envelope(&url, "act", "<x/>", Duration::from_secs(5), false).unwrap();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, "<ok/>");
    }

    #[test]
    fn test_connection_refused_is_transport_failure() {
        // Port fermé : on réserve un port puis on le libère
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = post_envelope(
            &format!("http://{addr}/x"),
            "act",
            "<x/>",
            Duration::from_secs(2),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, TransportError::Http(_)));
    }
}
