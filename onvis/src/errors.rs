use onvis_proto::soap::{SoapFault, SoapParseError};
use thiserror::Error;

use crate::transport::TransportError;

/// Erreurs du client, en trois classes disjointes que l'appelant peut
/// distinguer programmatiquement : la caméra est injoignable
/// ([`ClientError::Transport`]), la caméra a refusé la requête
/// ([`ClientError::Fault`]), ou la réponse est dans un format
/// inattendu (les autres variantes).
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Fault(#[from] SoapFault),

    #[error("Missing {0} element in SOAP body")]
    MissingElement(String),

    #[error("Invalid {0} value: {1}")]
    BadValue(String, String),

    #[error("Unparseable SOAP response: {0}")]
    Unparseable(String),
}

impl ClientError {
    pub fn missing_element(name: &str) -> Self {
        ClientError::MissingElement(name.to_string())
    }

    pub fn bad_value(name: &str, value: &str) -> Self {
        ClientError::BadValue(name.to_string(), value.to_string())
    }
}

// Un fault reste un fault ; tout autre échec de parse est un trou de
// décodage, pas une erreur rapportée par le device.
impl From<SoapParseError> for ClientError {
    fn from(err: SoapParseError) -> Self {
        match err {
            SoapParseError::Fault(fault) => ClientError::Fault(fault),
            other => ClientError::Unparseable(other.to_string()),
        }
    }
}

/// Erreurs d'une session de découverte.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("invalid multicast address '{0}'")]
    BadMulticastAddr(String),

    #[error("discovery I/O error: {0}")]
    Io(#[from] std::io::Error),
}
