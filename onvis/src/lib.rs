//! Client ONVIF : découverte WS-Discovery et requêtes SOAP
//! authentifiées vers les caméras IP.
//!
//! Tout est synchrone et sans état partagé : chaque appel HTTP et
//! chaque session de découverte alloue ses propres ressources (socket
//! UDP, connexion HTTP) et s'exécute jusqu'au bout sur le thread de
//! l'appelant. Aucun retry interne : la bonne stratégie dépend de la
//! sémantique de l'appel et appartient à l'appelant.

mod camera;
mod client;
mod device;
mod discovery;
mod errors;
mod transport;

pub use camera::Camera;
pub use onvis_proto::soap::{FaultKind, SoapFault};
pub use client::CameraClient;
pub use device::{DeviceCapabilities, DeviceInformation, HostnameInformation, SystemDateTime};
pub use discovery::{DEFAULT_DISCOVERY_TIMEOUT, DiscoveryOptions, discover_cameras};
pub use errors::{ClientError, DiscoveryError};
pub use transport::{DEFAULT_TIMEOUT, SoapReply, TransportError};
