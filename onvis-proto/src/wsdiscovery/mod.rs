//! # Module WS-Discovery - découverte des caméras sur le réseau local
//!
//! Ce module implémente la moitié "fil" du protocole WS-Discovery :
//! le document Probe émis en multicast et le décodage des réponses
//! ProbeMatch renvoyées par les caméras.
//!
//! ## Fonctionnalités
//!
//! - ✅ Message Probe avec MessageID frais par session
//! - ✅ Décodage des ProbeMatch multiples par datagramme
//! - ✅ Interprétation des scopes (nom, localisation, matériel)
//! - ✅ Mapping des types vers des capacités lisibles
//!
//! La session UDP elle-même (socket, deadline, déduplication) vit dans
//! la crate `onvis`.
//!
//! ## Constantes WS-Discovery
//!
//! - **Adresse multicast** : 239.255.255.250:3702 (IPv4)
//! - **Timeout de découverte par défaut** : 5 secondes (côté session)

mod probe;
mod reply;

pub use probe::probe_message;
pub use reply::{ProbeMatch, ScopeInfo, parse_capabilities, parse_probe_matches, parse_scopes};

/// Adresse multicast WS-Discovery
pub const WS_DISCOVERY_MULTICAST_ADDR: &str = "239.255.255.250";

/// Port WS-Discovery
pub const WS_DISCOVERY_PORT: u16 = 3702;
