//! Session de découverte WS-Discovery.
//!
//! Un Probe est émis en multicast depuis un port éphémère, puis les
//! datagrammes sont lus jusqu'à l'échéance configurée. Il n'existe pas
//! de signal "tous les devices ont répondu" dans ce protocole : seule
//! l'échéance termine la session. Les réponses malformées sont
//! ignorées datagramme par datagramme : un segment réseau bruyant ne
//! doit pas faire échouer la découverte.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};

use onvis_proto::wsdiscovery::{
    self, parse_capabilities, parse_probe_matches, parse_scopes, probe_message,
};
use socket2::{Domain, Protocol, Socket, Type};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::camera::Camera;
use crate::errors::DiscoveryError;

/// Fenêtre d'écoute par défaut d'une session de découverte.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Options d'une session de découverte.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Durée totale d'écoute après l'émission du Probe
    pub timeout: Duration,

    /// Destination du Probe, `"239.255.255.250:3702"` par défaut
    pub multicast_addr: String,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        DiscoveryOptions {
            timeout: DEFAULT_DISCOVERY_TIMEOUT,
            multicast_addr: format!(
                "{}:{}",
                wsdiscovery::WS_DISCOVERY_MULTICAST_ADDR,
                wsdiscovery::WS_DISCOVERY_PORT
            ),
        }
    }
}

/// Découvre les caméras du segment local.
///
/// Le résultat est dédupliqué sur la première adresse de la liste
/// XAddrs et peut légitimement être vide. Chaque session possède son
/// propre socket et sa propre table de déduplication : des sessions
/// concurrentes ne partagent rien.
pub fn discover_cameras(options: &DiscoveryOptions) -> Result<Vec<Camera>, DiscoveryError> {
    let target = resolve_ipv4(&options.multicast_addr)?;
    let socket = bind_probe_socket()?;

    let probe = probe_message(&Uuid::new_v4());
    socket.send_to(probe.as_bytes(), target)?;
    info!("📤 WS-Discovery probe sent to {}", target);

    let deadline = Instant::now() + options.timeout;
    let mut cameras: Vec<Camera> = Vec::new();
    let mut buf = [0u8; 65536];

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        socket.set_read_timeout(Some(remaining))?;

        match socket.recv_from(&mut buf) {
            Ok((len, from)) => {
                let datagram = String::from_utf8_lossy(&buf[..len]);
                cameras.extend(decode_reply(&datagram, from));
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                break;
            }
            Err(e) => {
                // Erreur ponctuelle (ICMP port unreachable par ex.) :
                // on continue jusqu'à l'échéance.
                warn!("❌ discovery read error: {}", e);
            }
        }
    }

    let unique = deduplicate(cameras);
    info!("discovery finished: {} camera(s)", unique.len());
    Ok(unique)
}

fn resolve_ipv4(addr: &str) -> Result<SocketAddr, DiscoveryError> {
    addr.to_socket_addrs()
        .map_err(|_| DiscoveryError::BadMulticastAddr(addr.to_string()))?
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| DiscoveryError::BadMulticastAddr(addr.to_string()))
}

// Port éphémère : les réponses ProbeMatch arrivent en unicast, pas
// besoin de rejoindre le groupe multicast.
fn bind_probe_socket() -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    let bind_addr = SocketAddr::from(([0, 0, 0, 0], 0));
    socket.bind(&bind_addr.into())?;
    Ok(socket.into())
}

fn decode_reply(datagram: &str, from: SocketAddr) -> Vec<Camera> {
    let matches = match parse_probe_matches(datagram) {
        Ok(matches) => matches,
        Err(e) => {
            debug!("skipping malformed datagram from {}: {}", from, e);
            return Vec::new();
        }
    };

    let mut cameras = Vec::new();
    for probe_match in matches {
        if probe_match.xaddrs.split_whitespace().next().is_none() {
            // Sans adresse, pas de clé de déduplication possible :
            // échec de décodage, jamais fusionné sous une clé vide.
            warn!("ProbeMatch from {} carries no address, ignored", from);
            continue;
        }

        trace!("📥 ProbeMatch from {}: {}", from, probe_match.xaddrs);
        let scope = parse_scopes(&probe_match.scopes);
        cameras.push(Camera {
            name: scope.name,
            address: probe_match.xaddrs.clone(),
            location: scope.location,
            hardware: scope.hardware,
            capabilities: parse_capabilities(&probe_match.types),
        });
    }
    cameras
}

// Première occurrence gagnante, ordre d'arrivée conservé.
fn deduplicate(cameras: Vec<Camera>) -> Vec<Camera> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for camera in cameras {
        if seen.insert(camera.primary_address().to_string()) {
            unique.push(camera);
        }
    }
    unique
}
