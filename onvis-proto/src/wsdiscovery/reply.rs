//! Décodage des réponses ProbeMatch.

use std::io::BufReader;

use xmltree::Element;

/// Un enregistrement ProbeMatch tel que reçu sur le fil.
///
/// Les trois champs sont des listes séparées par des espaces ; leur
/// interprétation (première adresse canonique, scopes, capacités) se
/// fait en aval.
#[derive(Debug, Clone, Default)]
pub struct ProbeMatch {
    /// Liste d'adresses de service (XAddrs)
    pub xaddrs: String,

    /// Liste de types annoncés
    pub types: String,

    /// Liste de scopes URI
    pub scopes: String,
}

/// Métadonnées décodées de la liste de scopes d'un ProbeMatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeInfo {
    pub name: String,
    pub location: String,
    pub hardware: String,
}

const SCOPE_NAME: &str = "onvif://www.onvif.org/name/";
const SCOPE_LOCATION: &str = "onvif://www.onvif.org/location/";
const SCOPE_HARDWARE: &str = "onvif://www.onvif.org/hardware/";

/// Extrait les ProbeMatch d'un datagramme.
///
/// Zéro enregistrement est un résultat valide : du trafic multicast
/// sans rapport peut très bien être une enveloppe SOAP bien formée.
pub fn parse_probe_matches(xml: &str) -> Result<Vec<ProbeMatch>, xmltree::ParseError> {
    let root = Element::parse(BufReader::new(xml.as_bytes()))?;
    let mut matches = Vec::new();
    collect_matches(&root, &mut matches);
    Ok(matches)
}

fn collect_matches(el: &Element, out: &mut Vec<ProbeMatch>) {
    for child in el.children.iter().filter_map(|node| node.as_element()) {
        if child.name == "ProbeMatch" {
            out.push(ProbeMatch {
                xaddrs: descendant_text(child, "XAddrs"),
                types: descendant_text(child, "Types"),
                scopes: descendant_text(child, "Scopes"),
            });
        } else {
            collect_matches(child, out);
        }
    }
}

fn descendant_text(el: &Element, local: &str) -> String {
    if el.name == local {
        return el.get_text().unwrap_or_default().trim().to_string();
    }
    el.children
        .iter()
        .filter_map(|node| node.as_element())
        .map(|child| descendant_text(child, local))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// Décode la liste de scopes d'un ProbeMatch.
///
/// Chaque scope est un token URI ; `.../name/`, `.../location/` et
/// `.../hardware/` renseignent les champs (underscores remplacés par
/// des espaces), tout le reste est ignoré sans erreur.
pub fn parse_scopes(scopes: &str) -> ScopeInfo {
    let mut info = ScopeInfo::default();
    for scope in scopes.split_whitespace() {
        if let Some(value) = scope.strip_prefix(SCOPE_NAME) {
            info.name = value.replace('_', " ");
        } else if let Some(value) = scope.strip_prefix(SCOPE_LOCATION) {
            info.location = value.replace('_', " ");
        } else if let Some(value) = scope.strip_prefix(SCOPE_HARDWARE) {
            info.hardware = value.replace('_', " ");
        }
    }
    info
}

/// Décode la liste de types d'un ProbeMatch en capacités lisibles.
///
/// Les tokens inconnus sont abandonnés silencieusement. L'ordre des
/// tests compte : `NetworkVideoTransmitter` avant les motifs courts.
pub fn parse_capabilities(types: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for token in types.split_whitespace() {
        let tag = if token.contains("NetworkVideoTransmitter") {
            "Network Video Transmitter"
        } else if token.contains("Device") {
            "Device"
        } else if token.contains("Media") {
            "Media"
        } else if token.contains("PTZ") {
            "PTZ"
        } else if token.contains("Analytics") {
            "Analytics"
        } else if token.contains("Events") {
            "Events"
        } else if token.contains("Imaging") {
            "Imaging"
        } else if token.contains("Recording") {
            "Recording"
        } else if token.contains("Replay") {
            "Replay"
        } else {
            continue;
        };
        tags.push(tag.to_string());
    }
    tags
}
