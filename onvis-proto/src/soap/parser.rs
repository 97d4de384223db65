//! Décodage structuré des réponses SOAP.
//!
//! Le contrat est en deux phases, volontairement : d'abord un décodage
//! structuré par noms locaux (cette passe), puis un repli par champ sur
//! [`super::extract`] quand le vendeur s'écarte du schéma. Les deux
//! phases se testent indépendamment.

use std::io::BufReader;

use thiserror::Error;
use tracing::trace;
use xmltree::Element;

use super::fault::{SoapFault, classify};

/// Erreur de décodage d'une réponse SOAP
#[derive(Debug, Error)]
pub enum SoapParseError {
    /// La caméra a répondu par un fault, classe d'erreur distincte
    /// d'un corps inexploitable.
    #[error(transparent)]
    Fault(#[from] SoapFault),

    #[error("XML parse error: {0}")]
    XmlError(#[from] xmltree::ParseError),

    #[error("Missing SOAP Envelope")]
    MissingEnvelope,

    #[error("Missing SOAP Body")]
    MissingBody,
}

/// Corps d'une réponse SOAP décodée, parcourable par nom local.
#[derive(Debug, Clone)]
pub struct SoapResponse {
    body: Element,
}

/// Décode une réponse : classification du fault d'abord, puis parse
/// structuré. Un fault court-circuite, jamais de décodage derrière.
pub fn parse_response(xml: &str) -> Result<SoapResponse, SoapParseError> {
    if let Some(fault) = classify(xml) {
        return Err(SoapParseError::Fault(fault));
    }

    let root = Element::parse(BufReader::new(xml.as_bytes()))?;
    if root.name != "Envelope" {
        return Err(SoapParseError::MissingEnvelope);
    }

    // xmltree sépare préfixe et nom local : get_child matche le nom
    // local, quel que soit le préfixe choisi par le vendeur.
    let body = root
        .get_child("Body")
        .cloned()
        .ok_or(SoapParseError::MissingBody)?;

    trace!("SOAP body decoded, {} top-level nodes", body.children.len());
    Ok(SoapResponse { body })
}

impl SoapResponse {
    /// Premier descendant portant ce nom local, profondeur d'abord.
    pub fn find(&self, local: &str) -> Option<&Element> {
        find_descendant(&self.body, local)
    }

    /// Texte non vide du premier descendant portant ce nom local.
    pub fn text_of(&self, local: &str) -> Option<String> {
        self.find(local)
            .map(element_text)
            .filter(|text| !text.is_empty())
    }

    /// Tous les descendants portant ce nom local, dans l'ordre du
    /// document. Une liste vide est un résultat valide (zéro
    /// enregistrement), pas un échec de décodage.
    pub fn each(&self, local: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_descendants(&self.body, local, &mut found);
        found
    }

    pub fn body(&self) -> &Element {
        &self.body
    }
}

/// Texte concaténé d'un élément, chaîne vide si absent.
pub(crate) fn element_text(el: &Element) -> String {
    el.get_text().unwrap_or_default().trim().to_string()
}

fn find_descendant<'a>(el: &'a Element, local: &str) -> Option<&'a Element> {
    for child in el.children.iter().filter_map(|node| node.as_element()) {
        if child.name == local {
            return Some(child);
        }
        if let Some(found) = find_descendant(child, local) {
            return Some(found);
        }
    }
    None
}

fn collect_descendants<'a>(el: &'a Element, local: &str, out: &mut Vec<&'a Element>) {
    for child in el.children.iter().filter_map(|node| node.as_element()) {
        if child.name == local {
            // un enregistrement ne contient pas ses frères : on ne
            // descend pas dans une correspondance
            out.push(child);
        } else {
            collect_descendants(child, local, out);
        }
    }
}
