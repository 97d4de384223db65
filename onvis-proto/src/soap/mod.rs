//! # Module SOAP - requêtes et réponses caméra
//!
//! Ce module implémente le support SOAP côté client pour ONVIF :
//! construction des enveloppes authentifiées et interprétation des
//! réponses des caméras, y compris celles qui s'écartent du schéma.
//!
//! ## Fonctionnalités
//!
//! - ✅ Enveloppes avec en-tête WS-Security optionnel
//! - ✅ Déclaration des namespaces de tous les sous-services
//! - ✅ Extraction d'éléments indépendante des préfixes
//! - ✅ Classification des SOAP Faults (taxonomie fermée)
//! - ✅ Décodage structuré avec repli sur extraction brute
//!
//! ## Architecture
//!
//! - [`build_envelope`] : enveloppe complète prête à poster
//! - [`first_text`] / [`sections`] : scanner d'extraction tolérant
//! - [`classify`] : détection et classification des faults
//! - [`parse_response`] : décodage structuré fault-first

mod envelope;
mod extract;
mod fault;
mod parser;

pub use envelope::{build_envelope, xml_escape};
pub use extract::{first_text, first_text_of_any, has_element, sections};
pub use fault::{FaultKind, SoapFault, classify};
pub use parser::{SoapParseError, SoapResponse, parse_response};
