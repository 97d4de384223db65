//! Caméra découverte sur le réseau.

use serde::{Deserialize, Serialize};

/// Une caméra telle qu'annoncée dans un ProbeMatch, après décodage des
/// scopes et des types.
///
/// `address` conserve la liste XAddrs complète telle que reçue ; seule
/// la première adresse fait foi pour identifier le device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Camera {
    /// Nom annoncé dans les scopes
    pub name: String,

    /// Liste d'adresses de service, séparées par des espaces
    pub address: String,

    /// Localisation annoncée dans les scopes
    pub location: String,

    /// Modèle matériel annoncé dans les scopes
    pub hardware: String,

    /// Capacités lisibles décodées de la liste de types
    pub capabilities: Vec<String>,
}

impl Camera {
    /// Première adresse de la liste, l'adresse canonique du device.
    pub fn primary_address(&self) -> &str {
        self.address.split_whitespace().next().unwrap_or("")
    }

    /// Meilleur nom disponible : nom découvert, sinon modèle matériel,
    /// sinon adresse canonique.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.hardware.is_empty() {
            &self.hardware
        } else {
            self.primary_address()
        }
    }
}
