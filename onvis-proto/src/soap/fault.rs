//! Détection et classification des SOAP Faults.

use thiserror::Error;
use tracing::debug;

use super::extract;

/// Taxonomie fermée des faults connus.
///
/// Les codes `ter:*` sont les codes d'erreur ONVIF embarqués dans le
/// corps du fault ; tout le reste retombe sur [`FaultKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Le nom d'utilisateur existe déjà
    UsernameClash,
    /// Nom d'utilisateur inconnu
    UsernameMissing,
    /// Quota d'utilisateurs atteint
    TooManyUsers,
    /// Compte fixe, non modifiable
    FixedUser,
    /// Mot de passe refusé par la politique du device
    PasswordPolicy,
    /// Requête refusée, droits insuffisants
    NotAuthorized,
    /// Fault présent mais non reconnu
    Other,
}

/// Fault SOAP classifié, tel que rapporté par la caméra.
#[derive(Debug, Clone, Error)]
#[error("camera returned a SOAP fault: {message}")]
pub struct SoapFault {
    pub kind: FaultKind,
    pub message: String,
}

// Table ordonnée : premier motif trouvé gagne. Certains vendeurs ne
// sont identifiables que par le code ter:*, d'autres uniquement par le
// texte libre du Reason.
const KNOWN_FAULTS: &[(&str, FaultKind, &str)] = &[
    ("ter:UsernameClash", FaultKind::UsernameClash, "username already exists"),
    ("ter:UsernameMissing", FaultKind::UsernameMissing, "username not found"),
    ("ter:TooManyUsers", FaultKind::TooManyUsers, "maximum number of users reached"),
    ("ter:FixedUser", FaultKind::FixedUser, "cannot modify or delete fixed user"),
    ("ter:Password", FaultKind::PasswordPolicy, "password does not meet requirements"),
    ("NotAuthorized", FaultKind::NotAuthorized, "not authorized"),
];

/// Classifie le corps d'une réponse.
///
/// `None` signifie : pas de fault, le corps est une réponse normale.
/// Un corps est l'un ou l'autre, jamais les deux.
pub fn classify(body: &str) -> Option<SoapFault> {
    if !extract::has_element(body, "Fault") {
        return None;
    }

    for (needle, kind, message) in KNOWN_FAULTS {
        if body.contains(needle) {
            debug!("SOAP fault matched {:?}", kind);
            return Some(SoapFault {
                kind: *kind,
                message: (*message).to_string(),
            });
        }
    }

    // Reason/Text (SOAP 1.2) puis faultstring (SOAP 1.1)
    let reason = extract::first_text(body, "Reason")
        .and_then(|inner| extract::first_text(&inner, "Text"))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .or_else(|| {
            extract::first_text(body, "faultstring")
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty())
        });

    Some(match reason {
        Some(message) => SoapFault {
            kind: FaultKind::Other,
            message,
        },
        None => SoapFault {
            kind: FaultKind::Other,
            message: "fault with no detail".to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_response_is_not_a_fault() {
        let body = "<s:Envelope><s:Body><tds:GetDeviceInformationResponse>\
                    <tds:Manufacturer>Axis</tds:Manufacturer>\
                    </tds:GetDeviceInformationResponse></s:Body></s:Envelope>";
        assert!(classify(body).is_none());
    }

    #[test]
    fn test_known_code_wins() {
        let body = "<s:Envelope><s:Body><s:Fault>\
                    <s:Code><s:Subcode><s:Value>ter:UsernameClash</s:Value></s:Subcode></s:Code>\
                    <s:Reason><s:Text>whatever the vendor says</s:Text></s:Reason>\
                    </s:Fault></s:Body></s:Envelope>";
        let fault = classify(body).unwrap();
        assert_eq!(fault.kind, FaultKind::UsernameClash);
        assert_eq!(fault.message, "username already exists");
    }

    #[test]
    fn test_soap12_reason_text() {
        // Scénario : aucun code connu, seul le texte libre identifie l'erreur
        let body = "<SOAP-ENV:Envelope><SOAP-ENV:Body><SOAP-ENV:Fault>\
                    <SOAP-ENV:Reason><SOAP-ENV:Text xml:lang=\"en\">Sender not authorized</SOAP-ENV:Text></SOAP-ENV:Reason>\
                    </SOAP-ENV:Fault></SOAP-ENV:Body></SOAP-ENV:Envelope>";
        let fault = classify(body).unwrap();
        assert_eq!(fault.message, "Sender not authorized");
    }

    #[test]
    fn test_soap11_faultstring() {
        let body = "<SOAP-ENV:Envelope><SOAP-ENV:Body><SOAP-ENV:Fault>\
                    <faultcode>SOAP-ENV:Client</faultcode>\
                    <faultstring>Invalid request</faultstring>\
                    </SOAP-ENV:Fault></SOAP-ENV:Body></SOAP-ENV:Envelope>";
        let fault = classify(body).unwrap();
        assert_eq!(fault.kind, FaultKind::Other);
        assert_eq!(fault.message, "Invalid request");
    }

    #[test]
    fn test_not_authorized_code() {
        let body = "<s:Envelope><s:Body><s:Fault>\
                    <s:Value>ter:NotAuthorized</s:Value>\
                    </s:Fault></s:Body></s:Envelope>";
        let fault = classify(body).unwrap();
        assert_eq!(fault.kind, FaultKind::NotAuthorized);
    }

    #[test]
    fn test_fault_without_detail() {
        let body = "<s:Envelope><s:Body><s:Fault></s:Fault></s:Body></s:Envelope>";
        let fault = classify(body).unwrap();
        assert_eq!(fault.kind, FaultKind::Other);
        assert_eq!(fault.message, "fault with no detail");
    }

    #[test]
    fn test_any_fault_prefix_detected() {
        for prefix in ["SOAP-ENV:", "s:", "env:", ""] {
            let body = format!("<Envelope><Body><{prefix}Fault></{prefix}Fault></Body></Envelope>");
            assert!(classify(&body).is_some(), "prefix '{prefix}' not detected");
        }
    }
}
