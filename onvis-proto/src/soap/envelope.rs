//! Construction de l'enveloppe SOAP 1.2 avec en-tête WS-Security.

use crate::wsse::DigestToken;

const NS_SOAP_ENV: &str = "http://www.w3.org/2003/05/soap-envelope";
const NS_DEVICE: &str = "http://www.onvif.org/ver10/device/wsdl";
const NS_MEDIA: &str = "http://www.onvif.org/ver10/media/wsdl";
const NS_SCHEMA: &str = "http://www.onvif.org/ver10/schema";
const NS_IMAGING: &str = "http://www.onvif.org/ver20/imaging/wsdl";
const NS_MEDIA2: &str = "http://www.onvif.org/ver20/media/wsdl";

const NS_WSSE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
const NS_WSU: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";
const PASSWORD_DIGEST_TYPE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordDigest";
const NONCE_ENCODING: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-soap-message-security-1.0#Base64Binary";

/// Enveloppe un fragment de body dans un document SOAP complet.
///
/// Tous les préfixes des sous-services (`tds`, `trt`, `tt`, `timg`, `tr2`)
/// sont déclarés sur l'enveloppe : un fragment peut utiliser n'importe
/// lequel sans négociation par appel. L'en-tête est toujours présent ;
/// le bloc Security n'est émis que si `auth` est fourni : l'accès anonyme
/// est un mode à part entière, pas un credential vide.
///
/// Le fragment n'est pas validé : un body malformé ressortira côté
/// réponse comme un document inexploitable, traité en aval.
pub fn build_envelope(body: &str, auth: Option<(&str, &DigestToken)>) -> String {
    let security = match auth {
        Some((username, token)) => format!(
            r#"<wsse:Security xmlns:wsse="{NS_WSSE}" s:mustUnderstand="1">
            <wsse:UsernameToken>
                <wsse:Username>{username}</wsse:Username>
                <wsse:Password Type="{PASSWORD_DIGEST_TYPE}">{digest}</wsse:Password>
                <wsse:Nonce EncodingType="{NONCE_ENCODING}">{nonce}</wsse:Nonce>
                <wsu:Created xmlns:wsu="{NS_WSU}">{created}</wsu:Created>
            </wsse:UsernameToken>
        </wsse:Security>"#,
            username = xml_escape(username),
            digest = token.digest,
            nonce = token.nonce,
            created = token.created,
        ),
        None => String::new(),
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<s:Envelope xmlns:s="{NS_SOAP_ENV}"
            xmlns:tds="{NS_DEVICE}"
            xmlns:trt="{NS_MEDIA}"
            xmlns:tt="{NS_SCHEMA}"
            xmlns:timg="{NS_IMAGING}"
            xmlns:tr2="{NS_MEDIA2}">
    <s:Header>{security}</s:Header>
    <s:Body>{body}</s:Body>
</s:Envelope>"#
    )
}

/// Échappe les caractères spéciaux XML d'un texte.
pub fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}
