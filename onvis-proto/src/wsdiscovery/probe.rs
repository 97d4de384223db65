//! Document Probe WS-Discovery.

use uuid::Uuid;

/// Construit le Probe émis en multicast.
///
/// Le filtre `Types` ne vise que les transmetteurs vidéo réseau ; les
/// autres équipements WS-Discovery du segment ignorent le message. Le
/// MessageID doit être unique par émission : certains devices jettent
/// silencieusement un id déjà vu.
pub fn probe_message(message_id: &Uuid) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Envelope xmlns="http://www.w3.org/2003/05/soap-envelope"
          xmlns:a="http://schemas.xmlsoap.org/ws/2004/08/addressing"
          xmlns:d="http://schemas.xmlsoap.org/ws/2005/04/discovery"
          xmlns:dn="http://www.onvif.org/ver10/network/wsdl">
    <Header>
        <a:Action>http://schemas.xmlsoap.org/ws/2005/04/discovery/Probe</a:Action>
        <a:MessageID>uuid:{message_id}</a:MessageID>
        <a:To>urn:schemas-xmlsoap-org:ws:2005:04:discovery</a:To>
    </Header>
    <Body>
        <d:Probe>
            <d:Types>dn:NetworkVideoTransmitter</d:Types>
        </d:Probe>
    </Body>
</Envelope>"#
    )
}
