//! Requêtes d'information du service device.
//!
//! Chaque opération est un appelant mince du coeur protocole : un
//! fragment de body, un POST, puis décodage structuré avec repli sur
//! l'extraction brute quand le vendeur s'écarte du schéma. Le
//! découpage requête/interprétation permet de tester l'interprétation
//! sur des corps enregistrés, sans caméra.

use onvis_proto::soap::{self, SoapParseError, SoapResponse};
use serde::Serialize;
use tracing::debug;

use crate::client::CameraClient;
use crate::errors::ClientError;

const DEVICE_WSDL: &str = "http://www.onvif.org/ver10/device/wsdl";

/// Identité du device (GetDeviceInformation).
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceInformation {
    pub manufacturer: String,
    pub model: String,
    pub firmware_version: String,
    pub serial_number: String,
    pub hardware_id: String,
}

/// Nom d'hôte du device (GetHostname).
#[derive(Debug, Clone, Default, Serialize)]
pub struct HostnameInformation {
    pub name: String,
    pub from_dhcp: bool,
}

/// Horloge du device (GetSystemDateAndTime).
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemDateTime {
    pub time_zone: String,
    /// `"YYYY-MM-DD HH:MM:SS UTC"`, absent si le device n'expose pas
    /// d'heure UTC exploitable
    pub utc_time: Option<String>,
}

/// Capacités annoncées par le device (GetCapabilities).
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceCapabilities {
    pub media_xaddr: String,
    pub imaging_xaddr: String,
    pub has_ptz: bool,
    pub has_analytics: bool,
}

impl CameraClient {
    /// Interroge l'identité du device.
    pub fn get_device_information(&self, xaddr: &str) -> Result<DeviceInformation, ClientError> {
        let body = self.send_soap_request(
            xaddr,
            &format!("{DEVICE_WSDL}/GetDeviceInformation"),
            "<tds:GetDeviceInformation/>",
        )?;
        device_information_from(&body)
    }

    /// Interroge le nom d'hôte du device.
    pub fn get_hostname(&self, xaddr: &str) -> Result<HostnameInformation, ClientError> {
        let body = self.send_soap_request(
            xaddr,
            &format!("{DEVICE_WSDL}/GetHostname"),
            "<tds:GetHostname/>",
        )?;
        hostname_from(&body)
    }

    /// Interroge l'horloge du device.
    pub fn get_system_date_time(&self, xaddr: &str) -> Result<SystemDateTime, ClientError> {
        let body = self.send_soap_request(
            xaddr,
            &format!("{DEVICE_WSDL}/GetSystemDateAndTime"),
            "<tds:GetSystemDateAndTime/>",
        )?;
        system_date_time_from(&body)
    }

    /// Interroge les capacités du device, toutes catégories.
    pub fn get_capabilities(&self, xaddr: &str) -> Result<DeviceCapabilities, ClientError> {
        let body = self.send_soap_request(
            xaddr,
            &format!("{DEVICE_WSDL}/GetCapabilities"),
            "<tds:GetCapabilities><tds:Category>All</tds:Category></tds:GetCapabilities>",
        )?;
        capabilities_from(&body)
    }
}

fn device_information_from(body: &str) -> Result<DeviceInformation, ClientError> {
    match soap::parse_response(body) {
        Ok(response) => Ok(DeviceInformation {
            manufacturer: response.text_of("Manufacturer").unwrap_or_default(),
            model: response.text_of("Model").unwrap_or_default(),
            firmware_version: response.text_of("FirmwareVersion").unwrap_or_default(),
            serial_number: response.text_of("SerialNumber").unwrap_or_default(),
            hardware_id: response.text_of("HardwareId").unwrap_or_default(),
        }),
        Err(SoapParseError::Fault(fault)) => Err(fault.into()),
        Err(e) => {
            // Corps hors schéma : extraction champ par champ.
            debug!("structured decode failed ({}), falling back to extraction", e);
            Ok(DeviceInformation {
                manufacturer: soap::first_text(body, "Manufacturer").unwrap_or_default(),
                model: soap::first_text(body, "Model").unwrap_or_default(),
                firmware_version: soap::first_text(body, "FirmwareVersion").unwrap_or_default(),
                serial_number: soap::first_text(body, "SerialNumber").unwrap_or_default(),
                hardware_id: soap::first_text(body, "HardwareId").unwrap_or_default(),
            })
        }
    }
}

fn hostname_from(body: &str) -> Result<HostnameInformation, ClientError> {
    match soap::parse_response(body) {
        Ok(response) => {
            let info = response
                .find("HostnameInformation")
                .ok_or_else(|| ClientError::missing_element("HostnameInformation"))?;

            // FromDHCP est un élément chez la plupart des vendeurs, un
            // attribut chez certains.
            let from_dhcp = child_text(info, "FromDHCP")
                .or_else(|| info.attributes.get("FromDHCP").cloned())
                .is_some_and(|value| value == "true" || value == "1");

            let name = child_text(info, "Name")
                .or_else(|| soap::first_text(body, "Name"))
                .unwrap_or_default();

            Ok(HostnameInformation { name, from_dhcp })
        }
        Err(SoapParseError::Fault(fault)) => Err(fault.into()),
        Err(_) => {
            let name = soap::first_text(body, "Name")
                .ok_or_else(|| ClientError::missing_element("Name"))?;
            Ok(HostnameInformation {
                name,
                from_dhcp: false,
            })
        }
    }
}

fn system_date_time_from(body: &str) -> Result<SystemDateTime, ClientError> {
    match soap::parse_response(body) {
        Ok(response) => Ok(SystemDateTime {
            time_zone: response.text_of("TZ").unwrap_or_default(),
            utc_time: response.find("UTCDateTime").and_then(format_utc_date_time),
        }),
        Err(SoapParseError::Fault(fault)) => Err(fault.into()),
        Err(_) => Ok(SystemDateTime {
            time_zone: soap::first_text(body, "TZ").unwrap_or_default(),
            utc_time: None,
        }),
    }
}

fn format_utc_date_time(utc: &xmltree::Element) -> Option<String> {
    let date = utc.get_child("Date")?;
    let time = utc.get_child("Time")?;

    let year: i32 = child_text(date, "Year")?.parse().ok()?;
    if year <= 0 {
        return None;
    }
    let month: u32 = child_text(date, "Month")?.parse().ok()?;
    let day: u32 = child_text(date, "Day")?.parse().ok()?;
    let hour: u32 = child_text(time, "Hour")?.parse().ok()?;
    let minute: u32 = child_text(time, "Minute")?.parse().ok()?;
    let second: u32 = child_text(time, "Second")?.parse().ok()?;

    Some(format!(
        "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02} UTC"
    ))
}

fn capabilities_from(body: &str) -> Result<DeviceCapabilities, ClientError> {
    match soap::parse_response(body) {
        Ok(response) => Ok(DeviceCapabilities {
            media_xaddr: section_xaddr(&response, "Media").unwrap_or_default(),
            imaging_xaddr: section_xaddr(&response, "Imaging").unwrap_or_default(),
            has_ptz: section_xaddr(&response, "PTZ").is_some(),
            has_analytics: section_xaddr(&response, "Analytics").is_some(),
        }),
        Err(SoapParseError::Fault(fault)) => Err(fault.into()),
        Err(_) => {
            // Détection de présence à la manière du repli champ à
            // champ : une section existe si elle annonce son XAddr.
            let has = |section: &str| {
                soap::first_text(body, section)
                    .map(|inner| soap::has_element(&inner, "XAddr"))
                    .unwrap_or(false)
            };
            Ok(DeviceCapabilities {
                media_xaddr: String::new(),
                imaging_xaddr: String::new(),
                has_ptz: has("PTZ"),
                has_analytics: has("Analytics"),
            })
        }
    }
}

// XAddr d'une section de capacités, si la section est annoncée.
fn section_xaddr(response: &SoapResponse, section: &str) -> Option<String> {
    let el = response.find(section)?;
    child_text(el, "XAddr").filter(|xaddr| !xaddr.is_empty())
}

fn child_text(el: &xmltree::Element, local: &str) -> Option<String> {
    el.get_child(local)
        .and_then(|child| child.get_text())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
