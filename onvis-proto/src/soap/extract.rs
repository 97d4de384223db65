//! Extraction d'éléments par nom local, indépendante des préfixes.
//!
//! Les caméras du terrain déclarent le même élément sous `tds:`, `tt:`,
//! `env:` ou sans préfixe du tout. Ce scanner travaille sur les tokens
//! XML (quick-xml en mode lecture seule) plutôt que par recherche de
//! sous-chaîne : les balises auto-fermantes, les attributs et les
//! imbrications de même nom local sont gérés explicitement.
//!
//! Contrat :
//! - une balise auto-fermante correspond et vaut `Some("")` ;
//! - une balise ouvrante sans fermeture avant la fin du document vaut
//!   `None` (le scanner ne consomme jamais au-delà) ;
//! - le contenu retourné est la tranche brute entre balises, markup
//!   imbriqué compris, sans expansion d'entités.

use quick_xml::Reader;
use quick_xml::events::Event;

fn scanner(xml: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(xml);
    // Vendor junk ailleurs dans le document ne doit pas empoisonner
    // l'extraction d'une région bien formée.
    reader.config_mut().check_end_names = false;
    reader
}

/// Contenu du premier élément dont le nom local vaut `name`, quel que
/// soit son préfixe de namespace.
pub fn first_text(xml: &str, name: &str) -> Option<String> {
    let mut reader = scanner(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().local_name().as_ref() == name.as_bytes() => {
                return match reader.read_text(e.name()) {
                    Ok(text) => Some(text.into_owned()),
                    // ouvrante sans fermante : absent plutôt que sur-consommer
                    Err(_) => None,
                };
            }
            Ok(Event::Empty(e)) if e.name().local_name().as_ref() == name.as_bytes() => {
                return Some(String::new());
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}

/// Première orthographe de `names` donnant un contenu non vide.
///
/// Le même champ apparaît sous des noms d'éléments différents selon la
/// version de schéma du vendeur (ex. `Uri` direct ou sous `MediaUri`).
pub fn first_text_of_any(xml: &str, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| first_text(xml, name).filter(|text| !text.trim().is_empty()))
}

/// Vrai si un élément de nom local `name` apparaît dans le document,
/// forme ouvrante ou auto-fermante.
pub fn has_element(xml: &str, name: &str) -> bool {
    let mut reader = scanner(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.name().local_name().as_ref() == name.as_bytes() =>
            {
                return true;
            }
            Ok(Event::Eof) | Err(_) => return false,
            Ok(_) => {}
        }
    }
}

/// Tranche interne de chaque élément de nom local `name`, dans l'ordre
/// du document.
///
/// Sert à délimiter des enregistrements répétés (une liste de `User`
/// par exemple) quand le décodeur structuré ne les itère pas de façon
/// fiable d'un vendeur à l'autre. Un enregistrement imbriqué dans un
/// autre est consommé avec son parent, pas compté deux fois.
pub fn sections(xml: &str, name: &str) -> Vec<String> {
    let mut reader = scanner(xml);
    let mut records = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().local_name().as_ref() == name.as_bytes() => {
                match reader.read_text(e.name()) {
                    Ok(text) => records.push(text.into_owned()),
                    Err(_) => break,
                }
            }
            Ok(Event::Empty(e)) if e.name().local_name().as_ref() == name.as_bytes() => {
                records.push(String::new());
            }
            Ok(Event::Eof) | Err(_) => break,
            Ok(_) => {}
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_and_unprefixed() {
        assert_eq!(
            first_text("<tds:Manufacturer>Axis</tds:Manufacturer>", "Manufacturer"),
            Some("Axis".to_string())
        );
        assert_eq!(
            first_text("<Manufacturer>Axis</Manufacturer>", "Manufacturer"),
            Some("Axis".to_string())
        );
        assert_eq!(
            first_text("<tt:Manufacturer>Axis</tt:Manufacturer>", "Manufacturer"),
            Some("Axis".to_string())
        );
    }

    #[test]
    fn test_attributes_on_open_tag() {
        let xml = r#"<tt:Name token="abc" fixed="true">cam-hall</tt:Name>"#;
        assert_eq!(first_text(xml, "Name"), Some("cam-hall".to_string()));
    }

    #[test]
    fn test_absent_element() {
        assert_eq!(first_text("<a><b>x</b></a>", "Model"), None);
    }

    #[test]
    fn test_self_closing_yields_empty() {
        assert_eq!(first_text(r#"<a><OSD token="x"/></a>"#, "OSD"), Some(String::new()));
        assert!(has_element(r#"<a><OSD token="x"/></a>"#, "OSD"));
    }

    #[test]
    fn test_unterminated_open_tag_is_absent() {
        assert_eq!(first_text("<a><Model>M20", "Model"), None);
    }

    #[test]
    fn test_nested_same_local_name_other_namespace() {
        let xml = "<tds:Info><tt:Info>inner</tt:Info>tail</tds:Info>";
        assert_eq!(
            first_text(xml, "Info"),
            Some("<tt:Info>inner</tt:Info>tail".to_string())
        );
    }

    #[test]
    fn test_nested_same_qualified_name() {
        let xml = "<tt:Node><tt:Node>deep</tt:Node></tt:Node>";
        assert_eq!(first_text(xml, "Node"), Some("<tt:Node>deep</tt:Node>".to_string()));
    }

    #[test]
    fn test_inner_markup_returned_verbatim() {
        let xml = "<Reason><Text lang=\"en\">Sender not authorized</Text></Reason>";
        let inner = first_text(xml, "Reason").unwrap();
        assert_eq!(first_text(&inner, "Text"), Some("Sender not authorized".to_string()));
    }

    #[test]
    fn test_spelling_drift() {
        let v1 = "<trt:Uri>rtsp://10.0.0.5/main</trt:Uri>";
        let v2 = "<tt:MediaUri><tt:Uri>rtsp://10.0.0.5/main</tt:Uri></tt:MediaUri>";
        assert_eq!(
            first_text_of_any(v1, &["Uri", "MediaUri"]),
            Some("rtsp://10.0.0.5/main".to_string())
        );
        assert!(first_text_of_any(v2, &["Uri", "MediaUri"]).is_some());
        assert_eq!(first_text_of_any("<a/>", &["Uri", "MediaUri"]), None);
    }

    #[test]
    fn test_sections_delimit_records() {
        let xml = "<GetUsersResponse>\
                   <tds:User><tt:Username>admin</tt:Username></tds:User>\
                   <tds:User><tt:Username>viewer</tt:Username></tds:User>\
                   </GetUsersResponse>";
        let records = sections(xml, "User");
        assert_eq!(records.len(), 2);
        assert_eq!(first_text(&records[0], "Username"), Some("admin".to_string()));
        assert_eq!(first_text(&records[1], "Username"), Some("viewer".to_string()));
    }

    #[test]
    fn test_sections_empty_when_no_records() {
        assert!(sections("<GetUsersResponse></GetUsersResponse>", "User").is_empty());
    }
}
