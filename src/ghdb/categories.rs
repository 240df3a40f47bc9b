//! GHDB category table

use std::collections::BTreeMap;

/// Category ids and names as listed by exploit-db
pub const CATEGORIES: [(u32, &str); 14] = [
    (1, "Footholds"),
    (2, "File Containing Usernames"),
    (3, "Sensitives Directories"),
    (4, "Web Server Detection"),
    (5, "Vulnerable Files"),
    (6, "Vulnerable Servers"),
    (7, "Error Messages"),
    (8, "File Containing Juicy Info"),
    (9, "File Containing Passwords"),
    (10, "Sensitive Online Shopping Info"),
    (11, "Network or Vulnerability Data"),
    (12, "Pages Containing Login Portals"),
    (13, "Various Online devices"),
    (14, "Advisories and Vulnerabilities"),
];

/// Name of a category id
pub fn category_name(id: u32) -> Option<&'static str> {
    CATEGORIES
        .iter()
        .find(|(cat_id, _)| *cat_id == id)
        .map(|(_, name)| *name)
}

/// Category file name: lowercase, spaces replaced by underscores, `.dorks` extension
pub fn category_file_name(name: &str) -> String {
    format!("{}.dorks", name.to_lowercase().replace(' ', "_"))
}

/// The table as a pretty JSON object keyed by id
pub fn to_json() -> serde_json::Result<String> {
    let table: BTreeMap<u32, &str> = CATEGORIES.iter().copied().collect();

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    serde::Serialize::serialize(&table, &mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(category_name(1), Some("Footholds"));
        assert_eq!(category_name(14), Some("Advisories and Vulnerabilities"));
        assert_eq!(category_name(15), None);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            category_file_name("Pages Containing Login Portals"),
            "pages_containing_login_portals.dorks"
        );
    }

    #[test]
    fn test_json_listing_in_id_order() {
        let json = to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["7"], "Error Messages");
        assert_eq!(value.as_object().unwrap().len(), 14);
        assert!(json.contains("\n    \"1\": \"Footholds\""));
        assert!(json.find("\"2\"").unwrap() < json.find("\"10\"").unwrap());
    }
}
