use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(u32);

impl SpeciesId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for SpeciesId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One catalogue entry tying a species to a method/region/area/rarity tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLocationRecord {
    #[serde(rename = "method", alias = "method_label", default)]
    pub method_label: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub rarity: Option<String>,
}

impl RawLocationRecord {
    pub fn new(
        method_label: impl AsRef<str>,
        region: Option<&str>,
        area: Option<&str>,
        rarity: Option<&str>,
    ) -> Self {
        Self {
            method_label: method_label.as_ref().to_string(),
            region: non_blank(region),
            area: non_blank(area),
            rarity: non_blank(rarity),
        }
    }

    /// Records with a blank method label are excluded from every derived view.
    pub fn is_usable(&self) -> bool {
        !self.method_label.trim().is_empty()
    }

    pub fn place(&self) -> (Option<&str>, Option<&str>) {
        (self.region.as_deref(), self.area.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id: SpeciesId,
    pub name: String,
    #[serde(default)]
    pub locations: Vec<RawLocationRecord>,
}

impl SpeciesRecord {
    pub fn new(id: impl Into<SpeciesId>, name: impl AsRef<str>) -> Self {
        Self {
            id: id.into(),
            name: name.as_ref().trim().to_string(),
            locations: Vec::new(),
        }
    }

    pub fn with_location(mut self, record: RawLocationRecord) -> Self {
        self.locations.push(record);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeciesSummary {
    pub id: SpeciesId,
    pub name: String,
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(non_blank(raw.as_deref()))
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

/// Row ids arrive as strings from some exporters and as integers from others.
pub(crate) fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Unsigned(n) => n.to_string(),
        TextOrNumber::Signed(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_become_absent() {
        let record = RawLocationRecord::new("Fishing", Some("  "), Some(""), None);
        assert_eq!(record.region, None);
        assert_eq!(record.area, None);
        assert!(record.is_usable());
    }

    #[test]
    fn blank_method_label_is_not_usable() {
        let record = RawLocationRecord::new("   ", Some("Kanto"), Some("Route 1"), Some("common"));
        assert!(!record.is_usable());
    }

    #[test]
    fn record_deserializes_with_blank_strings() {
        let record: RawLocationRecord = serde_json::from_str(
            r#"{"method":"Old Rod","region":"Kanto","area":" ","rarity":""}"#,
        )
        .unwrap();
        assert_eq!(record.method_label, "Old Rod");
        assert_eq!(record.region.as_deref(), Some("Kanto"));
        assert_eq!(record.area, None);
        assert_eq!(record.rarity, None);
    }

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "text_or_number")]
        id: String,
        #[serde(default, deserialize_with = "null_as_default")]
        method: String,
    }

    #[test]
    fn lenient_row_fields() {
        let row: Row = serde_json::from_str(r#"{"id": 42, "method": null}"#).unwrap();
        assert_eq!(row.id, "42");
        assert_eq!(row.method, "");

        let row: Row = serde_json::from_str(r#"{"id": "-7"}"#).unwrap();
        assert_eq!(row.id, "-7");
        assert_eq!(row.method, "");

        let row: Row = serde_json::from_str(r#"{"id": -7, "method": "Old Rod"}"#).unwrap();
        assert_eq!(row.id, "-7");
        assert_eq!(row.method, "Old Rod");

        assert!(serde_json::from_str::<Row>(r#"{"id": [1]}"#).is_err());
    }
}
