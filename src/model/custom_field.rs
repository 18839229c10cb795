use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BlueError;

/// Field types the API accepts values for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomFieldType {
    TextSingle,
    TextMulti,
    Number,
    Percent,
    StarRating,
    Checkbox,
    SelectSingle,
    SelectMulti,
    Date,
    Location,
    Currency,
    Country,
    Phone,
    Email,
    Url,
}

/// Remote field types that are computed server-side and cannot be written.
pub const READ_ONLY_FIELD_TYPES: &[&str] = &["UNIQUE_ID", "REFERENCE"];

impl CustomFieldType {
    pub const ALL: [CustomFieldType; 15] = [
        CustomFieldType::TextSingle,
        CustomFieldType::TextMulti,
        CustomFieldType::Number,
        CustomFieldType::Percent,
        CustomFieldType::StarRating,
        CustomFieldType::Checkbox,
        CustomFieldType::SelectSingle,
        CustomFieldType::SelectMulti,
        CustomFieldType::Date,
        CustomFieldType::Location,
        CustomFieldType::Currency,
        CustomFieldType::Country,
        CustomFieldType::Phone,
        CustomFieldType::Email,
        CustomFieldType::Url,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomFieldType::TextSingle => "TEXT_SINGLE",
            CustomFieldType::TextMulti => "TEXT_MULTI",
            CustomFieldType::Number => "NUMBER",
            CustomFieldType::Percent => "PERCENT",
            CustomFieldType::StarRating => "STAR_RATING",
            CustomFieldType::Checkbox => "CHECKBOX",
            CustomFieldType::SelectSingle => "SELECT_SINGLE",
            CustomFieldType::SelectMulti => "SELECT_MULTI",
            CustomFieldType::Date => "DATE",
            CustomFieldType::Location => "LOCATION",
            CustomFieldType::Currency => "CURRENCY",
            CustomFieldType::Country => "COUNTRY",
            CustomFieldType::Phone => "PHONE",
            CustomFieldType::Email => "EMAIL",
            CustomFieldType::Url => "URL",
        }
    }

    /// Example input shown next to a field in pickers.
    pub fn example(&self) -> &'static str {
        match self {
            CustomFieldType::TextSingle => "\"Project Alpha\"",
            CustomFieldType::TextMulti => "\"First line\\nSecond line\"",
            CustomFieldType::Number => "\"42\"",
            CustomFieldType::Percent => "\"75\" or \"75%\"",
            CustomFieldType::StarRating => "\"4\"",
            CustomFieldType::Checkbox => "\"true\", \"false\", \"1\", \"0\" or \"checked\"",
            CustomFieldType::SelectSingle => "\"option_123456\"",
            CustomFieldType::SelectMulti => "\"option_123456,option_789012\"",
            CustomFieldType::Date => "\"2023-12-31\" or \"2023-12-01,2023-12-31\"",
            CustomFieldType::Location => "\"37.7749,-122.4194\"",
            CustomFieldType::Currency => "\"100 USD\", \"USD100\" or \"100\"",
            CustomFieldType::Country => "\"US\" or \"US,United States\"",
            CustomFieldType::Phone => "\"+1-555-123-4567\"",
            CustomFieldType::Email => "\"contact@example.com\"",
            CustomFieldType::Url => "\"https://example.com\"",
        }
    }
}

impl fmt::Display for CustomFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomFieldType {
    type Err = BlueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        CustomFieldType::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(tag))
            .copied()
            .ok_or_else(|| BlueError::validation(format!("Unsupported custom field type: {tag}")))
    }
}

/// A custom field selection in `"id|TYPE"` form, as produced by the custom field lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    pub id: String,
    pub field_type: CustomFieldType,
}

impl FieldRef {
    pub fn new(id: impl Into<String>, field_type: CustomFieldType) -> Self {
        Self {
            id: id.into(),
            field_type,
        }
    }

    /// The id half of an `"id|TYPE"` string, or the whole string when there is no type.
    pub fn id_part(raw: &str) -> &str {
        raw.split_once('|').map(|(id, _)| id).unwrap_or(raw).trim()
    }
}

impl FromStr for FieldRef {
    type Err = BlueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, tag) = s.split_once('|').ok_or_else(|| {
            BlueError::validation(format!(
                "Custom field reference \"{s}\" must have the form id|TYPE"
            ))
        })?;
        let id = id.trim();
        if id.is_empty() {
            return Err(BlueError::validation(format!(
                "Custom field reference \"{s}\" has an empty id"
            )));
        }
        Ok(FieldRef::new(id, tag.parse()?))
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.id, self.field_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldOption {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A custom field as returned by the API. `field_type` stays a string because
/// the API also reports read-only types this crate cannot write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldSpec {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "customFieldOptions")]
    pub options: Option<Vec<CustomFieldOption>>,
}

impl CustomFieldSpec {
    pub fn is_writable(&self) -> bool {
        !READ_ONLY_FIELD_TYPES.contains(&self.field_type.as_str())
    }

    /// Options ordered by position; options without a position sort first.
    pub fn sorted_options(&self) -> Vec<&CustomFieldOption> {
        let mut options: Vec<&CustomFieldOption> =
            self.options.iter().flatten().collect();
        options.sort_by(|a, b| {
            a.position
                .unwrap_or(0.0)
                .total_cmp(&b.position.unwrap_or(0.0))
        });
        options
    }

    /// The field's own description, or an input example for its type when it has none.
    pub fn hint(&self) -> Option<String> {
        match self.description.as_deref().map(str::trim) {
            Some(description) if !description.is_empty() => Some(description.to_string()),
            _ => self
                .field_type
                .parse::<CustomFieldType>()
                .ok()
                .map(|t| format!("e.g. {}", t.example())),
        }
    }
}

/// One custom field value to write: the `"id|TYPE"` reference plus raw user input.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFieldAssignment {
    pub field: FieldRef,
    pub raw_value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_reference() {
        let field: FieldRef = "f1|NUMBER".parse().unwrap();
        assert_eq!(field, FieldRef::new("f1", CustomFieldType::Number));
        assert_eq!(field.to_string(), "f1|NUMBER");
    }

    #[test]
    fn field_reference_splits_on_first_delimiter_only() {
        let err = "f1|SELECT|MULTI".parse::<FieldRef>().unwrap_err();
        assert!(err.to_string().contains("SELECT|MULTI"));
    }

    #[test]
    fn field_reference_without_type_is_rejected() {
        let err = "f1".parse::<FieldRef>().unwrap_err();
        assert!(err.to_string().contains("id|TYPE"));
    }

    #[test]
    fn field_reference_with_empty_id_is_rejected() {
        assert!("|TEXT_SINGLE".parse::<FieldRef>().is_err());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = "f1|UNIQUE_ID".parse::<FieldRef>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported custom field type: UNIQUE_ID");
    }

    #[test]
    fn type_tags_round_trip_through_serde() {
        for t in CustomFieldType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
            assert_eq!(t.as_str().parse::<CustomFieldType>().unwrap(), t);
        }
    }

    #[test]
    fn id_part_strips_type() {
        assert_eq!(FieldRef::id_part("cf_1|DATE"), "cf_1");
        assert_eq!(FieldRef::id_part("cf_1"), "cf_1");
    }

    #[test]
    fn options_sort_by_position() {
        let spec: CustomFieldSpec = serde_json::from_value(serde_json::json!({
            "id": "cf", "name": "Stage", "type": "SELECT_SINGLE",
            "customFieldOptions": [
                { "id": "b", "title": "Second", "position": 2 },
                { "id": "a", "title": "First", "position": 1 }
            ]
        }))
        .unwrap();
        let ids: Vec<&str> = spec.sorted_options().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(spec.is_writable());
    }

    #[test]
    fn hint_falls_back_to_type_example() {
        let spec = |field_type: &str, description: Option<&str>| CustomFieldSpec {
            id: "cf".into(),
            name: "Field".into(),
            field_type: field_type.into(),
            description: description.map(String::from),
            options: None,
        };

        assert_eq!(spec("NUMBER", Some("Hours")).hint().as_deref(), Some("Hours"));
        assert_eq!(spec("LOCATION", Some("  ")).hint().as_deref(), Some("e.g. \"37.7749,-122.4194\""));
        assert_eq!(spec("NUMBER", None).hint().as_deref(), Some("e.g. \"42\""));
        assert_eq!(spec("FORMULA", None).hint(), None);
    }
}
