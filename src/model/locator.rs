use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{BlueError, Result};

/// How an identifier was entered: picked from a dropdown, typed by hand, or pasted as a URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorMode {
    #[default]
    List,
    Id,
    Url,
}

/// An identifier that may arrive either as a bare string or as a
/// `{ "mode": ..., "value": ... }` resource locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceLocator {
    Plain(String),
    Located {
        #[serde(default)]
        mode: LocatorMode,
        #[serde(default, deserialize_with = "null_as_empty")]
        value: String,
    },
}

/// An unpicked dropdown sends `"value": null`.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResourceLocator {
    /// The plain identifier, or `""` when nothing was picked.
    pub fn resolve(&self) -> &str {
        match self {
            ResourceLocator::Plain(id) => id,
            ResourceLocator::Located { value, .. } => value,
        }
    }
}

impl From<&str> for ResourceLocator {
    fn from(id: &str) -> Self {
        ResourceLocator::Plain(id.to_string())
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resolve())
    }
}

/// Resolve an optional locator; missing or `null` parameters resolve to `""`.
pub fn extract_id(param: Option<&ResourceLocator>) -> &str {
    param.map(ResourceLocator::resolve).unwrap_or("")
}

/// Resolve a locator that an operation cannot do without.
pub fn require_id<'a>(param: Option<&'a ResourceLocator>, what: &str) -> Result<&'a str> {
    let id = extract_id(param).trim();
    if id.is_empty() {
        return Err(BlueError::validation(format!("{what} is required")));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn locator(value: serde_json::Value) -> Option<ResourceLocator> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn id_mode_resolves_to_value() {
        let loc = locator(json!({ "mode": "id", "value": "company-1" }));
        assert_eq!(extract_id(loc.as_ref()), "company-1");
    }

    #[test]
    fn bare_string_resolves_to_itself() {
        let loc = locator(json!("company-1"));
        assert_eq!(extract_id(loc.as_ref()), "company-1");
    }

    #[test]
    fn empty_list_selection_resolves_to_empty() {
        let loc = locator(json!({ "mode": "list", "value": "" }));
        assert_eq!(extract_id(loc.as_ref()), "");
    }

    #[test]
    fn null_list_selection_resolves_to_empty() {
        let loc = locator(json!({ "mode": "list", "value": null })).unwrap();
        assert_eq!(loc.resolve(), "");
        assert!(require_id(Some(&loc), "Project ID").is_err());
    }

    #[test]
    fn null_resolves_to_empty() {
        let loc = locator(json!(null));
        assert!(loc.is_none());
        assert_eq!(extract_id(loc.as_ref()), "");
    }

    #[test]
    fn locator_without_mode_defaults_to_list() {
        let loc = locator(json!({ "value": "p-9" })).unwrap();
        assert_eq!(
            loc,
            ResourceLocator::Located {
                mode: LocatorMode::List,
                value: "p-9".into()
            }
        );
    }

    #[test]
    fn require_id_rejects_blank() {
        let loc = ResourceLocator::from("   ");
        let err = require_id(Some(&loc), "Project ID").unwrap_err();
        assert_eq!(err.to_string(), "Project ID is required");
    }

    #[test]
    fn require_id_trims() {
        let loc = ResourceLocator::from(" rec1 ");
        assert_eq!(require_id(Some(&loc), "Record ID").unwrap(), "rec1");
    }
}
