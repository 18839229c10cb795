pub mod custom_field;
pub mod entity;
pub mod locator;
pub mod result;

pub use custom_field::{
    CustomFieldAssignment, CustomFieldOption, CustomFieldSpec, CustomFieldType, FieldRef,
};
pub use entity::{Company, ListOption, Project, ProjectUser, Role, Tag, TodoList};
pub use locator::{extract_id, require_id, LocatorMode, ResourceLocator};
pub use result::OperationResult;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a string, a number or a boolean where a free-form value is expected.
/// Form fields arrive as strings, but hand-written items often use numbers.
/// A list of scalars (multi-select ids, a `[lat, lng]` pair) is joined with `,`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => {
            let parts = items
                .iter()
                .map(scalar_text)
                .collect::<Option<Vec<String>>>()
                .ok_or_else(|| {
                    D::Error::custom("list values may only hold strings, numbers or booleans")
                })?;
            Ok(Some(parts.join(",")))
        }
        Some(value) => scalar_text(&value).map(Some).ok_or_else(|| {
            D::Error::custom("expected a string, number, boolean or list, found an object")
        }),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
