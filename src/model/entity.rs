use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub id: String,
    #[serde(default)]
    pub uid: String,
    pub title: String,
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub is_disabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUser {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// One entry of a dropdown: what to show and what to submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListOption {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ListOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: None,
        }
    }

    /// An entry with an empty value, shown when a prerequisite is missing.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_list_defaults_missing_flags() {
        let list: TodoList =
            serde_json::from_str(r#"{"id":"l1","title":"Backlog"}"#).unwrap();
        assert!(!list.is_disabled);
        assert_eq!(list.uid, "");
    }

    #[test]
    fn tag_without_color_omits_it() {
        let tag = Tag {
            id: "t1".into(),
            title: "Urgent".into(),
            color: None,
        };
        let json = serde_json::to_string(&tag).unwrap();
        assert!(!json.contains("color"));
    }

    #[test]
    fn blank_description_is_dropped() {
        let opt = ListOption::new("Stage", "cf|SELECT_SINGLE").with_description(Some("  ".into()));
        assert_eq!(opt.description, None);
    }
}
