use serde::Deserialize;
use serde_json::{Map, Value};

use super::Context;
use crate::error::{BlueError, Result};
use crate::model::{extract_id, ResourceLocator};

/// A caller-written document, sent as given with real GraphQL variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub variables: Option<Value>,
    #[serde(default)]
    pub company_id: Option<ResourceLocator>,
    #[serde(default)]
    pub project_id: Option<ResourceLocator>,
}

impl CustomQuery {
    /// Variables may be an object or a JSON string holding one.
    pub fn variables(&self) -> Result<Map<String, Value>> {
        match &self.variables {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(Map::new()),
            Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(Value::Null) => Ok(Map::new()),
                Ok(_) => Err(BlueError::validation("Variables must be a JSON object")),
                Err(_) => Err(BlueError::validation("Invalid JSON in variables field")),
            },
            Some(_) => Err(BlueError::validation("Variables must be a JSON object")),
        }
    }

    pub async fn execute(&self, ctx: &Context<'_>) -> Result<Value> {
        if self.query.trim().is_empty() {
            return Err(BlueError::validation("GraphQL query cannot be empty"));
        }
        let request = ctx
            .request(self.query.as_str())
            .variables(self.variables()?)
            .company(extract_id(self.company_id.as_ref()))
            .project(extract_id(self.project_id.as_ref()));
        ctx.execute(request).await
    }
}
