use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BlueError;

/// Outcome of one operation on one input item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResult {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Failure result. Steps that were already applied before the failure are
    /// kept in `data.applied` so the caller can see what went through.
    pub fn from_error(err: BlueError) -> Self {
        let message = err.to_string();
        match err {
            BlueError::Step { applied, .. } if !applied.is_empty() => Self {
                success: false,
                data: Some(serde_json::json!({ "applied": applied })),
                error: Some(message),
            },
            _ => Self::failed(message),
        }
    }
}

impl From<crate::error::Result<Value>> for OperationResult {
    fn from(res: crate::error::Result<Value>) -> Self {
        match res {
            Ok(data) => OperationResult::ok(data),
            Err(err) => OperationResult::from_error(err),
        }
    }
}
