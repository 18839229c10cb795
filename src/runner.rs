use serde_json::{json, Value};
use tracing::warn;

use crate::error::{BlueError, Result};
use crate::graphql::BlueClient;
use crate::operations::{dispatch, Item};

/// Run items one after another. Each successful item yields its data.
///
/// A failed item yields `{"error": message}` when `continue_on_fail` is set;
/// otherwise the run stops at that item.
pub async fn run_batch(
    client: &BlueClient,
    items: Vec<Value>,
    continue_on_fail: bool,
) -> Result<Vec<Value>> {
    let mut out = Vec::with_capacity(items.len());

    for (index, raw) in items.into_iter().enumerate() {
        let operation = raw
            .get("operation")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        let outcome = match serde_json::from_value::<Item>(raw) {
            Ok(item) => {
                let res = dispatch(client, &item.operation, &item.additional_options).await;
                if res.success {
                    Ok(res.data.unwrap_or(Value::Null))
                } else {
                    let message = res.error.unwrap_or_else(|| "Unknown error".to_string());
                    Err((message, res.data))
                }
            }
            Err(e) => Err((format!("Invalid item: {e}"), None)),
        };

        match outcome {
            Ok(data) => out.push(data),
            Err((message, data)) if continue_on_fail => {
                warn!(index, %operation, %message, "item failed, continuing");
                out.push(failure_entry(message, data));
            }
            Err((message, _)) => {
                return Err(BlueError::Item {
                    index,
                    operation,
                    message,
                })
            }
        }
    }

    Ok(out)
}

/// `{"error": message}`, plus whatever a partially applied item reported (its `applied` steps).
fn failure_entry(message: String, data: Option<Value>) -> Value {
    let mut entry = json!({ "error": message });
    if let (Some(Value::Object(extra)), Value::Object(fields)) = (data, &mut entry) {
        for (key, value) in extra {
            fields.entry(key).or_insert(value);
        }
    }
    entry
}
