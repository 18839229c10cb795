use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::error::{BlueError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://api.blue.cc/graphql";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
const USER_AGENT: &str = concat!("blue-connector/", env!("CARGO_PKG_VERSION"));

const TOKEN_ID_HEADER: &str = "X-Bloo-Token-ID";
const TOKEN_SECRET_HEADER: &str = "X-Bloo-Token-Secret";
const COMPANY_HEADER: &str = "X-Bloo-Company-ID";
const PROJECT_HEADER: &str = "X-Bloo-Project-ID";

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub token_id: String,
    pub token_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token_id", &self.token_id)
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: String,
    pub credentials: Credentials,
    pub timeout: Duration,
    /// Return the whole `{data, errors, extensions}` envelope instead of `data`.
    pub full_response: bool,
}

impl ClientSettings {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials,
            timeout: DEFAULT_TIMEOUT,
            full_response: false,
        }
    }
}

/// One GraphQL document plus the tenant scope it runs in.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQlRequest {
    pub query: String,
    pub variables: Map<String, Value>,
    pub company_id: Option<String>,
    pub project_id: Option<String>,
    /// Overrides the client timeout for this request only.
    pub timeout: Option<Duration>,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
            company_id: None,
            project_id: None,
            timeout: None,
        }
    }

    /// Scope the request to a company. Empty ids leave the request unscoped.
    pub fn company(mut self, company_id: &str) -> Self {
        self.company_id = Some(company_id.trim())
            .filter(|id| !id.is_empty())
            .map(String::from);
        self
    }

    pub fn project(mut self, project_id: &str) -> Self {
        self.project_id = Some(project_id.trim())
            .filter(|id| !id.is_empty())
            .map(String::from);
        self
    }

    pub fn variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn body(&self) -> Value {
        serde_json::json!({
            "query": self.query.trim(),
            "variables": self.variables,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlErrorEntry {
    pub message: String,
}

/// The raw `{data, errors}` response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphQlErrorEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl Envelope {
    pub fn data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// Fail when the API reported any error, even if `data` is also present.
    pub fn check(&self) -> Result<()> {
        match &self.errors {
            Some(errors) if !errors.is_empty() => {
                let joined = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(BlueError::GraphQl(joined))
            }
            _ => Ok(()),
        }
    }
}

/// Sends one GraphQL request and returns the decoded envelope.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &GraphQlRequest) -> Result<Envelope>;
}

pub struct HttpTransport {
    endpoint: String,
    credentials: Credentials,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            endpoint: settings.endpoint.clone(),
            credentials: settings.credentials.clone(),
            client,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &GraphQlRequest) -> Result<Envelope> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header(TOKEN_ID_HEADER, &self.credentials.token_id)
            .header(TOKEN_SECRET_HEADER, &self.credentials.token_secret)
            .header("Content-Type", "application/json")
            .json(&request.body());
        if let Some(company_id) = &request.company_id {
            builder = builder.header(COMPANY_HEADER, company_id);
        }
        if let Some(project_id) = &request.project_id {
            builder = builder.header(PROJECT_HEADER, project_id);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BlueError::Status {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }
        Ok(resp.json::<Envelope>().await?)
    }
}

pub struct BlueClient {
    transport: Box<dyn Transport>,
    full_response: bool,
}

impl BlueClient {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let transport = HttpTransport::new(settings)?;
        Ok(Self::with_transport(Box::new(transport)).full_response(settings.full_response))
    }

    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            full_response: false,
        }
    }

    pub fn full_response(mut self, full_response: bool) -> Self {
        self.full_response = full_response;
        self
    }

    /// Send a request and return `data`, or the whole envelope when
    /// `full_response` is set (per call, falling back to the client default).
    pub async fn execute(&self, request: GraphQlRequest, full_response: Option<bool>) -> Result<Value> {
        let envelope = self.send_checked(&request).await?;
        if full_response.unwrap_or(self.full_response) {
            return Ok(serde_json::to_value(envelope)?);
        }
        Ok(envelope.data.unwrap_or(Value::Null))
    }

    /// Send a request and decode `data` into `T`.
    pub async fn query<T: DeserializeOwned>(&self, request: GraphQlRequest) -> Result<T> {
        let envelope = self.send_checked(&request).await?;
        Ok(serde_json::from_value(envelope.data.unwrap_or(Value::Null))?)
    }

    async fn send_checked(&self, request: &GraphQlRequest) -> Result<Envelope> {
        debug!(
            company = request.company_id.as_deref().unwrap_or(""),
            query = %first_line(&request.query),
            "sending GraphQL request"
        );
        let envelope = self.transport.send(request).await?;
        envelope.check()?;
        Ok(envelope)
    }

    /// Credential check: lists the companies the token can see.
    pub async fn test_connection(&self) -> Result<usize> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            company_list: Items,
        }
        #[derive(Deserialize)]
        struct Items {
            items: Vec<Value>,
        }

        let data: Data = self
            .query(GraphQlRequest::new(super::queries::companies()))
            .await?;
        Ok(data.company_list.items.len())
    }
}

fn first_line(query: &str) -> &str {
    query.trim().lines().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn errors_are_joined_even_with_data() {
        let envelope: Envelope = serde_json::from_value(json!({
            "data": { "editTodo": { "id": "rec1" } },
            "errors": [{ "message": "Not allowed" }, { "message": "Field invalid" }]
        }))
        .unwrap();
        let err = envelope.check().unwrap_err();
        assert_eq!(err.to_string(), "GraphQL Error: Not allowed, Field invalid");
    }

    #[test]
    fn empty_errors_array_is_success() {
        let envelope: Envelope =
            serde_json::from_value(json!({ "data": {}, "errors": [] })).unwrap();
        assert!(envelope.check().is_ok());
    }

    #[test]
    fn blank_company_scope_is_dropped() {
        let req = GraphQlRequest::new("{ x }").company("  ").project("p1");
        assert_eq!(req.company_id, None);
        assert_eq!(req.project_id.as_deref(), Some("p1"));
    }

    #[test]
    fn body_trims_query() {
        let req = GraphQlRequest::new("\n  query Q { x }\n");
        assert_eq!(req.body(), json!({ "query": "query Q { x }", "variables": {} }));
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let creds = Credentials {
            token_id: "id-1".into(),
            token_secret: "very-secret".into(),
        };
        let printed = format!("{creds:?}");
        assert!(printed.contains("id-1"));
        assert!(!printed.contains("very-secret"));
    }

    #[tokio::test]
    async fn execute_returns_data_or_envelope() {
        let transport = ScriptedTransport::new()
            .respond(json!({ "data": { "a": 1 } }))
            .respond(json!({ "data": { "a": 2 }, "extensions": { "cost": 3 } }));
        let client = BlueClient::with_transport(Box::new(transport));

        let data = client.execute(GraphQlRequest::new("{ a }"), None).await.unwrap();
        assert_eq!(data, json!({ "a": 1 }));

        let full = client.execute(GraphQlRequest::new("{ a }"), Some(true)).await.unwrap();
        assert_eq!(full, json!({ "data": { "a": 2 }, "extensions": { "cost": 3 } }));
    }

    #[tokio::test]
    async fn test_connection_counts_companies() {
        let transport = ScriptedTransport::new().respond(json!({
            "data": { "companyList": { "items": [{ "id": "c1" }, { "id": "c2" }] } }
        }));
        let client = BlueClient::with_transport(Box::new(transport));
        assert_eq!(client.test_connection().await.unwrap(), 2);
    }
}
