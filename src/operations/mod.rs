pub mod custom_query;
pub mod projects;
pub mod records;

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::Result;
use crate::graphql::{BlueClient, GraphQlRequest};
use crate::model::OperationResult;

pub use custom_query::CustomQuery;
pub use projects::{CreateProject, GetProjects, InviteUser, ListCustomFields};
pub use records::{CreateRecord, GetRecords, TagRecord, UpdateRecord};

/// Every operation the connector can run, with its parameters.
///
/// Items name the variant in their `operation` field, e.g.
/// `{"operation": "tagRecord", "recordId": "rec1", "tagIds": ["t1"]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum Operation {
    GetCompanies,
    GetProjects(GetProjects),
    GetRecords(GetRecords),
    CreateRecord(CreateRecord),
    UpdateRecord(UpdateRecord),
    TagRecord(TagRecord),
    CreateProject(CreateProject),
    InviteUser(InviteUser),
    ListCustomFields(ListCustomFields),
    CustomQuery(CustomQuery),
}

/// `(name, description)` for every operation, in the order they are listed to users.
pub const CATALOG: &[(&str, &str)] = &[
    ("createProject", "Create a new project from a template"),
    ("createRecord", "Create a new record (todo/task) with custom fields"),
    ("customQuery", "Execute a custom GraphQL query"),
    ("getCompanies", "List all companies you have access to"),
    ("getProjects", "Retrieve the open projects of a company"),
    ("getRecords", "Retrieve records (todos/tasks) with filtering"),
    ("inviteUser", "Invite a user to a project with a role"),
    ("listCustomFields", "List custom fields in a project"),
    ("tagRecord", "Add tags to a record"),
    ("updateRecord", "Update a record and its custom fields"),
];

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::GetCompanies => "getCompanies",
            Operation::GetProjects(_) => "getProjects",
            Operation::GetRecords(_) => "getRecords",
            Operation::CreateRecord(_) => "createRecord",
            Operation::UpdateRecord(_) => "updateRecord",
            Operation::TagRecord(_) => "tagRecord",
            Operation::CreateProject(_) => "createProject",
            Operation::InviteUser(_) => "inviteUser",
            Operation::ListCustomFields(_) => "listCustomFields",
            Operation::CustomQuery(_) => "customQuery",
        }
    }
}

/// Per-item request options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalOptions {
    /// Request timeout in milliseconds.
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub full_response: Option<bool>,
}

impl AdditionalOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.filter(|ms| *ms > 0).map(Duration::from_millis)
    }
}

/// One input item: an operation plus its options.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(flatten)]
    pub operation: Operation,
    #[serde(default)]
    pub additional_options: AdditionalOptions,
}

/// What a handler gets to work with.
pub struct Context<'a> {
    pub client: &'a BlueClient,
    pub options: &'a AdditionalOptions,
}

impl Context<'_> {
    pub(crate) fn request(&self, query: impl Into<String>) -> GraphQlRequest {
        GraphQlRequest::new(query).timeout(self.options.timeout())
    }

    pub(crate) async fn execute(&self, request: GraphQlRequest) -> Result<Value> {
        self.client.execute(request, self.options.full_response).await
    }
}

/// Run one operation to completion. Requests are sent strictly one after another.
pub async fn dispatch(
    client: &BlueClient,
    operation: &Operation,
    options: &AdditionalOptions,
) -> OperationResult {
    let ctx = Context { client, options };
    let res = match operation {
        Operation::GetCompanies => projects::get_companies(&ctx).await,
        Operation::GetProjects(params) => params.execute(&ctx).await,
        Operation::GetRecords(params) => params.execute(&ctx).await,
        Operation::CreateRecord(params) => params.execute(&ctx).await,
        Operation::UpdateRecord(params) => params.execute(&ctx).await,
        Operation::TagRecord(params) => params.execute(&ctx).await,
        Operation::CreateProject(params) => params.execute(&ctx).await,
        Operation::InviteUser(params) => params.execute(&ctx).await,
        Operation::ListCustomFields(params) => params.execute(&ctx).await,
        Operation::CustomQuery(params) => params.execute(&ctx).await,
    };

    match &res {
        Ok(_) => info!(operation = operation.name(), "operation succeeded"),
        Err(e) => warn!(operation = operation.name(), error = %e, "operation failed"),
    }
    OperationResult::from(res)
}

/// Keep only non-blank optional text.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
