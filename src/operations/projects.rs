use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::LazyLock;

use super::Context;
use crate::error::{BlueError, Result};
use crate::graphql::literal::{Arguments, Literal};
use crate::graphql::queries;
use crate::model::{extract_id, require_id, ResourceLocator};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

pub async fn get_companies(ctx: &Context<'_>) -> Result<Value> {
    ctx.execute(ctx.request(queries::companies())).await
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProjects {
    #[serde(default)]
    pub company_id: Option<ResourceLocator>,
}

impl GetProjects {
    pub async fn execute(&self, ctx: &Context<'_>) -> Result<Value> {
        let company_id = require_id(self.company_id.as_ref(), "Company ID")?;
        let request = ctx
            .request(queries::projects(company_id, false))
            .company(company_id);
        ctx.execute(request).await
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[serde(default)]
    pub company_id: Option<ResourceLocator>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub template_id: Option<ResourceLocator>,
}

impl CreateProject {
    pub fn document(&self, company_id: &str, template_id: &str) -> Result<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BlueError::validation("Project name is required"));
        }
        let mut input = Arguments::new();
        input
            .push("templateId", template_id)
            .push("name", name)
            .push("companyId", company_id);
        Ok(format!(
            r#"mutation CreateProject {{
  createProject(input: {input}) {{
    id
    name
    slug
    position
    archived
    company {{ id name }}
    createdAt
    updatedAt
  }}
}}"#,
            input = input.into_object(),
        ))
    }

    pub async fn execute(&self, ctx: &Context<'_>) -> Result<Value> {
        let company_id = require_id(self.company_id.as_ref(), "Company ID")?;
        let template_id = require_id(self.template_id.as_ref(), "Template ID")?;
        let request = ctx
            .request(self.document(company_id, template_id)?)
            .company(company_id);
        ctx.execute(request).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    Admin,
    Client,
    CommentOnly,
    CustomRole,
    Member,
    Owner,
    ViewOnly,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Admin => "ADMIN",
            AccessLevel::Client => "CLIENT",
            AccessLevel::CommentOnly => "COMMENT_ONLY",
            AccessLevel::CustomRole => "CUSTOM_ROLE",
            AccessLevel::Member => "MEMBER",
            AccessLevel::Owner => "OWNER",
            AccessLevel::ViewOnly => "VIEW_ONLY",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteUser {
    #[serde(default)]
    pub company_id: Option<ResourceLocator>,
    #[serde(default)]
    pub project_id: Option<ResourceLocator>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<AccessLevel>,
    #[serde(default)]
    pub custom_role_id: Option<ResourceLocator>,
}

impl InviteUser {
    /// Custom roles are invited as members carrying the role id.
    fn access(&self) -> Result<(AccessLevel, Option<&str>)> {
        let role = self
            .role
            .ok_or_else(|| BlueError::validation("Role is required"))?;
        if role != AccessLevel::CustomRole {
            return Ok((role, None));
        }
        let role_id = extract_id(self.custom_role_id.as_ref()).trim();
        if role_id.is_empty() {
            return Err(BlueError::validation(
                "Custom Role ID is required when CUSTOM_ROLE is selected",
            ));
        }
        Ok((AccessLevel::Member, Some(role_id)))
    }

    pub async fn execute(&self, ctx: &Context<'_>) -> Result<Value> {
        let company_id = require_id(self.company_id.as_ref(), "Company ID")?;
        let project_id = require_id(self.project_id.as_ref(), "Project ID")?;
        let email = self.email.trim();
        if email.is_empty() {
            return Err(BlueError::validation("Email is required"));
        }
        if !EMAIL.is_match(email) {
            return Err(BlueError::validation("Invalid email format"));
        }
        let (access_level, role_id) = self.access()?;

        let mut input = Arguments::new();
        input
            .push("email", email)
            .push("projectId", project_id)
            .push("companyId", company_id)
            .push("accessLevel", Literal::Enum(access_level.as_str()));
        if let Some(role_id) = role_id {
            input.push("roleId", role_id);
        }
        let mutation = format!(
            r#"mutation InviteUser {{
  inviteUser(input: {input})
}}"#,
            input = input.into_object(),
        );

        let request = ctx.request(mutation).company(company_id).project(project_id);
        let result = ctx.execute(request).await?;

        let mut data = json!({
            "email": email,
            "companyId": company_id,
            "projectId": project_id,
            "accessLevel": access_level.as_str(),
            "result": result,
            "message": format!("Successfully invited {email} to the project"),
        });
        if let Some(role_id) = role_id {
            data["roleId"] = json!(role_id);
        }
        Ok(data)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "createdAt_DESC")]
    CreatedAtDesc,
    #[serde(rename = "createdAt_ASC")]
    CreatedAtAsc,
    #[default]
    #[serde(rename = "name_ASC")]
    NameAsc,
    #[serde(rename = "name_DESC")]
    NameDesc,
    #[serde(rename = "position_DESC")]
    PositionDesc,
    #[serde(rename = "position_ASC")]
    PositionAsc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::CreatedAtDesc => "createdAt_DESC",
            SortOrder::CreatedAtAsc => "createdAt_ASC",
            SortOrder::NameAsc => "name_ASC",
            SortOrder::NameDesc => "name_DESC",
            SortOrder::PositionDesc => "position_DESC",
            SortOrder::PositionAsc => "position_ASC",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCustomFields {
    #[serde(default)]
    pub company_id: Option<ResourceLocator>,
    #[serde(default)]
    pub project_id: Option<ResourceLocator>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_take")]
    pub take: i64,
    #[serde(default)]
    pub sort_order: SortOrder,
}

fn default_take() -> i64 {
    50
}

impl ListCustomFields {
    fn check_page(&self) -> Result<()> {
        if self.skip < 0 {
            return Err(BlueError::validation("Skip must be >= 0"));
        }
        if !(1..=100).contains(&self.take) {
            return Err(BlueError::validation("Take must be between 1 and 100"));
        }
        Ok(())
    }

    pub async fn execute(&self, ctx: &Context<'_>) -> Result<Value> {
        let company_id = require_id(self.company_id.as_ref(), "Company ID")?;
        let project_id = require_id(self.project_id.as_ref(), "Project ID")?;
        self.check_page()?;

        let query = queries::custom_fields(
            project_id,
            self.sort_order.as_str(),
            self.skip,
            self.take,
        );
        let request = ctx.request(query).company(company_id).project(project_id);
        let result = ctx.execute(request).await?;
        Ok(json!({
            "projectId": project_id,
            "pagination": {
                "skip": self.skip,
                "take": self.take,
                "sortOrder": self.sort_order.as_str(),
            },
            "result": result,
        }))
    }
}
