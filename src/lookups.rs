//! Searchable option lists for identifier pickers.
//!
//! Every lookup answers with [`ListOption`]s. When the company or project a
//! lookup depends on is missing, the answer is a single placeholder option
//! with an empty value instead of an error.

use serde::Deserialize;
use std::str::FromStr;

use crate::error::{BlueError, Result};
use crate::graphql::queries;
use crate::graphql::{BlueClient, GraphQlRequest};
use crate::model::{
    Company, CustomFieldSpec, FieldRef, ListOption, Project, ProjectUser, Role, Tag, TodoList,
};

const SELECT_COMPANY: &str = "Please select a company first";
const SELECT_PROJECT: &str = "Please select a project first";
const SELECT_FIELD: &str = "Please select a custom field first";
const CUSTOM_FIELD_PAGE: i64 = 100;

#[derive(Deserialize)]
struct Items<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanyListData {
    company_list: Items<Company>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectListData {
    project_list: Items<Project>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoListsData {
    #[serde(default)]
    todo_lists: Vec<TodoList>,
}

#[derive(Deserialize)]
struct Users {
    #[serde(default)]
    users: Vec<ProjectUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectUsersData {
    project_user_list: Users,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagListData {
    tag_list: Items<Tag>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomFieldsData {
    custom_fields: Items<CustomFieldSpec>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomFieldData {
    custom_field: Option<CustomFieldSpec>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RolesData {
    #[serde(default)]
    project_user_roles: Vec<Role>,
}

/// What a lookup can search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Companies,
    Projects,
    Templates,
    TodoLists,
    Users,
    Tags,
    CustomFields,
    FieldOptions,
    Roles,
}

impl LookupKind {
    pub const ALL: [LookupKind; 9] = [
        LookupKind::Companies,
        LookupKind::Projects,
        LookupKind::Templates,
        LookupKind::TodoLists,
        LookupKind::Users,
        LookupKind::Tags,
        LookupKind::CustomFields,
        LookupKind::FieldOptions,
        LookupKind::Roles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Companies => "companies",
            LookupKind::Projects => "projects",
            LookupKind::Templates => "templates",
            LookupKind::TodoLists => "lists",
            LookupKind::Users => "users",
            LookupKind::Tags => "tags",
            LookupKind::CustomFields => "fields",
            LookupKind::FieldOptions => "options",
            LookupKind::Roles => "roles",
        }
    }
}

impl FromStr for LookupKind {
    type Err = BlueError;

    fn from_str(s: &str) -> Result<Self> {
        LookupKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BlueError::validation(format!("Unknown lookup: {s}")))
    }
}

/// The selections a lookup may depend on.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub company_id: Option<String>,
    pub project_id: Option<String>,
    /// A custom field, as `"id|TYPE"` or a bare id.
    pub field: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn filter_matches(filter: Option<&str>, fields: &[&str]) -> bool {
    let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) else {
        return true;
    };
    let needle = filter.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

pub struct Lookups<'a> {
    client: &'a BlueClient,
}

impl<'a> Lookups<'a> {
    pub fn new(client: &'a BlueClient) -> Self {
        Self { client }
    }

    pub async fn search(
        &self,
        kind: LookupKind,
        scope: &Scope,
        filter: Option<&str>,
    ) -> Result<Vec<ListOption>> {
        let company = present(&scope.company_id);
        let project = present(&scope.project_id);
        match kind {
            LookupKind::Companies => self.companies(filter).await,
            LookupKind::Projects => self.projects(company, filter).await,
            LookupKind::Templates => self.project_templates(company, filter).await,
            LookupKind::TodoLists => self.todo_lists(company, project, filter).await,
            LookupKind::Users => self.project_users(company, project, filter).await,
            LookupKind::Tags => self.project_tags(company, project, filter).await,
            LookupKind::CustomFields => self.custom_fields(company, project, filter).await,
            LookupKind::FieldOptions => {
                self.custom_field_options(company, present(&scope.field), filter)
                    .await
            }
            LookupKind::Roles => self.custom_roles(company, project, filter).await,
        }
    }

    pub async fn companies(&self, filter: Option<&str>) -> Result<Vec<ListOption>> {
        let data: CompanyListData = self
            .client
            .query(GraphQlRequest::new(queries::companies()))
            .await?;
        Ok(data
            .company_list
            .items
            .into_iter()
            .filter(|c| filter_matches(filter, &[&c.name, &c.slug]))
            .map(|c| ListOption::new(format!("{} ({})", c.name, c.slug), c.id))
            .collect())
    }

    pub async fn projects(
        &self,
        company_id: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Vec<ListOption>> {
        let Some(company_id) = company_id else {
            return Ok(vec![ListOption::placeholder(SELECT_COMPANY)]);
        };
        let projects = self.project_list(company_id, false).await?;
        Ok(projects
            .into_iter()
            .filter(|p| filter_matches(filter, &[&p.name, &p.slug]))
            .map(|p| ListOption::new(format!("{} ({})", p.name, p.slug), p.id))
            .collect())
    }

    pub async fn project_templates(
        &self,
        company_id: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Vec<ListOption>> {
        let Some(company_id) = company_id else {
            return Ok(vec![ListOption::placeholder(SELECT_COMPANY)]);
        };
        let templates = self.project_list(company_id, true).await?;
        Ok(templates
            .into_iter()
            .filter(|t| filter_matches(filter, &[&t.name]))
            .map(|t| ListOption::new(t.name, t.id))
            .collect())
    }

    async fn project_list(&self, company_id: &str, templates: bool) -> Result<Vec<Project>> {
        let request =
            GraphQlRequest::new(queries::projects(company_id, templates)).company(company_id);
        let data: ProjectListData = self.client.query(request).await?;
        Ok(data.project_list.items)
    }

    /// Enabled lists in board order.
    pub async fn todo_lists(
        &self,
        company_id: Option<&str>,
        project_id: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Vec<ListOption>> {
        let (company_id, project_id) = match require_scope(company_id, project_id) {
            Ok(ids) => ids,
            Err(placeholder) => return Ok(placeholder),
        };
        let request = GraphQlRequest::new(queries::todo_lists(project_id))
            .company(company_id)
            .project(project_id);
        let data: TodoListsData = self.client.query(request).await?;

        let mut lists: Vec<TodoList> = data
            .todo_lists
            .into_iter()
            .filter(|l| !l.is_disabled && filter_matches(filter, &[&l.title]))
            .collect();
        lists.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(lists
            .into_iter()
            .map(|l| ListOption::new(format!("{} ({})", l.title, l.uid), l.id))
            .collect())
    }

    pub async fn project_users(
        &self,
        company_id: Option<&str>,
        project_id: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Vec<ListOption>> {
        let (company_id, project_id) = match require_scope(company_id, project_id) {
            Ok(ids) => ids,
            Err(placeholder) => return Ok(placeholder),
        };
        let request = GraphQlRequest::new(queries::project_users(project_id)).company(company_id);
        let data: ProjectUsersData = self.client.query(request).await?;
        Ok(data
            .project_user_list
            .users
            .into_iter()
            .filter(|u| filter_matches(filter, &[&u.full_name, &u.email]))
            .map(|u| ListOption::new(format!("{} ({})", u.full_name, u.email), u.id))
            .collect())
    }

    pub async fn project_tags(
        &self,
        company_id: Option<&str>,
        project_id: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Vec<ListOption>> {
        let (company_id, project_id) = match require_scope(company_id, project_id) {
            Ok(ids) => ids,
            Err(placeholder) => return Ok(placeholder),
        };
        let request = GraphQlRequest::new(queries::project_tags(project_id)).company(company_id);
        let data: TagListData = self.client.query(request).await?;
        Ok(data
            .tag_list
            .items
            .into_iter()
            .filter(|t| filter_matches(filter, &[&t.title]))
            .map(|t| {
                let color = t
                    .color
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .unwrap_or("no color");
                ListOption::new(format!("{} ({color})", t.title), t.id)
            })
            .collect())
    }

    /// Writable custom fields, valued `"id|TYPE"` so the type travels with the selection.
    pub async fn custom_fields(
        &self,
        company_id: Option<&str>,
        project_id: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Vec<ListOption>> {
        let (company_id, project_id) = match require_scope(company_id, project_id) {
            Ok(ids) => ids,
            Err(placeholder) => return Ok(placeholder),
        };
        let query = queries::custom_fields(
            project_id,
            "name_ASC",
            0,
            CUSTOM_FIELD_PAGE,
        );
        let request = GraphQlRequest::new(query)
            .company(company_id)
            .project(project_id);
        let data: CustomFieldsData = self.client.query(request).await?;
        Ok(data
            .custom_fields
            .items
            .into_iter()
            .filter(|f| f.is_writable() && filter_matches(filter, &[&f.name]))
            .map(|f| {
                ListOption::new(
                    format!("{} ({})", f.name, f.field_type),
                    format!("{}|{}", f.id, f.field_type),
                )
                .with_description(f.hint())
            })
            .collect())
    }

    pub async fn custom_field_options(
        &self,
        company_id: Option<&str>,
        field: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Vec<ListOption>> {
        let Some(company_id) = company_id else {
            return Ok(vec![ListOption::placeholder(SELECT_COMPANY)]);
        };
        let Some(field_id) = field.map(FieldRef::id_part).filter(|id| !id.is_empty()) else {
            return Ok(vec![ListOption::placeholder(SELECT_FIELD)]);
        };
        let request =
            GraphQlRequest::new(queries::custom_field_options(field_id)).company(company_id);
        let data: CustomFieldData = self.client.query(request).await?;
        let Some(spec) = data.custom_field else {
            return Ok(Vec::new());
        };
        Ok(spec
            .sorted_options()
            .into_iter()
            .filter(|o| filter_matches(filter, &[&o.title]))
            .map(|o| ListOption::new(o.title.clone(), o.id.clone()))
            .collect())
    }

    pub async fn custom_roles(
        &self,
        company_id: Option<&str>,
        project_id: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Vec<ListOption>> {
        let (company_id, project_id) = match require_scope(company_id, project_id) {
            Ok(ids) => ids,
            Err(placeholder) => return Ok(placeholder),
        };
        let request = GraphQlRequest::new(queries::project_roles(project_id))
            .company(company_id)
            .project(project_id);
        let data: RolesData = self.client.query(request).await?;
        Ok(data
            .project_user_roles
            .into_iter()
            .filter(|r| filter_matches(filter, &[&r.name]))
            .map(|r| ListOption::new(r.name, r.id))
            .collect())
    }
}

/// Both ids, or the placeholder naming the first one missing.
fn require_scope<'s>(
    company_id: Option<&'s str>,
    project_id: Option<&'s str>,
) -> std::result::Result<(&'s str, &'s str), Vec<ListOption>> {
    match (company_id, project_id) {
        (None, _) => Err(vec![ListOption::placeholder(SELECT_COMPANY)]),
        (_, None) => Err(vec![ListOption::placeholder(SELECT_PROJECT)]),
        (Some(c), Some(p)) => Ok((c, p)),
    }
}
