use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::{non_blank, Context};
use crate::codec::{self, parse, Encoded};
use crate::error::{BlueError, Result};
use crate::graphql::literal::{Arguments, Literal};
use crate::model::{
    extract_id, lenient_string, require_id, CustomFieldAssignment, FieldRef, ResourceLocator,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRecords {
    #[serde(default)]
    pub company_id: Option<ResourceLocator>,
    #[serde(default)]
    pub project_id: Option<ResourceLocator>,
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub show_completed: bool,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub skip: u32,
}

fn default_limit() -> u32 {
    50
}

impl GetRecords {
    pub fn document(&self, company_id: &str) -> String {
        let mut filter = Arguments::new();
        filter.push("companyIds", Literal::strings([company_id]));
        let project_id = extract_id(self.project_id.as_ref()).trim();
        if !project_id.is_empty() {
            filter.push("projectIds", Literal::strings([project_id]));
        }
        filter
            .push("showCompleted", self.show_completed)
            .push("excludeArchivedProjects", true);
        if let Some(search) = non_blank(&self.search_term) {
            filter.push("search", search);
        }

        format!(
            r#"query ListRecordsAdvanced {{
  todoQueries {{
    todos(
      filter: {filter}
      sort: [duedAt_ASC, position_ASC]
      limit: {limit}
      skip: {skip}
    ) {{
      items {{
        id
        uid
        position
        title
        text
        html
        startedAt
        duedAt
        timezone
        color
        cover
        done
        archived
        createdAt
        updatedAt
        commentCount
        checklistCount
        checklistCompletedCount
        isRepeating
        todoList {{ id title }}
        users {{ id username email }}
        tags {{ id title color }}
        customFields {{ id name type value text number latitude longitude currency }}
        createdBy {{ id username }}
      }}
      pageInfo {{
        totalPages
        totalItems
        page
        perPage
        hasNextPage
        hasPreviousPage
      }}
    }}
  }}
}}"#,
            filter = filter.into_object(),
            limit = self.limit,
            skip = self.skip,
        )
    }

    pub async fn execute(&self, ctx: &Context<'_>) -> Result<Value> {
        let company_id = require_id(self.company_id.as_ref(), "Company ID")?;
        let request = ctx.request(self.document(company_id)).company(company_id);
        ctx.execute(request).await
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Placement {
    Top,
    #[default]
    Bottom,
}

impl Placement {
    fn as_literal(self) -> Literal {
        match self {
            Placement::Top => Literal::Enum("TOP"),
            Placement::Bottom => Literal::Enum("BOTTOM"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecordField {
    pub custom_field_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Checklist {
    pub title: String,
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecord {
    #[serde(default)]
    pub company_id: Option<ResourceLocator>,
    #[serde(default)]
    pub project_id: Option<ResourceLocator>,
    #[serde(default)]
    pub todo_list_id: Option<ResourceLocator>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub notify: bool,
    #[serde(default)]
    pub assignee_ids: Vec<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[serde(default)]
    pub custom_fields: Vec<NewRecordField>,
    #[serde(default)]
    pub checklists: Vec<Checklist>,
}

impl CreateRecord {
    pub fn document(&self, todo_list_id: &str) -> Result<String> {
        if self.title.trim().is_empty() {
            return Err(BlueError::validation("Title is required"));
        }

        let mut input = Arguments::new();
        input
            .push("todoListId", todo_list_id)
            .push("title", self.title.as_str())
            .push("placement", self.placement.as_literal());
        if let Some(description) = non_blank(&self.description) {
            input.push("description", description);
        }
        if let Some(start) = non_blank(&self.start_date) {
            input.push("startedAt", parse::normalize_date(start));
        }
        if let Some(due) = non_blank(&self.due_date) {
            input.push("duedAt", parse::normalize_date(due));
        }
        input.push("notify", self.notify);

        let assignees = non_empty_ids(&self.assignee_ids);
        if !assignees.is_empty() {
            input.push("assigneeIds", Literal::strings(assignees));
        }
        let tags = non_empty_ids(&self.tag_ids);
        if !tags.is_empty() {
            let tags = tags
                .into_iter()
                .map(|id| Literal::Object(vec![("id", Literal::string(id))]))
                .collect();
            input.push("tags", Literal::List(tags));
        }
        if !self.custom_fields.is_empty() {
            let fields = self
                .custom_fields
                .iter()
                .map(|f| {
                    Literal::Object(vec![
                        ("customFieldId", Literal::string(FieldRef::id_part(&f.custom_field_id))),
                        ("value", Literal::string(f.value.clone().unwrap_or_default())),
                    ])
                })
                .collect();
            input.push("customFields", Literal::List(fields));
        }
        if !self.checklists.is_empty() {
            let checklists = self
                .checklists
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    Literal::Object(vec![
                        ("title", Literal::string(c.title.as_str())),
                        ("position", Literal::Int(c.position.unwrap_or(i as i64 + 1))),
                    ])
                })
                .collect();
            input.push("checklists", Literal::List(checklists));
        }

        Ok(format!(
            r#"mutation CreateRecordAdvanced {{
  createTodo(input: {input}) {{
    id
    uid
    title
    position
    startedAt
    duedAt
    todoList {{ id title }}
    users {{ id fullName }}
    tags {{ id title color }}
  }}
}}"#,
            input = input.into_object(),
        ))
    }

    pub async fn execute(&self, ctx: &Context<'_>) -> Result<Value> {
        let todo_list_id = require_id(self.todo_list_id.as_ref(), "Todo list ID")?;
        let request = ctx
            .request(self.document(todo_list_id)?)
            .company(extract_id(self.company_id.as_ref()))
            .project(extract_id(self.project_id.as_ref()));
        ctx.execute(request).await
    }
}

fn non_empty_ids(ids: &[String]) -> Vec<&str> {
    ids.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .collect()
}

/// A custom field update: an `"id|TYPE"` reference and the raw value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInput {
    pub field_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecord {
    #[serde(default)]
    pub company_id: Option<ResourceLocator>,
    #[serde(default)]
    pub project_id: Option<ResourceLocator>,
    #[serde(default)]
    pub record_id: Option<ResourceLocator>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub todo_list_id: Option<ResourceLocator>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<FieldInput>,
}

impl UpdateRecord {
    /// The `editTodo` input fields, without the record id. Empty when no core field is set.
    pub fn core_fields(&self) -> Result<Arguments> {
        let mut input = Arguments::new();
        if let Some(title) = non_blank(&self.title) {
            input.push("title", title);
        }
        if let Some(description) = non_blank(&self.description) {
            input.push("html", description).push("text", description);
        }
        if let Some(start) = non_blank(&self.start_date) {
            input.push("startedAt", parse::normalize_date(start));
        }
        if let Some(due) = non_blank(&self.due_date) {
            input.push("duedAt", parse::normalize_date(due));
        }
        let todo_list_id = extract_id(self.todo_list_id.as_ref()).trim();
        if !todo_list_id.is_empty() {
            input.push("todoListId", todo_list_id);
        }
        if let Some(position) = non_blank(&self.position) {
            let position = parse::number(position).ok_or_else(|| {
                BlueError::validation(format!("Position \"{position}\" is not a number"))
            })?;
            input.push("position", position);
        }
        if let Some(color) = non_blank(&self.color) {
            input.push("color", color.trim());
        }
        Ok(input)
    }

    /// Parse every custom field reference up front so a bad one fails before anything is sent.
    pub fn assignments(&self) -> Result<Vec<CustomFieldAssignment>> {
        self.custom_fields
            .iter()
            .filter(|f| !f.field_id.trim().is_empty())
            .map(|f| {
                Ok(CustomFieldAssignment {
                    field: f.field_id.trim().parse()?,
                    raw_value: f.value.clone().unwrap_or_default(),
                })
            })
            .collect()
    }

    pub async fn execute(&self, ctx: &Context<'_>) -> Result<Value> {
        let record_id = require_id(self.record_id.as_ref(), "Record ID")?;
        let company_id = extract_id(self.company_id.as_ref());
        let project_id = extract_id(self.project_id.as_ref());
        let core = self.core_fields()?;
        let assignments = self.assignments()?;

        let mut updates: Vec<Value> = Vec::new();
        let mut applied = 0usize;

        if !core.is_empty() {
            let request = ctx
                .request(edit_todo_mutation(record_id, core))
                .company(company_id);
            let data = ctx.execute(request).await?;
            updates.push(json!({ "type": "core_update", "data": data }));
            applied += 1;
        }

        for assignment in assignments {
            let field = &assignment.field;
            let value = match codec::encode(field.field_type, &assignment.raw_value) {
                Encoded::Value(value) => value,
                Encoded::Skipped(reason) => {
                    warn!(field = %field, %reason, "custom field value skipped");
                    updates.push(json!({
                        "type": "custom_field_skipped",
                        "fieldId": field.id,
                        "fieldType": field.field_type,
                        "value": assignment.raw_value,
                        "reason": reason,
                    }));
                    continue;
                }
            };

            let mut input = Arguments::new();
            input
                .push("customFieldId", field.id.as_str())
                .push("todoId", record_id)
                .extend(value.input_fields());
            let request = ctx
                .request(set_custom_field_mutation(input))
                .company(company_id)
                .project(project_id);

            match ctx.execute(request).await {
                Ok(data) => {
                    updates.push(json!({
                        "type": "custom_field_update",
                        "fieldId": field.id,
                        "fieldType": field.field_type,
                        "value": assignment.raw_value,
                        "data": data,
                    }));
                    applied += 1;
                }
                Err(source) => {
                    return Err(BlueError::Step {
                        step: format!(
                            "Custom field {} ({}) with value \"{}\"",
                            field.id, field.field_type, assignment.raw_value
                        ),
                        source: Box::new(source),
                        applied: updates,
                    });
                }
            }
        }

        Ok(json!({
            "recordId": record_id,
            "updates": updates,
            "message": format!("Successfully updated record with {applied} operations"),
        }))
    }
}

pub fn edit_todo_mutation(record_id: &str, core: Arguments) -> String {
    let mut input = Arguments::new();
    input.push("todoId", record_id).extend(core.into_fields());
    format!(
        r#"mutation UpdateRecordDetails {{
  editTodo(input: {input}) {{
    id
    title
    position
    html
    text
    color
    duedAt
    updatedAt
  }}
}}"#,
        input = input.into_object(),
    )
}

pub fn set_custom_field_mutation(input: Arguments) -> String {
    format!(
        r#"mutation SetRecordCustomField {{
  setTodoCustomField(input: {input})
}}"#,
        input = input.into_object(),
    )
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRecord {
    #[serde(default)]
    pub company_id: Option<ResourceLocator>,
    #[serde(default)]
    pub record_id: Option<ResourceLocator>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
}

impl TagRecord {
    pub async fn execute(&self, ctx: &Context<'_>) -> Result<Value> {
        let record_id = require_id(self.record_id.as_ref(), "Record ID")?;
        let tag_ids = non_empty_ids(&self.tag_ids);
        if tag_ids.is_empty() {
            return Err(BlueError::validation("At least one tag must be selected"));
        }

        let mut input = Arguments::new();
        input
            .push("todoId", record_id)
            .push("tagIds", Literal::strings(tag_ids.iter().copied()));
        let mutation = format!(
            r#"mutation TagRecord {{
  setTodoTags(input: {input})
}}"#,
            input = input.into_object(),
        );

        let request = ctx
            .request(mutation)
            .company(extract_id(self.company_id.as_ref()));
        let result = ctx.execute(request).await?;
        Ok(json!({
            "recordId": record_id,
            "tagIds": tag_ids,
            "result": result,
            "message": format!("Successfully tagged record with {} tag(s)", tag_ids.len()),
        }))
    }
}
