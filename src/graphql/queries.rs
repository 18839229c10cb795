//! Read-only documents shared by the read operations and the lookups.

use super::literal::Literal;

pub fn companies() -> String {
    r#"query GetCompanies {
  companyList {
    items {
      id
      name
      slug
      description
      createdAt
    }
  }
}"#
    .to_string()
}

/// Open projects of a company; `templates` selects project templates instead.
pub fn projects(company_id: &str, templates: bool) -> String {
    format!(
        r#"query FilteredProjectList {{
  projectList(
    filter: {{ companyIds: {company_ids}, archived: false, isTemplate: {templates} }}
    sort: [position_ASC, name_ASC]
    skip: 0
    take: 50
  ) {{
    items {{
      id
      name
      slug
      position
      archived
    }}
    totalCount
    pageInfo {{
      totalItems
      hasNextPage
    }}
  }}
}}"#,
        company_ids = Literal::strings([company_id]),
    )
}

pub fn todo_lists(project_id: &str) -> String {
    format!(
        r#"query GetProjectLists {{
  todoLists(projectId: {project}) {{
    id
    uid
    title
    position
    isDisabled
    isLocked
    createdAt
    updatedAt
  }}
}}"#,
        project = Literal::string(project_id),
    )
}

pub fn project_users(project_id: &str) -> String {
    format!(
        r#"query GetProjectUsers {{
  projectUserList(projectId: {project}) {{
    users {{
      id
      uid
      fullName
      email
    }}
  }}
}}"#,
        project = Literal::string(project_id),
    )
}

pub fn project_tags(project_id: &str) -> String {
    format!(
        r#"query ListOfTagsWithinProjects {{
  tagList(filter: {{ projectIds: {projects}, excludeArchivedProjects: false }}) {{
    items {{
      id
      uid
      title
      color
    }}
  }}
}}"#,
        projects = Literal::strings([project_id]),
    )
}

pub fn custom_fields(project_id: &str, sort: &'static str, skip: i64, take: i64) -> String {
    let filter = format!("projectId: {}", Literal::string(project_id));
    format!(
        r#"query ListCustomFieldsAdvanced {{
  customFields(
    filter: {{ {filter} }}
    sort: {sort}
    skip: {skip}
    take: {take}
  ) {{
    items {{
      id
      uid
      name
      type
      position
      description
      min
      max
      currency
      prefix
      isDueDate
      formula
      editable
      metadata
      customFieldOptions {{
        id
        title
        color
        position
      }}
    }}
    pageInfo {{
      totalItems
      hasNextPage
      hasPreviousPage
    }}
  }}
}}"#
    )
}

pub fn custom_field_options(custom_field_id: &str) -> String {
    format!(
        r#"query GetCustomFieldOptions {{
  customField(id: {id}) {{
    id
    name
    type
    customFieldOptions {{
      id
      title
      position
    }}
  }}
}}"#,
        id = Literal::string(custom_field_id),
    )
}

pub fn project_roles(project_id: &str) -> String {
    format!(
        r#"query GetCustomRoles {{
  projectUserRoles(filter: {{ projectId: {project} }}) {{
    id
    name
  }}
}}"#,
        project = Literal::string(project_id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_query_quotes_company_id() {
        let q = projects("c\"1", false);
        assert!(q.contains(r#"companyIds: ["c\"1"]"#));
        assert!(q.contains("isTemplate: false"));
    }

    #[test]
    fn template_query_selects_templates() {
        assert!(projects("c1", true).contains("isTemplate: true"));
    }

    #[test]
    fn custom_fields_query_scopes_by_project() {
        let first = custom_fields("p1", "name_ASC", 0, 50);
        assert!(first.contains(r#"filter: { projectId: "p1" }"#));
        assert!(first.contains("take: 50"));

        let paged = custom_fields("p\"1", "name_DESC", 10, 5);
        assert!(paged.contains(r#"filter: { projectId: "p\"1" }"#));
        assert!(paged.contains("sort: name_DESC"));
        assert!(paged.contains("skip: 10"));
    }
}
