use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::io::Read;

use blue_connector::lookups::{LookupKind, Lookups, Scope};
use blue_connector::operations::CATALOG;
use blue_connector::{run_batch, BlueClient};

use crate::config::AppConfig;

fn client(config: &AppConfig) -> Result<BlueClient> {
    let settings = config.client_settings()?;
    BlueClient::new(&settings).context("Failed to build HTTP client")
}

/// Run a batch of items from a file or stdin and print one JSON result per line.
pub async fn handle_run(config: &AppConfig, args: &[String]) -> Result<()> {
    let (path, continue_on_fail) = parse_run_args(args)?;

    let input = match &path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read items from {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read items from stdin")?;
            buf
        }
    };
    let items = parse_items(&input)?;
    if items.is_empty() {
        bail!("No items to run");
    }

    let client = client(config)?;
    let results = run_batch(&client, items, continue_on_fail).await?;
    for result in results {
        println!("{}", serde_json::to_string(&result)?);
    }
    Ok(())
}

/// Parse `blue run` arguments into (optional file, continue-on-fail).
pub fn parse_run_args(args: &[String]) -> Result<(Option<String>, bool)> {
    let mut path = None;
    let mut continue_on_fail = false;

    for arg in args {
        match arg.as_str() {
            "-c" | "--continue-on-fail" => continue_on_fail = true,
            "-" => {}
            flag if flag.starts_with('-') => bail!("Unknown flag for run: {flag}"),
            file => {
                if path.is_some() {
                    bail!("Usage: blue run [FILE] [--continue-on-fail]");
                }
                path = Some(file.to_string());
            }
        }
    }

    Ok((path, continue_on_fail))
}

/// A JSON array of items, a single item object, or one item per line.
pub fn parse_items(input: &str) -> Result<Vec<Value>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return match value {
            Value::Array(items) => Ok(items),
            Value::Object(_) => Ok(vec![value]),
            _ => bail!("Items must be JSON objects"),
        };
    }

    trimmed
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str::<Value>(line)
                .with_context(|| format!("Invalid JSON on line {}", n + 1))
        })
        .collect()
}

#[derive(Debug, PartialEq)]
pub struct SearchArgs {
    pub kind: LookupKind,
    pub company: Option<String>,
    pub project: Option<String>,
    pub field: Option<String>,
    pub filter: Option<String>,
}

/// List lookup options as `name<TAB>value` lines.
pub async fn handle_search(config: &AppConfig, args: &[String]) -> Result<()> {
    let search = parse_search_args(args)?;
    let client = client(config)?;
    let scope = Scope {
        company_id: search.company,
        project_id: search.project,
        field: search.field,
    };

    let options = Lookups::new(&client)
        .search(search.kind, &scope, search.filter.as_deref())
        .await?;
    for option in options {
        match &option.description {
            Some(description) => println!("{}\t{}\t{description}", option.name, option.value),
            None => println!("{}\t{}", option.name, option.value),
        }
    }
    Ok(())
}

/// Parse `blue search` arguments.
///
/// Supported forms:
///   blue search companies
///   blue search projects --company c1 web
///   blue search options --company c1 --field "f1|SELECT_SINGLE"
pub fn parse_search_args(args: &[String]) -> Result<SearchArgs> {
    let Some(kind) = args.first() else {
        let kinds: Vec<&str> = LookupKind::ALL.iter().map(|k| k.as_str()).collect();
        bail!(
            "Usage: blue search <kind> [--company ID] [--project ID] [--field ID|TYPE] [FILTER]\n\nKinds: {}",
            kinds.join(", ")
        );
    };
    let kind: LookupKind = kind.parse()?;

    let mut search = SearchArgs {
        kind,
        company: None,
        project: None,
        field: None,
        filter: None,
    };
    let mut filter_parts: Vec<String> = Vec::new();
    let mut i = 1;

    while i < args.len() {
        let flag = args[i].as_str();
        let slot = match flag {
            "--company" => Some(&mut search.company),
            "--project" => Some(&mut search.project),
            "--field" => Some(&mut search.field),
            _ => None,
        };
        match slot {
            Some(slot) => {
                i += 1;
                match args.get(i) {
                    Some(value) => *slot = Some(value.clone()),
                    None => bail!("Missing value for {flag}"),
                }
            }
            None if flag.starts_with("--") => bail!("Unknown flag for search: {flag}"),
            None => filter_parts.push(args[i].clone()),
        }
        i += 1;
    }

    if !filter_parts.is_empty() {
        search.filter = Some(filter_parts.join(" "));
    }
    Ok(search)
}

pub async fn handle_check(config: &AppConfig) -> Result<()> {
    let client = client(config)?;
    let count = client
        .test_connection()
        .await
        .context("Credential check failed")?;
    println!("Connected. {count} companies visible.");
    Ok(())
}

pub fn print_operations() {
    let width = CATALOG.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, description) in CATALOG {
        println!("  {name:<width$}  {description}");
    }
}

pub fn print_help() {
    println!("blue: run operations against the Blue project management API\n");
    println!("USAGE:");
    println!("  blue run [FILE] [--continue-on-fail]   Run items from FILE (or stdin)");
    println!("  blue search <kind> [OPTIONS] [FILTER]   List selectable ids");
    println!("  blue check                              Test the configured credentials");
    println!("  blue operations                         List supported operations");
    println!();
    println!("SEARCH OPTIONS:");
    println!("  --company <id>     Company scope");
    println!("  --project <id>     Project scope");
    println!("  --field <id|TYPE>  Custom field, for `options`");
    println!();
    println!("CONFIG:");
    println!("  ~/.blue/config.toml, or BLUE_TOKEN_ID / BLUE_TOKEN_SECRET / BLUE_API_URL");
    println!();
    println!("EXAMPLES:");
    println!("  echo '{{\"operation\":\"getCompanies\"}}' | blue run");
    println!("  blue search lists --company c1 --project p1 backlog");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn run_defaults_to_stdin() {
        assert_eq!(parse_run_args(&args(&[])).unwrap(), (None, false));
        assert_eq!(parse_run_args(&args(&["-"])).unwrap(), (None, false));
    }

    #[test]
    fn run_with_file_and_flag() {
        let (path, cont) = parse_run_args(&args(&["--continue-on-fail", "items.json"])).unwrap();
        assert_eq!(path.as_deref(), Some("items.json"));
        assert!(cont);
    }

    #[test]
    fn run_rejects_two_files_and_unknown_flags() {
        assert!(parse_run_args(&args(&["a.json", "b.json"])).is_err());
        assert!(parse_run_args(&args(&["--fast"])).is_err());
    }

    #[test]
    fn items_from_array_object_or_lines() {
        let items = parse_items(r#"[{"operation":"getCompanies"},{"operation":"getProjects"}]"#)
            .unwrap();
        assert_eq!(items.len(), 2);

        let items = parse_items(r#"{"operation":"getCompanies"}"#).unwrap();
        assert_eq!(items, vec![json!({ "operation": "getCompanies" })]);

        let items = parse_items(
            "{\"operation\":\"getCompanies\"}\n\n{\"operation\":\"getProjects\",\"companyId\":\"c1\"}\n",
        )
        .unwrap();
        assert_eq!(items[1]["companyId"], "c1");
    }

    #[test]
    fn items_report_bad_line() {
        let err = parse_items("{\"operation\":\"getCompanies\"}\n{oops").unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON on line 2");
    }

    #[test]
    fn items_must_be_objects() {
        assert!(parse_items("42").is_err());
        assert!(parse_items("  ").unwrap().is_empty());
    }

    #[test]
    fn search_kind_scope_and_filter() {
        let search = parse_search_args(&args(&[
            "lists", "--company", "c1", "--project", "p1", "sprint", "backlog",
        ]))
        .unwrap();
        assert_eq!(
            search,
            SearchArgs {
                kind: LookupKind::TodoLists,
                company: Some("c1".into()),
                project: Some("p1".into()),
                field: None,
                filter: Some("sprint backlog".into()),
            }
        );
    }

    #[test]
    fn search_field_flag() {
        let search =
            parse_search_args(&args(&["options", "--company", "c1", "--field", "f1|SELECT_SINGLE"]))
                .unwrap();
        assert_eq!(search.field.as_deref(), Some("f1|SELECT_SINGLE"));
        assert_eq!(search.filter, None);
    }

    #[test]
    fn search_errors() {
        assert!(parse_search_args(&args(&[])).is_err());
        assert!(parse_search_args(&args(&["widgets"])).is_err());
        assert!(parse_search_args(&args(&["projects", "--company"])).is_err());
        assert!(parse_search_args(&args(&["projects", "--colour", "red"])).is_err());
    }
}
