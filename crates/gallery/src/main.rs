//! Command line gallery for the widget crates
//!
//! `gallery tree <path> [query]` prints a searched directory outline and
//! `gallery table <rows.json>` filters, sorts and paginates a JSON row file.
//! Set RUST_LOG=debug to watch the widgets' state changes.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use data_table::prelude::*;
use data_table::value::{parse_number, parse_timestamp};
use log::info;
use platform::SequentialIds;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tree_view::prelude::*;
use tree_view::tree::{load_directory, LoadOptions};

#[derive(Parser, Debug)]
#[command(author, version, about = "Exercise the tree and table widgets from a terminal.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a directory as a tree, optionally searched.
    Tree {
        /// Directory to load.
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Case-insensitive name search; without it every folder is opened.
        query: Option<String>,
    },
    /// Filter, sort and paginate a JSON array of row objects.
    Table(TableArgs),
}

#[derive(clap::Args, Debug, Clone, PartialEq)]
struct TableArgs {
    /// JSON file holding an array of objects.
    file: PathBuf,

    /// Global search over every filterable column.
    #[arg(long)]
    search: Option<String>,

    /// Column condition as COLUMN:OPERATOR[:VALUE]; ranges take LOW..HIGH.
    #[arg(long = "filter", value_name = "COLUMN:OPERATOR[:VALUE]", value_parser = parse_filter)]
    filters: Vec<FilterArg>,

    /// Sort key as COLUMN[:asc|desc]; repeat for tie-breakers.
    #[arg(long = "sort", value_name = "COLUMN[:DIRECTION]", value_parser = parse_sort)]
    sorts: Vec<SortArg>,

    /// Page to show, starting at 1.
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Rows per page.
    #[arg(long)]
    page_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
struct FilterArg {
    column: String,
    operator: Operator,
    value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct SortArg {
    column: String,
    direction: SortDirection,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(command: Command) -> Result<String> {
    match command {
        Command::Tree { path, query } => render_tree(&path, query.as_deref()),
        Command::Table(args) => {
            let text = fs::read_to_string(&args.file)
                .with_context(|| format!("Failed to read {}", args.file.display()))?;
            let rows: Vec<Value> = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a JSON array", args.file.display()))?;
            render_table(&args, rows)
        }
    }
}

/// Print a directory as a searchable tree
///
/// Without a query every folder is opened.
fn render_tree(path: impl AsRef<Path>, query: Option<&str>) -> Result<String> {
    let path = path.as_ref();
    let snapshot = load_directory(path, LoadOptions::default())
        .with_context(|| format!("Failed to load {}", path.display()))?;
    info!("Loaded {} entries from {}", snapshot.node_count(), path.display());

    let mut view = TreeView::new(snapshot);
    match query {
        Some(query) => view.set_query(query),
        None => {
            let containers = view.snapshot().containers();
            for id in containers {
                view.toggle(id);
            }
        }
    }
    Ok(view.to_string())
}

fn parse_filter(text: &str) -> Result<FilterArg> {
    let mut parts = text.splitn(3, ':');
    let column = parts.next().unwrap_or_default();
    let operator = parts
        .next()
        .ok_or_else(|| anyhow!("'{}' needs COLUMN:OPERATOR", text))?;
    Ok(FilterArg {
        column: column.to_string(),
        operator: operator.parse()?,
        value: parts.next().map(str::to_string),
    })
}

fn parse_sort(text: &str) -> Result<SortArg> {
    let (column, direction) = match text.split_once(':') {
        Some((column, direction)) => (column, direction.parse()?),
        None => (text, SortDirection::Asc),
    };
    Ok(SortArg {
        column: column.to_string(),
        direction,
    })
}

/// Column definitions from the keys of the first row
///
/// Each column's filter type comes from its first non-null value.
fn infer_columns(rows: &[Value]) -> Vec<ColumnDef> {
    let Some(first) = rows.first().and_then(Value::as_object) else {
        return Vec::new();
    };

    first
        .keys()
        .map(|key| {
            let sample = rows.iter().map(|row| &row[key.as_str()]).find(|v| !v.is_null());
            let filter_type = match sample {
                Some(Value::Number(_)) => FilterType::Number,
                Some(Value::Bool(_)) => FilterType::Boolean,
                Some(Value::String(s)) if s.contains('-') && !parse_timestamp(s).is_nan() => FilterType::Date,
                _ => FilterType::Text,
            };
            ColumnDef::new(key.clone()).filter_type(filter_type)
        })
        .collect()
}

fn filter_value(filter_type: FilterType, raw: &str) -> FilterValue {
    match filter_type {
        FilterType::Range | FilterType::DateRange => match raw.split_once("..") {
            Some((low, high)) if filter_type == FilterType::Range => FilterValue::pair(parse_number(low), parse_number(high)),
            Some((low, high)) => FilterValue::pair(low, high),
            None => FilterValue::scalar(raw),
        },
        FilterType::Number => FilterValue::number_input(raw),
        FilterType::Boolean => FilterValue::scalar(raw == "true"),
        _ => FilterValue::scalar(raw),
    }
}

fn render_table(args: &TableArgs, rows: Vec<Value>) -> Result<String> {
    let columns = infer_columns(&rows);
    let mut table = DataTable::new(columns, rows);

    let mut filters = AdvancedFilter::with_ids(SequentialIds::new("filter"));
    for filter in &args.filters {
        let id = filters
            .add(&mut table)
            .ok_or_else(|| anyhow!("The table has no filterable columns"))?;
        filters.update_column(&mut table, &id, &filter.column)?;
        filters.update_operator(&mut table, &id, filter.operator)?;

        let filter_type = filters.filter_type_of(&table, &id).unwrap_or_default();
        let value = filter.value.as_deref().map(|raw| filter_value(filter_type, raw));
        filters.update_value(&mut table, &id, value)?;
    }

    let mut sorts = AdvancedSort::with_ids(SequentialIds::new("sort"));
    for sort in &args.sorts {
        let id = sorts
            .add(&mut table)
            .ok_or_else(|| anyhow!("The table has no sortable columns"))?;
        sorts.update_column(&mut table, &id, &sort.column)?;
        sorts.update_direction(&mut table, &id, sort.direction)?;
    }

    if let Some(search) = &args.search {
        table.set_global_filter(search.as_str());
    }
    if let Some(size) = args.page_size {
        table.set_page_size(size);
    }
    table.set_page_index(args.page.saturating_sub(1));

    Ok(format!("{}{}\n", table, table.pagination_summary()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;

    fn table_args(args: &[&str]) -> TableArgs {
        let cli = Cli::try_parse_from(["gallery", "table"].into_iter().chain(args.iter().copied())).unwrap();
        match cli.command {
            Command::Table(args) => args,
            other => panic!("expected the table command, got {:?}", other),
        }
    }

    fn rows() -> Vec<Value> {
        vec![
            json!({"name": "ada", "age": 36, "joined": "2021-05-01"}),
            json!({"name": "bob", "age": 27, "joined": "2023-01-10"}),
            json!({"name": "cy", "age": 45, "joined": "2019-11-30"}),
        ]
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_table_flags() {
        let parsed = table_args(&[
            "rows.json",
            "--filter",
            "age:>=:30",
            "--filter",
            "name:isNotEmpty",
            "--sort",
            "age:desc",
            "--sort",
            "name",
            "--page-size",
            "5",
        ]);

        assert_eq!(parsed.file, PathBuf::from("rows.json"));
        assert_eq!(
            parsed.filters,
            vec![
                FilterArg {
                    column: "age".to_string(),
                    operator: Operator::GreaterOrEqual,
                    value: Some("30".to_string()),
                },
                FilterArg {
                    column: "name".to_string(),
                    operator: Operator::IsNotEmpty,
                    value: None,
                },
            ]
        );
        assert_eq!(
            parsed.sorts,
            vec![
                SortArg { column: "age".to_string(), direction: SortDirection::Desc },
                SortArg { column: "name".to_string(), direction: SortDirection::Asc },
            ]
        );
        assert_eq!(parsed.page, 1);
        assert_eq!(parsed.page_size, Some(5));
    }

    #[test]
    fn test_bad_flags_are_rejected() {
        let parse = |args: &[&str]| Cli::try_parse_from(["gallery", "table"].into_iter().chain(args.iter().copied()));

        assert!(parse(&["rows.json", "--bogus", "1"]).is_err());
        assert!(parse(&["rows.json", "--filter", "age:like:3"]).is_err());
        assert!(parse(&["rows.json", "--sort", "age:sideways"]).is_err());
        assert!(parse(&["rows.json", "--page", "two"]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_help_flag_prints_help() {
        let err = Cli::try_parse_from(["gallery", "table", "rows.json", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("--page-size"));
    }

    #[test]
    fn test_tree_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["gallery", "tree"]).unwrap();
        match cli.command {
            Command::Tree { path, query } => {
                assert_eq!(path, PathBuf::from("."));
                assert_eq!(query, None);
            }
            other => panic!("expected the tree command, got {:?}", other),
        }
    }

    #[test]
    fn test_infer_columns() {
        let types: Vec<(String, FilterType)> = infer_columns(&rows())
            .into_iter()
            .map(|c| (c.id, c.filter_type))
            .collect();
        assert_eq!(
            types,
            vec![
                ("age".to_string(), FilterType::Number),
                ("joined".to_string(), FilterType::Date),
                ("name".to_string(), FilterType::Text),
            ]
        );
    }

    #[test]
    fn test_render_filtered_sorted_table() {
        let parsed = table_args(&["rows.json", "--filter", "age:>=:30", "--sort", "age:desc"]);

        let output = render_table(&parsed, rows()).unwrap();
        assert_eq!(
            output,
            "age | joined     | name\n45  | 2019-11-30 | cy\n36  | 2021-05-01 | ada\n1 / 1 | Total: 2\n"
        );
    }

    #[test]
    fn test_render_tree_with_query() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("proj");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("README.md"), "# hi").unwrap();

        let output = render_tree(&root, Some("main")).unwrap();
        assert_eq!(output, "v proj\n  v src\n      main.rs\n");

        let output = render_tree(&root, None).unwrap();
        assert_eq!(output, "v proj\n  v src\n      main.rs\n    README.md\n");
    }
}
