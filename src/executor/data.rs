use super::{Interpretation, Interpreter};
use regex::Regex;
use std::sync::LazyLock;

static CREATE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)CREATE TABLE\s+(\w+)").unwrap());
static INSERT_INTO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)INSERT INTO").unwrap());

const USERS_TABLE: &[&str] = &[
    "id | username     | email",
    "1  | alice_dev    | alice@codetribe.com",
    "2  | bob_coder    | bob@codetribe.com",
    "3  | charlie_admin| charlie@codetribe.com",
];

/// Statement-kind summaries, one line per kind found
pub struct Sql;

impl Interpreter for Sql {
    fn run(&self, source: &str) -> Interpretation {
        let upper = source.to_uppercase();
        let mut lines = Vec::new();

        if upper.contains("CREATE TABLE") {
            let table = CREATE_TABLE
                .captures(source)
                .map_or("table".to_string(), |caps| caps[1].to_string());
            lines.push(format!("Table '{}' created successfully", table));
        }

        if upper.contains("INSERT INTO") {
            let rows = INSERT_INTO.find_iter(source).count().max(1);
            lines.push(format!("{} row(s) inserted", rows));
        }

        if upper.contains("SELECT") {
            if upper.contains("FROM USERS") {
                lines.extend(USERS_TABLE.iter().map(|row| row.to_string()));
            } else {
                lines.push("Query executed successfully".to_string());
            }
        }

        if upper.contains("UPDATE") {
            lines.push("1 row(s) affected".to_string());
        }

        if upper.contains("DELETE") {
            lines.push("Row(s) deleted successfully".to_string());
        }

        Interpretation::from_lines(lines, "SQL query executed successfully")
    }
}

/// The one language that gets real validation
pub struct Json;

impl Interpreter for Json {
    fn run(&self, source: &str) -> Interpretation {
        match serde_json::from_str::<serde_json::Value>(source) {
            Ok(_) => Interpretation::ok("JSON is valid ✓"),
            Err(e) => {
                Interpretation::failed(format!("JSON Parse Error: {}", e), "Invalid JSON syntax")
            }
        }
    }
}

/// Same message whatever the source (HTML, CSS, Markdown)
pub struct Fixed(pub &'static str);

impl Interpreter for Fixed {
    fn run(&self, _source: &str) -> Interpretation {
        Interpretation::ok(self.0)
    }
}
