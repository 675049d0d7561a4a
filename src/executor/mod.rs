//! Simulated code execution.
//!
//! Nothing is compiled or interpreted for real. Each language has an
//! [`Interpreter`] that scans the source for print-like statements and
//! fabricates the console output they would plausibly produce.

mod compiled;
mod data;
mod script;

use crate::types::ExecutionResult;
use async_trait::async_trait;
use rand::Rng;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::time::Instant;

pub use compiled::{CFamily, Java, PrintCall};
pub use data::{Fixed, Json, Sql};
pub use script::{JavaScript, Php, Python, Ruby};

/// Anything that can turn source text into a run result.
///
/// Never fails: a broken program is an `ExecutionResult` with `success == false`.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, code: &str, language: &str) -> ExecutionResult;
}

/// What an interpreter made of a piece of source
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub output: String,
    pub error: Option<String>,
}

impl Interpretation {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: None,
        }
    }

    pub fn failed(output: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: Some(error.into()),
        }
    }

    /// Join collected output lines, or use `fallback` when nothing was printed
    pub fn from_lines(lines: Vec<String>, fallback: &str) -> Self {
        if lines.is_empty() {
            Self::ok(fallback)
        } else {
            Self::ok(lines.join("\n"))
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// One fake runtime. Must be a pure function of the source.
pub trait Interpreter: Send + Sync {
    fn run(&self, source: &str) -> Interpretation;
}

/// Configuration for the simulated executor
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Shortest pretend run time
    pub min_latency: Duration,
    /// Longest pretend run time
    pub max_latency: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            min_latency: Duration::from_millis(300),
            max_latency: Duration::from_millis(800),
        }
    }
}

impl ExecutorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let min_ms = std::env::var("EXEC_MIN_LATENCY_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.min_latency.as_millis() as u64);
        let max_ms = std::env::var("EXEC_MAX_LATENCY_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_latency.as_millis() as u64);

        let (min_ms, max_ms) = if min_ms <= max_ms {
            (min_ms, max_ms)
        } else {
            tracing::warn!(
                "EXEC_MIN_LATENCY_MS ({}) exceeds EXEC_MAX_LATENCY_MS ({}), swapping",
                min_ms,
                max_ms
            );
            (max_ms, min_ms)
        };

        tracing::info!(min_ms, max_ms, "Executor config loaded");

        Self {
            min_latency: Duration::from_millis(min_ms),
            max_latency: Duration::from_millis(max_ms),
        }
    }
}

/// Executor backed by the per-language fake interpreters
pub struct SimulatedExecutor {
    config: ExecutorConfig,
    interpreters: HashMap<&'static str, Box<dyn Interpreter>>,
}

impl SimulatedExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        let mut interpreters: HashMap<&'static str, Box<dyn Interpreter>> = HashMap::new();
        interpreters.insert("javascript", Box::new(JavaScript));
        interpreters.insert("typescript", Box::new(JavaScript));
        interpreters.insert("python", Box::new(Python));
        interpreters.insert("ruby", Box::new(Ruby));
        interpreters.insert("php", Box::new(Php));
        interpreters.insert("java", Box::new(Java));
        interpreters.insert("c", Box::new(CFamily::c()));
        interpreters.insert("cpp", Box::new(CFamily::cpp()));
        interpreters.insert("go", Box::new(PrintCall::go()));
        interpreters.insert("rust", Box::new(PrintCall::rust()));
        interpreters.insert("csharp", Box::new(PrintCall::csharp()));
        interpreters.insert("sql", Box::new(Sql));
        interpreters.insert("json", Box::new(Json));
        interpreters.insert(
            "html",
            Box::new(Fixed("HTML rendered successfully (see preview panel)")),
        );
        interpreters.insert(
            "css",
            Box::new(Fixed("CSS compiled successfully (see preview panel)")),
        );
        interpreters.insert("markdown", Box::new(Fixed("Markdown processed successfully")));

        Self {
            config,
            interpreters,
        }
    }

    /// Run the matching interpreter without any simulated latency
    pub fn interpret(&self, code: &str, language: &str) -> Interpretation {
        match self.interpreters.get(language) {
            Some(interpreter) => interpreter.run(code),
            None => Interpretation::ok(format!("Code execution simulated for {}", language)),
        }
    }

    fn latency(&self) -> Duration {
        let min = self.config.min_latency.as_millis() as u64;
        let max = self.config.max_latency.as_millis() as u64;
        if min >= max {
            return self.config.min_latency;
        }
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

#[async_trait]
impl Executor for SimulatedExecutor {
    async fn execute(&self, code: &str, language: &str) -> ExecutionResult {
        let start = Instant::now();
        tokio::time::sleep(self.latency()).await;
        let execution_time = start.elapsed().as_millis() as u64;

        let interpretation = self.interpret(code, language);
        tracing::debug!(
            language,
            success = interpretation.is_success(),
            execution_time,
            "Simulated execution finished"
        );

        ExecutionResult {
            success: interpretation.is_success(),
            output: interpretation.output,
            error: interpretation.error,
            execution_time,
        }
    }
}

static DOUBLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^"(.*)"$"#).unwrap());
static ANY_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(?:"(.*)"|'(.*)'|`(.*)`)$"#).unwrap());
static LEADING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"((?:[^"\\]|\\.)*)"\s*,"#).unwrap());
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}|%v|%d|%s|%\.2f").unwrap());

/// Contents of a `"..."` literal
fn double_quoted(text: &str) -> Option<&str> {
    DOUBLE_QUOTED
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Contents of a literal in double, single or back quotes
fn any_quoted(text: &str) -> Option<&str> {
    let caps = ANY_QUOTED.captures(text)?;
    (1..=3).find_map(|i| caps.get(i)).map(|m| m.as_str())
}

fn expand_escapes(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t")
}

/// Substitute format placeholders with believable values
fn fill_placeholders(template: &str) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| match &caps[0] {
            "%d" => "42",
            "%s" => "string",
            "%.2f" => "3.14",
            _ => "value",
        })
        .into_owned()
}

/// Render the argument list of a print call.
///
/// A lone literal prints as itself, a format string followed by arguments
/// prints with its placeholders filled, anything else prints verbatim.
fn render_args(args: &str) -> String {
    let args = args.trim();
    if let Some(literal) = double_quoted(args) {
        return expand_escapes(literal);
    }
    if let Some(caps) = LEADING_LITERAL.captures(args) {
        return expand_escapes(&fill_placeholders(&caps[1]));
    }
    args.to_string()
}

/// Apply `pattern` to every line and collect what `render` makes of capture 1
fn scan_lines(source: &str, pattern: &Regex, render: impl Fn(&str) -> String) -> Vec<String> {
    source
        .lines()
        .flat_map(|line| pattern.captures_iter(line.trim()))
        .filter_map(|caps| caps.get(1).map(|m| render(m.as_str())))
        .collect()
}

/// Argument text of every call on `line` whose name `opener` matches.
///
/// `opener` has to end at the opening parenthesis. Arguments run up to the
/// matching close, so comments and further statements after the call are
/// left alone. Calls nested in another call's arguments are not reported.
fn call_args<'a>(line: &'a str, opener: &Regex) -> Vec<&'a str> {
    let mut args = Vec::new();
    let mut resume = 0;
    for m in opener.find_iter(line) {
        if m.start() < resume {
            continue;
        }
        let rest = &line[m.end()..];
        if let Some(len) = closing_paren(rest) {
            args.push(&rest[..len]);
            resume = m.end() + len + 1;
        }
    }
    args
}

/// Collect what `render` makes of every call `opener` finds in `source`
fn scan_calls(source: &str, opener: &Regex, render: impl Fn(&str) -> String) -> Vec<String> {
    source
        .lines()
        .flat_map(|line| call_args(line, opener))
        .map(render)
        .collect()
}

/// Byte offset of the `)` closing an already opened call
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
