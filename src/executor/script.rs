use super::{any_quoted, call_args, expand_escapes, scan_calls, scan_lines};
use super::{Interpretation, Interpreter};
use regex::Regex;
use std::sync::LazyLock;

static CONSOLE_LOG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"console\.log\s*\(").unwrap());
static THROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"throw\s+new\s+\w*Error\s*\(\s*["'`](.*?)["'`]\s*\)"#).unwrap()
});
static PRINT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bprint\s*\(").unwrap());
static ARITHMETIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*([+\-*/])\s*(\d+)$").unwrap());
static PUTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"puts\s+(.+)").unwrap());
static INTERPOLATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\{[^}]*\}").unwrap());
static ECHO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"echo\s+(.+?);").unwrap());

/// Canned output for the fibonacci sample
const FIBONACCI: &str = "[0, 1, 1, 2, 3, 5, 8, 13, 21, 34]";

/// JavaScript and TypeScript
pub struct JavaScript;

impl Interpreter for JavaScript {
    fn run(&self, source: &str) -> Interpretation {
        let mut lines = Vec::new();
        for line in source.lines().map(str::trim) {
            if let Some(caps) = THROW.captures(line) {
                let message = caps[1].to_string();
                return Interpretation::failed(format!("Runtime Error: {}", message), message);
            }
            for args in call_args(line, &CONSOLE_LOG) {
                let args = args.trim();
                lines.push(any_quoted(args).unwrap_or(args).to_string());
            }
        }
        Interpretation::from_lines(lines, "Code executed successfully (no output)")
    }
}

pub struct Python;

impl Python {
    fn render(content: &str) -> String {
        let content = content.trim();
        if let Some(literal) = any_quoted(content) {
            return literal.to_string();
        }
        if content.contains("fibonacci") {
            return FIBONACCI.to_string();
        }
        if content.contains("fib_numbers") {
            return format!("Fibonacci sequence: {}", FIBONACCI);
        }
        if let Some(value) = evaluate(content) {
            return value;
        }
        if content.contains('(') && content.contains(')') {
            return "Function result".to_string();
        }
        content.to_string()
    }
}

impl Interpreter for Python {
    fn run(&self, source: &str) -> Interpretation {
        let lines = scan_calls(source, &PRINT, Self::render);
        Interpretation::from_lines(lines, "Python script executed successfully")
    }
}

/// Evaluate `a op b` for two integer literals
fn evaluate(expr: &str) -> Option<String> {
    let caps = ARITHMETIC.captures(expr)?;
    let a: i64 = caps[1].parse().ok()?;
    let b: i64 = caps[3].parse().ok()?;
    let value = match &caps[2] {
        "+" => a.checked_add(b)?.to_string(),
        "-" => a.checked_sub(b)?.to_string(),
        "*" => a.checked_mul(b)?.to_string(),
        _ if b == 0 => return None,
        _ => (a as f64 / b as f64).to_string(),
    };
    Some(value)
}

pub struct Ruby;

impl Interpreter for Ruby {
    fn run(&self, source: &str) -> Interpretation {
        let mut lines = scan_lines(source, &PUTS, |content| {
            let content = content.trim();
            let text = any_quoted(content).unwrap_or(content);
            INTERPOLATION
                .replace_all(text, "interpolated_value")
                .into_owned()
        });
        prepend_banner(&mut lines, source, "CodeTribe Ruby Demo");
        Interpretation::from_lines(lines, "Ruby script executed successfully")
    }
}

pub struct Php;

impl Interpreter for Php {
    fn run(&self, source: &str) -> Interpretation {
        let mut lines = scan_lines(source, &ECHO, |content| {
            let content = content.trim();
            match any_quoted(content) {
                Some(literal) => expand_escapes(literal),
                None => content.to_string(),
            }
        });
        prepend_banner(&mut lines, source, "CodeTribe PHP Demo");
        Interpretation::from_lines(lines, "PHP script executed successfully")
    }
}

/// Demo programs that mention their own title get it printed as a header
pub(super) fn prepend_banner(lines: &mut Vec<String>, source: &str, title: &str) {
    if !source.contains(title) {
        return;
    }
    let banner = format!("=== {} ===", title);
    if lines.first() != Some(&banner) {
        lines.insert(0, banner);
    }
}
