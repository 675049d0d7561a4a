//! Live preview documents for the web languages.

const CSS_PREVIEW_BODY: &str = r#"<div class="preview-container">
    <h1>CSS Preview</h1>
    <p>Add HTML elements to see your styles in action.</p>
    <div class="sample-elements">
      <button>Button</button>
      <input type="text" placeholder="Input field" />
      <div class="box">Box Element</div>
    </div>
  </div>"#;

const SCRIPT_PREVIEW_STYLE: &str = "body { font-family: sans-serif; padding: 20px; background: #1a1a1a; color: white; }\n    .console { background: #2a2a2a; padding: 15px; border-radius: 5px; white-space: pre-wrap; }";

/// Languages that have a live preview
pub fn has_preview(language: &str) -> bool {
    matches!(language, "html" | "css" | "javascript" | "typescript")
}

/// Build a standalone HTML page showing `code`, or None for languages
/// that cannot be previewed in a browser
pub fn render(code: &str, language: &str) -> Option<String> {
    match language {
        "html" => Some(code.to_string()),
        "css" => Some(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n  <style>{}</style>\n</head>\n<body>\n  {}\n</body>\n</html>",
            escape_closing_tag(code, "style"),
            CSS_PREVIEW_BODY
        )),
        "javascript" | "typescript" => Some(format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <style>
    {style}
  </style>
</head>
<body>
  <h2>JavaScript Output</h2>
  <div id="console" class="console">Ready to execute...</div>
  <script>
    const consoleElement = document.getElementById('console');
    const originalConsoleLog = console.log;
    console.log = function(...args) {{
      consoleElement.textContent += args.join(' ') + '\n';
      originalConsoleLog.apply(console, args);
    }};
    try {{
      {code}
    }} catch (error) {{
      console.log('Error: ' + error.message);
    }}
  </script>
</body>
</html>"#,
            style = SCRIPT_PREVIEW_STYLE,
            code = escape_closing_tag(code, "script"),
        )),
        _ => None,
    }
}

/// Keep user code from terminating the element it is embedded in
fn escape_closing_tag(code: &str, tag: &str) -> String {
    code.replace(&format!("</{}", tag), &format!("<\\/{}", tag))
}
