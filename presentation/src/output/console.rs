//! Console output for settings and saved explanations

use crate::render::escape_html;
use colored::Colorize;
use explainer_domain::ApiSettings;
use std::path::Path;

/// Formats non-overlay output for the console
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the stored settings, masking the key
    pub fn settings(settings: &ApiSettings, path: &Path) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Readable Explainer Settings"));
        output.push('\n');

        let key = match settings.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Self::mask_key(key),
            _ => "(not set)".yellow().to_string(),
        };
        let url = match settings.api_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => "(not set)".yellow().to_string(),
        };

        output.push_str(&format!("{} {}\n", "API key:".cyan().bold(), key));
        output.push_str(&format!("{} {}\n", "API URL:".cyan().bold(), url));
        output.push_str(&format!(
            "{} {}\n",
            "Settings file:".dimmed(),
            path.display()
        ));

        output
    }

    /// Keep the first and last four characters of a key.
    pub fn mask_key(key: &str) -> String {
        let chars: Vec<char> = key.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
    }

    /// Wrap overlay HTML in a standalone document.
    pub fn html_document(title: &str, body_html: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{}</title>
<style>
body {{ max-width: 500px; margin: 2em auto; line-height: 1.6; color: #333; font-family: sans-serif; }}
.re-quote {{ background: #f5f5f5; padding: 10px; border-radius: 4px; margin: 10px 0; }}
.re-label {{ font-weight: bold; margin-top: 1em; }}
.re-h1 {{ display: block; font-size: 1.2em; }}
.re-h2 {{ display: block; }}
.re-num {{ font-weight: bold; }}
.re-error {{ color: red; }}
</style>
</head>
<body>
{}
</body>
</html>
"#,
            escape_html(title),
            body_html
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }
}
