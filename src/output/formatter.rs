//! Output formatters for the replacement summary

use crate::config::OutputFormat;
use crate::error::{FileReplaceError, Result};
use crate::output::report::*;
use crate::processing::FileStatus;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting replacement summaries
pub trait OutputFormatter {
    fn format_summary(&self, summary: &ReplacementSummary) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for scripting
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter;

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

/// One table row, shared by the HTML report and the web result page
#[derive(Debug, Clone)]
pub struct HtmlFileRow {
    pub name: String,
    pub format: String,
    pub outcome: String,
    pub row_class: String,
    pub warnings: Vec<String>,
}

impl HtmlFileRow {
    pub fn from_summary(file: &FileSummary) -> Self {
        let (outcome, row_class) = match &file.status {
            FileStatus::Replaced { count } => (format!("{} replacements", count), "ok"),
            FileStatus::Unsupported => ("Unsupported file type".to_string(), "warn"),
            FileStatus::Failed { error } => (format!("Error: {}", error), "error"),
        };
        Self {
            name: file.name.clone(),
            format: file
                .format
                .map(|f| f.to_string())
                .unwrap_or_else(|| "-".to_string()),
            outcome,
            row_class: row_class.to_string(),
            warnings: file.warnings.clone(),
        }
    }
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Replacement Summary</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; color: #333; }
        table { border-collapse: collapse; width: 100%; }
        th, td { text-align: left; padding: 8px; border-bottom: 1px solid #e9ecef; }
        tr.ok td:last-child { color: #28a745; }
        tr.warn td:last-child { color: #b58900; }
        tr.error td:last-child { color: #dc3545; }
        ul.warnings { margin: 4px 0 0; padding-left: 18px; color: #b58900; font-size: 0.9em; }
        .meta { color: #6c757d; font-size: 0.9em; }
    </style>
    {% endif %}
</head>
<body>
    <h1>Replacement Summary</h1>
    <p class="meta">Generated: {{ generated_at }}</p>
    <p><strong>Find:</strong> <code>{{ find }}</code> &rarr; <strong>Replace:</strong> <code>{{ replace }}</code> ({{ case_mode }})</p>
    <table>
        <tr><th>File</th><th>Format</th><th>Result</th></tr>
        {% for row in rows %}
        <tr class="{{ row.row_class }}"><td>{{ row.name }}</td><td>{{ row.format }}</td><td>{{ row.outcome }}{% if !row.warnings.is_empty() %}<ul class="warnings">{% for warning in row.warnings %}<li>{{ warning }}</li>{% endfor %}</ul>{% endif %}</td></tr>
        {% endfor %}
    </table>
    <p><strong>Total replacements:</strong> {{ total }}</p>
    {% if has_archive %}<p class="meta">Archive: {{ archive }}</p>{% endif %}
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    generated_at: String,
    find: String,
    replace: String,
    case_mode: String,
    rows: Vec<HtmlFileRow>,
    total: usize,
    has_archive: bool,
    archive: String,
}

fn case_mode(summary: &ReplacementSummary) -> &'static str {
    if summary.case_sensitive {
        "case-sensitive"
    } else {
        "case-insensitive"
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".color(Color::Blue).bold(), title.color(Color::Blue).bold())
        } else {
            format!("\n{} {}\n", "█", title)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_summary(&self, summary: &ReplacementSummary) -> Result<String> {
        let mut output = String::new();

        let title = if summary.dry_run {
            "📊 REPLACEMENT SUMMARY (dry run)"
        } else {
            "📊 REPLACEMENT SUMMARY"
        };
        output.push_str(&self.format_header(title));
        output.push_str(&format!(
            "Find: \"{}\" → Replace: \"{}\" ({})\n\n",
            summary.find,
            summary.replace,
            case_mode(summary)
        ));

        for file in &summary.files {
            let line = match &file.status {
                FileStatus::Replaced { count } => format!(
                    "  {} {} — {} replacements",
                    self.colorize("✔", Color::Green),
                    file.name,
                    count
                ),
                FileStatus::Unsupported => format!(
                    "  {} {} — unsupported file type",
                    self.colorize("❌", Color::Yellow),
                    file.name
                ),
                FileStatus::Failed { error } => format!(
                    "  {} {} — {}",
                    self.colorize("✖", Color::Red),
                    file.name,
                    self.colorize(error, Color::Red)
                ),
            };
            output.push_str(&line);
            output.push('\n');
            for warning in &file.warnings {
                output.push_str(&format!("      {} {}\n", self.colorize("⚠", Color::Yellow), warning));
            }
        }

        output.push_str(&format!(
            "\nTotal replacements: {}\n",
            self.colorize(&summary.total_replacements.to_string(), Color::Cyan)
        ));
        if let Some(archive) = &summary.archive {
            output.push_str(&format!("📥 Archive: {}\n", archive));
        }
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_summary(&self, summary: &ReplacementSummary) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(summary)?)
        } else {
            Ok(serde_json::to_string(summary)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_summary(&self, summary: &ReplacementSummary) -> Result<String> {
        let mut output = String::new();

        output.push_str("### 📊 Replacement Summary\n\n");
        output.push_str(&format!(
            "**Generated:** {}\n\n",
            summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!(
            "**Find:** `{}` | **Replace:** `{}` | {}\n\n",
            summary.find,
            summary.replace,
            case_mode(summary)
        ));

        output.push_str("| File | Format | Result |\n|---|---|---|\n");
        for file in &summary.files {
            let format = file.format.map(|f| f.to_string()).unwrap_or_else(|| "-".to_string());
            let mut result = match &file.status {
                FileStatus::Replaced { count } => format!("{} replacements", count),
                FileStatus::Unsupported => "unsupported file type".to_string(),
                FileStatus::Failed { error } => format!("error: {}", error.replace('|', "\\|")),
            };
            for warning in &file.warnings {
                result.push_str(&format!("<br>⚠ {}", warning.replace('|', "\\|")));
            }
            output.push_str(&format!("| **{}** | {} | {} |\n", file.name, format, result));
        }

        output.push_str(&format!(
            "\n**Total replacements:** {}\n",
            summary.total_replacements
        ));
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_summary(&self, summary: &ReplacementSummary) -> Result<String> {
        let template = HtmlTemplate {
            include_styles: self.include_styles,
            generated_at: summary
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            find: summary.find.clone(),
            replace: summary.replace.clone(),
            case_mode: case_mode(summary).to_string(),
            rows: summary.files.iter().map(HtmlFileRow::from_summary).collect(),
            total: summary.total_replacements,
            has_archive: summary.archive.is_some(),
            archive: summary.archive.clone().unwrap_or_default(),
        };
        template
            .render()
            .map_err(|e| FileReplaceError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool, include_html_styles: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter,
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn generate_report(&self, summary: &ReplacementSummary, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_summary(summary),
            OutputFormat::Json => self.json_formatter.format_summary(summary),
            OutputFormat::Markdown => self.markdown_formatter.format_summary(summary),
            OutputFormat::Html => self.html_formatter.format_summary(summary),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}
