//! Askama templates for the upload form and the result page

use crate::output::formatter::HtmlFileRow;
use askama::Template;

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 720px; margin: 0 auto; padding: 20px; color: #333; background: #f8f9fa; }
.container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
label { display: block; margin-top: 15px; font-weight: bold; }
input[type=text] { width: 100%; padding: 8px; box-sizing: border-box; }
button, .button { margin-top: 20px; padding: 10px 18px; background: #007acc; color: white; border: none; border-radius: 6px; text-decoration: none; display: inline-block; }
.warning { background: #fff3cd; border-left: 4px solid #ffc107; padding: 10px; margin: 15px 0; }
.success { background: #d4edda; border-left: 4px solid #28a745; padding: 10px; margin: 15px 0; }
table { border-collapse: collapse; width: 100%; margin-top: 15px; }
th, td { text-align: left; padding: 8px; border-bottom: 1px solid #e9ecef; }
tr.warn td:last-child { color: #b58900; }
tr.error td:last-child { color: #dc3545; }
ul.warnings { margin: 4px 0 0; padding-left: 18px; color: #b58900; font-size: 0.9em; }
"#;

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>File Replace Tool</title>
    <style>{{ style|safe }}</style>
</head>
<body>
<div class="container">
    <h1>🔁 File Find &amp; Replace Tool</h1>
    <p>Upload PDF, CSV, XML, or XPT files to find and replace a word across formats.</p>
    {% if has_warning %}<div class="warning">{{ warning }}</div>{% endif %}
    <form action="/replace" method="post" enctype="multipart/form-data">
        <label for="files">📤 Upload files (PDF, CSV, XML, XPT)</label>
        <input id="files" type="file" name="files" accept="{{ accept }}" multiple>
        <label for="find">🔍 Word to Find</label>
        <input id="find" type="text" name="find" value="{{ find }}">
        <label for="replace">✏️ Replace With</label>
        <input id="replace" type="text" name="replace" value="{{ replace }}">
        <label><input type="checkbox" name="case_sensitive"{% if case_sensitive %} checked{% endif %}> Match case (Case-sensitive)</label>
        <button type="submit">🚀 Start Replacement</button>
    </form>
</div>
</body>
</html>"#, ext = "html")]
pub struct FormTemplate {
    pub style: &'static str,
    pub accept: String,
    pub has_warning: bool,
    pub warning: String,
    pub find: String,
    pub replace: String,
    pub case_sensitive: bool,
}

impl FormTemplate {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            style: STYLE,
            accept: crate::input::FileFormat::SUPPORTED_EXTENSIONS
                .iter()
                .map(|ext| format!(".{}", ext))
                .collect::<Vec<_>>()
                .join(","),
            has_warning: false,
            warning: String::new(),
            find: String::new(),
            replace: String::new(),
            case_sensitive,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.has_warning = true;
        self.warning = warning.into();
        self
    }
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Replacement Summary</title>
    <style>{{ style|safe }}</style>
</head>
<body>
<div class="container">
    <h1>🔁 File Find &amp; Replace Tool</h1>
    {% if has_download %}
    <a class="button" href="{{ download_url }}">📥 Download Modified Files</a>
    {% endif %}
    <h3>📊 Replacement Summary</h3>
    <table>
        <tr><th>File</th><th>Format</th><th>Result</th></tr>
        {% for row in rows %}
        <tr class="{{ row.row_class }}"><td><strong>{{ row.name }}</strong></td><td>{{ row.format }}</td><td>{{ row.outcome }}{% if !row.warnings.is_empty() %}<ul class="warnings">{% for warning in row.warnings %}<li>⚠ {{ warning }}</li>{% endfor %}</ul>{% endif %}</td></tr>
        {% endfor %}
    </table>
    <p><strong>Total replacements:</strong> {{ total }}</p>
    {% if has_download %}<div class="success">✅ All done! Download your files above.</div>{% endif %}
    <p><a href="/">← Process more files</a></p>
</div>
</body>
</html>"#, ext = "html")]
pub struct ResultTemplate {
    pub style: &'static str,
    pub has_download: bool,
    pub download_url: String,
    pub rows: Vec<HtmlFileRow>,
    pub total: usize,
}

impl ResultTemplate {
    pub fn new(rows: Vec<HtmlFileRow>, total: usize, download_url: Option<String>) -> Self {
        Self {
            style: STYLE,
            has_download: download_url.is_some(),
            download_url: download_url.unwrap_or_default(),
            rows,
            total,
        }
    }
}
