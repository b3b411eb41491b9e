// ABOUTME: Markdown document pages for the static site
// ABOUTME: Converts markdown notes into standalone HTML pages with math rendering

use comrak::{markdown_to_html, ComrakOptions};
use quick_xml::escape::escape;

const KATEX_VERSION: &str = "0.16.9";

/// Title of a markdown document: the text of a leading `# ` line, or the
/// fallback (usually the file stem).
pub fn document_title(markdown: &str, fallback: &str) -> String {
    markdown
        .trim_start()
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn page_options() -> ComrakOptions {
    let mut options = ComrakOptions::default();
    options.render.unsafe_ = true; // Allow raw HTML
    options.render.hardbreaks = true;
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.footnotes = true;
    options.extension.header_ids = Some(String::new());
    options
}

/// Render markdown into a complete page with the given stylesheet inlined.
pub fn render_markdown_page(markdown: &str, title: &str, style_css: &str) -> String {
    let body = markdown_to_html(markdown, &page_options());
    let katex = format!("https://cdn.jsdelivr.net/npm/katex@{}/dist", KATEX_VERSION);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<link rel="stylesheet" href="{katex}/katex.min.css">
<style>
{style_css}
</style>
<style>
body {{ max-width: 900px; margin: 0 auto; padding: 2rem; }}
.back-link {{ display: inline-block; margin-bottom: 1rem; color: #0366d6; text-decoration: none; }}
.back-link:hover {{ text-decoration: underline; }}
</style>
</head>
<body class="markdown-body">
<a href="./index.html" class="back-link">&larr; Back to index</a>
{body}
<script defer src="{katex}/katex.min.js"></script>
<script defer src="{katex}/contrib/auto-render.min.js"
    onload="renderMathInElement(document.body, {{
        delimiters: [
            {{left: '$$', right: '$$', display: true}},
            {{left: '$', right: '$', display: false}},
            {{left: '\\[', right: '\\]', display: true}},
            {{left: '\\(', right: '\\)', display: false}}
        ],
        throwOnError: false
    }});"></script>
</body>
</html>
"#,
        title = escape(title),
        katex = katex,
        style_css = style_css,
        body = body,
    )
}
