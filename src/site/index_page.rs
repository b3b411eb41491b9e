// ABOUTME: Directory page for the static site
// ABOUTME: Lists encrypted and public documents with links to their generated pages

use quick_xml::escape::escape;

/// One document listed on the directory page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    /// Output path relative to the site root, with `/` separators
    pub href: String,
    pub source: String,
    pub is_public: bool,
}

fn render_section(entries: &[&IndexEntry], heading: &str, is_public: bool) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let (link_class, status_class, status) = if is_public {
        ("is-public", "status-public", "Public")
    } else {
        ("", "status-lock", "Encrypted")
    };

    let mut html = format!(
        "<section class=\"file-section\">\n<h2>{}</h2>\n<ul class=\"file-list\">\n",
        heading
    );
    for entry in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\" class=\"{}\"><span class=\"file-name\">{}</span><span class=\"file-status {}\">{}</span></a></li>\n",
            escape(entry.href.as_str()),
            link_class,
            escape(entry.name.as_str()),
            status_class,
            status
        ));
    }
    html.push_str("</ul>\n</section>\n");
    html
}

/// Render the directory page: encrypted documents first, then public ones.
pub fn render_index(entries: &[IndexEntry], index_css: &str, built_at: &str) -> String {
    let encrypted: Vec<&IndexEntry> = entries.iter().filter(|e| !e.is_public).collect();
    let public: Vec<&IndexEntry> = entries.iter().filter(|e| e.is_public).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Document index</title>
<style>
{index_css}

* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", "Noto Sans", Helvetica, Arial, sans-serif;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    min-height: 100vh;
    padding: 2rem;
}}
.container {{ max-width: 800px; margin: 0 auto; }}
header {{ text-align: center; margin-bottom: 2rem; color: white; }}
.file-section {{ background: white; border-radius: 12px; padding: 1.5rem; margin-bottom: 1.5rem; }}
.file-list {{ list-style: none; }}
.file-list li {{ margin-bottom: 0.75rem; }}
.file-name {{ flex-grow: 1; }}
footer {{ text-align: center; color: rgba(255,255,255,0.8); margin-top: 2rem; font-size: 0.9rem; }}
</style>
</head>
<body>
<div class="container">
<header>
<h1>Documents</h1>
</header>
{encrypted}{public}<footer>
<p>Built {built_at}</p>
</footer>
</div>
</body>
</html>
"#,
        index_css = index_css,
        encrypted = render_section(&encrypted, "Encrypted documents", false),
        public = render_section(&public, "Public documents", true),
        built_at = escape(built_at),
    )
}
