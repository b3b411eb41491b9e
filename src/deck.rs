// ABOUTME: Slide deck generation for the slide-site application
// ABOUTME: Splits markdown into sectioned slides and renders a deck with a grouped header

use crate::errors::{Result, SiteError};
use crate::resources::ResourceFile;
use crate::slides::{
    HeaderSync, HtmlCounter, HtmlHeader, Navigator, RenderContext, SlideElement, BINDING_SCRIPT,
};
use comrak::{markdown_to_html, ComrakOptions};
use log::{info, warn};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// One slide of a markdown deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSlide {
    pub section: Option<String>,
    pub markdown: String,
}

impl SlideElement for DeckSlide {
    fn section_label(&self) -> Option<&str> {
        self.section.as_deref()
    }
}

/// A parsed markdown deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub title: String,
    pub author: String,
    pub date: String,
    pub slides: Vec<DeckSlide>,
}

/// A fixed position in a deck, for rendering outside a browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckPosition {
    pub current: usize,
    pub total: usize,
}

impl Navigator for DeckPosition {
    fn current_index(&self) -> usize {
        self.current
    }

    fn total_slides(&self) -> usize {
        self.total
    }

    fn go_to(&mut self, index: usize) {
        if index < self.total {
            self.current = index;
        }
    }
}

/// Parse `% Title`, `% Author`, `% Date` lines at the top of a deck.
fn parse_frontmatter(content: &str) -> (String, String, String, &str) {
    let mut fields = Vec::new();
    let mut rest = content;

    while fields.len() < 3 {
        let (line, tail) = match rest.split_once('\n') {
            Some((line, tail)) => (line, tail),
            None => (rest, ""),
        };
        match line.strip_prefix("% ") {
            Some(value) => {
                fields.push(value.trim().to_string());
                rest = tail;
            }
            None => break,
        }
    }

    let mut fields = fields.into_iter();
    let title = fields.next().unwrap_or_else(|| "Presentation".to_string());
    let author = fields.next().unwrap_or_default();
    let date = fields.next().unwrap_or_default();
    (title, author, date, rest)
}

const SECTION_ATTR: &str = "data-section=\"";

fn comment_body(line: &str) -> Option<&str> {
    Some(
        line.trim()
            .strip_prefix("<!--")?
            .strip_suffix("-->")?
            .trim(),
    )
}

/// Attributes of a `<!-- .slide: ... -->` comment line.
fn slide_comment(line: &str) -> Option<&str> {
    comment_body(line)?.strip_prefix(".slide:").map(str::trim)
}

/// Read a section label from a marker comment, if the line is one.
///
/// Accepts `<!-- .slide: data-section="Label" -->` and `<!-- section: Label -->`.
fn section_marker(line: &str) -> Option<String> {
    if let Some(attrs) = slide_comment(line) {
        let start = attrs.find(SECTION_ATTR)? + SECTION_ATTR.len();
        let len = attrs[start..].find('"')?;
        return Some(attrs[start..start + len].trim().to_string());
    }

    comment_body(line)?
        .strip_prefix("section:")
        .map(|label| label.trim().to_string())
}

/// Attributes from a slide's `.slide:` comment other than `data-section`,
/// to be copied onto its `<section>` element.
fn extra_slide_attributes(markdown: &str) -> Option<String> {
    let attrs = markdown.lines().find_map(slide_comment)?;
    let rest = match attrs.find(SECTION_ATTR) {
        Some(start) => {
            let value_start = start + SECTION_ATTR.len();
            let end = attrs[value_start..]
                .find('"')
                .map_or(attrs.len(), |len| value_start + len + 1);
            format!("{} {}", attrs[..start].trim_end(), attrs[end..].trim_start())
        }
        None => attrs.to_string(),
    };
    let rest = rest.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

/// Split deck markdown into slides on lines holding only `---`.
pub fn parse_deck(content: &str) -> Deck {
    let (title, author, date, body) = parse_frontmatter(content);

    let mut slides = Vec::new();
    let mut current = DeckSlide {
        section: None,
        markdown: String::new(),
    };

    for line in body.lines() {
        if line.trim() == "---" {
            slides.push(std::mem::replace(
                &mut current,
                DeckSlide {
                    section: None,
                    markdown: String::new(),
                },
            ));
            continue;
        }

        if let Some(label) = section_marker(line) {
            current.section = Some(label);
            // `.slide:` comments may carry other attributes; keep them with the slide
            if slide_comment(line).is_none() {
                continue;
            }
        }

        current.markdown.push_str(line);
        current.markdown.push('\n');
    }
    slides.push(current);

    // Separators at the very start or end should not produce blank slides.
    slides.retain(|s| !s.markdown.trim().is_empty() || s.section.is_some());

    Deck {
        title,
        author,
        date,
        slides,
    }
}

fn markdown_options() -> ComrakOptions {
    let mut options = ComrakOptions::default();
    options.render.unsafe_ = true; // Allow raw HTML
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options
}

fn push_resources(html_doc: &mut String, resources: &[ResourceFile], embed: bool) {
    for resource in resources {
        match resource.tag(embed, embed) {
            Ok(tag) => {
                html_doc.push_str(&tag);
                html_doc.push('\n');
            }
            Err(e) => {
                // Fall back to a link rather than failing the whole deck
                warn!("Failed to embed resource {}: {}", resource.path, e);
                html_doc.push_str(&resource.link_tag());
                html_doc.push('\n');
            }
        }
    }
}

/// Render a parsed deck to a standalone HTML page.
///
/// The header and counter are pre-rendered with the first slide active.
pub fn render_deck(
    deck: &Deck,
    css_files: &[ResourceFile],
    js_files: &[ResourceFile],
    embed_resources: bool,
) -> String {
    let mut sync = HeaderSync::new(RenderContext::new(
        Some(HtmlHeader::new()),
        Some(HtmlCounter::new()),
    ));
    let position = DeckPosition {
        current: 0,
        total: deck.slides.len(),
    };
    sync.on_ready(&deck.slides, &position);

    let mut html_doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html_doc.push_str("<meta charset=\"UTF-8\">\n");
    html_doc.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html_doc.push_str(&format!("<title>{}</title>\n", escape(deck.title.as_str())));
    if !deck.author.is_empty() {
        html_doc.push_str(&format!(
            "<meta name=\"author\" content=\"{}\">\n",
            escape(deck.author.as_str())
        ));
    }
    push_resources(&mut html_doc, css_files, embed_resources);
    html_doc.push_str("</head>\n<body>\n");

    if let Some(header) = sync.context().header.as_ref() {
        html_doc.push_str(&header.to_html());
        html_doc.push('\n');
    }

    html_doc.push_str("<div class=\"reveal\">\n<div class=\"slides\">\n");
    let options = markdown_options();
    for (record, slide) in sync.index().iter().zip(&deck.slides) {
        let extra = extra_slide_attributes(&slide.markdown)
            .map(|attrs| format!(" {}", attrs))
            .unwrap_or_default();
        html_doc.push_str(&format!(
            "<section data-section=\"{}\"{}>\n",
            escape(record.section()),
            extra
        ));
        html_doc.push_str(markdown_to_html(&slide.markdown, &options).trim());
        html_doc.push_str("\n</section>\n");
    }
    html_doc.push_str("</div>\n</div>\n");

    if let Some(counter) = sync.context().counter.as_ref() {
        html_doc.push_str(&counter.to_html());
        html_doc.push('\n');
    }

    push_resources(&mut html_doc, js_files, embed_resources);
    html_doc.push_str("<script>\n");
    html_doc.push_str(BINDING_SCRIPT);
    html_doc.push_str("</script>\n");
    html_doc.push_str("</body>\n</html>\n");
    html_doc
}

/// Read a markdown deck from disk and render it.
pub fn generate_deck_html(
    markdown_path: &Path,
    css_files: &[ResourceFile],
    js_files: &[ResourceFile],
    embed_resources: bool,
) -> Result<String> {
    info!("Generating deck from markdown: {:?}", markdown_path);

    if !markdown_path.exists() {
        return Err(SiteError::PathNotFoundError(markdown_path.to_path_buf()));
    }

    let content = fs::read_to_string(markdown_path)?;
    let deck = parse_deck(&content);
    info!("Parsed {} slides", deck.slides.len());

    Ok(render_deck(&deck, css_files, js_files, embed_resources))
}

fn data_section(element: &BytesStart) -> Option<String> {
    for attr in element.html_attributes().flatten() {
        if attr.key.as_ref() == b"data-section" {
            // HTML allows bare ampersands that XML unescaping rejects
            return Some(match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            });
        }
    }
    None
}

fn is_raw_text(name: &[u8]) -> bool {
    name.eq_ignore_ascii_case(b"script") || name.eq_ignore_ascii_case(b"style")
}

/// Read the section labels of the top-level `<section>` slides of a deck.
///
/// Nested sections (vertical slides) belong to their parent's horizontal
/// position and are not listed.
pub fn scan_deck_html(html: &str) -> Result<Vec<Option<String>>> {
    let mut reader = Reader::from_str(html);
    reader.check_end_names(false);

    let mut labels = Vec::new();
    let mut depth = 0usize;
    // Inside <script> or <style>: everything up to the matching end tag is text
    let mut raw_text: Option<Vec<u8>> = None;

    loop {
        let event = reader.read_event()?;
        if let Some(name) = &raw_text {
            match event {
                Event::End(ref e) if e.name().as_ref().eq_ignore_ascii_case(name) => {
                    raw_text = None;
                }
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(ref e) if is_raw_text(e.name().as_ref()) => {
                raw_text = Some(e.name().as_ref().to_vec());
            }
            Event::Start(ref e) if e.name().as_ref() == b"section" => {
                if depth == 0 {
                    labels.push(data_section(e));
                }
                depth += 1;
            }
            Event::Empty(ref e) if e.name().as_ref() == b"section" => {
                if depth == 0 {
                    labels.push(data_section(e));
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"section" => {
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(labels)
}
