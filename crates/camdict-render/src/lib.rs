//! Renders a lookup record as a standalone styled HTML card.
//!
//! Plain string templating, nothing more. The definition strings come out
//! of the parser with their metadata as leading `[tag]` groups; those are
//! split off here and rendered as pills.

use std::sync::LazyLock;

use camdict_core::LookupRecord;
use regex::Regex;

/// Stylesheet inlined into the document unless an external path is given.
pub const DEFAULT_CSS: &str = include_str!("default.css");

static LEADING_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^((?:\[[^\]]+\]\s*)+)(.*)$").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").unwrap());

/// Build the full HTML document for one record.
///
/// With `css_path` set, the document links the stylesheet instead of
/// inlining [`DEFAULT_CSS`]. Content is embedded as-is; the source markup
/// is already plain text.
pub fn render_html(record: &LookupRecord, css_path: Option<&str>) -> String {
    let css_tag = match css_path {
        Some(path) => format!(r#"<link rel="stylesheet" href="{path}">"#),
        None => format!("<style>{DEFAULT_CSS}</style>"),
    };

    let def_list = if record.definitions.is_empty() {
        r#"<li class="definition"><div class="definition-text">No definitions found.</div></li>"#
            .to_string()
    } else {
        record
            .definitions
            .iter()
            .enumerate()
            .map(|(i, definition)| format_definition(i + 1, definition))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut media_parts = Vec::new();
    if !record.thumb.is_empty() {
        media_parts.push(format!(r#"<img src="{}" alt="Thumbnail">"#, record.thumb));
    }
    if !record.image.is_empty() && record.image != record.thumb {
        media_parts.push(format!(r#"<img src="{}" alt="Image">"#, record.image));
    }
    let media_html = if media_parts.is_empty() {
        r#"<div class="meta">No images available.</div>"#.to_string()
    } else {
        media_parts.join("\n")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Cambridge: {word}</title>
  {css_tag}
</head>
<body>
  <div class="card">
    <div class="header">
      <div class="word">{word}</div>
      <div class="meta"><a href="{url}">{url}</a></div>
    </div>
    <div class="pron">
      <span>AmE: {ame}</span>
      <span>BrE: {bre}</span>
    </div>
    <div class="section">
      <div class="section-title">Definitions</div>
      <ul class="definitions">
        {def_list}
      </ul>
    </div>
    <div class="section">
      <div class="section-title">Images</div>
      <div class="media">
        {media_html}
      </div>
    </div>
    <div class="footer">Generated by camdict</div>
  </div>
</body>
</html>
"#,
        word = record.word,
        url = record.url,
        ame = record.pronunciation.ame,
        bre = record.pronunciation.bre,
    )
}

/// One `<li>` per definition: two-digit index, one pill per leading
/// bracketed tag, then the remaining body text.
fn format_definition(index: usize, definition: &str) -> String {
    let mut tags_html = String::new();
    let mut body = definition.trim().to_string();
    if let Some(caps) = LEADING_TAGS.captures(definition) {
        for tag in TAG.captures_iter(&caps[1]) {
            tags_html.push_str(&format!(r#"<span class="tag">{}</span>"#, &tag[1]));
        }
        body = caps[2].trim().to_string();
    }

    let header =
        format!(r#"<div class="definition-header"><span class="definition-index">{index:02}</span>{tags_html}</div>"#);
    let text = if body.is_empty() {
        "No definition text."
    } else {
        &body
    };

    format!(r#"<li class="definition">{header}<div class="definition-text">{text}</div></li>"#)
}
