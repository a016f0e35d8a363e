//! Template document assembler
//!
//! Combines template HTML, CSS and JS with card data into one inline HTML
//! document. References to the template's own hosted `styles.css` and
//! `script.js` are stripped since both are inlined. Nothing here performs
//! I/O and template text is never validated.

use crate::bootstrap::fallback_block;
use crate::dom::{Document, DocumentSurface};
use crate::error::RenderResult;
use crate::synth::{SynthOutcome, synthesize};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use shared::models::{RenderedCardData, TemplateSource};
use std::sync::LazyLock;

static STYLESHEET_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<link[^>]*styles\.css[^>]*>").expect("valid regex"));
static SCRIPT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<script[^>]*script\.js[^>]*>\s*</script>").expect("valid regex")
});
static DOCTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!doctype[^>]*>").expect("valid regex"));
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?html(\s[^>]*)?>").expect("valid regex"));
static HEAD_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<head(\s[^>]*)?>(.*?)</head>").expect("valid regex"));
static BODY_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body(\s[^>]*)?>").expect("valid regex"));
static BODY_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").expect("valid regex"));

/// Remove `<link>` / `<script>` tags pointing at the template's hosted
/// assets. Idempotent.
pub fn strip_asset_references(html: &str) -> String {
    let without_links = STYLESHEET_LINK.replace_all(html, "");
    SCRIPT_TAG.replace_all(&without_links, "").into_owned()
}

/// Serialize for inline `<script>` use; `<` is escaped so no `</script>`
/// sequence can appear
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> RenderResult<String> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}

/// Template markup split into head additions, body attributes and body
struct TemplateParts {
    head: String,
    body_attrs: String,
    body: String,
}

/// Full-document templates contribute their head contents and body
/// attributes; fragments go into the body as-is
fn split_template(html: &str) -> TemplateParts {
    let mut head = String::new();
    let without_head = HEAD_BLOCK.replace_all(html, |caps: &regex::Captures<'_>| {
        head.push_str(caps.get(2).map_or("", |m| m.as_str()).trim());
        String::new()
    });
    let body_attrs = BODY_OPEN
        .captures(&without_head)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let body = DOCTYPE.replace_all(&without_head, "");
    let body = HTML_TAG.replace_all(&body, "");
    let body = BODY_OPEN.replace_all(&body, "");
    let body = BODY_CLOSE.replace_all(&body, "");

    TemplateParts {
        head,
        body_attrs,
        body: body.trim().to_string(),
    }
}

/// Builder for one preview document
pub struct DocumentAssembler<'a> {
    template: &'a TemplateSource,
    meta: Option<&'a Map<String, Value>>,
    fallback: bool,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(template: &'a TemplateSource) -> Self {
        Self {
            template,
            meta: None,
            fallback: false,
        }
    }

    /// Assign `window.vcardMeta`; omitted when not set
    pub fn meta(mut self, meta: Option<&'a Map<String, Value>>) -> Self {
        self.meta = meta;
        self
    }

    /// Embed pre-rendered fallback sections and the bootstrap script
    pub fn fallback(mut self, enabled: bool) -> Self {
        self.fallback = enabled;
        self
    }

    pub fn assemble(&self, data: &RenderedCardData) -> RenderResult<String> {
        let parts = split_template(&strip_asset_references(&self.template.html));

        let style_block = non_blank(self.template.css.as_deref())
            .map(|css| format!("<style>{css}</style>"))
            .unwrap_or_default();
        let script_block = non_blank(self.template.js.as_deref())
            .map(|js| format!("<script>{js}</script>"))
            .unwrap_or_default();
        let data_script = format!("<script>window.vcardData = {};</script>", script_json(data)?);
        let meta_script = match self.meta {
            Some(meta) => format!("<script>window.vcardMeta = {};</script>", script_json(meta)?),
            None => String::new(),
        };
        let fallback = if self.fallback {
            fallback_block(&prerender_sections(data))
        } else {
            String::new()
        };

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    {head}{style_block}
  </head>
  <body{body_attrs}>
    {body}
    {data_script}
    {meta_script}
    {script_block}
    {fallback}
  </body>
</html>"#,
            head = parts.head,
            body_attrs = parts.body_attrs,
            body = parts.body,
        ))
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Run the synthesizer on an empty staging document and return the
/// sections it produced
fn prerender_sections(data: &RenderedCardData) -> String {
    let mut staging = Document::new();
    match synthesize(&mut staging, data) {
        SynthOutcome::Rendered { sections } => {
            tracing::debug!(sections, "Pre-rendered fallback sections");
            staging.inner_html(staging.body())
        }
        _ => String::new(),
    }
}

/// Assemble without metadata or fallback sections
pub fn assemble(template: &TemplateSource, data: &RenderedCardData) -> RenderResult<String> {
    DocumentAssembler::new(template).assemble(data)
}
