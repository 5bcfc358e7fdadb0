//! Server-rendered listing page.
//!
//! The page skeleton lives in `index.tmpl` in the working directory and is
//! parsed once at startup. Rendering expands a small placeholder language:
//!
//! - `{{#items}} .. {{/items}}` repeats its body once per listed object;
//!   inside it `{{key}}`, `{{url}}`, `{{size}}` and `{{last_modified}}`
//!   expand HTML-escaped.
//! - `{{#more}} .. {{/more}}` is emitted only when a further page exists.
//! - `{{next_cursor}}` expands anywhere to the URL-encoded cursor of the
//!   next page, or to the empty string on the final page.
//!
//! Sections cannot nest. An unterminated section fails the load, which in
//! turn fails startup.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

use crate::models::object::{StoredObject, url_encode};

/// Template file resolved relative to the working directory.
pub const TEMPLATE_FILE: &str = "index.tmpl";

#[derive(Clone, Debug)]
enum Segment {
    Literal(String),
    Items(String),
    More(String),
}

/// Parsed `index.tmpl`, cached for the process lifetime.
#[derive(Clone, Debug)]
pub struct IndexTemplate {
    segments: Vec<Segment>,
}

impl IndexTemplate {
    /// Read and parse the template file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("reading template `{}`", path.display()))?;
        Self::from_source(&source)
            .with_context(|| format!("parsing template `{}`", path.display()))
    }

    /// Parse template source into literal and section segments.
    pub fn from_source(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = source;

        loop {
            let next_items = rest.find("{{#items}}");
            let next_more = rest.find("{{#more}}");
            let (pos, name, open, close) = match (next_items, next_more) {
                (None, None) => break,
                (Some(i), None) => (i, "items", "{{#items}}", "{{/items}}"),
                (None, Some(m)) => (m, "more", "{{#more}}", "{{/more}}"),
                (Some(i), Some(m)) if i < m => (i, "items", "{{#items}}", "{{/items}}"),
                (Some(_), Some(m)) => (m, "more", "{{#more}}", "{{/more}}"),
            };

            if pos > 0 {
                segments.push(Segment::Literal(rest[..pos].to_string()));
            }
            let after_open = &rest[pos + open.len()..];
            let Some(end) = after_open.find(close) else {
                bail!("section `{name}` is never closed");
            };
            let body = &after_open[..end];
            if body.contains("{{#") {
                bail!("section `{name}` contains a nested section");
            }
            segments.push(match name {
                "items" => Segment::Items(body.to_string()),
                _ => Segment::More(body.to_string()),
            });
            rest = &after_open[end + close.len()..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Expand the template for one listing page. Rendering never fails; bad
    /// placeholder names simply pass through as literal text.
    pub fn render(&self, items: &[StoredObject], next_cursor: Option<&str>) -> String {
        let cursor = url_encode(next_cursor.unwrap_or_default());
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    out.push_str(&text.replace("{{next_cursor}}", &cursor));
                }
                Segment::Items(body) => {
                    for item in items {
                        out.push_str(&render_item(body, item).replace("{{next_cursor}}", &cursor));
                    }
                }
                Segment::More(body) => {
                    if next_cursor.is_some() {
                        out.push_str(&body.replace("{{next_cursor}}", &cursor));
                    }
                }
            }
        }
        out
    }
}

fn render_item(body: &str, item: &StoredObject) -> String {
    body.replace("{{key}}", &html_escape(&item.key))
        .replace("{{url}}", &html_escape(&item.url))
        .replace("{{size}}", &item.size.to_string())
        .replace("{{last_modified}}", &html_escape(&item.last_modified))
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
