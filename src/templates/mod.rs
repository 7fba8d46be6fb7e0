//! Built-in blog templates using the Tera template engine
//!
//! Templates are embedded in the binary; the site needs no theme
//! directory at runtime.

mod highlight;
mod meta;
mod nodes;

use anyhow::Result;
use chrono::DateTime;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::{MenuItem, SiteConfig};
use crate::content::Entry;
use crate::helpers::{blog_url, format_date, html_escape, post_url};

pub use highlight::CodeHighlighter;
pub use meta::{PageMeta, NOT_FOUND_DESCRIPTION, NOT_FOUND_TITLE};
pub use nodes::render_nodes;

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Content arrives as pre-rendered HTML; templates escape text fields
        // explicitly
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("blog_index.html", include_str!("site/blog_index.html")),
            ("post.html", include_str!("site/post.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            // Partials
            (
                "partials/head.html",
                include_str!("site/partials/head.html"),
            ),
            ("partials/nav.html", include_str!("site/partials/nav.html")),
        ])?;

        tera.register_filter("html_escape", html_escape_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: escape text for HTML content and attributes
fn html_escape_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("html_escape", "value", String, value);
    Ok(tera::Value::String(html_escape(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Tera filter: format an RFC 3339 timestamp with a Moment.js-style format
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "D MMMM YYYY".to_string(),
    };

    match DateTime::parse_from_rfc3339(&s) {
        Ok(date) => Ok(tera::Value::String(format_date(&date, &format))),
        // Not a timestamp: show as-is
        Err(_) => Ok(tera::Value::String(s)),
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub url: String,
    pub root_url: String,
    pub blog_url: String,
    pub date_format: String,
    pub menu: Vec<MenuItem>,
}

impl SiteData {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root_url: "/".to_string(),
            blog_url: blog_url(config),
            date_format: config.date_format.clone(),
            menu: config.menu.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub slug: String,
    pub url: String,
    pub description: String,
    /// RFC 3339 publication timestamp
    pub date: String,
    pub cover_image: Option<String>,
}

impl PostData {
    pub fn new(config: &SiteConfig, entry: &Entry) -> Self {
        Self {
            title: entry.title.clone(),
            slug: entry.slug.clone(),
            url: post_url(config, &entry.slug),
            description: entry.description.clone(),
            date: entry.published_date.to_rfc3339(),
            cover_image: entry.cover_image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_html_escape_filter() {
        let value = html_escape_filter(&json!("<a href=\"/x\">"), &HashMap::new()).unwrap();
        assert_eq!(value, json!("&lt;a href=&quot;/x&quot;&gt;"));
    }

    #[test]
    fn test_truncate_chars_filter() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), json!(5));
        let value = truncate_chars_filter(&json!("Hello World"), &args).unwrap();
        assert_eq!(value, json!("Hello..."));

        let value = truncate_chars_filter(&json!("Hi"), &args).unwrap();
        assert_eq!(value, json!("Hi"));
    }

    #[test]
    fn test_date_format_filter() {
        let mut args = HashMap::new();
        args.insert("format".to_string(), json!("D MMMM YYYY"));
        let value = date_format_filter(&json!("2024-01-15T10:30:00+00:00"), &args).unwrap();
        assert_eq!(value, json!("15 January 2024"));

        let value = date_format_filter(&json!("someday"), &args).unwrap();
        assert_eq!(value, json!("someday"));
    }

    #[test]
    fn test_post_data_url() {
        let mut config = SiteConfig::default();
        config.blog_path = "/news/".to_string();
        let entry = Entry {
            id: "id".to_string(),
            title: "T".to_string(),
            slug: "my post".to_string(),
            description: String::new(),
            published_date: chrono::Utc::now(),
            cover_image: None,
            content: None,
        };
        assert_eq!(PostData::new(&config, &entry).url, "/news/my%20post/");
    }
}
