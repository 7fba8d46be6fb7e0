//! Blog entry model and its decoding from Notion pages

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::config::PropertyNames;
use crate::notion::types::{plain_text, FormulaValue, Page, PropertyValue};

/// Title used when a page has no title. Entries carrying it are hidden
/// from the listing.
pub const UNTITLED: &str = "Title not available";

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// Notion page id
    pub id: String,

    /// Post title
    pub title: String,

    /// Routing key
    pub slug: String,

    /// Short description, empty when unset
    pub description: String,

    /// Publication date
    pub published_date: DateTime<Utc>,

    /// Cover image URL
    pub cover_image: Option<String>,

    /// Markdown body; only set by single-entry lookups
    pub content: Option<String>,
}

impl Entry {
    /// Apply the default policy to a decoded record
    pub fn from_record(record: EntryRecord, now: DateTime<Utc>) -> Self {
        let slug = record.resolved_slug();
        Self {
            id: record.id,
            title: record.title.unwrap_or_else(|| UNTITLED.to_string()),
            slug,
            description: record.description.unwrap_or_default(),
            published_date: record.published_date.unwrap_or(now),
            cover_image: record.cover_image,
            content: None,
        }
    }

    /// Decode a page and apply defaults in one step
    pub fn from_page(page: &Page, names: &PropertyNames, now: DateTime<Utc>) -> Self {
        Self::from_record(EntryRecord::decode(page, names), now)
    }

    /// Whether the title resolved to something other than the placeholder
    pub fn has_title(&self) -> bool {
        self.title != UNTITLED
    }

    pub fn with_content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }
}

/// The fields of a page an entry is built from, before defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryRecord {
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub cover_image: Option<String>,
}

impl EntryRecord {
    /// Decode the entry fields of a page. Missing, null and mistyped
    /// properties all decode to `None`.
    pub fn decode(page: &Page, names: &PropertyNames) -> Self {
        Self {
            id: page.id.clone(),
            title: page.property(&names.title).and_then(text_value),
            slug: page.property(&names.slug).and_then(slug_value),
            description: page.property(&names.description).and_then(text_value),
            published_date: page.property(&names.published_date).and_then(date_value),
            cover_image: page.property(&names.cover_image).and_then(file_value),
        }
    }

    /// The routing key: the computed slug, or the page id when there is none.
    ///
    /// Both the listing and the lookup go through here.
    pub fn resolved_slug(&self) -> String {
        self.slug.clone().unwrap_or_else(|| self.id.clone())
    }
}

/// Resolve the slug of a raw page
pub fn resolve_slug(page: &Page, names: &PropertyNames) -> String {
    page.property(&names.slug)
        .and_then(slug_value)
        .unwrap_or_else(|| page.id.clone())
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn text_value(value: &PropertyValue) -> Option<String> {
    match value {
        PropertyValue::Title { title } => non_empty(plain_text(title)),
        PropertyValue::RichText { rich_text } => non_empty(plain_text(rich_text)),
        _ => None,
    }
}

fn slug_value(value: &PropertyValue) -> Option<String> {
    match value {
        PropertyValue::Formula {
            formula: Some(FormulaValue::String { string }),
        } => string.clone().and_then(non_empty),
        _ => None,
    }
}

fn date_value(value: &PropertyValue) -> Option<DateTime<Utc>> {
    let date = match value {
        PropertyValue::Date { date } => date.as_ref(),
        PropertyValue::Formula {
            formula: Some(FormulaValue::Date { date }),
        } => date.as_ref(),
        _ => None,
    }?;
    date.start.as_deref().and_then(parse_date)
}

fn file_value(value: &PropertyValue) -> Option<String> {
    match value {
        PropertyValue::Files { files } => files.first().and_then(|f| f.url()).map(String::from),
        _ => None,
    }
}

/// Parse a Notion date: RFC 3339 timestamp or a bare `YYYY-MM-DD`
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    tracing::debug!("Unparseable date: {}", s);
    None
}
