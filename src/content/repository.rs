//! Blog content repository backed by a Notion database

use chrono::Utc;
use std::sync::Arc;

use super::blocks::{to_markdown_string, MarkdownExporter};
use super::entry::{resolve_slug, Entry};
use crate::config::NotionSettings;
use crate::notion::types::{looks_like_id, PropertyFilter, Sort};
use crate::notion::{NotionApi, NotionError, Page, QueryRequest, Result};

/// Result of listing published entries
#[derive(Debug)]
pub enum ListOutcome {
    /// Titled entries, newest first
    Entries(Vec<Entry>),
    /// The database answered but nothing qualified
    Empty,
    /// The database could not be read
    Unavailable(NotionError),
}

impl ListOutcome {
    /// Degrade to a plain list: failures become an empty list
    pub fn into_entries(self) -> Vec<Entry> {
        match self {
            ListOutcome::Entries(entries) => entries,
            ListOutcome::Empty | ListOutcome::Unavailable(_) => Vec::new(),
        }
    }
}

/// Result of looking up one entry
#[derive(Debug)]
pub enum EntryOutcome {
    /// The entry, with its markdown body
    Found(Entry),
    /// No entry has this slug
    NotFound,
    /// The database or the page body could not be read
    Unavailable(NotionError),
}

impl EntryOutcome {
    pub fn into_entry(self) -> Option<Entry> {
        match self {
            EntryOutcome::Found(entry) => Some(entry),
            EntryOutcome::NotFound | EntryOutcome::Unavailable(_) => None,
        }
    }
}

/// Reads blog entries out of a Notion database
#[derive(Clone)]
pub struct ContentRepository {
    api: Arc<dyn NotionApi>,
    database_id: Option<String>,
    settings: NotionSettings,
}

impl ContentRepository {
    pub fn new(
        api: Arc<dyn NotionApi>,
        database_id: Option<String>,
        settings: NotionSettings,
    ) -> Self {
        Self {
            api,
            database_id,
            settings,
        }
    }

    pub fn settings(&self) -> &NotionSettings {
        &self.settings
    }

    /// Published entries, newest first. Entries without a title are left out.
    pub async fn list_published(&self) -> ListOutcome {
        let entries: Vec<Entry> = match self.published_entries().await {
            Ok(entries) => entries.into_iter().filter(Entry::has_title).collect(),
            Err(e) => return ListOutcome::Unavailable(e),
        };

        if entries.is_empty() {
            ListOutcome::Empty
        } else {
            ListOutcome::Entries(entries)
        }
    }

    /// Every published entry newest first, untitled ones included, from a
    /// single database read
    pub async fn published_entries(&self) -> Result<Vec<Entry>> {
        let pages = self.published_pages().await?;

        let now = Utc::now();
        let mut entries: Vec<Entry> = pages
            .iter()
            .map(|page| Entry::from_page(page, &self.settings.properties, now))
            .collect();

        // Pages without a date default to now, so the server-side sort
        // is not enough on its own.
        entries.sort_by(|a, b| b.published_date.cmp(&a.published_date));
        Ok(entries)
    }

    /// The entry routed at `slug`, with its body converted to markdown
    pub async fn get_by_slug(&self, slug: &str) -> EntryOutcome {
        let page = match self.find_page(slug).await {
            Ok(Some(page)) => page,
            Ok(None) => return EntryOutcome::NotFound,
            Err(e) => return EntryOutcome::Unavailable(e),
        };

        let exporter = MarkdownExporter::new(self.api.as_ref());
        let blocks = match exporter.page_to_markdown(&page.id).await {
            Ok(blocks) => blocks,
            Err(e) => return EntryOutcome::Unavailable(e),
        };

        let entry = Entry::from_page(&page, &self.settings.properties, Utc::now())
            .with_content(to_markdown_string(&blocks));
        EntryOutcome::Found(entry)
    }

    /// Resolved slugs of every published entry, newest first
    pub async fn list_slugs(&self) -> Result<Vec<String>> {
        let entries = self.published_entries().await?;
        Ok(entries.into_iter().map(|entry| entry.slug).collect())
    }

    fn database_id(&self) -> Result<&str> {
        self.database_id
            .as_deref()
            .ok_or(NotionError::MissingCredential("NOTION_BLOG_DATABASE_ID"))
    }

    async fn published_pages(&self) -> Result<Vec<Page>> {
        let names = &self.settings.properties;
        let request = QueryRequest::filtered(PropertyFilter::status_equals(
            &names.status,
            &self.settings.published_status,
        ))
        .sorted_by(Sort::descending(&names.published_date))
        .with_page_size(self.settings.page_size);

        self.query_all(request).await
    }

    async fn query_all(&self, mut request: QueryRequest) -> Result<Vec<Page>> {
        let database_id = self.database_id()?;
        let mut pages = Vec::new();

        loop {
            let batch = self.api.query_database(database_id, &request).await?;
            pages.extend(batch.results);

            match batch.next_cursor {
                Some(cursor) if batch.has_more => request.start_cursor = Some(cursor),
                _ => break,
            }
        }

        tracing::debug!("Fetched {} pages from database {}", pages.len(), database_id);
        Ok(pages)
    }

    async fn find_page(&self, slug: &str) -> Result<Option<Page>> {
        if slug.is_empty() {
            return Ok(None);
        }

        let database_id = self.database_id()?;
        let names = &self.settings.properties;
        let request =
            QueryRequest::filtered(PropertyFilter::formula_string_equals(&names.slug, slug))
                .with_page_size(1);

        let batch = self.api.query_database(database_id, &request).await?;
        if let Some(page) = batch.results.into_iter().next() {
            return Ok(Some(page));
        }

        // Entries without a computed slug are routed by page id
        if !looks_like_id(slug) {
            return Ok(None);
        }

        let page = match self.api.retrieve_page(slug).await {
            Ok(page) => page,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        if page.archived || !page.belongs_to(database_id) || resolve_slug(&page, names) != slug {
            tracing::debug!("Page {} is not a routable blog entry", slug);
            return Ok(None);
        }

        Ok(Some(page))
    }
}
