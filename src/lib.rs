//! notion-blog: a small blog website backed by a Notion database
//!
//! Posts live as rows of a Notion database. This crate fetches them,
//! converts their block trees to markdown, maps the markdown to display
//! nodes and renders pages with embedded Tera templates, either on demand
//! from an HTTP server or as a static site.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod notion;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Credentials, SiteConfig};
use content::{ContentRepository, Entry, EntryOutcome, ListOutcome};
use notion::{NotionApi, NotionClient};

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    repository: ContentRepository,
}

impl Blog {
    /// Create a blog from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P, credentials: Credentials) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            SiteConfig::load(&config_path)?
        } else {
            SiteConfig::default()
        };

        if credentials.token.is_none() {
            tracing::warn!("NOTION_TOKEN is not set; posts will not be available");
        }
        if credentials.database_id.is_none() {
            tracing::warn!("NOTION_BLOG_DATABASE_ID is not set; posts will not be available");
        }

        let client = NotionClient::new(&config.notion, credentials.token)?;
        Ok(Self::with_api(
            config,
            base_dir,
            Arc::new(client),
            credentials.database_id,
        ))
    }

    /// Create a blog over any Notion backend
    pub fn with_api(
        config: SiteConfig,
        base_dir: PathBuf,
        api: Arc<dyn NotionApi>,
        database_id: Option<String>,
    ) -> Self {
        let public_dir = base_dir.join(&config.public_dir);
        let repository = ContentRepository::new(api, database_id, config.notion.clone());

        Self {
            config,
            base_dir,
            public_dir,
            repository,
        }
    }

    /// The underlying content repository
    pub fn repository(&self) -> &ContentRepository {
        &self.repository
    }

    /// Published entries, newest first. An unreachable database yields an
    /// empty list; the failure is logged.
    pub async fn list_published(&self) -> Vec<Entry> {
        match self.repository.list_published().await {
            ListOutcome::Entries(entries) => {
                tracing::debug!("Fetched {} published posts", entries.len());
                entries
            }
            ListOutcome::Empty => {
                tracing::debug!("No published posts");
                Vec::new()
            }
            ListOutcome::Unavailable(e) => {
                tracing::error!("Failed to fetch posts from Notion: {}", e);
                Vec::new()
            }
        }
    }

    /// The entry for `slug` with its markdown body. Unknown slugs and
    /// unreachable data both yield `None`; failures are logged.
    pub async fn get_by_slug(&self, slug: &str) -> Option<Entry> {
        match self.repository.get_by_slug(slug).await {
            EntryOutcome::Found(entry) => Some(entry),
            EntryOutcome::NotFound => {
                tracing::debug!("No post with slug {:?}", slug);
                None
            }
            EntryOutcome::Unavailable(e) => {
                tracing::error!("Failed to fetch post {:?} from Notion: {}", slug, e);
                None
            }
        }
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<usize> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notion::{MockNotion, Page};
    use serde_json::json;
    use tempfile::TempDir;

    fn published(id: &str, title: &str) -> Page {
        serde_json::from_value(json!({
            "id": id,
            "properties": {
                "Title": {"type": "title", "title": [{"plain_text": title}]},
                "Slug": {"type": "formula", "formula": {"type": "string", "string": id}},
                "Status": {"type": "status", "status": {"name": "Published"}}
            }
        }))
        .unwrap()
    }

    fn blog(mock: MockNotion) -> Blog {
        Blog::with_api(
            SiteConfig::default(),
            PathBuf::from("/site"),
            Arc::new(mock),
            Some("db".to_string()),
        )
    }

    #[tokio::test]
    async fn test_list_published_is_fail_soft() {
        let blog = blog(MockNotion::new().failing("Notion is down"));
        assert!(blog.list_published().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_slug_is_fail_soft() {
        let blog = blog(MockNotion::new().failing("Notion is down"));
        assert!(blog.get_by_slug("hello").await.is_none());
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let blog = blog(MockNotion::new().with_page(published("hello", "Hello")));

        let entries = blog.list_published().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].slug, "hello");

        let entry = blog.get_by_slug("hello").await.unwrap();
        assert_eq!(entry.title, "Hello");
        assert!(blog.get_by_slug("nonexistent").await.is_none());
    }

    #[test]
    fn test_new_reads_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("_config.yml"),
            "title: Notes\npublic_dir: out\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path(), Credentials::default()).unwrap();
        assert_eq!(blog.config.title, "Notes");
        assert_eq!(blog.public_dir, dir.path().join("out"));
    }

    #[test]
    fn test_new_without_config() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path(), Credentials::default()).unwrap();
        assert_eq!(blog.config.title, "Blog");
        assert_eq!(blog.public_dir, dir.path().join("public"));
    }
}
