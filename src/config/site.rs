//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // URL
    pub url: String,
    /// Path prefix the blog lives under
    pub blog_path: String,

    // Directory
    pub public_dir: String,

    // Date format (Moment.js style)
    pub date_format: String,

    // Listing page
    pub listing_title: String,
    pub listing_description: String,

    // Navigation menu
    pub menu: Vec<MenuItem>,

    // Code highlighting
    pub highlight: HighlightConfig,

    // Content source
    pub notion: NotionSettings,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            language: "en".to_string(),

            url: "http://localhost:4000".to_string(),
            blog_path: "/blog".to_string(),

            public_dir: "public".to_string(),

            date_format: "D MMMM YYYY".to_string(),

            listing_title: "Blog - Our Latest News".to_string(),
            listing_description: "Discover the latest articles and updates from our blog"
                .to_string(),

            menu: vec![
                MenuItem::new("Home", "/"),
                MenuItem::new("Blog", "/blog"),
            ],

            highlight: HighlightConfig::default(),

            notion: NotionSettings::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Blog path without trailing slash, always starting with '/'
    pub fn blog_root(&self) -> String {
        let trimmed = self.blog_path.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}

/// Navigation menu entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

impl MenuItem {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

/// Code block highlighting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Notion database layout and API settings.
///
/// Credentials are not part of the file; they come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionSettings {
    pub api_url: String,
    pub api_version: String,
    pub page_size: u32,
    pub published_status: String,
    pub properties: PropertyNames,
}

impl Default for NotionSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.notion.com/v1".to_string(),
            api_version: "2022-06-28".to_string(),
            page_size: 100,
            published_status: "Published".to_string(),
            properties: PropertyNames::default(),
        }
    }
}

/// Names of the database properties an entry is read from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyNames {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub published_date: String,
    pub cover_image: String,
    pub status: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            slug: "Slug".to_string(),
            description: "Description".to_string(),
            published_date: "PublishedDate".to_string(),
            cover_image: "CoverImage".to_string(),
            status: "Status".to_string(),
        }
    }
}
