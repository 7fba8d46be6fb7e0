//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::MenuItem;
pub use site::NotionSettings;
pub use site::PropertyNames;
pub use site::SiteConfig;

/// Credentials for the Notion database, taken from the environment
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Integration token (`NOTION_TOKEN`)
    pub token: Option<String>,
    /// Blog database id (`NOTION_BLOG_DATABASE_ID`)
    pub database_id: Option<String>,
}

impl Credentials {
    pub fn new(token: Option<String>, database_id: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            database_id: database_id.filter(|d| !d.is_empty()),
        }
    }
}
