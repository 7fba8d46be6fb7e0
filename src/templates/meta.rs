//! Page-level metadata (document title, description, social preview)

use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::Entry;
use crate::helpers::open_graph;

pub const NOT_FOUND_TITLE: &str = "Post not found";
pub const NOT_FOUND_DESCRIPTION: &str = "The requested post does not exist";

/// Metadata for the `<head>` of a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    /// Social preview images
    pub images: Vec<String>,
}

impl PageMeta {
    /// Metadata for a post page, or for the not-found page when there is no post
    pub fn for_entry(entry: Option<&Entry>) -> Self {
        match entry {
            Some(entry) => Self {
                title: entry.title.clone(),
                description: entry.description.clone(),
                images: entry.cover_image.iter().cloned().collect(),
            },
            None => Self {
                title: NOT_FOUND_TITLE.to_string(),
                description: NOT_FOUND_DESCRIPTION.to_string(),
                images: Vec::new(),
            },
        }
    }

    /// Metadata for the blog listing
    pub fn for_listing(config: &SiteConfig) -> Self {
        Self {
            title: config.listing_title.clone(),
            description: config.listing_description.clone(),
            images: Vec::new(),
        }
    }

    /// Open Graph tags for a page at `url`
    pub fn open_graph(&self, url: &str, site_name: &str) -> String {
        open_graph(&self.title, &self.description, url, &self.images, site_name)
    }
}
