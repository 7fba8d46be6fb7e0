//! Notion API access
//!
//! [`NotionApi`] is the seam between the content repository and the
//! network: [`NotionClient`] talks to the real API over HTTP, tests plug in
//! an in-memory implementation.

mod client;
mod error;
pub mod mock;
pub mod types;

use async_trait::async_trait;

pub use client::NotionClient;
pub use error::{NotionError, Result};
pub use mock::MockNotion;
pub use types::{Block, BlockContent, Page, PaginatedList, PropertyValue, QueryRequest, RichText};

/// The Notion endpoints the blog needs
#[async_trait]
pub trait NotionApi: Send + Sync {
    /// Query a database. Returns one page of results; callers follow
    /// `next_cursor` through `request.start_cursor`.
    async fn query_database(
        &self,
        database_id: &str,
        request: &QueryRequest,
    ) -> Result<PaginatedList<Page>>;

    /// Retrieve a single page by id
    async fn retrieve_page(&self, page_id: &str) -> Result<Page>;

    /// List the direct children of a block (a page id is a block id too)
    async fn block_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<PaginatedList<Block>>;
}
