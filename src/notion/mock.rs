//! In-memory Notion backend for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::error::{NotionError, Result};
use super::types::{
    Block, FilterCondition, FormulaValue, Page, PaginatedList, PropertyFilter,
    PropertyValue, QueryRequest,
};
use super::NotionApi;

/// Serves canned pages and block trees.
///
/// Database queries evaluate the equality filters the blog issues and
/// return pages in insertion order; sorts are recorded but not applied.
#[derive(Default)]
pub struct MockNotion {
    pages: Vec<Page>,
    children: HashMap<String, Vec<Block>>,
    failure: Option<Failure>,
    query_failures: AtomicUsize,
    page_limit: Option<usize>,
    queries: Mutex<Vec<QueryRequest>>,
}

impl MockNotion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a database row
    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    /// Set the child blocks of a page or block
    pub fn with_children(mut self, block_id: &str, blocks: Vec<Block>) -> Self {
        self.children.insert(block_id.to_string(), blocks);
        self
    }

    /// Make every call fail with a 503
    pub fn failing(self, message: &str) -> Self {
        self.failing_with_status(503, "service_unavailable", message)
    }

    /// Make every call fail with the given API status and code
    pub fn failing_with_status(mut self, status: u16, code: &str, message: &str) -> Self {
        self.failure = Some(Failure {
            status,
            code: code.to_string(),
            message: message.to_string(),
        });
        self
    }

    /// Fail the next `count` database queries with a 503, then recover
    pub fn failing_queries(self, count: usize) -> Self {
        self.query_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Split query results into pages of at most `limit` rows
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = Some(limit.max(1));
        self
    }

    /// Every query request received so far
    pub fn queries(&self) -> Vec<QueryRequest> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn check_query(&self) -> Result<()> {
        let flaky = self
            .query_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if flaky {
            return Err(NotionError::Api {
                status: 503,
                code: "service_unavailable".to_string(),
                message: "temporarily unavailable".to_string(),
            });
        }
        self.check()
    }
}

struct Failure {
    status: u16,
    code: String,
    message: String,
}

impl Failure {
    fn to_error(&self) -> NotionError {
        NotionError::Api {
            status: self.status,
            code: self.code.clone(),
            message: self.message.clone(),
        }
    }
}

fn matches(page: &Page, filter: &PropertyFilter) -> bool {
    match (&filter.condition, page.property(&filter.property)) {
        (FilterCondition::Status(cond), Some(PropertyValue::Status { status: Some(s) })) => {
            s.name == cond.equals
        }
        (
            FilterCondition::Formula(cond),
            Some(PropertyValue::Formula {
                formula: Some(FormulaValue::String { string: Some(s) }),
            }),
        ) => *s == cond.string.equals,
        _ => false,
    }
}

fn paginate<T: Clone>(all: &[T], cursor: Option<&str>, limit: Option<usize>) -> PaginatedList<T> {
    let start: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
    let limit = limit.unwrap_or(usize::MAX);
    let end = start.saturating_add(limit).min(all.len());
    let has_more = end < all.len();

    PaginatedList {
        results: all.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        has_more,
        next_cursor: has_more.then(|| end.to_string()),
    }
}

#[async_trait]
impl NotionApi for MockNotion {
    async fn query_database(
        &self,
        _database_id: &str,
        request: &QueryRequest,
    ) -> Result<PaginatedList<Page>> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        self.check_query()?;

        let matching: Vec<Page> = self
            .pages
            .iter()
            .filter(|p| request.filter.as_ref().map_or(true, |f| matches(p, f)))
            .cloned()
            .collect();

        let limit = match (self.page_limit, request.page_size) {
            (Some(a), Some(b)) => Some(a.min(b as usize)),
            (a, b) => a.or(b.map(|b| b as usize)),
        };

        Ok(paginate(&matching, request.start_cursor.as_deref(), limit))
    }

    async fn retrieve_page(&self, page_id: &str) -> Result<Page> {
        self.check()?;
        self.pages
            .iter()
            .find(|p| p.id == page_id)
            .cloned()
            .ok_or_else(|| NotionError::Api {
                status: 404,
                code: "object_not_found".to_string(),
                message: format!("Could not find page with ID: {}", page_id),
            })
    }

    async fn block_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<PaginatedList<Block>> {
        self.check()?;
        let blocks = self.children.get(block_id).cloned().unwrap_or_default();
        Ok(paginate(&blocks, start_cursor, self.page_limit))
    }
}
