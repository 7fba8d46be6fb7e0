//! Content module - blog entries, their Notion source and display mapping

mod blocks;
mod display;
mod entry;
mod repository;

pub use blocks::{rich_text_to_markdown, to_markdown_string, MarkdownExporter, MdBlock};
pub use display::{map_markdown, DisplayNode, Span, SpanStyle};
pub use entry::{parse_date, resolve_slug, Entry, EntryRecord, UNTITLED};
pub use repository::{ContentRepository, EntryOutcome, ListOutcome};
