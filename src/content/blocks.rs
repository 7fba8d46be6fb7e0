//! Notion block tree to markdown
//!
//! Conversion happens in two steps: [`MarkdownExporter::page_to_markdown`]
//! walks the block tree and renders each block on its own, then
//! [`to_markdown_string`] joins the resulting tree into one document.

use futures::future::{BoxFuture, FutureExt};

use crate::notion::types::{plain_text, BlockContent, RichText};
use crate::notion::{Block, NotionApi, Result};

/// Markdown for a single block, plus its rendered children
#[derive(Debug, Clone, PartialEq)]
pub struct MdBlock {
    pub block_type: String,
    /// Markdown of the block itself; empty for blocks that render nothing
    pub parent: String,
    pub children: Vec<MdBlock>,
}

impl MdBlock {
    fn is_list_item(&self) -> bool {
        matches!(
            self.block_type.as_str(),
            "bulleted_list_item" | "numbered_list_item" | "to_do"
        )
    }
}

/// Walks a page's block tree through the API
pub struct MarkdownExporter<'a> {
    api: &'a dyn NotionApi,
}

impl<'a> MarkdownExporter<'a> {
    pub fn new(api: &'a dyn NotionApi) -> Self {
        Self { api }
    }

    /// Fetch every block of a page (recursively) and render each one
    pub async fn page_to_markdown(&self, page_id: &str) -> Result<Vec<MdBlock>> {
        self.children_to_markdown(page_id.to_string()).await
    }

    fn children_to_markdown(&self, block_id: String) -> BoxFuture<'_, Result<Vec<MdBlock>>> {
        async move {
            let blocks = self.fetch_children(&block_id).await?;
            let mut rendered = Vec::with_capacity(blocks.len());
            let mut number = 0;

            for block in blocks {
                number = match block.content {
                    BlockContent::NumberedListItem(_) => number + 1,
                    _ => 0,
                };

                let children = if block.has_children {
                    self.children_to_markdown(block.id.clone()).await?
                } else {
                    Vec::new()
                };

                rendered.push(MdBlock {
                    block_type: block.type_name().to_string(),
                    parent: block_to_markdown(&block.content, number),
                    children,
                });
            }

            Ok(rendered)
        }
        .boxed()
    }

    async fn fetch_children(&self, block_id: &str) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.api.block_children(block_id, cursor.as_deref()).await?;
            blocks.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(blocks)
    }
}

/// Join rendered blocks into a single markdown document.
///
/// Consecutive list items are separated by a single newline, everything
/// else by a blank line. Children of list items are nested by four spaces;
/// children of other blocks follow their parent at the same level.
pub fn to_markdown_string(blocks: &[MdBlock]) -> String {
    let mut chunks = Vec::new();
    flatten(blocks, 0, &mut chunks);

    let mut out = String::new();
    let mut prev_list = false;
    for (text, is_list) in chunks {
        if !out.is_empty() {
            out.push_str(if is_list && prev_list { "\n" } else { "\n\n" });
        }
        out.push_str(&text);
        prev_list = is_list;
    }
    out
}

fn flatten(blocks: &[MdBlock], indent: usize, chunks: &mut Vec<(String, bool)>) {
    for block in blocks {
        let is_list = block.is_list_item();
        if !block.parent.is_empty() {
            chunks.push((indent_lines(&block.parent, indent), is_list));
        }
        let child_indent = if is_list { indent + 4 } else { indent };
        flatten(&block.children, child_indent, chunks);
    }
}

fn indent_lines(text: &str, indent: usize) -> String {
    if indent == 0 {
        return text.to_string();
    }
    let pad = " ".repeat(indent);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one block, without its children
fn block_to_markdown(content: &BlockContent, number: usize) -> String {
    match content {
        BlockContent::Paragraph(p) | BlockContent::Toggle(p) => rich_text_to_markdown(&p.rich_text),
        BlockContent::Heading1(h) => format!("# {}", rich_text_to_markdown(&h.rich_text)),
        BlockContent::Heading2(h) => format!("## {}", rich_text_to_markdown(&h.rich_text)),
        BlockContent::Heading3(h) => format!("### {}", rich_text_to_markdown(&h.rich_text)),
        BlockContent::BulletedListItem(item) => {
            format!("- {}", rich_text_to_markdown(&item.rich_text))
        }
        BlockContent::NumberedListItem(item) => {
            format!("{}. {}", number.max(1), rich_text_to_markdown(&item.rich_text))
        }
        BlockContent::ToDo(todo) => format!(
            "- [{}] {}",
            if todo.checked { "x" } else { " " },
            rich_text_to_markdown(&todo.rich_text)
        ),
        BlockContent::Quote(q) => quote(&rich_text_to_markdown(&q.rich_text)),
        BlockContent::Callout(c) => {
            let text = rich_text_to_markdown(&c.rich_text);
            match c.icon.as_ref().and_then(|i| i.emoji.as_deref()) {
                Some(emoji) => quote(&format!("{} {}", emoji, text)),
                None => quote(&text),
            }
        }
        BlockContent::Code(code) => {
            let language = match code.language.as_deref() {
                Some("plain text") | None => "",
                Some(lang) => lang,
            };
            let source = plain_text(&code.rich_text);
            let fence = code_fence(&source);
            format!("{}{}\n{}\n{}", fence, language, source, fence)
        }
        BlockContent::Divider => "---".to_string(),
        BlockContent::Image(image) => match image.url() {
            Some(url) => format!("![{}]({})", plain_text(&image.caption), url),
            None => String::new(),
        },
        BlockContent::Bookmark(link) | BlockContent::Embed(link) => {
            if link.url.is_empty() {
                String::new()
            } else {
                let caption = plain_text(&link.caption);
                let text = if caption.is_empty() { &link.url } else { &caption };
                format!("[{}]({})", text, link.url)
            }
        }
        BlockContent::Equation(eq) => format!("$$\n{}\n$$", eq.expression),
        BlockContent::ChildPage(child) => format!("**{}**", child.title),
        BlockContent::Unsupported(kind) => {
            tracing::debug!("Skipping unsupported block type {}", kind);
            String::new()
        }
    }
}

/// A backtick fence longer than any backtick run inside `code`
fn code_fence(code: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in code.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn quote(text: &str) -> String {
    text.lines()
        .map(|line| format!("> {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render rich text with its annotations as inline markdown
pub fn rich_text_to_markdown(segments: &[RichText]) -> String {
    let mut out = String::new();

    for segment in segments {
        if segment.kind == "equation" {
            out.push_str(&format!("${}$", segment.plain_text));
            continue;
        }

        let text = segment.plain_text.as_str();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            out.push_str(text);
            continue;
        }

        // Markers must hug the text, so surrounding whitespace stays outside
        let leading = &text[..text.len() - text.trim_start().len()];
        let trailing = &text[text.trim_end().len()..];

        let a = &segment.annotations;
        let mut styled = if a.code {
            format!("`{}`", trimmed)
        } else {
            trimmed.to_string()
        };
        if a.bold {
            styled = format!("**{}**", styled);
        }
        if a.italic {
            styled = format!("_{}_", styled);
        }
        if a.strikethrough {
            styled = format!("~~{}~~", styled);
        }
        if let Some(href) = segment.href.as_deref().filter(|h| !h.is_empty()) {
            styled = format!("[{}]({})", styled, href);
        }

        out.push_str(leading);
        out.push_str(&styled);
        out.push_str(trailing);
    }

    out
}
