//! Markdown to display nodes
//!
//! [`map_markdown`] turns a markdown document into a flat-ish tree of
//! render-ready nodes. It never fails: anything it does not model (raw
//! HTML, tables, task markers) comes out as plain text.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

/// A render-ready block
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayNode {
    Heading {
        level: u8,
        spans: Vec<Span>,
    },
    Paragraph {
        spans: Vec<Span>,
    },
    Image {
        src: String,
        alt: String,
        title: Option<String>,
    },
    List {
        ordered: bool,
        start: Option<u64>,
        items: Vec<Vec<DisplayNode>>,
    },
    Quote {
        children: Vec<DisplayNode>,
    },
    Code {
        language: Option<String>,
        code: String,
    },
    Rule,
}

impl DisplayNode {
    /// Text content without any styling
    pub fn plain_text(&self) -> String {
        match self {
            DisplayNode::Heading { spans, .. } | DisplayNode::Paragraph { spans } => {
                spans.iter().map(|s| s.text.as_str()).collect()
            }
            DisplayNode::Image { alt, .. } => alt.clone(),
            DisplayNode::List { items, .. } => items
                .iter()
                .flatten()
                .map(DisplayNode::plain_text)
                .collect::<Vec<_>>()
                .join("\n"),
            DisplayNode::Quote { children } => children
                .iter()
                .map(DisplayNode::plain_text)
                .collect::<Vec<_>>()
                .join("\n"),
            DisplayNode::Code { code, .. } => code.clone(),
            DisplayNode::Rule => String::new(),
        }
    }
}

/// A run of text with uniform styling
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
    pub link: Option<String>,
}

impl Span {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
}

/// Map a markdown document to display nodes
pub fn map_markdown(markdown: &str) -> Vec<DisplayNode> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut mapper = Mapper::new();

    for event in Parser::new_ext(markdown, options) {
        mapper.event(event);
    }

    mapper.finish()
}

/// Open containers, innermost last
enum Frame {
    Root(Vec<DisplayNode>),
    Quote(Vec<DisplayNode>),
    List {
        ordered: bool,
        start: Option<u64>,
        items: Vec<Vec<DisplayNode>>,
    },
    Item(Vec<DisplayNode>),
    /// A block we do not model; its text lands in the enclosing container
    Opaque,
}

#[derive(Clone, Copy)]
enum InlineKind {
    Paragraph,
    Heading(u8),
}

struct Inline {
    kind: InlineKind,
    spans: Vec<Span>,
    /// Part of a block an image was cut out of
    split: bool,
}

struct ImageCapture {
    src: String,
    title: Option<String>,
    alt: String,
}

struct Mapper {
    frames: Vec<Frame>,
    inline: Option<Inline>,
    image: Option<ImageCapture>,
    code: Option<(Option<String>, String)>,
    strong: usize,
    emphasis: usize,
    strikethrough: usize,
    links: Vec<String>,
}

impl Mapper {
    fn new() -> Self {
        Self {
            frames: vec![Frame::Root(Vec::new())],
            inline: None,
            image: None,
            code: None,
            strong: 0,
            emphasis: 0,
            strikethrough: 0,
            links: Vec::new(),
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Paragraph) => self.open_inline(InlineKind::Paragraph),
            Event::End(TagEnd::Paragraph) => self.flush_inline(),

            Event::Start(Tag::Heading { level, .. }) => {
                self.open_inline(InlineKind::Heading(level as u8))
            }
            Event::End(TagEnd::Heading(_)) => self.flush_inline(),

            Event::Start(Tag::BlockQuote(..)) => {
                self.flush_inline();
                self.frames.push(Frame::Quote(Vec::new()));
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush_inline();
                let language = match kind {
                    CodeBlockKind::Fenced(lang) => {
                        let lang = lang.split_whitespace().next().unwrap_or("").to_string();
                        if lang.is_empty() {
                            None
                        } else {
                            Some(lang)
                        }
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((language, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, code)) = self.code.take() {
                    let code = code.trim_end_matches('\n').to_string();
                    self.push_node(DisplayNode::Code { language, code });
                }
            }

            Event::Start(Tag::List(start)) => {
                self.flush_inline();
                self.frames.push(Frame::List {
                    ordered: start.is_some(),
                    start,
                    items: Vec::new(),
                });
            }
            Event::End(TagEnd::List(_)) => {
                self.flush_inline();
                if let Some(Frame::List {
                    ordered,
                    start,
                    items,
                }) = self.frames.pop()
                {
                    self.push_node(DisplayNode::List {
                        ordered,
                        start,
                        items,
                    });
                }
            }

            Event::Start(Tag::Item) => {
                self.flush_inline();
                self.frames.push(Frame::Item(Vec::new()));
            }
            Event::End(TagEnd::Item) => {
                self.flush_inline();
                if let Some(Frame::Item(nodes)) = self.frames.pop() {
                    match self.frames.last_mut() {
                        Some(Frame::List { items, .. }) => items.push(nodes),
                        _ => nodes.into_iter().for_each(|n| self.push_node(n)),
                    }
                }
            }

            Event::Start(Tag::Emphasis) => self.emphasis += 1,
            Event::End(TagEnd::Emphasis) => self.emphasis = self.emphasis.saturating_sub(1),
            Event::Start(Tag::Strong) => self.strong += 1,
            Event::End(TagEnd::Strong) => self.strong = self.strong.saturating_sub(1),
            Event::Start(Tag::Strikethrough) => self.strikethrough += 1,
            Event::End(TagEnd::Strikethrough) => {
                self.strikethrough = self.strikethrough.saturating_sub(1)
            }

            Event::Start(Tag::Link { dest_url, .. }) => self.links.push(dest_url.to_string()),
            Event::End(TagEnd::Link) => {
                self.links.pop();
            }

            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                self.image = Some(ImageCapture {
                    src: dest_url.to_string(),
                    title: if title.is_empty() {
                        None
                    } else {
                        Some(title.to_string())
                    },
                    alt: String::new(),
                });
            }
            Event::End(TagEnd::Image) => self.close_image(),

            // Blocks we do not model
            Event::Start(_) => {
                self.flush_inline();
                self.frames.push(Frame::Opaque);
            }
            Event::End(_) => {
                self.flush_inline();
                match self.frames.pop() {
                    Some(Frame::Quote(children)) => self.push_node(DisplayNode::Quote { children }),
                    Some(Frame::Opaque) | None => {}
                    Some(other) => self.frames.push(other),
                }
            }

            Event::Text(text) => self.push_text(&text, false),
            Event::Code(text) => self.push_text(&text, true),
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html, false),
            Event::SoftBreak => self.push_text(" ", false),
            Event::HardBreak => self.push_text("\n", false),
            Event::Rule => {
                self.flush_inline();
                self.push_node(DisplayNode::Rule);
            }
            Event::TaskListMarker(checked) => {
                self.push_text(if checked { "[x] " } else { "[ ] " }, false)
            }
            Event::FootnoteReference(label) => self.push_text(&format!("[^{}]", label), false),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<DisplayNode> {
        self.flush_inline();
        if let Some((language, code)) = self.code.take() {
            self.push_node(DisplayNode::Code { language, code });
        }

        // Close anything left open so no content is lost
        while self.frames.len() > 1 {
            match self.frames.pop() {
                Some(Frame::Quote(children)) => self.push_node(DisplayNode::Quote { children }),
                Some(Frame::List {
                    ordered,
                    start,
                    items,
                }) => self.push_node(DisplayNode::List {
                    ordered,
                    start,
                    items,
                }),
                Some(Frame::Item(nodes)) => nodes.into_iter().for_each(|n| self.push_node(n)),
                Some(Frame::Root(nodes)) => nodes.into_iter().for_each(|n| self.push_node(n)),
                Some(Frame::Opaque) | None => {}
            }
        }

        match self.frames.pop() {
            Some(Frame::Root(nodes)) => nodes,
            _ => Vec::new(),
        }
    }

    fn style(&self) -> SpanStyle {
        SpanStyle {
            strong: self.strong > 0,
            emphasis: self.emphasis > 0,
            strikethrough: self.strikethrough > 0,
            code: false,
        }
    }

    fn open_inline(&mut self, kind: InlineKind) {
        self.flush_inline();
        self.inline = Some(Inline {
            kind,
            spans: Vec::new(),
            split: false,
        });
    }

    fn push_text(&mut self, text: &str, code: bool) {
        if let Some(image) = self.image.as_mut() {
            image.alt.push_str(text);
            return;
        }
        if let Some((_, source)) = self.code.as_mut() {
            source.push_str(text);
            return;
        }

        let mut style = self.style();
        style.code = code;
        let link = self.links.last().cloned();

        let inline = self.inline.get_or_insert_with(|| Inline {
            kind: InlineKind::Paragraph,
            spans: Vec::new(),
            split: false,
        });

        match inline.spans.last_mut() {
            Some(last) if last.style == style && last.link == link => last.text.push_str(text),
            _ => inline.spans.push(Span {
                text: text.to_string(),
                style,
                link,
            }),
        }
    }

    fn close_image(&mut self) {
        let Some(image) = self.image.take() else {
            return;
        };

        // Split the surrounding block around the image
        let kind = match self.inline.as_mut() {
            Some(inline) => {
                inline.split = true;
                Some(inline.kind)
            }
            None => None,
        };
        self.flush_inline();
        self.push_node(DisplayNode::Image {
            src: image.src,
            alt: image.alt,
            title: image.title,
        });
        if let Some(kind) = kind {
            self.inline = Some(Inline {
                kind,
                spans: Vec::new(),
                split: true,
            });
        }
    }

    fn flush_inline(&mut self) {
        let Some(mut inline) = self.inline.take() else {
            return;
        };

        if let Some(first) = inline.spans.first_mut() {
            first.text = first.text.trim_start().to_string();
        }
        if let Some(last) = inline.spans.last_mut() {
            last.text = last.text.trim_end().to_string();
        }
        inline.spans.retain(|s| !s.text.is_empty());

        match inline.kind {
            InlineKind::Heading(_) if inline.split && inline.spans.is_empty() => {}
            InlineKind::Heading(level) => self.push_node(DisplayNode::Heading {
                level,
                spans: inline.spans,
            }),
            InlineKind::Paragraph if !inline.spans.is_empty() => {
                self.push_node(DisplayNode::Paragraph {
                    spans: inline.spans,
                })
            }
            InlineKind::Paragraph => {}
        }
    }

    fn push_node(&mut self, node: DisplayNode) {
        for frame in self.frames.iter_mut().rev() {
            match frame {
                Frame::Root(nodes) | Frame::Quote(nodes) | Frame::Item(nodes) => {
                    nodes.push(node);
                    return;
                }
                Frame::List { items, .. } => {
                    match items.last_mut() {
                        Some(item) => item.push(node),
                        None => items.push(vec![node]),
                    }
                    return;
                }
                Frame::Opaque => continue,
            }
        }
    }
}
