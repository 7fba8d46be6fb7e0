//! Display nodes to HTML

use super::highlight::CodeHighlighter;
use crate::content::{DisplayNode, Span};
use crate::helpers::{html_escape, image_tag, link_to};

/// Render a sequence of display nodes to an HTML fragment
pub fn render_nodes(nodes: &[DisplayNode], highlighter: &CodeHighlighter) -> String {
    let mut out = String::new();
    for node in nodes {
        render_node(node, highlighter, &mut out);
        out.push('\n');
    }
    out
}

fn render_node(node: &DisplayNode, highlighter: &CodeHighlighter, out: &mut String) {
    match node {
        DisplayNode::Heading { level, spans } => {
            let level = (*level).clamp(1, 6);
            let anchor = heading_id(&node.plain_text());
            if anchor.is_empty() {
                out.push_str(&format!("<h{}>", level));
            } else {
                out.push_str(&format!(r#"<h{} id="{}">"#, level, anchor));
            }
            render_spans(spans, out);
            out.push_str(&format!("</h{}>", level));
        }
        DisplayNode::Paragraph { spans } => {
            out.push_str("<p>");
            render_spans(spans, out);
            out.push_str("</p>");
        }
        DisplayNode::Image { src, alt, title } => {
            out.push_str("<figure>");
            out.push_str(&image_tag(src, Some(alt), title.as_deref()));
            if !alt.is_empty() {
                out.push_str(&format!("<figcaption>{}</figcaption>", html_escape(alt)));
            }
            out.push_str("</figure>");
        }
        DisplayNode::List {
            ordered,
            start,
            items,
        } => {
            let tag = if *ordered { "ol" } else { "ul" };
            match start {
                Some(n) if *ordered && *n != 1 => {
                    out.push_str(&format!(r#"<ol start="{}">"#, n))
                }
                _ => out.push_str(&format!("<{}>", tag)),
            }
            for item in items {
                out.push_str("<li>");
                render_item(item, highlighter, out);
                out.push_str("</li>");
            }
            out.push_str(&format!("</{}>", tag));
        }
        DisplayNode::Quote { children } => {
            out.push_str("<blockquote>");
            for child in children {
                render_node(child, highlighter, out);
            }
            out.push_str("</blockquote>");
        }
        DisplayNode::Code { language, code } => {
            out.push_str(&highlighter.highlight(code, language.as_deref()));
        }
        DisplayNode::Rule => out.push_str("<hr>"),
    }
}

/// Tight list items hold a single paragraph; render it without `<p>`
fn render_item(item: &[DisplayNode], highlighter: &CodeHighlighter, out: &mut String) {
    for (i, node) in item.iter().enumerate() {
        match node {
            DisplayNode::Paragraph { spans } if i == 0 => render_spans(spans, out),
            _ => render_node(node, highlighter, out),
        }
    }
}

fn render_spans(spans: &[Span], out: &mut String) {
    for span in spans {
        let mut html = html_escape(&span.text);
        if span.style.code {
            html = format!("<code>{}</code>", html);
        }
        if span.style.strikethrough {
            html = format!("<del>{}</del>", html);
        }
        if span.style.emphasis {
            html = format!("<em>{}</em>", html);
        }
        if span.style.strong {
            html = format!("<strong>{}</strong>", html);
        }
        if let Some(link) = &span.link {
            html = link_to(link, &html);
        }
        out.push_str(&html);
    }
}

/// Lowercase alphanumerics joined by single dashes
fn heading_id(text: &str) -> String {
    let mut id = String::new();
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            id.push(c);
        } else if !id.is_empty() && !id.ends_with('-') {
            id.push('-');
        }
    }
    id.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::map_markdown;

    fn render(markdown: &str) -> String {
        render_nodes(&map_markdown(markdown), &CodeHighlighter::new())
    }

    #[test]
    fn test_heading_and_paragraph() {
        let html = render("## Getting Started!\n\nSome <text> & more.");
        assert!(html.contains(r#"<h2 id="getting-started">Getting Started!</h2>"#));
        assert!(html.contains("<p>Some &lt;text&gt; &amp; more.</p>"));
    }

    #[test]
    fn test_inline_styles_and_links() {
        let html = render("A **bold** _move_ with `code` and [a link](https://x.io/?a=1&b=2).");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>move</em>"));
        assert!(html.contains("<code>code</code>"));
        assert!(html.contains(r#"<a href="https://x.io/?a=1&amp;b=2" target="_blank" rel="noopener">a link</a>"#));
    }

    #[test]
    fn test_lists() {
        let html = render("- one\n- two\n\n3. three\n4. four");
        assert!(html.contains("<ul><li>one</li><li>two</li></ul>"));
        assert!(html.contains(r#"<ol start="3"><li>three</li><li>four</li></ol>"#));
    }

    #[test]
    fn test_image_quote_rule() {
        let html = render("![Cover](https://cdn/c.png)\n\n> quoted\n\n---");
        assert!(html.contains(r#"<img src="https://cdn/c.png" alt="Cover" loading="lazy">"#));
        assert!(html.contains("<figcaption>Cover</figcaption>"));
        assert!(html.contains("<blockquote><p>quoted</p></blockquote>"));
        assert!(html.contains("<hr>"));
    }

    #[test]
    fn test_code_block_is_highlighted() {
        let html = render("```rust\nlet x = 1;\n```");
        assert!(html.contains(r#"<figure class="highlight rust">"#));
    }

    #[test]
    fn test_heading_id() {
        assert_eq!(heading_id("Hello, World"), "hello-world");
        assert_eq!(heading_id("  "), "");
        assert_eq!(heading_id("Déjà vu"), "déjà-vu");
    }
}
