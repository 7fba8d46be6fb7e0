//! HTML helper functions

/// Generate an anchor tag
///
/// # Examples
/// ```ignore
/// link_to("/blog/hello/", "Hello") // -> <a href="/blog/hello/">Hello</a>
/// ```
pub fn link_to(href: &str, text: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            html_escape(href),
            text
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, html_escape(href), text)
    }
}

/// Generate an image tag
///
/// # Examples
/// ```ignore
/// image_tag("https://cdn/photo.jpg", Some("My Photo"), None)
/// ```
pub fn image_tag(src: &str, alt: Option<&str>, title: Option<&str>) -> String {
    let alt = alt.unwrap_or("");
    let title_attr = title
        .filter(|t| !t.is_empty())
        .map(|t| format!(r#" title="{}""#, html_escape(t)))
        .unwrap_or_default();

    format!(
        r#"<img src="{}" alt="{}"{} loading="lazy">"#,
        html_escape(src),
        html_escape(alt),
        title_attr
    )
}

/// Generate Open Graph meta tags
pub fn open_graph(
    title: &str,
    description: &str,
    url: &str,
    images: &[String],
    site_name: &str,
) -> String {
    let mut tags = vec![
        r#"<meta property="og:type" content="website">"#.to_string(),
        format!(
            r#"<meta property="og:title" content="{}">"#,
            html_escape(title)
        ),
        format!(r#"<meta property="og:url" content="{}">"#, html_escape(url)),
        format!(
            r#"<meta property="og:site_name" content="{}">"#,
            html_escape(site_name)
        ),
    ];

    if !description.is_empty() {
        tags.push(format!(
            r#"<meta property="og:description" content="{}">"#,
            html_escape(description)
        ));
    }

    for img in images {
        tags.push(format!(
            r#"<meta property="og:image" content="{}">"#,
            html_escape(img)
        ));
    }

    tags.join("\n")
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="notion-blog {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_link_to() {
        assert_eq!(link_to("/blog/", "Blog"), r#"<a href="/blog/">Blog</a>"#);
        assert!(link_to("https://example.com", "Out").contains(r#"rel="noopener""#));
    }

    #[test]
    fn test_image_tag() {
        assert_eq!(
            image_tag("https://cdn/a.png?x=1&y=2", Some("A \"cat\""), None),
            r#"<img src="https://cdn/a.png?x=1&amp;y=2" alt="A &quot;cat&quot;" loading="lazy">"#
        );
        assert!(image_tag("/a.png", None, Some("Title")).contains(r#" title="Title""#));
    }

    #[test]
    fn test_open_graph() {
        let tags = open_graph(
            "Post",
            "",
            "https://example.com/blog/post/",
            &["https://cdn/cover.png".to_string()],
            "Blog",
        );
        assert!(tags.contains(r#"<meta property="og:title" content="Post">"#));
        assert!(!tags.contains("og:description"));
        assert!(tags.contains(r#"<meta property="og:image" content="https://cdn/cover.png">"#));
    }
}
