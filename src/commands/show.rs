//! Print a single post

use anyhow::Result;

use crate::content::{map_markdown, DisplayNode};
use crate::helpers::full_date;
use crate::Blog;

/// Print the markdown body of the post at `slug`, or its display nodes
/// as JSON when `nodes` is set
pub async fn run(blog: &Blog, slug: &str, nodes: bool) -> Result<()> {
    let Some(entry) = blog.get_by_slug(slug).await else {
        anyhow::bail!("Post not found: {}", slug);
    };

    if nodes {
        let nodes: Vec<DisplayNode> = map_markdown(entry.content.as_deref().unwrap_or(""));
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else {
        println!("# {}", entry.title);
        println!("{}", full_date(&entry.published_date));
        if !entry.description.is_empty() {
            println!("\n{}", entry.description);
        }
        println!("\n{}", entry.content.as_deref().unwrap_or(""));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::notion::MockNotion;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_show_missing_post_fails() {
        let blog = Blog::with_api(
            SiteConfig::default(),
            PathBuf::from("."),
            Arc::new(MockNotion::new()),
            Some("db".to_string()),
        );
        assert!(run(&blog, "missing", false).await.is_err());
    }
}
