//! List blog content

use anyhow::Result;

use crate::helpers::{format_date, post_url};
use crate::Blog;

/// List site content by type
pub async fn run(blog: &Blog, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let entries = blog.list_published().await;
            println!("Posts ({}):", entries.len());
            for entry in entries {
                println!(
                    "  {} - {} [{}]",
                    format_date(&entry.published_date, "YYYY-MM-DD"),
                    entry.title,
                    post_url(&blog.config, &entry.slug)
                );
            }
        }
        "slug" | "slugs" => {
            let slugs = blog.repository().list_slugs().await?;
            println!("Slugs ({}):", slugs.len());
            for slug in slugs {
                println!("  {}", slug);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, slug", content_type);
        }
    }

    Ok(())
}
