//! Generate static files

use anyhow::{Context, Result};

use crate::content::Entry;
use crate::generator::Generator;
use crate::Blog;

/// Fetch every published post and write the static site.
/// Returns the number of files written.
pub async fn run(blog: &Blog) -> Result<usize> {
    let start = std::time::Instant::now();

    let published = blog
        .repository()
        .published_entries()
        .await
        .context("Failed to enumerate posts")?;
    let slugs: Vec<String> = published.iter().map(|entry| entry.slug.clone()).collect();
    let entries: Vec<Entry> = published.into_iter().filter(Entry::has_title).collect();

    tracing::info!("Found {} posts ({} listed)", slugs.len(), entries.len());

    let mut posts = Vec::with_capacity(slugs.len());
    for slug in &slugs {
        match blog.get_by_slug(slug).await {
            Some(entry) => posts.push(entry),
            None => tracing::warn!("Skipping post {:?}: not available", slug),
        }
    }

    let generator = Generator::new(&blog.config)?;
    let written = generator.write_site(&blog.public_dir, &entries, &posts)?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} files in {:.2}s",
        written,
        duration.as_secs_f64()
    );

    Ok(written)
}
