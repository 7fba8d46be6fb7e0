//! Generator module - renders blog pages with the built-in Tera templates

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;

use crate::config::SiteConfig;
use crate::content::{map_markdown, Entry};
use crate::helpers::{blog_url, full_url_for, meta_generator, post_url};
use crate::templates::{render_nodes, CodeHighlighter, PageMeta, PostData, SiteData, TemplateRenderer};

/// Page renderer and static site writer
pub struct Generator {
    config: SiteConfig,
    renderer: TemplateRenderer,
    highlighter: CodeHighlighter,
}

impl Generator {
    /// Create a new generator
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            renderer: TemplateRenderer::new()?,
            highlighter: CodeHighlighter::from_config(&config.highlight),
        })
    }

    /// Create a base context with common variables
    fn create_base_context(&self, meta: &PageMeta, current_path: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::new(&self.config));
        context.insert("meta", meta);
        context.insert(
            "og_tags",
            &meta.open_graph(&full_url_for(&self.config, current_path), &self.config.title),
        );
        context.insert("generator", &meta_generator());
        context.insert("current_path", current_path);
        context.insert("current_year", &Utc::now().format("%Y").to_string());
        context
    }

    /// Render the blog listing
    pub fn listing_page(&self, entries: &[Entry]) -> Result<String> {
        let posts: Vec<PostData> = entries
            .iter()
            .map(|e| PostData::new(&self.config, e))
            .collect();

        let meta = PageMeta::for_listing(&self.config);
        let mut context = self.create_base_context(&meta, &self.listing_path());
        context.insert("posts", &posts);

        self.renderer.render("blog_index.html", &context)
    }

    /// Render a post page
    pub fn post_page(&self, entry: &Entry) -> Result<String> {
        let nodes = map_markdown(entry.content.as_deref().unwrap_or(""));
        let content = render_nodes(&nodes, &self.highlighter);

        let meta = PageMeta::for_entry(Some(entry));
        let mut context =
            self.create_base_context(&meta, &post_url(&self.config, &entry.slug));
        context.insert("post", &PostData::new(&self.config, entry));
        context.insert("content", &content);

        self.renderer.render("post.html", &context)
    }

    /// Render the page shown for an unknown slug
    pub fn not_found_page(&self) -> Result<String> {
        let meta = PageMeta::for_entry(None);
        let context = self.create_base_context(&meta, &blog_url(&self.config));
        self.renderer.render("not_found.html", &context)
    }

    /// Write the listing, every post and the not-found page under `public_dir`.
    /// Returns the number of files written.
    pub fn write_site(&self, public_dir: &Path, entries: &[Entry], posts: &[Entry]) -> Result<usize> {
        let blog_dir = self.blog_dir(public_dir);
        fs::create_dir_all(&blog_dir)?;

        write_page(&blog_dir.join("index.html"), &self.listing_page(entries)?)?;
        write_page(&blog_dir.join("404.html"), &self.not_found_page()?)?;

        let mut written = 2;
        for post in posts {
            if !is_safe_segment(&post.slug) {
                tracing::warn!("Skipping post {} with unusable slug {:?}", post.id, post.slug);
                continue;
            }
            let output_path = blog_dir.join(&post.slug).join("index.html");
            write_page(&output_path, &self.post_page(post)?)?;
            written += 1;
        }

        Ok(written)
    }

    fn listing_path(&self) -> String {
        let root = self.config.blog_root();
        if root.is_empty() {
            "/".to_string()
        } else {
            root
        }
    }

    fn blog_dir(&self, public_dir: &Path) -> PathBuf {
        let root = self.config.blog_root();
        let relative = root.trim_start_matches('/');
        if relative.is_empty() {
            public_dir.to_path_buf()
        } else {
            public_dir.join(relative)
        }
    }
}

/// Whether a slug can be used as a single directory name
fn is_safe_segment(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".." && !slug.contains(['/', '\\'])
}

fn write_page(output_path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(output_path, html)
        .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
    tracing::debug!("Generated: {:?}", output_path);
    Ok(())
}
