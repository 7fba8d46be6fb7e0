//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters left as-is in a path segment: A-Z a-z 0-9 - . _ ~
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// URL of the blog listing
///
/// # Examples
/// ```ignore
/// blog_url(&config) // -> "/blog/"
/// ```
pub fn blog_url(config: &SiteConfig) -> String {
    format!("{}/", config.blog_root())
}

/// URL of a post page
///
/// # Examples
/// ```ignore
/// post_url(&config, "hello world") // -> "/blog/hello%20world/"
/// ```
pub fn post_url(config: &SiteConfig, slug: &str) -> String {
    format!("{}/{}/", config.blog_root(), encode_segment(slug))
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog/") // -> "https://example.com/blog/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    let base = config.url.trim_end_matches('/');
    format!("{}/{}", base, path.trim_start_matches('/'))
}

/// Encode one URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com/".to_string();
        config
    }

    #[test]
    fn test_blog_url() {
        let mut config = test_config();
        assert_eq!(blog_url(&config), "/blog/");
        config.blog_path = "/".to_string();
        assert_eq!(blog_url(&config), "/");
    }

    #[test]
    fn test_post_url() {
        let config = test_config();
        assert_eq!(post_url(&config, "hello-world"), "/blog/hello-world/");
        assert_eq!(post_url(&config, "a b/c"), "/blog/a%20b%2Fc/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/blog/post/"),
            "https://example.com/blog/post/"
        );
        assert_eq!(
            full_url_for(&config, "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }
}
