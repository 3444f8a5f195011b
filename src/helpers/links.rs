//! Link and path helpers

use url::Url;

use crate::config::SiteConfig;

/// Whether a link points off-site.
///
/// A link is external when it has an explicit scheme and a host that is
/// not one of `internal_hosts`. Relative paths, fragments, protocol-relative
/// URLs and host-less schemes such as `mailto:` are internal.
pub fn is_external_link(href: &str, internal_hosts: &[String]) -> bool {
    let Ok(url) = Url::parse(href) else {
        return false;
    };

    match url.host_str() {
        Some(host) => !internal_hosts
            .iter()
            .any(|own| own.eq_ignore_ascii_case(host)),
        None => false,
    }
}

/// Join a root path and a relative path with exactly one slash
pub fn join_path(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        if root.is_empty() {
            "/".to_string()
        } else {
            root.to_string()
        }
    } else {
        format!("{}/{}", root, path)
    }
}

/// Public path of a blog index page
///
/// # Examples
/// ```ignore
/// page_url(&config, 1) // -> "/blog"
/// page_url(&config, 3) // -> "/blog/page/3"
/// ```
pub fn page_url(config: &SiteConfig, page: usize) -> String {
    if page <= 1 {
        join_path(&config.blog_root, "")
    } else {
        join_path(
            &config.blog_root,
            &format!("{}/{}", config.pagination_dir.trim_matches('/'), page),
        )
    }
}

/// Public path of a single post
pub fn post_url(config: &SiteConfig, slug: &str) -> String {
    format!("{}/", join_path(&config.blog_root, slug))
}
