//! Current-page highlighting for navigation links.

#[cfg(test)]
#[path = "active_link_test.rs"]
mod active_link_test;

use crate::config::ActiveLinkConfig;
use crate::host::Dom;

/// Whether a link pointing at `target` represents the page at `path`.
///
/// A link matches when the path ends with its target, or when the path is a
/// directory (`/` or anything ending in `/`) and the target is `home_page`.
/// An empty target never matches.
#[must_use]
pub fn is_active(path: &str, target: &str, home_page: &str) -> bool {
    if target.is_empty() {
        return false;
    }
    path.ends_with(target) || (path.ends_with('/') && target == home_page)
}

/// Flag the links matching `path` and clear the flag from all others.
///
/// Returns the number of links marked active.
pub fn mark_active_links<D: Dom>(dom: &D, path: &str, config: &ActiveLinkConfig) -> usize {
    let mut marked = 0;
    for link in dom.query_all(&config.link) {
        let target = dom.attribute(&link, "href").unwrap_or_default();
        if is_active(path, &target, &config.home_page) {
            dom.add_class(&link, &config.active_class);
            dom.set_attribute(&link, "aria-current", "page");
            marked += 1;
        } else {
            dom.remove_class(&link, &config.active_class);
            dom.remove_attribute(&link, "aria-current");
        }
    }
    log::debug!("active_link: {marked} link(s) marked for {path}");
    marked
}
