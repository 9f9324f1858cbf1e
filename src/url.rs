// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use relative_path::{Component, RelativePath};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct Routes {
    pub article_prefix: String,
    pub category_prefix: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            article_prefix: "terminos".into(),
            category_prefix: "categorias".into(),
        }
    }
}

impl Routes {
    /// `/{article_prefix}/{category}/{slug}`. Idempotent.
    pub fn article_url(&self, path: &str) -> String {
        prefixed(&self.article_prefix, path)
    }

    /// `/{category_prefix}/{category}`. Idempotent.
    pub fn category_url(&self, category: &str) -> String {
        prefixed(&self.category_prefix, category)
    }

    pub fn categories_url(&self) -> String {
        prefixed(&self.category_prefix, "")
    }
}

/// Collapses separators and `.` segments into `a/b/c`, without a leading `/`.
/// `..` segments are dropped rather than resolved.
pub fn normalize_path(path: &str) -> String {
    segments(path).collect::<Vec<_>>().join("/")
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    RelativePath::new(path)
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) if !segment.is_empty() => Some(segment),
            _ => None,
        })
}

fn prefixed(prefix: &str, path: &str) -> String {
    let prefix: Vec<&str> = segments(prefix).collect();
    let mut segments: Vec<&str> = segments(path).collect();

    if !prefix.is_empty() && segments.starts_with(&prefix) {
        segments.drain(..prefix.len());
    }

    let mut url = String::from("/");
    url.push_str(&prefix.join("/"));
    for segment in segments {
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(segment);
    }
    url
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn leading_separator_is_normalized() {
        let routes = Routes::default();
        assert_eq!(routes.article_url("frontend/react"), "/terminos/frontend/react");
        assert_eq!(
            routes.article_url("frontend/react"),
            routes.article_url("/frontend/react")
        );
        assert_eq!(
            routes.article_url("//frontend/./react"),
            "/terminos/frontend/react"
        );
    }

    #[test]
    fn article_url_is_idempotent() {
        let routes = Routes::default();
        let once = routes.article_url("/frontend/react");
        assert_eq!(routes.article_url(&once), once);
    }

    #[test]
    fn nested_prefixes_are_idempotent() {
        let routes = Routes {
            article_prefix: "docs/terms".into(),
            category_prefix: "/docs/categories/".into(),
        };

        let once = routes.article_url("frontend/react");
        assert_eq!(once, "/docs/terms/frontend/react");
        assert_eq!(routes.article_url(&once), once);
        assert_eq!(routes.article_url("docs/frontend"), "/docs/terms/docs/frontend");

        let once = routes.category_url("backend");
        assert_eq!(once, "/docs/categories/backend");
        assert_eq!(routes.category_url(&once), once);
        assert_eq!(routes.categories_url(), "/docs/categories");
    }

    #[test]
    fn category_urls() {
        let routes = Routes::default();
        assert_eq!(routes.category_url("ux-ui"), "/categorias/ux-ui");
        assert_eq!(routes.category_url("/categorias/ux-ui"), "/categorias/ux-ui");
        assert_eq!(routes.categories_url(), "/categorias");
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_path("/a//b/"), "a/b");
        assert_eq!(normalize_path(""), "");
    }
}
