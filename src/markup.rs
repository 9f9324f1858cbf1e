// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use comrak::{markdown_to_html, Options};
use fancy_regex::{Captures, Regex};
use lazy_static::lazy_static;

use crate::url::{normalize_path, Routes};

lazy_static! {
    /// `[text](/category/slug)`, a site-absolute Markdown link. Images are not links.
    static ref INTERNAL_LINK: Regex = Regex::new(r"(?<!!)\[(?P<text>[^\]]+)\]\(/(?P<target>[^)\s]+)\)").unwrap();
    static ref ESM_LINE: Regex = Regex::new(r"^(?:import|export)\s").unwrap();
}

/// Points internal links at article pages. Links that already go to an
/// article or category page are kept.
pub fn rewrite_internal_links(body: &str, routes: &Routes) -> String {
    INTERNAL_LINK
        .replace_all(body, |caps: &Captures| {
            let target = &caps["target"];
            let category = routes.category_url(target);

            let url = if !normalize_path(&routes.category_prefix).is_empty()
                && category == format!("/{}", normalize_path(target))
            {
                category
            } else {
                routes.article_url(target)
            };

            format!("[{}]({})", &caps["text"], url)
        })
        .into_owned()
}

/// Net count of open brackets on a line.
fn nesting(line: &str) -> isize {
    line.chars()
        .map(|c| match c {
            '{' | '(' | '[' => 1,
            '}' | ')' | ']' => -1,
            _ => 0,
        })
        .sum()
}

/// Drops top-level MDX `import`/`export` statements, which have no meaning
/// outside a JavaScript bundler. A statement runs until its brackets close.
/// Fenced code is left alone.
pub fn strip_esm(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut in_fence = false;
    let mut depth: isize = 0;

    for line in body.split_inclusive('\n') {
        if depth > 0 {
            depth += nesting(line);
            continue;
        }

        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }

        if !in_fence && ESM_LINE.is_match(line).unwrap_or(false) {
            depth = nesting(line).max(0);
            continue;
        }

        out.push_str(line);
    }

    out
}

/// Renders an article body to HTML.
pub fn render(body: &str, routes: &Routes) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    let source = rewrite_internal_links(&strip_esm(body), routes);
    markdown_to_html(&source, &options)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn internal_links() {
        let routes = Routes::default();
        assert_eq!(
            rewrite_internal_links("See [React](/frontend/react) and [x](https://a.b/c).", &routes),
            "See [React](/terminos/frontend/react) and [x](https://a.b/c)."
        );
        assert_eq!(
            rewrite_internal_links("[UX](/categorias/ux-ui) [R](/terminos/frontend/react)", &routes),
            "[UX](/categorias/ux-ui) [R](/terminos/frontend/react)"
        );
    }

    #[test]
    fn nested_category_prefix_links() {
        let routes = Routes {
            article_prefix: "docs/terms".into(),
            category_prefix: "docs/categories".into(),
        };
        assert_eq!(
            rewrite_internal_links("[UX](/docs/categories/ux-ui) [R](/frontend/react)", &routes),
            "[UX](/docs/categories/ux-ui) [R](/docs/terms/frontend/react)"
        );
    }

    #[test]
    fn esm_lines() {
        assert_eq!(
            strip_esm("import X from 'y'\n# Title\n```js\nimport a from 'b'\n```\n"),
            "# Title\n```js\nimport a from 'b'\n```\n"
        );
    }

    #[test]
    fn multi_line_export_is_dropped() {
        assert_eq!(
            strip_esm("export const meta = {\n  title: 'React',\n  tags: ['ui'],\n}\n\n# React\n"),
            "\n# React\n"
        );
        assert_eq!(
            strip_esm("import {\n  Note,\n} from '../components'\nBody\n"),
            "Body\n"
        );
    }

    #[test]
    fn images_are_not_rewritten() {
        let routes = Routes::default();
        assert_eq!(
            rewrite_internal_links("![flow](/images/flow.png)", &routes),
            "![flow](/images/flow.png)"
        );
        assert_eq!(
            rewrite_internal_links("![flow](/images/flow.png) [React](/frontend/react)", &routes),
            "![flow](/images/flow.png) [React](/terminos/frontend/react)"
        );
    }

    #[test]
    fn renders_markdown() {
        let html = render("## Hooks\n\nUse [state](/frontend/state).\n", &Routes::default());
        assert!(html.contains("<h2>Hooks</h2>"));
        assert!(html.contains(r#"<a href="/terminos/frontend/state">state</a>"#));
    }
}
