// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use std::path::Path;

use tera::{Context, Tera};

const BUILTIN: [(&str, &str); 6] = [
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("categories.html", include_str!("../templates/categories.html")),
    ("category.html", include_str!("../templates/category.html")),
    ("article.html", include_str!("../templates/article.html")),
    ("404.html", include_str!("../templates/404.html")),
];

#[derive(Clone, Debug)]
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// The built-in templates only.
    pub fn builtin() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN.to_vec())?;
        tera.autoescape_on(vec![]); // Pages are built from the site's own content.

        Ok(Self { tera })
    }

    /// Templates found under `dir` replace the built-in ones of the same name.
    pub fn new(dir: &Path) -> Result<Self, tera::Error> {
        let builtin = Self::builtin()?;

        if !dir.is_dir() {
            return Ok(builtin);
        }

        log::info!("Loading templates from {:?}", dir);

        let mut pb = dir.to_owned();
        pb.push("**");
        pb.push("*.html");

        let mut tera = Tera::parse(&pb.to_string_lossy())?;
        tera.extend(&builtin.tera)?;
        tera.autoescape_on(vec![]);

        Ok(Self { tera })
    }

    /// Render a page.
    pub fn render(&self, template: &str, context: &Context) -> Result<String, tera::Error> {
        self.tera.render(template, context)
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use tera::Context;

    use crate::template::Templates;

    fn context() -> Context {
        let mut context = Context::new();
        context.insert("site_title", "Tech Wiki");
        context.insert("page_title", "Not found");
        context.insert("categories_url", "/categorias");
        context.insert("search_min_length", &3);
        context.insert("search_max_results", &5);
        context
    }

    #[test]
    fn builtin_not_found_page() {
        let html = Templates::builtin()
            .unwrap()
            .render("404.html", &context())
            .unwrap();

        assert!(html.contains("<title>Not found - Tech Wiki</title>"));
    }

    #[test]
    fn override_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("404.html"),
            "{% extends \"base.html\" %}{% block content %}<p>gone</p>{% endblock %}",
        )
        .unwrap();

        let templates = Templates::new(dir.path()).unwrap();
        let html = templates.render("404.html", &context()).unwrap();
        assert!(html.contains("<p>gone</p>"));
        assert!(html.contains("<title>Not found - Tech Wiki</title>"));
    }

    #[test]
    fn missing_dir_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Templates::new(&dir.path().join("none")).is_ok());
    }
}
