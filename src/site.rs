// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde::Serialize;
use tera::Context;

use crate::{
    config::Config,
    content::{filter_file, Article, Corpus},
    index::{self, CategorySummary, PREVIEW_LEN},
    markup,
    metadata::Category,
    search::SearchIndex,
    template::Templates,
};

/// Tags shown on a listing card before collapsing into "+N".
const CARD_TAGS: usize = 3;

/// The search box script, reading `search-index.json`.
const SEARCH_SCRIPT: &str = include_str!("../assets/search.js");

fn file_changed(old: &Path, new: &Path) -> std::io::Result<bool> {
    Ok(!new.exists() || new.metadata()?.modified()? < old.metadata()?.modified()?)
}

fn writeable(path: &Path) -> std::io::Result<std::fs::File> {
    use std::fs::{create_dir_all, File};

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    File::create(path)
}

#[derive(Serialize, Debug)]
struct ArticleCard {
    title: String,
    url: String,
    category: &'static str,
    category_slug: &'static str,
    category_url: String,
    difficulty: &'static str,
    difficulty_slug: &'static str,
    reading_time: u32,
    summary: Option<String>,
    tags: Vec<String>,
    tags_preview: Vec<String>,
    tags_hidden: usize,
}

#[derive(Serialize, Debug)]
struct CategoryCard {
    slug: &'static str,
    name: &'static str,
    icon: &'static str,
    description: &'static str,
    url: String,
    count: usize,
    reading_minutes: u32,
    preview: Vec<ArticleCard>,
    more: bool,
}

#[derive(Serialize, Debug)]
struct GroupView {
    slug: &'static str,
    name: &'static str,
    articles: Vec<ArticleCard>,
}

#[derive(Debug, Default, PartialEq)]
pub struct BuildReport {
    pub articles: usize,
    pub pages: usize,
    pub assets: usize,
}

/// Renders the whole site from a corpus into a directory.
pub struct SiteBuilder<'a, C: Corpus> {
    config: &'a Config,
    corpus: &'a C,
    templates: Templates,
}

impl<'a, C: Corpus> SiteBuilder<'a, C> {
    pub fn new(config: &'a Config, corpus: &'a C) -> anyhow::Result<Self> {
        let templates = Templates::new(&config.templates_dir).context("Could not load templates")?;

        Ok(Self {
            config,
            corpus,
            templates,
        })
    }

    fn card(&self, article: &Article) -> ArticleCard {
        let meta = &article.metadata;
        let routes = &self.config.routes;

        ArticleCard {
            title: meta.title.clone(),
            url: routes.article_url(article.path.as_str()),
            category: meta.category.name(),
            category_slug: meta.category.slug(),
            category_url: routes.category_url(meta.category.slug()),
            difficulty: meta.difficulty.name(),
            difficulty_slug: meta.difficulty.slug(),
            reading_time: meta.reading_minutes(),
            summary: meta.summary().map(str::to_owned),
            tags: meta.tags.clone(),
            tags_preview: meta.tags.iter().take(CARD_TAGS).cloned().collect(),
            tags_hidden: meta.tags.len().saturating_sub(CARD_TAGS),
        }
    }

    fn category_card(&self, summary: &CategorySummary) -> CategoryCard {
        let category = summary.category;

        CategoryCard {
            slug: category.slug(),
            name: category.name(),
            icon: category.icon(),
            description: category.description(),
            url: self.config.routes.category_url(category.slug()),
            count: summary.count,
            reading_minutes: summary.reading_minutes,
            preview: summary.preview.iter().map(|a| self.card(a)).collect(),
            more: summary.count > PREVIEW_LEN,
        }
    }

    fn context(&self, page_title: &str) -> Context {
        let mut context = Context::new();
        context.insert("site_title", &self.config.title);
        context.insert("site_url", &self.config.site_url);
        context.insert("page_title", page_title);
        context.insert("categories_url", &self.config.routes.categories_url());
        context.insert("search_min_length", &self.config.search.min_query_len);
        context.insert("search_max_results", &self.config.search.max_results);
        context
    }

    fn write_page(
        &self,
        dest: &Path,
        url: &str,
        template: &str,
        context: &Context,
    ) -> anyhow::Result<PathBuf> {
        let file = dest.join(url.trim_start_matches('/')).join("index.html");
        self.write_file(&file, template, context)?;
        Ok(file)
    }

    fn write_file(&self, file: &Path, template: &str, context: &Context) -> anyhow::Result<()> {
        let out = self
            .templates
            .render(template, context)
            .with_context(|| format!("Could not render {} for {:?}", template, file))?;

        log::debug!("Writing {:?}", file);
        writeable(file)?.write_all(out.as_bytes())?;

        Ok(())
    }

    fn render_home(&self, dest: &Path, articles: &[Article]) -> anyhow::Result<()> {
        let summaries = index::category_summaries(articles);

        let mut context = self.context("Home");
        context.insert(
            "featured",
            &articles
                .iter()
                .take(PREVIEW_LEN)
                .map(|a| self.card(a))
                .collect::<Vec<_>>(),
        );
        context.insert(
            "categories",
            &summaries
                .iter()
                .map(|s| self.category_card(s))
                .collect::<Vec<_>>(),
        );
        context.insert("total", &articles.len());

        self.write_file(&dest.join("index.html"), "index.html", &context)
    }

    fn render_categories(&self, dest: &Path, articles: &[Article]) -> anyhow::Result<()> {
        let summaries = index::category_summaries(articles);

        let mut context = self.context("Categories");
        context.insert(
            "categories",
            &summaries
                .iter()
                .map(|s| self.category_card(s))
                .collect::<Vec<_>>(),
        );

        self.write_page(
            dest,
            &self.config.routes.categories_url(),
            "categories.html",
            &context,
        )?;
        Ok(())
    }

    fn render_category(&self, dest: &Path, category: Category) -> anyhow::Result<()> {
        let articles = self.corpus.by_category(category);
        let groups: Vec<GroupView> = index::group_by_difficulty(&articles)
            .iter()
            .map(|group| GroupView {
                slug: group.difficulty.slug(),
                name: group.difficulty.name(),
                articles: group.articles.iter().map(|a| self.card(a)).collect(),
            })
            .collect();

        let mut context = self.context(category.name());
        context.insert(
            "category",
            &serde_json::json!({
                "name": category.name(),
                "slug": category.slug(),
                "icon": category.icon(),
                "description": category.description(),
            }),
        );
        context.insert("count", &articles.len());
        context.insert(
            "reading_minutes",
            &articles
                .iter()
                .map(|a| a.metadata.reading_minutes())
                .sum::<u32>(),
        );
        context.insert("groups", &groups);

        if articles.is_empty() {
            log::info!("Category {} has no articles", category.slug());
        }

        self.write_page(
            dest,
            &self.config.routes.category_url(category.slug()),
            "category.html",
            &context,
        )?;
        Ok(())
    }

    fn render_article(&self, dest: &Path, article: &Article, corpus: &[Article]) -> anyhow::Result<()> {
        log::info!("Rendering {}", article.path);

        let related: Vec<ArticleCard> = index::related(article, corpus, self.config.related_limit)
            .into_iter()
            .map(|a| self.card(a))
            .collect();

        let mut context = self.context(&article.metadata.title);
        context.insert("article", &self.card(article));
        context.insert("content", &markup::render(&article.body, &self.config.routes));
        context.insert("related", &related);

        self.write_page(
            dest,
            &self.config.routes.article_url(article.path.as_str()),
            "article.html",
            &context,
        )?;
        Ok(())
    }

    /// Copies the static directory as-is, skipping files that are up to date.
    fn copy_static(&self, dest: &Path) -> anyhow::Result<usize> {
        let root = &self.config.static_dir;
        if !root.is_dir() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in walkdir::WalkDir::new(root) {
            let file = entry?.into_path();
            if !filter_file(&file) {
                continue;
            }

            let target = dest.join(file.strip_prefix(root)?);
            if !file_changed(&file, &target)? {
                continue;
            }

            log::debug!("Copying {:?}", file);
            writeable(&target)?.write_all(std::fs::read(&file)?.as_slice())?;
            copied += 1;
        }

        Ok(copied)
    }

    pub fn build(&self, dest: &Path) -> anyhow::Result<BuildReport> {
        let articles = self.corpus.articles();
        let mut report = BuildReport {
            articles: articles.len(),
            ..Default::default()
        };

        self.render_home(dest, &articles)?;
        self.render_categories(dest, &articles)?;
        report.pages += 2;

        for category in Category::ALL {
            self.render_category(dest, category)?;
            report.pages += 1;
        }

        for article in &articles {
            self.render_article(dest, article, &articles)?;
            report.pages += 1;
        }

        self.write_file(&dest.join("404.html"), "404.html", &self.context("Not found"))?;
        report.pages += 1;

        let index = SearchIndex::new(&articles, &self.config.routes, &self.config.search);
        log::debug!("Indexed {} articles for search", index.entries().len());
        writeable(&dest.join("search-index.json"))?.write_all(index.to_json()?.as_bytes())?;
        writeable(&dest.join("search.js"))?.write_all(SEARCH_SCRIPT.as_bytes())?;

        report.assets = self.copy_static(dest)?;

        Ok(report)
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;
    use crate::content::{
        test::{article, write},
        ContentRepository,
    };

    #[test]
    fn builds_every_route() {
        let site = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let config = Config::load(site.path()).unwrap();

        write(
            &config.content_dir,
            "frontend/react.mdx",
            &article("React", "beginner", "tags: [javascript]\n"),
        );
        write(
            &config.content_dir,
            "frontend/nextjs.mdx",
            &article("Next.js", "intermediate", "tags: [javascript]\n"),
        );
        write(&config.content_dir, "frontend/broken.mdx", "---\ntitle: Broken\n---\n");
        write(&config.static_dir, "style.css", "body {}");

        let repo = ContentRepository::from_config(&config);
        let report = SiteBuilder::new(&config, &repo)
            .unwrap()
            .build(out.path())
            .unwrap();

        assert_eq!(
            report,
            BuildReport {
                articles: 2,
                pages: 2 + Category::ALL.len() + 2 + 1,
                assets: 1,
            }
        );

        let page = fs::read_to_string(out.path().join("terminos/frontend/react/index.html")).unwrap();
        assert!(page.contains("<title>React - Tech Wiki</title>"));
        assert!(page.contains("About React."));
        assert!(page.contains(r#"href="/terminos/frontend/nextjs""#));

        let backend = fs::read_to_string(out.path().join("categorias/backend/index.html")).unwrap();
        assert!(backend.contains("Coming soon"));

        let frontend = fs::read_to_string(out.path().join("categorias/frontend/index.html")).unwrap();
        assert!(frontend.contains("Beginner"));
        assert!(frontend.contains("Intermediate"));
        assert!(!frontend.contains("Advanced"));

        assert!(out.path().join("index.html").is_file());
        assert!(out.path().join("categorias/index.html").is_file());
        assert!(out.path().join("404.html").is_file());
        assert!(out.path().join("style.css").is_file());

        let index: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(out.path().join("search-index.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(index.as_array().unwrap().len(), 2);

        let script = fs::read_to_string(out.path().join("search.js")).unwrap();
        assert!(script.contains("input.dataset.index"));
        assert!(page.contains(r#"<script src="/search.js" defer></script>"#));
        assert!(page.contains(r#"data-min-length="3" data-max-results="5""#));
    }

    #[test]
    fn empty_site() {
        let site = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let config = Config::load(site.path()).unwrap();
        let repo = ContentRepository::from_config(&config);

        let report = SiteBuilder::new(&config, &repo)
            .unwrap()
            .build(out.path())
            .unwrap();
        assert_eq!(report.articles, 0);
        assert_eq!(report.assets, 0);

        let home = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(home.contains("<strong>0</strong> terms available"));
    }
}
