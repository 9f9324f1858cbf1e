// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use std::{
    cmp::Ordering,
    ffi::OsStr,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use relative_path::RelativePathBuf;
use serde::Serialize;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::{
    config::Config,
    error::ContentError,
    frontmatter::{self, SplitError},
    metadata::{ArticleMetadata, Category},
};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Article {
    pub slug: String,
    pub metadata: ArticleMetadata,
    /// Unparsed Markdown/MDX.
    pub body: String,
    /// `{directory}/{slug}`, the identity of the article.
    pub path: RelativePathBuf,
}

impl Article {
    /// The directory the article was loaded from.
    pub fn directory(&self) -> &str {
        self.path.parent().map(|p| p.as_str()).unwrap_or("")
    }
}

/// Lowercase with diacritics removed, so `Árbol` sorts next to `arbol`.
fn collation_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Title order used by every listing: accent- and case-insensitive, then
/// exact title, then canonical path so the result never depends on
/// directory order.
pub fn title_order(a: &Article, b: &Article) -> Ordering {
    collation_key(&a.metadata.title)
        .cmp(&collation_key(&b.metadata.title))
        .then_with(|| a.metadata.title.cmp(&b.metadata.title))
        .then_with(|| a.path.cmp(&b.path))
}

/// Everything a full scan produced. Failures never abort the scan.
#[derive(Debug, Default)]
pub struct Scan {
    pub articles: Vec<Article>,
    pub failures: Vec<ContentError>,
}

/// Read access to the set of articles.
pub trait Corpus {
    /// All loadable articles in title order; malformed ones are left out.
    fn articles(&self) -> Vec<Article>;

    /// Looks up `{category}/{slug}`. `Ok(None)` means there is no such article.
    fn find(&self, category: &str, slug: &str) -> Result<Option<Article>, ContentError>;

    /// Like [`Corpus::find`], but logs failures and reports them as absent.
    fn article(&self, category: &str, slug: &str) -> Option<Article> {
        match self.find(category, slug) {
            Ok(article) => article,
            Err(err) => {
                log::error!("{}", err);
                None
            }
        }
    }

    fn by_category(&self, category: Category) -> Vec<Article> {
        self.articles()
            .into_iter()
            .filter(|article| article.metadata.category == category)
            .collect()
    }

    /// Category listing by identifier; unknown identifiers list nothing.
    fn by_category_name(&self, category: &str) -> Vec<Article> {
        match category.parse() {
            Ok(category) => self.by_category(category),
            Err(err) => {
                log::debug!("{}", err);
                vec![]
            }
        }
    }
}

/// The content directory on disk: one subdirectory per category, one file
/// per article.
#[derive(Clone, Debug)]
pub struct ContentRepository {
    root: PathBuf,
    extension: String,
}

/// Skips editor leftovers and hidden files.
pub(crate) fn filter_file(file: &Path) -> bool {
    let filename = match file.file_name().and_then(OsStr::to_str) {
        Some(filename) => filename,
        None => return false,
    };

    let is_backup = filename.ends_with('~');
    let is_buffer = filename.ends_with('#') && filename.starts_with('#');
    let is_hidden = filename.starts_with('.');

    file.is_file() && !is_buffer && !is_backup && !is_hidden
}

/// A category or slug must be one plain path segment.
fn is_segment(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains(&['/', '\\'][..])
}

impl ContentRepository {
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_owned(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.content_dir, &config.extension)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn has_extension(&self, file: &Path) -> bool {
        file.extension().and_then(OsStr::to_str) == Some(self.extension.as_str())
    }

    /// Walks every category directory under the root.
    pub fn scan(&self) -> Scan {
        let mut scan = Scan::default();

        if !self.root.is_dir() {
            log::debug!("Content root {:?} does not exist", self.root);
            return scan;
        }

        for entry in walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) if entry.file_type().is_dir() => {
                    let directory = entry.file_name().to_string_lossy().into_owned();
                    self.scan_directory(&directory, entry.path(), &mut scan);
                }
                Ok(_) => (),
                Err(err) => scan.failures.push(ContentError::Walk {
                    path: self.root.clone(),
                    source: err,
                }),
            }
        }

        scan.articles.sort_by(title_order);
        scan
    }

    fn scan_directory(&self, directory: &str, path: &Path, scan: &mut Scan) {
        log::debug!("Scanning category directory {:?}", path);

        for entry in walkdir::WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let file = match entry {
                Ok(entry) => entry.into_path(),
                Err(err) => {
                    scan.failures.push(ContentError::Walk {
                        path: path.to_owned(),
                        source: err,
                    });
                    continue;
                }
            };

            if !filter_file(&file) || !self.has_extension(&file) {
                continue;
            }

            match self.load_file(&file, directory) {
                Ok(article) => scan.articles.push(article),
                Err(err) => scan.failures.push(err),
            }
        }
    }

    /// Reads and parses one article file found under `directory`.
    pub fn load_file(&self, file: &Path, directory: &str) -> Result<Article, ContentError> {
        let source = std::fs::read_to_string(file).map_err(|source| ContentError::Io {
            path: file.to_owned(),
            source,
        })?;

        Self::parse_article(file, directory, &source)
    }

    fn parse_article(file: &Path, directory: &str, source: &str) -> Result<Article, ContentError> {
        let malformed = |reason: String| ContentError::Malformed {
            path: file.to_owned(),
            reason,
        };

        let slug = file
            .file_stem()
            .and_then(OsStr::to_str)
            .ok_or_else(|| malformed("file name is not valid UTF-8".into()))?
            .to_owned();

        let (yaml, body) = match frontmatter::split(source) {
            Ok(Some(parts)) => parts,
            Ok(None) => ("", source),
            Err(SplitError::Unterminated) => {
                return Err(malformed("front-matter block is never closed".into()))
            }
        };

        let raw = frontmatter::parse(yaml).map_err(|source| ContentError::Yaml {
            path: file.to_owned(),
            source,
        })?;
        let metadata = ArticleMetadata::from_front_matter(raw, directory).map_err(malformed)?;

        Ok(Article {
            path: RelativePathBuf::from(directory).join(&slug),
            slug,
            metadata,
            body: body.to_owned(),
        })
    }

    fn article_file(&self, category: &str, slug: &str) -> PathBuf {
        self.root
            .join(category)
            .join(format!("{}.{}", slug, self.extension))
    }
}

impl Corpus for ContentRepository {
    fn articles(&self) -> Vec<Article> {
        let scan = self.scan();

        for failure in &scan.failures {
            log::warn!("Skipping article: {}", failure);
        }

        scan.articles
    }

    fn find(&self, category: &str, slug: &str) -> Result<Option<Article>, ContentError> {
        if !is_segment(category) || !is_segment(slug) {
            return Ok(None);
        }

        let file = self.article_file(category, slug);

        match std::fs::read_to_string(&file) {
            Ok(source) => Self::parse_article(&file, category, &source).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ContentError::Io { path: file, source }),
        }
    }
}

/// An already loaded article list.
impl Corpus for Vec<Article> {
    fn articles(&self) -> Vec<Article> {
        let mut articles = self.clone();
        articles.sort_by(title_order);
        articles
    }

    fn find(&self, category: &str, slug: &str) -> Result<Option<Article>, ContentError> {
        Ok(self
            .iter()
            .find(|article| article.directory() == category && article.slug == slug)
            .cloned())
    }
}
