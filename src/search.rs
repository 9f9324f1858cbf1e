// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    config::SearchConfig,
    content::{Article, Corpus},
    metadata::{Category, Difficulty},
    url::Routes,
};

/// What the client widget needs to list and link a result.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SearchEntry {
    pub title: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub reading_time: u32,
    pub url: String,
    #[serde(skip)]
    words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub entry: &'a SearchEntry,
    /// 0.0 is an exact hit.
    pub distance: f64,
}

#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
    config: SearchConfig,
}

fn words(text: &str) -> Vec<String> {
    let mut words: Vec<String> = text.unicode_words().map(str::to_lowercase).collect();
    words.sort();
    words.dedup();
    words
}

fn similarity(query: &str, candidate: &str) -> f64 {
    if candidate.contains(query) {
        1.0
    } else {
        strsim::normalized_levenshtein(query, candidate)
    }
}

impl SearchEntry {
    fn new(article: &Article, routes: &Routes) -> Self {
        Self {
            title: article.metadata.title.clone(),
            category: article.metadata.category,
            difficulty: article.metadata.difficulty,
            tags: article.metadata.tags.clone(),
            reading_time: article.metadata.reading_minutes(),
            url: routes.article_url(article.path.as_str()),
            words: words(&article.body),
        }
    }

    /// Best similarity over title, tags and body words. Titles and tags
    /// match as substrings; body words only fuzzily.
    fn similarity(&self, query: &str) -> f64 {
        let title = similarity(query, &self.title.to_lowercase());
        let tags = self
            .tags
            .iter()
            .map(|tag| similarity(query, &tag.to_lowercase()))
            .fold(0.0, f64::max);
        let body = self
            .words
            .iter()
            .map(|word| strsim::normalized_levenshtein(query, word))
            .fold(0.0, f64::max);

        title.max(tags).max(body)
    }
}

impl SearchIndex {
    pub fn new(articles: &[Article], routes: &Routes, config: &SearchConfig) -> Self {
        Self {
            entries: articles
                .iter()
                .map(|article| SearchEntry::new(article, routes))
                .collect(),
            config: config.clone(),
        }
    }

    pub fn from_corpus(corpus: &impl Corpus, routes: &Routes, config: &SearchConfig) -> Self {
        Self::new(&corpus.articles(), routes, config)
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Closest entries first, ties in corpus order.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < self.config.min_query_len {
            return vec![];
        }

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .map(|entry| SearchHit {
                entry,
                distance: 1.0 - entry.similarity(&query),
            })
            .filter(|hit| hit.distance <= self.config.threshold)
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(self.config.max_results);
        hits
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }
}

#[cfg(test)]
mod test {
    use tempfile::TempDir;

    use super::*;
    use crate::content::{
        test::{article, write},
        ContentRepository,
    };

    fn index(dir: &TempDir) -> SearchIndex {
        SearchIndex::from_corpus(
            &ContentRepository::new(dir.path(), "mdx"),
            &Routes::default(),
            &SearchConfig::default(),
        )
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "frontend/nextjs.mdx",
            &article("Next.js", "intermediate", "tags: [react, framework]\n"),
        );
        write(
            dir.path(),
            "frontend/react.mdx",
            &article("React", "intermediate", "tags: [javascript, library]\n"),
        );
        write(
            dir.path(),
            "ux-ui/wireframe.mdx",
            &article("Wireframe", "beginner", "tags: [design]\n"),
        );
        dir
    }

    fn titles(hits: &[SearchHit]) -> Vec<String> {
        hits.iter().map(|hit| hit.entry.title.clone()).collect()
    }

    #[test]
    fn short_queries_return_nothing() {
        let dir = fixture();
        assert!(index(&dir).search("re").is_empty());
        assert!(index(&dir).search("   ").is_empty());
    }

    #[test]
    fn title_and_tag_substrings() {
        let dir = fixture();
        let index = index(&dir);

        let hits = index.search("react");
        assert_eq!(titles(&hits), vec!["Next.js", "React"]);
        assert!(hits.iter().all(|hit| hit.distance == 0.0));
        assert_eq!(hits[1].entry.url, "/terminos/frontend/react");
    }

    #[test]
    fn typos_are_tolerated() {
        let dir = fixture();
        assert_eq!(titles(&index(&dir).search("wirefrane")), vec!["Wireframe"]);
    }

    #[test]
    fn unrelated_query_finds_nothing() {
        let dir = fixture();
        assert!(index(&dir).search("kubernetes").is_empty());
    }

    #[test]
    fn results_are_capped() {
        let dir = TempDir::new().unwrap();
        for i in 0..8 {
            write(
                dir.path(),
                &format!("general/term{}.mdx", i),
                &article(&format!("Term {}", i), "beginner", "tags: [shared]\n"),
            );
        }
        assert_eq!(index(&dir).search("shared").len(), 5);
    }

    #[test]
    fn json_export() {
        let dir = fixture();
        let index = index(&dir);
        let json: serde_json::Value = serde_json::from_str(&index.to_json().unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), index.entries().len());
        assert_eq!(json[0]["title"], "Next.js");
        assert_eq!(json[0]["category"], "frontend");
        assert_eq!(json[0]["difficulty"], "intermediate");
        assert_eq!(json[0]["url"], "/terminos/frontend/nextjs");
        assert!(json[0].get("words").is_none());
    }
}
