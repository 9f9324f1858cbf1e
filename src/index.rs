// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

//! Listings derived from an already sorted article list.

use crate::{
    content::Article,
    metadata::{Category, Difficulty},
};

/// Articles shown per category on overview pages.
pub const PREVIEW_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyGroup<'a> {
    pub difficulty: Difficulty,
    pub articles: Vec<&'a Article>,
}

/// Partitions `articles` into the fixed difficulty buckets, keeping their
/// order. Empty buckets are left out.
pub fn group_by_difficulty(articles: &[Article]) -> Vec<DifficultyGroup<'_>> {
    Difficulty::ALL
        .iter()
        .map(|&difficulty| DifficultyGroup {
            difficulty,
            articles: articles
                .iter()
                .filter(|article| article.metadata.difficulty == difficulty)
                .collect(),
        })
        .filter(|group| !group.articles.is_empty())
        .collect()
}

/// Up to `limit` articles that the source lists as related or that share a
/// tag with it, in corpus order. Never includes the source itself.
pub fn related<'a>(source: &Article, corpus: &'a [Article], limit: usize) -> Vec<&'a Article> {
    corpus
        .iter()
        .filter(|candidate| candidate.path != source.path)
        .filter(|candidate| {
            let listed = source.metadata.related.iter().any(|related| {
                related == &candidate.slug
                    || crate::url::normalize_path(related) == candidate.path.as_str()
            });
            let shares_tag = candidate
                .metadata
                .tags
                .iter()
                .any(|tag| source.metadata.tags.contains(tag));

            listed || shares_tag
        })
        .take(limit)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary<'a> {
    pub category: Category,
    pub count: usize,
    pub reading_minutes: u32,
    pub preview: Vec<&'a Article>,
}

/// One summary per known category, including empty ones.
pub fn category_summaries(articles: &[Article]) -> Vec<CategorySummary<'_>> {
    Category::ALL
        .iter()
        .map(|&category| {
            let members: Vec<&Article> = articles
                .iter()
                .filter(|article| article.metadata.category == category)
                .collect();

            CategorySummary {
                category,
                count: members.len(),
                reading_minutes: members
                    .iter()
                    .map(|article| article.metadata.reading_minutes())
                    .sum(),
                preview: members.into_iter().take(PREVIEW_LEN).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use relative_path::RelativePathBuf;

    use super::*;
    use crate::metadata::ArticleMetadata;

    fn article(path: &str, difficulty: Difficulty, tags: &[&str], related: &[&str]) -> Article {
        let path = RelativePathBuf::from(path);
        let slug = path.file_name().unwrap().to_owned();
        Article {
            metadata: ArticleMetadata {
                title: slug.clone(),
                category: path.parent().unwrap().as_str().parse().unwrap(),
                difficulty,
                tags: tags.iter().map(|t| t.to_string()).collect(),
                related: related.iter().map(|t| t.to_string()).collect(),
                reading_time: None,
                short_description: None,
                description: None,
            },
            slug,
            body: String::new(),
            path,
        }
    }

    #[test]
    fn groups_in_fixed_order_without_empty_buckets() {
        let articles = vec![
            article("frontend/a", Difficulty::Advanced, &[], &[]),
            article("frontend/b", Difficulty::Beginner, &[], &[]),
            article("frontend/c", Difficulty::Advanced, &[], &[]),
        ];

        let groups = group_by_difficulty(&articles);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].difficulty, Difficulty::Beginner);
        assert_eq!(groups[1].difficulty, Difficulty::Advanced);
        assert_eq!(
            groups[1].articles.iter().map(|a| a.slug.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert!(group_by_difficulty(&[]).is_empty());
    }

    #[test]
    fn related_by_slug_path_and_tag() {
        let corpus = vec![
            article("frontend/html", Difficulty::Beginner, &["markup"], &[]),
            article("frontend/nextjs", Difficulty::Intermediate, &["react"], &[]),
            article("frontend/react", Difficulty::Intermediate, &["javascript"], &["nextjs"]),
            article("general/api", Difficulty::Beginner, &["backend"], &[]),
            article("backend/rest", Difficulty::Beginner, &["javascript"], &[]),
            article("general/http", Difficulty::Beginner, &[], &["/general/api"]),
        ];

        let react = &corpus[2];
        let related: Vec<&str> = related(react, &corpus, 4)
            .iter()
            .map(|a| a.path.as_str())
            .collect();
        assert_eq!(related, vec!["frontend/nextjs", "backend/rest"]);

        let http = &corpus[5];
        assert_eq!(related_paths(http, &corpus), vec!["general/api"]);
    }

    fn related_paths<'a>(source: &Article, corpus: &'a [Article]) -> Vec<&'a str> {
        related(source, corpus, 4)
            .into_iter()
            .map(|a| a.path.as_str())
            .collect()
    }

    #[test]
    fn related_excludes_self_and_is_capped() {
        let corpus: Vec<Article> = (0..8)
            .map(|i| {
                article(
                    &format!("frontend/t{}", i),
                    Difficulty::Beginner,
                    &["shared"],
                    &["t0"],
                )
            })
            .collect();

        let related = related(&corpus[0], &corpus, 4);
        assert_eq!(related.len(), 4);
        assert!(related.iter().all(|a| a.path != corpus[0].path));
        assert_eq!(related[0].slug, "t1");
    }

    #[test]
    fn same_slug_other_category_is_not_self() {
        let corpus = vec![
            article("frontend/testing", Difficulty::Beginner, &["qa"], &[]),
            article("backend/testing", Difficulty::Beginner, &["qa"], &[]),
        ];
        assert_eq!(related_paths(&corpus[0], &corpus), vec!["backend/testing"]);
    }

    #[test]
    fn summaries_cover_every_category() {
        let mut articles = vec![
            article("frontend/a", Difficulty::Beginner, &[], &[]),
            article("frontend/b", Difficulty::Beginner, &[], &[]),
        ];
        articles[1].metadata.reading_time = Some(2);

        let summaries = category_summaries(&articles);
        assert_eq!(summaries.len(), Category::ALL.len());
        assert_eq!(summaries[0].category, Category::Frontend);
        assert_eq!(summaries[0].count, 2);
        assert_eq!(summaries[0].reading_minutes, 7);
        assert_eq!(summaries[2].count, 0);
        assert!(summaries[2].preview.is_empty());
    }
}
