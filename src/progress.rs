// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

//! Reading progress, persisted as one JSON document in a key/value store.
//!
//! Read-modify-write cycles are not atomic; two processes sharing a store can
//! lose each other's updates.

use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    content::Article,
    metadata::Category,
    url::normalize_path,
};

pub const STORAGE_KEY: &str = "techWiki_progress";

/// Entries listed under "recently read".
pub const RECENT_LEN: usize = 6;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressData {
    /// Canonical article paths, first visit order.
    pub visited_terms: Vec<String>,
    pub reading_paths: Vec<Vec<String>>,
    /// Seconds per canonical path.
    pub time_spent: BTreeMap<String, u64>,
    pub last_visit: DateTime<Utc>,
    pub badges: Vec<String>,
}

impl ProgressData {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            visited_terms: vec![],
            reading_paths: vec![],
            time_spent: BTreeMap::new(),
            last_visit: now,
            badges: vec![],
        }
    }

    fn visited<'a>(&self, corpus: &'a [Article]) -> Vec<&'a Article> {
        self.visited_terms
            .iter()
            .filter_map(|path| corpus.iter().find(|article| article.path.as_str() == path))
            .collect()
    }

    fn visited_in(&self, corpus: &[Article], category: Category) -> usize {
        self.visited(corpus)
            .iter()
            .filter(|article| article.metadata.category == category)
            .count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Badge {
    FirstStep,
    FrontendExplorer,
    UxEnthusiast,
    KnowledgeSeeker,
    RabbitHole,
}

impl Badge {
    pub const ALL: [Badge; 5] = [
        Badge::FirstStep,
        Badge::FrontendExplorer,
        Badge::UxEnthusiast,
        Badge::KnowledgeSeeker,
        Badge::RabbitHole,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::FirstStep => "first_step",
            Self::FrontendExplorer => "frontend_explorer",
            Self::UxEnthusiast => "ux_enthusiast",
            Self::KnowledgeSeeker => "knowledge_seeker",
            Self::RabbitHole => "rabbit_hole",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FirstStep => "First Step",
            Self::FrontendExplorer => "Frontend Explorer",
            Self::UxEnthusiast => "UX Enthusiast",
            Self::KnowledgeSeeker => "Knowledge Seeker",
            Self::RabbitHole => "Rabbit Hole Master",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::FirstStep => "Read your first term",
            Self::FrontendExplorer => "Read 3 Frontend terms",
            Self::UxEnthusiast => "Read 3 UX/UI terms",
            Self::KnowledgeSeeker => "Read 10 terms in total",
            Self::RabbitHole => "Follow 5 links in a row",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::FirstStep => "🎯",
            Self::FrontendExplorer => "💻",
            Self::UxEnthusiast => "🎨",
            Self::KnowledgeSeeker => "📚",
            Self::RabbitHole => "🐰",
        }
    }

    pub fn is_earned(&self, progress: &ProgressData, corpus: &[Article]) -> bool {
        match self {
            Self::FirstStep => !progress.visited_terms.is_empty(),
            Self::FrontendExplorer => progress.visited_in(corpus, Category::Frontend) >= 3,
            Self::UxEnthusiast => progress.visited_in(corpus, Category::UxUi) >= 3,
            Self::KnowledgeSeeker => progress.visited_terms.len() >= 10,
            Self::RabbitHole => progress.reading_paths.iter().any(|path| path.len() >= 5),
        }
    }
}

/// Adds newly earned badges. Earned badges are never taken away.
pub fn award_badges(progress: &mut ProgressData, corpus: &[Article]) -> Vec<Badge> {
    let earned: Vec<Badge> = Badge::ALL
        .iter()
        .copied()
        .filter(|badge| !progress.badges.iter().any(|id| id == badge.id()))
        .filter(|badge| badge.is_earned(progress, corpus))
        .collect();

    for badge in &earned {
        log::info!("Badge earned: {}", badge.name());
        progress.badges.push(badge.id().to_owned());
    }

    earned
}

/// String storage addressed by key, like a browser's local storage.
pub trait ProgressStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove_item(&mut self, key: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl ProgressStore for MemoryStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> anyhow::Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// A JSON object of string values in a single file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> anyhow::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let source = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Could not read {:?}", self.path))?;

        match serde_json::from_str(&source) {
            Ok(items) => Ok(items),
            Err(err) => {
                log::warn!("Store {:?} is corrupt ({}), starting empty", self.path, err);
                Ok(BTreeMap::new())
            }
        }
    }

    fn write(&self, items: &BTreeMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(items)?)
            .with_context(|| format!("Could not write {:?}", self.path))
    }
}

impl ProgressStore for FileStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.read()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut items = self.read()?;
        items.insert(key.to_owned(), value.to_owned());
        self.write(&items)
    }

    fn remove_item(&mut self, key: &str) -> anyhow::Result<()> {
        let mut items = self.read()?;
        if items.remove(key).is_some() {
            self.write(&items)?;
        }
        Ok(())
    }
}

pub struct ProgressTracker<S: ProgressStore> {
    store: S,
}

impl<S: ProgressStore> ProgressTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Current progress. A missing or unreadable document is replaced with
    /// empty progress.
    pub fn load(&mut self, now: DateTime<Utc>) -> anyhow::Result<ProgressData> {
        if let Some(saved) = self.store.get_item(STORAGE_KEY)? {
            match serde_json::from_str(&saved) {
                Ok(progress) => return Ok(progress),
                Err(err) => log::warn!("Discarding corrupt progress data: {}", err),
            }
        }

        let progress = ProgressData::new(now);
        self.save(&progress)?;
        Ok(progress)
    }

    pub fn save(&mut self, progress: &ProgressData) -> anyhow::Result<()> {
        self.store
            .set_item(STORAGE_KEY, &serde_json::to_string(progress)?)
    }

    pub fn reset(&mut self) -> anyhow::Result<()> {
        self.store.remove_item(STORAGE_KEY)
    }

    fn update(
        &mut self,
        now: DateTime<Utc>,
        f: impl FnOnce(&mut ProgressData),
    ) -> anyhow::Result<ProgressData> {
        let mut progress = self.load(now)?;
        f(&mut progress);
        self.save(&progress)?;
        Ok(progress)
    }

    /// Marks `path` as read and awards any badges this unlocks.
    pub fn record_visit(
        &mut self,
        path: &str,
        corpus: &[Article],
        now: DateTime<Utc>,
    ) -> anyhow::Result<ProgressData> {
        let path = normalize_path(path);
        self.update(now, |progress| {
            if !progress.visited_terms.contains(&path) {
                progress.visited_terms.push(path);
            }
            progress.last_visit = now;
            award_badges(progress, corpus);
        })
    }

    pub fn record_time(
        &mut self,
        path: &str,
        seconds: u64,
        now: DateTime<Utc>,
    ) -> anyhow::Result<ProgressData> {
        let path = normalize_path(path);
        self.update(now, |progress| {
            *progress.time_spent.entry(path).or_insert(0) += seconds;
        })
    }

    /// Records navigation from one article to another. Continues the reading
    /// path that ends at `from`, or starts a new one.
    pub fn follow_link(
        &mut self,
        from: &str,
        to: &str,
        corpus: &[Article],
        now: DateTime<Utc>,
    ) -> anyhow::Result<ProgressData> {
        let (from, to) = (normalize_path(from), normalize_path(to));
        self.update(now, |progress| {
            match progress
                .reading_paths
                .iter_mut()
                .rev()
                .find(|path| path.last() == Some(&from))
            {
                Some(path) => path.push(to),
                None => progress.reading_paths.push(vec![from, to]),
            }
            award_badges(progress, corpus);
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProgress {
    pub category: Category,
    pub visited: usize,
    pub total: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BadgeState {
    pub badge: Badge,
    pub earned: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary<'a> {
    pub visited: usize,
    pub total: usize,
    pub percent: u32,
    pub reading_minutes: u32,
    pub categories: Vec<CategoryProgress>,
    pub badges: Vec<BadgeState>,
    /// Newest first.
    pub recent: Vec<&'a Article>,
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        ((part as f64 / total as f64) * 100.0).round() as u32
    }
}

impl<'a> ProgressSummary<'a> {
    pub fn new(progress: &ProgressData, corpus: &'a [Article]) -> Self {
        let visited = progress.visited(corpus);

        let categories = Category::ALL
            .iter()
            .map(|&category| {
                let total = corpus
                    .iter()
                    .filter(|article| article.metadata.category == category)
                    .count();
                let count = progress.visited_in(corpus, category);

                CategoryProgress {
                    category,
                    visited: count,
                    total,
                    percent: percent(count, total),
                }
            })
            .collect();

        let badges = Badge::ALL
            .iter()
            .map(|&badge| BadgeState {
                badge,
                earned: progress.badges.iter().any(|id| id == badge.id())
                    || badge.is_earned(progress, corpus),
            })
            .collect();

        Self {
            visited: progress.visited_terms.len(),
            total: corpus.len(),
            percent: percent(progress.visited_terms.len().min(corpus.len()), corpus.len()),
            reading_minutes: visited
                .iter()
                .map(|article| article.metadata.reading_minutes())
                .sum(),
            categories,
            badges,
            recent: visited.iter().rev().take(RECENT_LEN).copied().collect(),
        }
    }
}
