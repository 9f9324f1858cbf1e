// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reading time shown for articles that don't declare one.
pub const DEFAULT_READING_TIME: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Frontend,
    UxUi,
    Backend,
    General,
    Tools,
    Concepts,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Frontend,
        Category::UxUi,
        Category::Backend,
        Category::General,
        Category::Tools,
        Category::Concepts,
    ];

    /// The URL segment, also the name of the content directory.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::UxUi => "ux-ui",
            Self::Backend => "backend",
            Self::General => "general",
            Self::Tools => "tools",
            Self::Concepts => "concepts",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Frontend => "Frontend",
            Self::UxUi => "UX/UI",
            Self::Backend => "Backend",
            Self::General => "General",
            Self::Tools => "Tools",
            Self::Concepts => "Concepts",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Frontend => "💻",
            Self::UxUi => "🎨",
            Self::Backend => "⚙️",
            Self::General => "📚",
            Self::Tools => "🔧",
            Self::Concepts => "💡",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Frontend => "Client-side technologies such as React, HTML, CSS, JavaScript and modern frameworks",
            Self::UxUi => "User experience and interface design, wireframes, prototypes and design methods",
            Self::Backend => "Server-side technologies, APIs, databases and system architecture",
            Self::General => "General technology concepts, software development and methodologies",
            Self::Tools => "Editors, build tools, version control and the rest of the daily toolbox",
            Self::Concepts => "Cross-cutting ideas and patterns that show up everywhere",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "frontend" => Ok(Self::Frontend),
            "ux-ui" | "ux/ui" | "uxui" | "ux" => Ok(Self::UxUi),
            "backend" => Ok(Self::Backend),
            "general" => Ok(Self::General),
            "tools" | "herramientas" => Ok(Self::Tools),
            "concepts" | "conceptos" => Ok(Self::Concepts),
            _ => Err(format!("unknown category `{}`", s)),
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Listing order of the difficulty buckets.
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    /// Legacy Spanish values are read and normalized, never written back.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "easy" | "principiante" | "facil" | "fácil" => Ok(Self::Beginner),
            "intermediate" | "intermedio" => Ok(Self::Intermediate),
            "advanced" | "avanzado" => Ok(Self::Advanced),
            _ => Err(format!("unknown difficulty `{}`", s)),
        }
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Front-matter exactly as written in the file. Everything is optional here;
/// required keys are enforced by [`ArticleMetadata::from_front_matter`].
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(alias = "relacionados", alias = "related_slugs")]
    pub related: Option<Vec<String>>,
    #[serde(alias = "tiempo_lectura", alias = "reading-time")]
    pub reading_time: Option<u32>,
    #[serde(alias = "descripcion_corta")]
    pub short_description: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ArticleMetadata {
    pub title: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub related: Vec<String>,
    pub reading_time: Option<u32>,
    pub short_description: Option<String>,
    pub description: Option<String>,
}

/// Explicit front-matter category wins; the enclosing directory is the fallback.
pub fn merge_category(explicit: Option<Category>, directory: Option<Category>) -> Option<Category> {
    explicit.or(directory)
}

impl ArticleMetadata {
    pub fn from_front_matter(raw: FrontMatter, directory: &str) -> Result<Self, String> {
        let title = raw
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or("missing required key `title`")?;
        let difficulty: Difficulty = raw
            .difficulty
            .ok_or("missing required key `difficulty`")?
            .parse()?;
        let explicit = raw.category.map(|c| c.parse::<Category>()).transpose()?;
        let category = merge_category(explicit, directory.parse().ok()).ok_or_else(|| {
            format!(
                "no `category` key and directory `{}` is not a category",
                directory
            )
        })?;

        Ok(Self {
            title,
            category,
            difficulty,
            tags: raw.tags.unwrap_or_default(),
            related: raw.related.unwrap_or_default(),
            reading_time: raw.reading_time,
            short_description: raw.short_description,
            description: raw.description,
        })
    }

    pub fn reading_minutes(&self) -> u32 {
        self.reading_time.unwrap_or(DEFAULT_READING_TIME)
    }

    /// Short blurb for listings.
    pub fn summary(&self) -> Option<&str> {
        self.short_description
            .as_deref()
            .or(self.description.as_deref())
    }
}
