// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::url::Routes;

pub const CONFIG_FILE: &str = "techwiki.yaml";

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub site_url: Option<String>,
    pub content_dir: PathBuf,
    pub extension: String,
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
    pub routes: Routes,
    pub related_limit: usize,
    pub search: SearchConfig,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub min_query_len: usize,
    pub max_results: usize,
    /// Largest accepted distance, 0.0 (exact) to 1.0 (anything).
    pub threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: 3,
            max_results: 5,
            threshold: 0.4,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Tech Wiki".into(),
            site_url: None,
            content_dir: "content".into(),
            extension: "mdx".into(),
            templates_dir: "templates".into(),
            static_dir: "static".into(),
            routes: Routes::default(),
            related_limit: 4,
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    /// Reads `techwiki.yaml` from the site root, if there is one. Relative
    /// directories are resolved against the site root.
    pub fn load(site_root: &Path) -> anyhow::Result<Self> {
        let file = site_root.join(CONFIG_FILE);

        let mut config: Config = if file.is_file() {
            log::info!("Reading configuration from {:?}", file);
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("Could not read {:?}", file))?;
            serde_yaml::from_str(&source).with_context(|| format!("Invalid config {:?}", file))?
        } else {
            log::debug!("No {} in {:?}, using defaults", CONFIG_FILE, site_root);
            Config::default()
        };

        config.content_dir = site_root.join(&config.content_dir);
        config.templates_dir = site_root.join(&config.templates_dir);
        config.static_dir = site_root.join(&config.static_dir);

        Ok(config)
    }
}
