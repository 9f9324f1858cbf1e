// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a single article. "Not found" is not an error; lookups
/// report it as `None`.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid front-matter YAML in {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("malformed article {path:?}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

impl ContentError {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Io { path, .. }
            | Self::Walk { path, .. }
            | Self::Yaml { path, .. }
            | Self::Malformed { path, .. } => path,
        }
    }
}
