// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod index;
pub mod markup;
pub mod metadata;
pub mod progress;
pub mod search;
pub mod site;
pub mod template;
pub mod url;
