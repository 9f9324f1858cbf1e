// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use crate::metadata::FrontMatter;

#[derive(Debug, PartialEq)]
pub enum SplitError {
    /// An opening `---` with no closing fence.
    Unterminated,
}

/// Splits `source` into the raw YAML between the `---` fences and the body
/// after them. Returns `Ok(None)` when the file has no front-matter block.
pub fn split(source: &str) -> Result<Option<(&str, &str)>, SplitError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = source.split_inclusive('\n');

    let opening = match lines.next() {
        Some(line) if is_fence(line, false) => line,
        _ => return Ok(None),
    };

    let yaml_start = opening.len();
    let mut offset = yaml_start;

    for line in lines {
        if is_fence(line, true) {
            let yaml = &source[yaml_start..offset];
            let body = &source[offset + line.len()..];
            return Ok(Some((yaml, body)));
        }
        offset += line.len();
    }

    Err(SplitError::Unterminated)
}

fn is_fence(line: &str, closing: bool) -> bool {
    let line = line.trim_end();
    line == "---" || (closing && line == "...")
}

/// Parses the YAML block. An empty block yields empty front-matter.
pub fn parse(yaml: &str) -> Result<FrontMatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }

    serde_yaml::from_str(yaml)
}
