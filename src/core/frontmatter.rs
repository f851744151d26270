//! YAML frontmatter extraction for `SKILL.md`.
//!
//! A document carries frontmatter when its first line is `---` and a later
//! line is `---`. Everything between is parsed as YAML and cast to
//! [`SkillFrontmatter`]; anything malformed or incomplete yields no
//! frontmatter at all.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::trace;

const DELIMITER: &str = "---";

/// Metadata a skill declares about itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillFrontmatter {
    pub name: String,
    pub description: String,
    pub license: String,
    pub metadata: FrontmatterMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrontmatterMetadata {
    pub author: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Result of parsing a skill document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSkillFile {
    pub frontmatter: Option<SkillFrontmatter>,
    /// Markdown body with the frontmatter block removed and trimmed.
    pub content: String,
    /// The input, unmodified.
    pub raw: String,
}

pub struct FrontmatterParser;

impl FrontmatterParser {
    /// True when the document (ignoring leading whitespace) opens with `---`.
    #[must_use]
    pub fn has_frontmatter(document: &str) -> bool {
        document.trim_start().starts_with(DELIMITER)
    }

    #[must_use]
    pub fn parse(document: &str) -> ParsedSkillFile {
        let unparsed = || ParsedSkillFile {
            frontmatter: None,
            content: document.to_string(),
            raw: document.to_string(),
        };

        if !Self::has_frontmatter(document) {
            return unparsed();
        }

        let Some((block, body)) = split_fenced(document) else {
            trace!("frontmatter fence is not closed");
            return unparsed();
        };

        let value: Value = match serde_yaml::from_str(block) {
            Ok(value) => value,
            Err(err) => {
                trace!(error = %err, "frontmatter is not valid YAML");
                return unparsed();
            }
        };

        ParsedSkillFile {
            frontmatter: cast_frontmatter(&value),
            content: body.trim().to_string(),
            raw: document.to_string(),
        }
    }
}

/// Split `---\n<block>\n---\n<body>` into block and body. The closing
/// fence needs a line of its own after the opener, so `---\n---` opens a
/// block rather than closing an empty one.
fn split_fenced(document: &str) -> Option<(&str, &str)> {
    let rest = document
        .strip_prefix("---\n")
        .or_else(|| document.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if offset > 0 && line.trim_end_matches(['\n', '\r']) == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn cast_frontmatter(value: &Value) -> Option<SkillFrontmatter> {
    let root = value.as_mapping()?;
    let name = required_str(root, "name")?;
    let description = required_str(root, "description")?;
    let license = required_str(root, "license")?;

    let metadata = root.get("metadata")?.as_mapping()?;
    let author = required_str(metadata, "author")?;
    let version = required_str(metadata, "version")?;
    let tags = metadata.get("tags").and_then(Value::as_sequence).map(|seq| {
        seq.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    });

    Some(SkillFrontmatter {
        name,
        description,
        license,
        metadata: FrontmatterMetadata {
            author,
            version,
            tags,
        },
    })
}

fn required_str(map: &Mapping, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
