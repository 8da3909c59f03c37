//! Test definitions: one declared command plus the predicates its output must meet.

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};
use crate::predicate::Predicate;
use crate::tag::{canonical, Tag};

/// A validated test, detached from the document it was loaded from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestDefinition {
    /// Test name; falls back to `test[<position>]` when the document has none.
    pub name: String,

    /// Free-form description of what the image is expected to provide.
    pub assumption: String,

    /// Command line to run inside the image.
    pub command: String,

    /// Output predicates, in document order.
    pub predicates: Vec<Predicate>,
}

impl TestDefinition {
    /// Load the test element at 1-based `position` of the `tests` sequence.
    ///
    /// Accepts both the flat shape (`- cmd: ...`) and the wrapped shape
    /// (`- test: {cmd: ...}`).
    pub fn from_tag(tag: &Tag<'_>, position: usize) -> LoadResult<Self> {
        let tag = unwrap_test(tag)?;
        tag.assert_mapping()?;

        let name = tag.get_or("name", "").trim().to_string();
        let name = if name.is_empty() {
            format!("test[{}]", position)
        } else {
            name
        };
        let assumption = tag.get_or("assume", "");

        let command = tag.get("cmd")?;
        if command.split_whitespace().next().is_none() {
            return Err(LoadError::EmptyCommand {
                tag_path: tag.path().to_string(),
            });
        }

        let predicates = tag
            .sequence("output")?
            .iter()
            .map(predicate_from_tag)
            .collect::<LoadResult<Vec<_>>>()?;
        if predicates.is_empty() {
            return Err(LoadError::EmptyOutput {
                tag_path: tag.path().to_string(),
            });
        }

        Ok(Self {
            name,
            assumption,
            command,
            predicates,
        })
    }

    /// The command split on whitespace. No shell quoting is interpreted.
    pub fn args(&self) -> Vec<String> {
        self.command.split_whitespace().map(str::to_string).collect()
    }
}

fn unwrap_test<'a>(tag: &Tag<'a>) -> LoadResult<Tag<'a>> {
    match tag.single_entry() {
        Some((key, inner)) if key.as_str() == Some("test") && inner.is_mapping() => {
            Ok(Tag::new(format!("{}/test", tag.path()), inner))
        }
        _ => Ok(tag.clone()),
    }
}

fn predicate_from_tag(tag: &Tag<'_>) -> LoadResult<Predicate> {
    let (kind, expected) = tag
        .single_entry()
        .ok_or_else(|| LoadError::MalformedPredicate {
            tag_path: tag.path().to_string(),
            reason: "expected a single `kind: expected` entry".to_string(),
        })?;
    let kind = kind.as_str().ok_or_else(|| LoadError::MalformedPredicate {
        tag_path: tag.path().to_string(),
        reason: format!("predicate kind `{}` is not a string", canonical(kind)),
    })?;
    Predicate::new(kind, canonical(expected))
}
