//! Typed read access over a parsed YAML node.
//!
//! A [`Tag`] pairs a borrowed `serde_yaml::Value` with its path inside the
//! document, so every structural complaint can name the offending tag.
//! Tags only live for the duration of a load; definitions copy strings out.

use std::fmt;

use serde_yaml::Value;

use crate::error::{LoadError, LoadResult};

const ROOT: &str = "<root>";

/// A node of the test document together with its path.
#[derive(Debug, Clone)]
pub struct Tag<'a> {
    path: String,
    node: &'a Value,
    position: Option<usize>,
}

impl<'a> Tag<'a> {
    /// Wrap `node` found at `path` (slash separated, e.g. `tests[2]/output`).
    pub fn new(path: impl Into<String>, node: &'a Value) -> Self {
        Self {
            path: path.into(),
            node,
            position: None,
        }
    }

    /// The document root.
    pub fn root(node: &'a Value) -> Self {
        Self::new("", node)
    }

    pub fn path(&self) -> &str {
        if self.path.is_empty() {
            ROOT
        } else {
            &self.path
        }
    }

    pub fn node(&self) -> &'a Value {
        self.node
    }

    /// 1-based position in the parent sequence, for tags produced by
    /// [`Tag::sequence`].
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Single-entry mappings (`{kind: expected}`) as a key/value pair.
    pub fn single_entry(&self) -> Option<(&'a Value, &'a Value)> {
        match self.node {
            Value::Mapping(map) if map.len() == 1 => map.iter().next(),
            _ => None,
        }
    }

    /// Fail unless this tag is a mapping.
    pub fn assert_mapping(&self) -> LoadResult<()> {
        if self.node.is_mapping() {
            Ok(())
        } else {
            Err(LoadError::NotAMapping {
                tag_path: self.path().to_string(),
            })
        }
    }

    /// Fail with [`LoadError::MissingTag`] unless `child` is present and not null.
    pub fn assert_present(&self, child: &str) -> LoadResult<()> {
        self.find(child).map(|_| ()).ok_or_else(|| self.missing(child))
    }

    /// Value of `child` in its canonical string form.
    pub fn get(&self, child: &str) -> LoadResult<String> {
        self.find(child)
            .map(canonical)
            .ok_or_else(|| self.missing(child))
    }

    /// Value of an optional `child`, or `default` when it is absent or null.
    pub fn get_or(&self, child: &str, default: &str) -> String {
        self.find(child)
            .map(canonical)
            .unwrap_or_else(|| default.to_string())
    }

    /// Descend into a present `child`.
    pub fn child(&self, child: &str) -> LoadResult<Tag<'a>> {
        self.find(child)
            .map(|node| Tag::new(self.join(child), node))
            .ok_or_else(|| self.missing(child))
    }

    /// Elements of the sequence under `child`, skipping null entries.
    ///
    /// Element paths keep their position in the document (1-based), so a
    /// skipped null leaves a gap rather than renumbering its siblings.
    pub fn sequence(&self, child: &str) -> LoadResult<Vec<Tag<'a>>> {
        self.assert_present(child)?;
        let items = self
            .find(child)
            .and_then(Value::as_sequence)
            .ok_or_else(|| LoadError::NotASequence {
                tag_path: self.path().to_string(),
                child: child.to_string(),
            })?;

        let base = self.join(child);
        Ok(items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_null())
            .map(|(i, item)| Tag {
                path: format!("{}[{}]", base, i + 1),
                node: item,
                position: Some(i + 1),
            })
            .collect())
    }

    fn find(&self, child: &str) -> Option<&'a Value> {
        self.node.get(child).filter(|value| !value.is_null())
    }

    fn join(&self, child: &str) -> String {
        if self.path.is_empty() {
            child.to_string()
        } else {
            format!("{}/{}", self.path, child)
        }
    }

    fn missing(&self, child: &str) -> LoadError {
        LoadError::MissingTag {
            tag_path: self.path().to_string(),
            child: child.to_string(),
        }
    }
}

impl fmt::Display for Tag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag \"{}\"", self.path())
    }
}

/// Canonical string form of a node.
///
/// Scalars render as written; mappings and sequences render as compact YAML.
pub fn canonical(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => canonical(&tagged.value),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
