//! Suite loading: YAML document to ordered test definitions.

use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::definition::TestDefinition;
use crate::error::{LoadError, LoadResult};
use crate::tag::Tag;

/// Load every test of a YAML document, in document order.
///
/// The `version` tag is checked before `tests` is looked at. The first
/// structural problem aborts the load.
pub fn load_str(text: &str) -> LoadResult<Vec<TestDefinition>> {
    let document: Value = serde_yaml::from_str(text)?;
    load_value(&document)
}

/// Read and load a test document from disk.
pub fn load_path(path: &Path) -> LoadResult<Vec<TestDefinition>> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Loading test document");
    load_str(&text)
}

/// Load from an already parsed document.
pub fn load_value(document: &Value) -> LoadResult<Vec<TestDefinition>> {
    let root = Tag::root(document);
    root.assert_mapping()?;
    let version = root.get("version")?;

    let tests = root.sequence("tests")?;
    if tests.is_empty() {
        return Err(LoadError::NoTests);
    }

    let definitions = tests
        .iter()
        .enumerate()
        .map(|(i, tag)| TestDefinition::from_tag(tag, tag.position().unwrap_or(i + 1)))
        .collect::<LoadResult<Vec<_>>>()?;

    debug!(version = %version, tests = definitions.len(), "Loaded test document");
    Ok(definitions)
}
