//! Output predicates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};

/// The four supported ways of checking command output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    #[serde(rename = "contains")]
    Contains,

    #[serde(rename = "startWith")]
    StartsWith,

    #[serde(rename = "endWith")]
    EndsWith,

    #[serde(rename = "equal")]
    Equals,
}

impl PredicateKind {
    pub const ALL: [PredicateKind; 4] = [
        PredicateKind::Contains,
        PredicateKind::StartsWith,
        PredicateKind::EndsWith,
        PredicateKind::Equals,
    ];

    /// The literal used for this kind in test documents.
    pub fn literal(&self) -> &'static str {
        match self {
            PredicateKind::Contains => "contains",
            PredicateKind::StartsWith => "startWith",
            PredicateKind::EndsWith => "endWith",
            PredicateKind::Equals => "equal",
        }
    }

    /// Parse a document literal.
    pub fn from_literal(literal: &str) -> LoadResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.literal() == literal)
            .ok_or_else(|| LoadError::UnknownPredicateKind {
                kind: literal.to_string(),
            })
    }
}

impl fmt::Display for PredicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// One condition over the captured output of a command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Predicate {
    pub kind: PredicateKind,
    pub expected: String,
}

impl Predicate {
    /// Build a predicate from its document literal and expected value.
    pub fn new(kind: &str, expected: impl Into<String>) -> LoadResult<Self> {
        Ok(Self::of(PredicateKind::from_literal(kind)?, expected))
    }

    pub fn of(kind: PredicateKind, expected: impl Into<String>) -> Self {
        Self {
            kind,
            expected: expected.into(),
        }
    }

    /// Check `actual` against the expected value. Literal and case-sensitive.
    pub fn evaluate(&self, actual: &str) -> bool {
        let expected = self.expected.as_str();
        match self.kind {
            PredicateKind::Contains => actual.contains(expected),
            PredicateKind::StartsWith => actual.starts_with(expected),
            PredicateKind::EndsWith => actual.ends_with(expected),
            PredicateKind::Equals => actual == expected,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.expected)
    }
}
