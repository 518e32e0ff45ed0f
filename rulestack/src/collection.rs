//! The ordered, indexable result of a build.

use std::ops::Index;
use std::slice;

use camino::Utf8Path;
use serde_json::Value;

use crate::builder::CollectionBuilder;
use crate::document::{DocumentStream, RawDefinition};
use crate::error::CollectionResult;
use crate::rule::{FromRawDefinition, Rule};

/// An ordered sequence of rule objects in emission order.
///
/// Insertion order equals emission order during the document walk:
/// include-expanded, depth-first, in source order. Two collections are equal
/// iff they have the same length and pairwise-equal rules in order. The
/// collection is immutable once the build call returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleCollection<R = Rule> {
    rules: Vec<R>,
}

impl<R: FromRawDefinition> RuleCollection<R> {
    /// Fresh builder for configuring a base path or recursion limit.
    #[must_use]
    pub fn builder() -> CollectionBuilder<R> {
        CollectionBuilder::new()
    }

    /// Build a collection from an in-memory ordered sequence of values.
    ///
    /// `base_path` is only consulted when an `include` document is
    /// encountered anywhere in the stream.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::CollectionError`] if any value is not a mapping or
    /// the document walk fails.
    pub fn from_values(
        values: impl IntoIterator<Item = Value>,
        base_path: Option<&Utf8Path>,
    ) -> CollectionResult<Self> {
        Self::from_stream(DocumentStream::from_values(values)?, base_path)
    }

    /// Build a collection from already-mapped definitions.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::CollectionError`] if the document walk fails.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = RawDefinition>,
        base_path: Option<&Utf8Path>,
    ) -> CollectionResult<Self> {
        Self::from_stream(DocumentStream::from_definitions(definitions), base_path)
    }

    /// Build a collection from a multi-document YAML string.
    ///
    /// No base path is configured: `include` documents in the stream fail
    /// with a "base path" error. Use [`RuleCollection::builder`] to supply
    /// one.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::CollectionError`] on parse failure or if the
    /// document walk fails.
    pub fn from_yaml(data: &str) -> CollectionResult<Self> {
        Self::from_stream(DocumentStream::from_yaml(data, "<yaml>")?, None)
    }

    /// Load a multi-document YAML file and build a collection from it.
    ///
    /// The file's parent directory becomes the sandbox root for any
    /// `include` documents, including nested ones.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::CollectionError`] if the file cannot be read or
    /// parsed, or if the document walk fails.
    pub fn from_yaml_path(path: impl AsRef<Utf8Path>) -> CollectionResult<Self> {
        let path = path.as_ref();
        let base = parent_or_dot(path);
        Self::from_stream(DocumentStream::from_yaml_path(path)?, Some(base))
    }

    fn from_stream(stream: DocumentStream, base_path: Option<&Utf8Path>) -> CollectionResult<Self> {
        let mut builder = Self::builder();
        if let Some(base) = base_path {
            builder = builder.base_path(base);
        }
        builder.build(stream)
    }
}

impl<R> RuleCollection<R> {
    pub(crate) fn new(rules: Vec<R>) -> Self {
        Self { rules }
    }

    /// Number of rules in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the collection holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&R> {
        self.rules.get(index)
    }

    /// Iterate over the rules in emission order.
    pub fn iter(&self) -> slice::Iter<'_, R> {
        self.rules.iter()
    }
}

impl<R> Index<usize> for RuleCollection<R> {
    type Output = R;

    fn index(&self, index: usize) -> &Self::Output {
        self.rules.index(index)
    }
}

impl<R> IntoIterator for RuleCollection<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a RuleCollection<R> {
    type Item = &'a R;
    type IntoIter = slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Parent directory of `path`, falling back to `"."` when the path has no
/// parent or the parent is empty.
fn parent_or_dot(path: &Utf8Path) -> &Utf8Path {
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."))
}
