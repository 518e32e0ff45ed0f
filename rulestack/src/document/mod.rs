//! Raw document streams feeding the collection builder.
//!
//! A stream is an ordered sequence of raw mappings read from one named
//! source: in-memory values, a multi-document YAML string, or a file path.
//! Parsing is delegated to `serde_yaml`; the builder itself only ever sees
//! [`RawDefinition`] mappings.

use camino::Utf8Path;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{CollectionError, CollectionResult};

/// One document as read from a stream: a mapping from string keys to
/// arbitrary nested values.
///
/// No keys are required at this layer except the optional `action` metadata
/// key (and `filename` when the action is `include`).
pub type RawDefinition = serde_json::Map<String, Value>;

/// Display name used for streams built from in-memory values.
const VALUES_SOURCE: &str = "<values>";

/// An ordered sequence of raw mappings from a named source.
#[derive(Debug, Clone, Default)]
pub struct DocumentStream {
    source: String,
    documents: Vec<RawDefinition>,
}

impl DocumentStream {
    /// Build a stream from already-mapped definitions.
    #[must_use]
    pub fn from_definitions(definitions: impl IntoIterator<Item = RawDefinition>) -> Self {
        Self {
            source: VALUES_SOURCE.to_owned(),
            documents: definitions.into_iter().collect(),
        }
    }

    /// Build a stream from in-memory values.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Document`] if any value is not a mapping.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> CollectionResult<Self> {
        let documents = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| into_definition(value, VALUES_SOURCE, index))
            .filter_map(Result::transpose)
            .collect::<CollectionResult<Vec<_>>>()?;
        Ok(Self {
            source: VALUES_SOURCE.to_owned(),
            documents,
        })
    }

    /// Parse a multi-document YAML string into a stream.
    ///
    /// Empty documents (for example a bare `---` separator) are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Parse`] on malformed YAML and
    /// [`CollectionError::Document`] if a document is not a mapping.
    pub fn from_yaml(data: &str, source_name: impl Into<String>) -> CollectionResult<Self> {
        let source = source_name.into();
        let mut documents = Vec::new();
        for (index, deserializer) in serde_yaml::Deserializer::from_str(data).enumerate() {
            let value = Value::deserialize(deserializer)
                .map_err(|err| CollectionError::parse(source.clone(), err))?;
            if let Some(definition) = into_definition(value, &source, index)? {
                documents.push(definition);
            }
        }
        debug!(source = %source, documents = documents.len(), "parsed document stream");
        Ok(Self { source, documents })
    }

    /// Read `path` and parse it as a multi-document YAML stream.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::File`] if the file cannot be read, plus any
    /// error from [`DocumentStream::from_yaml`].
    pub fn from_yaml_path(path: &Utf8Path) -> CollectionResult<Self> {
        let data =
            std::fs::read_to_string(path).map_err(|err| CollectionError::file(path, err))?;
        Self::from_yaml(&data, path.as_str())
    }

    /// Display name of the source this stream was read from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of documents in the stream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the stream holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl IntoIterator for DocumentStream {
    type Item = RawDefinition;
    type IntoIter = std::vec::IntoIter<RawDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

/// Convert one deserialised value into a definition mapping.
///
/// Null documents are skipped (`Ok(None)`); anything else that is not a
/// mapping is a [`CollectionError::Document`].
fn into_definition(
    value: Value,
    source: &str,
    index: usize,
) -> CollectionResult<Option<RawDefinition>> {
    match value {
        Value::Object(map) => Ok(Some(map)),
        Value::Null => Ok(None),
        _ => Err(CollectionError::Document {
            source_name: source.to_owned(),
            index,
        }),
    }
}

#[cfg(test)]
mod tests;
