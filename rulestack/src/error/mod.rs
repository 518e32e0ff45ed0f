//! Error types produced while assembling a rule collection.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias for results carrying a [`CollectionError`].
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Errors that can occur while building a rule collection from a document
/// stream.
///
/// Every failure aborts the whole build; no partial collection is returned.
/// The message for each protocol violation carries a stable keyword that
/// callers and tests match on: `base path`, `not a directory`, `filename`,
/// `outside`, `recursion` and `Unknown`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CollectionError {
    /// An `include` action was encountered but no base path was configured.
    #[error("action 'include' requires a base path, but none was configured")]
    MissingBasePath,

    /// The configured base path does not denote an existing directory.
    #[error("base path '{path}' is not a directory")]
    InvalidBasePath {
        /// The base path that failed validation.
        path: Utf8PathBuf,
    },

    /// An `include` document did not carry a usable `filename` key.
    #[error("action 'include' requires a filename")]
    MissingFilename,

    /// The include target is absolute or escapes the base path via traversal.
    #[error("include target '{filename}' resolves outside the base path '{base}'")]
    OutsideBasePath {
        /// The offending `filename` value as written in the document.
        filename: String,
        /// The sandbox root the target must stay inside.
        base: Utf8PathBuf,
    },

    /// Nested includes exceeded the configured recursion limit.
    #[error("include recursion limit of {limit} exceeded while resolving '{filename}'")]
    RecursionLimit {
        /// The include target that tripped the limit.
        filename: String,
        /// The limit in force for this build.
        limit: usize,
    },

    /// A document carried an `action` value outside the recognised set.
    #[error("Unknown action '{action}'")]
    UnknownAction {
        /// The unrecognised `action` value.
        action: String,
    },

    /// A `repeat` action was encountered before anything had been emitted.
    #[error("action 'repeat' without a previous rule definition")]
    RepeatWithoutPrevious,

    /// Reading a document source from the filesystem failed.
    #[error("failed to read '{path}': {source}")]
    File {
        /// The path that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Deserialising a document stream failed.
    #[error("failed to parse document stream from {source_name}: {source}")]
    Parse {
        /// Display name of the stream source (a path or `<values>`).
        source_name: String,
        /// The underlying deserialisation error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A document in the stream was not a mapping.
    #[error("document {index} in {source_name} is not a mapping")]
    Document {
        /// Display name of the stream source.
        source_name: String,
        /// Zero-based position of the offending document.
        index: usize,
    },

    /// Constructing a rule object from a resolved definition failed.
    ///
    /// Failures from the rule-construction seam propagate unchanged; the
    /// collection layer does not reinterpret them.
    #[error("invalid rule definition: {source}")]
    Rule {
        /// The error reported by the rule constructor.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CollectionError {
    /// Wrap an I/O failure for `path` in a [`CollectionError::File`].
    pub(crate) fn file(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    /// Wrap a deserialisation failure in a [`CollectionError::Parse`].
    pub(crate) fn parse(source_name: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            source,
        }
    }

    /// Wrap a rule-construction failure in a [`CollectionError::Rule`].
    pub(crate) fn rule(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Rule {
            source: source.into(),
        }
    }
}
