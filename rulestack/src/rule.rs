//! The rule-construction seam and a default rule type.
//!
//! The collection layer resolves merge and inclusion only; what a rule
//! *means* lives behind [`FromRawDefinition`]. Consumers with their own rule
//! model implement the trait; [`Rule`] is a shape-only default that mirrors
//! the common detection-rule layout without validating its semantics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::RawDefinition;

/// Construct a rule object from a resolved definition.
///
/// Implementations may reject malformed content; the failure propagates
/// unchanged as [`crate::CollectionError::Rule`] and aborts the build.
pub trait FromRawDefinition: Sized {
    /// Error reported when a definition cannot be turned into a rule.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the rule from a definition with all merge state applied and the
    /// `action` key already stripped.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when the definition is malformed.
    fn from_raw(definition: RawDefinition) -> Result<Self, Self::Error>;
}

/// Identity construction: collect the resolved definitions themselves.
impl FromRawDefinition for RawDefinition {
    type Error = std::convert::Infallible;

    fn from_raw(definition: RawDefinition) -> Result<Self, Self::Error> {
        Ok(definition)
    }
}

/// The log source a rule applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSource {
    /// Event category, e.g. `process_creation`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Originating product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    /// Originating service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl LogSource {
    /// Log source restricted to a category.
    #[must_use]
    pub fn category(name: impl Into<String>) -> Self {
        Self {
            category: Some(name.into()),
            ..Self::default()
        }
    }

    /// Log source restricted to a service.
    #[must_use]
    pub fn service(name: impl Into<String>) -> Self {
        Self {
            service: Some(name.into()),
            ..Self::default()
        }
    }
}

/// A detection rule as assembled by the collection layer.
///
/// Every field is optional by design: the collection protocol is agnostic to
/// rule semantics, and downstream consumers decide what is mandatory. Keys
/// outside the known set are preserved in [`Rule::custom`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    /// Rule title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Stable rule identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Maturity status, e.g. `experimental` or `stable`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reference URLs or document identifiers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    /// Rule author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Classification tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// The log source the rule applies to.
    pub logsource: LogSource,
    /// Raw detection logic; its grammar is outside the collection layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection: Option<Value>,
    /// Fields of interest for display alongside matches.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Known benign triggers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub falsepositives: Vec<String>,
    /// Severity level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Any keys not covered by the named fields.
    #[serde(flatten)]
    pub custom: RawDefinition,
}

impl FromRawDefinition for Rule {
    type Error = serde_json::Error;

    fn from_raw(definition: RawDefinition) -> Result<Self, Self::Error> {
        serde_json::from_value(Value::Object(definition))
    }
}
