//! The state machine driving a document walk.
//!
//! Each document either mutates the shared merge state (`global`, `reset`),
//! emits a rule (`repeat`, or no action at all), or splices in another
//! document stream (`include`). The state travels by mutable reference
//! through include recursion, so an included file can set defaults that
//! persist after the inclusion returns, or consume defaults set before it.

use camino::Utf8PathBuf;
use serde_json::Value;
use tracing::debug;

use crate::collection::RuleCollection;
use crate::document::{DocumentStream, RawDefinition};
use crate::error::{CollectionError, CollectionResult};
use crate::include;
use crate::merge::{deep_merge, merged};
use crate::rule::{FromRawDefinition, Rule};

/// The merge behaviour a document's `action` key selects.
///
/// The set is closed; anything else is carried as [`Action::Unknown`] so the
/// error can name the offending value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Global,
    Reset,
    Repeat,
    Include,
    Unknown(String),
}

impl Action {
    /// Remove the `action` key from `definition` and decode it.
    ///
    /// Returns `Ok(None)` when the key is absent (the default emit case). A
    /// non-string value is reported as unknown, rendered as written.
    fn take_from(definition: &mut RawDefinition) -> CollectionResult<Option<Self>> {
        let Some(value) = definition.remove("action") else {
            return Ok(None);
        };
        let Value::String(name) = value else {
            return Err(CollectionError::UnknownAction {
                action: value.to_string(),
            });
        };
        Ok(Some(match name.as_str() {
            "global" => Self::Global,
            "reset" => Self::Reset,
            "repeat" => Self::Repeat,
            "include" => Self::Include,
            _ => Self::Unknown(name),
        }))
    }
}

/// Merge state scoped to one build invocation.
///
/// `defaults` always holds a mapping (possibly empty); `last_emitted` is the
/// most recent emission, or `None` before the first one and after a `reset`.
#[derive(Debug, Default)]
struct MergeState {
    defaults: RawDefinition,
    last_emitted: Option<RawDefinition>,
}

/// Walks document streams and accumulates the resulting rule collection.
///
/// A builder is single-use: configure it, then call
/// [`build`](CollectionBuilder::build) with the top-level stream.
#[derive(Debug)]
pub struct CollectionBuilder<R = Rule> {
    base_path: Option<Utf8PathBuf>,
    recursion_limit: usize,
    state: MergeState,
    rules: Vec<R>,
}

impl<R> Default for CollectionBuilder<R> {
    fn default() -> Self {
        Self {
            base_path: None,
            recursion_limit: include::DEFAULT_RECURSION_LIMIT,
            state: MergeState::default(),
            rules: Vec::new(),
        }
    }
}

impl<R: FromRawDefinition> CollectionBuilder<R> {
    /// Builder with no base path and the default recursion limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sandbox root for resolving `include` documents.
    ///
    /// The root is fixed for the whole build: nested includes resolve
    /// against it, never against the including file's own directory.
    #[must_use]
    pub fn base_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Override the include recursion limit.
    #[must_use]
    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Walk `stream` and assemble the collection.
    ///
    /// # Errors
    ///
    /// Returns the first [`CollectionError`] encountered; the build aborts
    /// atomically and no partial collection is returned.
    pub fn build(mut self, stream: DocumentStream) -> CollectionResult<RuleCollection<R>> {
        self.process_stream(stream, 0)?;
        debug!(rules = self.rules.len(), "assembled rule collection");
        Ok(RuleCollection::new(self.rules))
    }

    fn process_stream(&mut self, stream: DocumentStream, depth: usize) -> CollectionResult<()> {
        for document in stream {
            self.process_document(document, depth)?;
        }
        Ok(())
    }

    fn process_document(&mut self, mut document: RawDefinition, depth: usize) -> CollectionResult<()> {
        match Action::take_from(&mut document)? {
            None => {
                let resolved = merged(&self.state.defaults, document);
                self.emit(resolved)
            }
            Some(Action::Global) => {
                deep_merge(&mut self.state.defaults, document);
                // Seed the repeat base so `global` followed immediately by
                // `repeat` emits exactly one rule.
                self.state.last_emitted = Some(self.state.defaults.clone());
                Ok(())
            }
            Some(Action::Reset) => {
                self.state.defaults = RawDefinition::new();
                self.state.last_emitted = None;
                Ok(())
            }
            Some(Action::Repeat) => {
                let previous = self
                    .state
                    .last_emitted
                    .as_ref()
                    .ok_or(CollectionError::RepeatWithoutPrevious)?;
                let resolved = merged(previous, document);
                self.emit(resolved)
            }
            Some(Action::Include) => {
                let filename = document.get("filename").and_then(Value::as_str);
                let nested = include::resolve(
                    filename,
                    self.base_path.as_deref(),
                    depth,
                    self.recursion_limit,
                )?;
                // The nested stream shares this builder's state: defaults
                // and the repeat base persist across the inclusion boundary.
                self.process_stream(nested, depth + 1)
            }
            Some(Action::Unknown(action)) => Err(CollectionError::UnknownAction { action }),
        }
    }

    fn emit(&mut self, definition: RawDefinition) -> CollectionResult<()> {
        self.state.last_emitted = Some(definition.clone());
        let rule = R::from_raw(definition).map_err(CollectionError::rule)?;
        self.rules.push(rule);
        Ok(())
    }
}
