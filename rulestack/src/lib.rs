//! Ordered rule-collection assembly from document streams.
//!
//! A document stream is a sequence of loosely-structured mappings, typically
//! deserialised from multi-document YAML. Each document either contributes a
//! rule or steers the merge state through its `action` key:
//!
//! - *absent* — overlay the document onto the accumulated defaults and emit
//!   one rule;
//! - `global` — fold the document into the defaults applied to every later
//!   document (emits nothing);
//! - `reset` — discard the accumulated defaults;
//! - `repeat` — re-emit the previous definition with fields overridden;
//! - `include` — splice in another document stream from the filesystem,
//!   sandboxed to a base directory and recursion-bounded; merge state is
//!   shared across the inclusion boundary.
//!
//! The result is a flat, ordered [`RuleCollection`]. Rule semantics stay
//! behind the [`FromRawDefinition`] seam; the crate only implements the merge
//! and inclusion protocol.
//!
//! ```rust
//! use rulestack::{Rule, RuleCollection};
//! use serde_json::json;
//!
//! let collection: RuleCollection<Rule> = RuleCollection::from_values(
//!     [
//!         json!({"action": "global", "title": "Suspicious Launch", "detection": {"condition": "sel"}}),
//!         json!({"logsource": {"category": "process_creation"}}),
//!         json!({"logsource": {"category": "network_connection"}}),
//!     ],
//!     None,
//! )?;
//! assert_eq!(collection.len(), 2);
//! assert_eq!(collection[0].title.as_deref(), Some("Suspicious Launch"));
//! assert_eq!(collection[1].logsource.category.as_deref(), Some("network_connection"));
//! # Ok::<_, rulestack::CollectionError>(())
//! ```

mod builder;
mod collection;
mod document;
mod error;
mod include;
mod merge;
mod rule;

pub use builder::CollectionBuilder;
pub use collection::RuleCollection;
pub use document::{DocumentStream, RawDefinition};
pub use error::{CollectionError, CollectionResult};
pub use include::DEFAULT_RECURSION_LIMIT;
pub use merge::{deep_merge, merge_value, merged};
pub use rule::{FromRawDefinition, LogSource, Rule};
