//! Deep-merge mechanics for raw rule definitions.
//!
//! The merge is the primitive every action in the collection protocol builds
//! on: `global` folds documents into the accumulated defaults, `repeat` folds
//! an override into the last emitted definition, and plain documents are
//! overlaid onto the defaults before emission.

use serde_json::Value;

use crate::document::RawDefinition;

/// Overlay `overlay` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - Mappings merge recursively: keys only in `overlay` are inserted, keys
///   only in `target` are retained, and nested mappings are overlaid.
/// - Any other pairing (scalars, arrays, or a type conflict) replaces
///   `target` wholesale. Arrays are never merged element-wise.
///
/// # Examples
///
/// ```rust
/// use rulestack::merge_value;
/// use serde_json::json;
///
/// let mut acc = json!({"a": 1, "b": {"x": 1}});
/// merge_value(&mut acc, json!({"b": {"y": 2}, "c": 3}));
/// assert_eq!(acc, json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3}));
///
/// // Arrays replace existing values.
/// merge_value(&mut acc, json!({"b": [1, 2, 3]}));
/// assert_eq!(acc["b"], json!([1, 2, 3]));
/// ```
pub fn merge_value(target: &mut Value, overlay: Value) {
    match (target, overlay) {
        (Value::Object(base), Value::Object(overlay)) => deep_merge(base, overlay),
        (slot, overlay) => *slot = overlay,
    }
}

/// Merge `overlay` into `base`, mutating `base`.
///
/// Semantics mirror [`merge_value`] at the mapping level. The operation is
/// total: it cannot fail, and it has no observable effect on values supplied
/// to other merge calls because `overlay` is consumed by value.
pub fn deep_merge(base: &mut RawDefinition, overlay: RawDefinition) {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

/// Return a fresh mapping equal to `base` with `overlay` merged on top.
///
/// `base` is left untouched, which is what the collection builder needs when
/// overlaying a document onto the shared defaults.
#[must_use]
pub fn merged(base: &RawDefinition, overlay: RawDefinition) -> RawDefinition {
    let mut result = base.clone();
    deep_merge(&mut result, overlay);
    result
}
