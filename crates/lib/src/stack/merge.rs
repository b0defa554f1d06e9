//! Overlay of caller overrides onto a stack's existing parameters.

use super::{OverrideSet, StackParameter};

/// Merge `overrides` into `existing`.
///
/// With no overrides the existing list is returned untouched, order included.
/// Otherwise the result is every existing parameter whose key is not
/// overridden, in original order, followed by one entry per override in the
/// override set's iteration order. Overridden keys therefore move to the tail.
pub fn merge_parameters(existing: Vec<StackParameter>, overrides: &OverrideSet) -> Vec<StackParameter> {
  if overrides.is_empty() {
    return existing;
  }

  let mut merged: Vec<StackParameter> = existing
    .into_iter()
    .filter(|param| !overrides.contains_key(&param.key))
    .collect();

  merged.extend(
    overrides
      .iter()
      .map(|(key, value)| StackParameter::new(key.clone(), value.clone())),
  );

  merged
}
