//! Reusable predicates for [`Validator::check`](super::Validator::check)

use std::collections::HashSet;
use std::hash::Hash;

/// True when no value appears twice. Empty and single-item slices are unique.
pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|value| seen.insert(value))
}

/// True when `value` is one of `permitted`.
pub fn permitted_value<T, S>(value: &T, permitted: &[S]) -> bool
where
    T: PartialEq<S> + ?Sized,
{
    permitted.iter().any(|candidate| value == candidate)
}
