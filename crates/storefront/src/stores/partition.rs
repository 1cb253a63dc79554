//! Per-user partition map shared by all three stores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stride_core::UserId;

/// Mapping from user to that user's ordered list of entries.
///
/// A user's list is created lazily on first mutation. Clearing resets it to
/// an empty list rather than removing the user. Lookups for unknown users
/// see an empty slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Partitions<T> {
    by_user: BTreeMap<UserId, Vec<T>>,
}

impl<T> Default for Partitions<T> {
    fn default() -> Self {
        Self {
            by_user: BTreeMap::new(),
        }
    }
}

impl<T> Partitions<T> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's entries, or an empty slice.
    #[must_use]
    pub fn entries(&self, user: &UserId) -> &[T] {
        self.by_user
            .get(user)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The user's list, materializing an empty one if needed.
    pub fn entries_mut(&mut self, user: &UserId) -> &mut Vec<T> {
        self.by_user.entry(user.clone()).or_default()
    }

    /// The user's list, only if it already exists.
    pub fn existing_mut(&mut self, user: &UserId) -> Option<&mut Vec<T>> {
        self.by_user.get_mut(user)
    }

    /// Reset the user's list to empty. Returns whether anything was removed.
    pub fn reset(&mut self, user: &UserId) -> bool {
        let list = self.entries_mut(user);
        let had_entries = !list.is_empty();
        list.clear();
        had_entries
    }

    /// Remove every entry of `user` matching `predicate`. Returns how many.
    pub fn remove_where(&mut self, user: &UserId, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let Some(list) = self.existing_mut(user) else {
            return 0;
        };
        let before = list.len();
        list.retain(|entry| !predicate(entry));
        before - list.len()
    }

    /// Users with a materialized list.
    pub fn users(&self) -> impl Iterator<Item = &UserId> {
        self.by_user.keys()
    }

    /// Mutable access to every user's list.
    pub fn lists_mut(&mut self) -> impl Iterator<Item = &mut Vec<T>> {
        self.by_user.values_mut()
    }

    /// Whether no user has a materialized list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_user.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    #[test]
    fn test_unknown_user_sees_empty_slice() {
        let partitions: Partitions<u32> = Partitions::new();
        assert!(partitions.entries(&user("ghost")).is_empty());
        assert!(partitions.is_empty());
    }

    #[test]
    fn test_entries_mut_materializes_lazily() {
        let mut partitions: Partitions<u32> = Partitions::new();
        partitions.entries_mut(&user("a")).push(1);
        assert_eq!(partitions.entries(&user("a")), &[1]);
        assert_eq!(partitions.users().count(), 1);
    }

    #[test]
    fn test_reset_keeps_user() {
        let mut partitions: Partitions<u32> = Partitions::new();
        partitions.entries_mut(&user("a")).extend([1, 2]);
        assert!(partitions.reset(&user("a")));
        assert!(!partitions.reset(&user("a")));
        assert!(partitions.entries(&user("a")).is_empty());
        assert_eq!(partitions.users().count(), 1);
    }

    #[test]
    fn test_remove_where_on_absent_user_does_not_materialize() {
        let mut partitions: Partitions<u32> = Partitions::new();
        assert_eq!(partitions.remove_where(&user("a"), |_| true), 0);
        assert!(partitions.is_empty());
    }

    #[test]
    fn test_partitions_are_independent() {
        let mut partitions: Partitions<u32> = Partitions::new();
        partitions.entries_mut(&user("a")).push(1);
        partitions.entries_mut(&user("b")).push(2);
        partitions.remove_where(&user("a"), |n| *n == 1);
        assert!(partitions.entries(&user("a")).is_empty());
        assert_eq!(partitions.entries(&user("b")), &[2]);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut partitions: Partitions<u32> = Partitions::new();
        partitions.entries_mut(&user("u1")).push(7);
        let json = serde_json::to_string(&partitions).unwrap();
        assert_eq!(json, r#"{"u1":[7]}"#);

        let back: Partitions<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, partitions);
    }
}
