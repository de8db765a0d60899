//! Inverted index from an association value (label, username) to issue ids

use dashmap::DashMap;
use std::collections::{BTreeSet, HashSet};
use uuid::Uuid;

/// How stored values are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyNormalization {
    /// Keys compare byte-for-byte
    Exact,
    /// Usernames: `@` and `%` stripped, lowercased
    Username,
}

impl KeyNormalization {
    pub fn apply(self, value: &str) -> String {
        match self {
            KeyNormalization::Exact => value.to_string(),
            KeyNormalization::Username => normalize_username(value),
        }
    }
}

/// Strip `@` and `%` and lowercase, so `@Alice` and `alice` share a key
pub fn normalize_username(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '@' && *c != '%')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Thread-safe value → ids postings
pub struct InvertedIndex {
    postings: DashMap<String, HashSet<Uuid>>,
    normalization: KeyNormalization,
}

impl InvertedIndex {
    pub fn new(normalization: KeyNormalization) -> Self {
        Self {
            postings: DashMap::new(),
            normalization,
        }
    }

    pub fn insert<'a, I>(&self, id: Uuid, values: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for value in values {
            self.postings
                .entry(self.normalization.apply(value))
                .or_default()
                .insert(id);
        }
    }

    pub fn remove<'a, I>(&self, id: &Uuid, values: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for value in values {
            let key = self.normalization.apply(value);
            let now_empty = match self.postings.get_mut(&key) {
                Some(mut ids) => {
                    ids.remove(id);
                    ids.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.postings.remove_if(&key, |_, ids| ids.is_empty());
            }
        }
    }

    /// Ids carrying `value`
    pub fn ids(&self, value: &str) -> HashSet<Uuid> {
        self.postings
            .get(&self.normalization.apply(value))
            .map(|ids| ids.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, id: &Uuid, value: &str) -> bool {
        self.postings
            .get(&self.normalization.apply(value))
            .map(|ids| ids.contains(id))
            .unwrap_or(false)
    }

    /// Number of distinct names in `names` that the issue carries
    pub fn matching_count(&self, id: &Uuid, names: &BTreeSet<String>) -> usize {
        let keys: BTreeSet<String> = names.iter().map(|n| self.normalization.apply(n)).collect();
        keys.iter()
            .filter(|key| {
                self.postings
                    .get(key.as_str())
                    .map(|ids| ids.contains(id))
                    .unwrap_or(false)
            })
            .count()
    }

    /// Cardinality-equality test: the issue carries every name in `names`
    pub fn has_all(&self, id: &Uuid, names: &BTreeSet<String>) -> bool {
        let distinct: BTreeSet<String> = names.iter().map(|n| self.normalization.apply(n)).collect();
        self.matching_count(id, names) == distinct.len()
    }

    pub fn key_count(&self) -> usize {
        self.postings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_has_all_is_superset_match() {
        let index = InvertedIndex::new(KeyNormalization::Exact);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        index.insert(a, &names(&["bug"]));
        index.insert(b, &names(&["bug", "urgent", "docs"]));

        let wanted = names(&["bug", "urgent"]);
        assert!(!index.has_all(&a, &wanted));
        assert!(index.has_all(&b, &wanted));
        assert_eq!(index.matching_count(&a, &wanted), 1);
    }

    #[test]
    fn test_exact_keys_are_case_sensitive() {
        let index = InvertedIndex::new(KeyNormalization::Exact);
        let id = Uuid::new_v4();
        index.insert(id, &names(&["Bug"]));
        assert!(!index.contains(&id, "bug"));
        assert!(index.contains(&id, "Bug"));
    }

    #[test]
    fn test_username_keys_are_normalized() {
        let index = InvertedIndex::new(KeyNormalization::Username);
        let id = Uuid::new_v4();
        index.insert(id, &names(&["Alice"]));
        assert!(index.contains(&id, "@alice"));
        assert!(index.has_all(&id, &names(&["%ALICE", "alice"])));
    }

    #[test]
    fn test_remove_drops_empty_postings() {
        let index = InvertedIndex::new(KeyNormalization::Exact);
        let id = Uuid::new_v4();
        let labels = names(&["bug"]);
        index.insert(id, &labels);
        assert_eq!(index.key_count(), 1);

        index.remove(&id, &labels);
        assert_eq!(index.key_count(), 0);
        assert!(index.ids("bug").is_empty());
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("@Octo%Cat"), "octocat");
    }
}
