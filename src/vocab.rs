//! Vocabulary: dense integer ids for tokens seen in the base corpus.

use std::collections::HashMap;

/// Maps distinct token strings to dense ids assigned in first-seen order.
///
/// Ids start at 0 and are never reassigned within a run. The final size
/// becomes the modulus of the hash family, so the whole base corpus must be
/// registered before any hashing starts.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    ids: HashMap<String, u64>,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `token`, assigning the next sequential id on first
    /// sight. Repeated calls with the same token return the existing id.
    pub fn register(&mut self, token: &str) -> u64 {
        if let Some(&id) = self.ids.get(token) {
            return id;
        }
        let id = self.ids.len() as u64;
        self.ids.insert(token.to_owned(), id);
        id
    }

    /// Look up a token without assigning. Unknown tokens return `None`.
    pub fn get(&self, token: &str) -> Option<u64> {
        self.ids.get(token).copied()
    }

    /// Map tokens to ids, silently dropping out-of-vocabulary tokens.
    ///
    /// Duplicates are kept as-is; signature computation ignores multiplicity.
    pub fn token_ids<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<u64> {
        tokens
            .iter()
            .filter_map(|t| self.get(t.as_ref()))
            .collect()
    }

    /// Number of distinct tokens registered.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if no token has been registered.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_first_seen() {
        let mut vocab = Vocabulary::new();
        assert_eq!(vocab.register("nikon"), 0);
        assert_eq!(vocab.register("d90"), 1);
        assert_eq!(vocab.register("nikon"), 0);
        assert_eq!(vocab.register("slr"), 2);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn lookup_drops_unknown_tokens() {
        let mut vocab = Vocabulary::new();
        vocab.register("a");
        vocab.register("b");
        let ids = vocab.token_ids(&["a", "zzz", "b", "a"]);
        assert_eq!(ids, vec![0, 1, 0]);
    }

    #[test]
    fn get_does_not_assign() {
        let vocab = Vocabulary::new();
        assert_eq!(vocab.get("anything"), None);
        assert!(vocab.is_empty());
    }
}
