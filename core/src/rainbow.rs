//! Precomputed digest-to-word reverse lookup tables.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use crate::hash::HashAlgorithm;
use crate::lexicon;

/// Per-algorithm digest -> word maps built once at bootstrap from the
/// expanded dictionary. Read-only afterwards, safe to share across runs.
#[derive(Clone, Debug)]
pub struct RainbowIndex {
    tables: HashMap<HashAlgorithm, HashMap<String, String>>,
}

impl RainbowIndex {
    /// Hashes the expanded dictionary under every indexed algorithm, one
    /// table per algorithm.
    pub fn build() -> Self {
        let dictionary = lexicon::expanded_dictionary();

        let tables: HashMap<_, _> = HashAlgorithm::INDEXED
            .into_par_iter()
            .map(|algorithm| {
                let table: HashMap<String, String> = dictionary
                    .par_iter()
                    .map(|word| (algorithm.digest_hex(word), word.clone()))
                    .collect();
                (algorithm, table)
            })
            .collect();

        for (algorithm, table) in &tables {
            debug!(%algorithm, entries = table.len(), "rainbow table built");
        }

        Self { tables }
    }

    /// O(1) reverse lookup of a normalized digest.
    pub fn lookup(&self, algorithm: HashAlgorithm, digest: &str) -> Option<&str> {
        self.tables
            .get(&algorithm)?
            .get(digest)
            .map(String::as_str)
    }

    /// Whether the algorithm has a prebuilt table.
    pub fn supports(&self, algorithm: HashAlgorithm) -> bool {
        self.tables.contains_key(&algorithm)
    }

    /// Number of entries in the table for an algorithm. Charged as the
    /// attempt count of a rainbow phase regardless of outcome.
    pub fn table_len(&self, algorithm: HashAlgorithm) -> usize {
        self.tables.get(&algorithm).map_or(0, HashMap::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_dictionary_words_by_digest() {
        let index = RainbowIndex::build();

        // md5("password")
        assert_eq!(
            index.lookup(HashAlgorithm::Md5, "5f4dcc3b5aa765d61d8327deb882cf99"),
            Some("password")
        );
        // sha1("password")
        assert_eq!(
            index.lookup(
                HashAlgorithm::Sha1,
                "5baa61e4c9b93f3f0682250b6cf8331b7ee68fd8"
            ),
            Some("password")
        );
        // sha256 of a mutated dictionary word
        let digest = HashAlgorithm::Sha256.digest_hex("admin123");
        assert_eq!(index.lookup(HashAlgorithm::Sha256, &digest), Some("admin123"));
    }

    #[test]
    fn misses_return_none() {
        let index = RainbowIndex::build();
        let digest = HashAlgorithm::Md5.digest_hex("definitely-not-in-the-dictionary");
        assert_eq!(index.lookup(HashAlgorithm::Md5, &digest), None);
    }

    #[test]
    fn only_indexed_algorithms_have_tables() {
        let index = RainbowIndex::build();

        for algorithm in HashAlgorithm::INDEXED {
            assert!(index.supports(algorithm));
            assert_eq!(index.table_len(algorithm), lexicon::expanded_dictionary().len());
        }
        assert!(!index.supports(HashAlgorithm::Sha512));
        assert_eq!(index.table_len(HashAlgorithm::Sha512), 0);
    }
}
