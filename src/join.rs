//! The end-to-end similarity-join pipeline.
//!
//! Three phases, none re-entrant once advanced:
//!
//! 1. **Build**: register every base token (the hash modulus is the final
//!    vocabulary size, so this pre-pass must complete first), plan banding,
//!    draw the hash family, sign every base record, build the banded index.
//! 2. **Match**: per query, look up token ids, sign, collect banding
//!    candidates, pick at most one.
//! 3. **Report**: fold the per-query picks into per-base assignment lists.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::hash::{HashFamily, Signature};
use crate::index::BandedIndex;
use crate::params::{BandingPlan, JoinConfig};
use crate::vocab::Vocabulary;

/// A built similarity join: vocabulary, hash family, and banded index over
/// the base corpus, ready to match query token sets against it.
///
/// The vocabulary and index are immutable after [`SimilarityJoin::build`];
/// the only mutable state left is the tie-break RNG.
#[derive(Debug)]
pub struct SimilarityJoin {
    vocab: Vocabulary,
    family: HashFamily,
    index: BandedIndex,
    base_len: usize,
    rng: StdRng,
}

impl SimilarityJoin {
    /// Index a base corpus given one token list per record.
    ///
    /// A base corpus with no tokens at all is degenerate but not an error:
    /// every signature becomes a pure sentinel row and queries can only
    /// match those sentinel rows (or nothing).
    pub fn build<S: AsRef<str>>(config: &JoinConfig, base: &[Vec<S>]) -> Result<Self> {
        let plan = BandingPlan::from_config(config)?;
        let seed = config.rng_seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);

        // Full pre-pass over the base corpus before any hashing.
        let mut vocab = Vocabulary::new();
        let id_sets: Vec<Vec<u64>> = base
            .iter()
            .map(|tokens| {
                tokens
                    .iter()
                    .map(|t| vocab.register(t.as_ref()))
                    .collect()
            })
            .collect();

        let family = if vocab.is_empty() {
            HashFamily::degenerate(plan.num_hashes())
        } else {
            HashFamily::generate(plan.num_hashes(), vocab.len() as u64, &mut rng)?
        };

        Self::from_parts(vocab, family, &id_sets, plan, rng)
    }

    /// Assemble a join from pre-built components.
    ///
    /// `base_id_sets` holds the token ids of each base record, already
    /// mapped through `vocab`. Exposed for callers that need full control
    /// over the hash family (e.g. hand-picked coefficients in tests).
    pub fn from_parts(
        vocab: Vocabulary,
        family: HashFamily,
        base_id_sets: &[Vec<u64>],
        plan: BandingPlan,
        rng: StdRng,
    ) -> Result<Self> {
        let signatures: Vec<Signature> = base_id_sets
            .iter()
            .map(|ids| family.signature(ids))
            .collect();
        let index = BandedIndex::build(&signatures, plan)?;
        Ok(Self {
            vocab,
            family,
            index,
            base_len: base_id_sets.len(),
            rng,
        })
    }

    /// Match one query token set to at most one base record.
    ///
    /// Out-of-vocabulary tokens are dropped silently and contribute nothing
    /// to the signature. When several base records share a band with the
    /// query, one is picked uniformly at random; candidates are not
    /// re-scored by exact Jaccard. No candidate means no match.
    pub fn match_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) -> Option<u32> {
        let ids = self.vocab.token_ids(tokens);
        let signature = self.family.signature(&ids);
        let candidates = self.index.query(&signature);
        candidates.choose(&mut self.rng).copied()
    }

    /// Match every query in order and fold the picks per base record.
    pub fn match_all<S: AsRef<str>>(&mut self, queries: &[Vec<S>]) -> JoinReport {
        let mut assignments = vec![Vec::new(); self.base_len];
        let mut matched = 0;
        for (query_idx, tokens) in queries.iter().enumerate() {
            if let Some(base) = self.match_tokens(tokens) {
                assignments[base as usize].push(query_idx);
                matched += 1;
            }
        }
        JoinReport {
            assignments,
            matched,
            total: queries.len(),
        }
    }

    /// The base-corpus vocabulary.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// The banding geometry in use.
    pub fn plan(&self) -> BandingPlan {
        self.index.plan()
    }

    /// Signature length (`bands * rows`).
    pub fn num_hashes(&self) -> usize {
        self.family.len()
    }

    /// Number of indexed base records.
    pub fn base_len(&self) -> usize {
        self.base_len
    }
}

/// Aggregate result of matching a query corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinReport {
    /// For each base record, the query indices assigned to it, in query
    /// order. Every query appears at most once across all lists.
    pub assignments: Vec<Vec<usize>>,
    /// Number of queries that found a match.
    pub matched: usize,
    /// Total number of queries processed.
    pub total: usize,
}

impl JoinReport {
    /// Matched fraction in [0, 1]; 0 for an empty query corpus.
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }
}
