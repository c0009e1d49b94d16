//! minjoin: approximate set-similarity join via MinHash and banded LSH.
//!
//! Given a small **base** corpus and a large **query** corpus, each record
//! reducible to a set of tokens, minjoin decides for every query record
//! which base record (if any) is *probably similar* under Jaccard
//! similarity, without comparing every pair.
//!
//! ## Pipeline
//!
//! 1. [`Vocabulary`]: dense integer ids for every distinct base token.
//! 2. [`BandingPlan`]: turn a desired (similarity, detection probability)
//!    pair into banding geometry via the S-curve `p = 1 - (1 - s^r)^b`.
//! 3. [`HashFamily`]: `bands * rows` affine hash functions over the id
//!    domain, coefficients drawn from a seedable RNG.
//! 4. [`Signature`]: per-record MinHash signature (minimum hash value per
//!    function).
//! 5. [`BandedIndex`]: base signatures split into bands and inverted into
//!    per-band bucket maps.
//! 6. [`SimilarityJoin`]: the assembled pipeline; per query it unions the
//!    band buckets, deduplicates, and picks at most one base record.
//!
//! Candidate retrieval is the standard LSH approximate-join guarantee: two
//! records are candidates iff they agree on at least one full band. There
//! is no exact verification pass, so occasional false positives and
//! S-curve-bounded false negatives are part of the contract.
//!
//! ## Example
//!
//! ```rust
//! use minjoin::{JoinConfig, SimilarityJoin};
//!
//! let config = JoinConfig { rng_seed: Some(42), ..Default::default() };
//! let base = vec![
//!     vec!["nikon".to_string(), "d90".to_string(), "slr".to_string()],
//!     vec!["canon".to_string(), "a495".to_string(), "compact".to_string()],
//! ];
//! let mut join = SimilarityJoin::build(&config, &base).unwrap();
//!
//! let query = vec!["nikon".to_string(), "d90".to_string(), "slr".to_string()];
//! assert_eq!(join.match_tokens(&query), Some(0));
//! ```
//!
//! The [`corpus`] module holds the I/O glue (tokenization, line-delimited
//! JSON records) used by the `minjoin` binary; the core itself never reads
//! or writes files.

#![warn(missing_docs)]

pub mod corpus;
pub mod error;
pub mod hash;
pub mod index;
pub mod join;
pub mod params;
pub mod vocab;

pub use error::{JoinError, Result};
pub use hash::{HashFamily, Signature, EMPTY_SENTINEL};
pub use index::BandedIndex;
pub use join::{JoinReport, SimilarityJoin};
pub use params::{BandingPlan, JoinConfig};
pub use vocab::Vocabulary;
