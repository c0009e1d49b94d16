//! Banded inverted index over MinHash signatures.

use std::collections::{HashMap, HashSet};

use smallvec::SmallVec;

use crate::error::{JoinError, Result};
use crate::hash::Signature;
use crate::params::BandingPlan;

/// One band's worth of signature values, used as a structural bucket key.
///
/// Keys compare position by position, so two band slices only share a
/// bucket when every value matches; a hash collision between distinct band
/// values cannot silently merge them. The inline capacity covers the
/// default 10 rows without allocating.
type BandKey = SmallVec<[u64; 16]>;

/// Banded inverted index: for each band, a map from band value to the base
/// record ids holding that value.
///
/// Band `b` of a signature `S` is the slice `S[b*rows .. (b+1)*rows]`.
/// Every base id lands in exactly one bucket per band. Two records are
/// candidates iff they agree on at least one full band; false positives
/// (accidental band agreement at low true similarity) and false negatives
/// (bounded by the S-curve) are properties of the scheme, not defects.
///
/// Built once over the full base signature matrix, read-only afterwards.
#[derive(Debug)]
pub struct BandedIndex {
    plan: BandingPlan,
    buckets: Vec<HashMap<BandKey, Vec<u32>>>,
}

impl BandedIndex {
    /// Build the index from one signature per base record.
    ///
    /// Every signature must have length `bands * rows`.
    pub fn build(signatures: &[Signature], plan: BandingPlan) -> Result<Self> {
        if plan.bands == 0 || plan.rows == 0 {
            return Err(JoinError::InvalidParameter(
                "bands and rows must be >= 1".to_string(),
            ));
        }
        let expected = plan.num_hashes();
        let mut buckets: Vec<HashMap<BandKey, Vec<u32>>> =
            (0..plan.bands).map(|_| HashMap::new()).collect();

        for (idx, signature) in signatures.iter().enumerate() {
            if signature.len() != expected {
                return Err(JoinError::InvalidParameter(format!(
                    "signature {idx} has length {}, expected {expected}",
                    signature.len()
                )));
            }
            for (band, chunk) in signature.values.chunks_exact(plan.rows).enumerate() {
                buckets[band]
                    .entry(SmallVec::from_slice(chunk))
                    .or_default()
                    .push(idx as u32);
            }
        }

        Ok(Self { plan, buckets })
    }

    /// Candidate base ids sharing at least one band bucket with `signature`.
    ///
    /// A band value absent from a bucket map contributes nothing. The
    /// result is deduplicated and sorted ascending so callers and tests see
    /// a stable order.
    ///
    /// The signature must have the `bands * rows` length the index was
    /// built with; a mismatch is a caller bug, caught by a debug assertion.
    /// In release builds only the bands the signature fully covers are
    /// consulted.
    pub fn query(&self, signature: &Signature) -> Vec<u32> {
        debug_assert_eq!(
            signature.len(),
            self.plan.num_hashes(),
            "query signature length must match the index geometry"
        );
        let mut candidates: HashSet<u32> = HashSet::new();
        for (bucket_map, chunk) in self
            .buckets
            .iter()
            .zip(signature.values.chunks_exact(self.plan.rows))
        {
            if let Some(ids) = bucket_map.get(chunk) {
                candidates.extend(ids.iter().copied());
            }
        }
        let mut out: Vec<u32> = candidates.into_iter().collect();
        out.sort_unstable();
        out
    }

    /// The banding geometry this index was built with.
    pub fn plan(&self) -> BandingPlan {
        self.plan
    }

    /// Number of bands.
    pub fn bands(&self) -> usize {
        self.buckets.len()
    }
}
