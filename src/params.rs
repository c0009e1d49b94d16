//! Banding parameter selection from the LSH S-curve.
//!
//! Two records become candidates iff they agree on at least one full band.
//! For true Jaccard similarity `s`, `b` bands, and `r` rows per band that
//! happens with probability `1 - (1 - s^r)^b` (the S-curve). Fixing `r` and
//! solving for `b` turns a desired (similarity, detection probability) pair
//! into concrete banding geometry.

use crate::error::{JoinError, Result};

/// User-facing knobs for a similarity join.
#[derive(Debug, Clone)]
pub struct JoinConfig {
    /// Desired Jaccard similarity at the S-curve threshold.
    pub similarity_threshold: f64,
    /// Desired probability of flagging a pair at that similarity.
    pub detection_probability: f64,
    /// Rows per band (signature positions hashed together).
    pub rows: usize,
    /// Explicit RNG seed; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.975,
            detection_probability: 0.99,
            rows: 10,
            rng_seed: None,
        }
    }
}

/// Banding geometry: `bands` slices of `rows` signature positions each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandingPlan {
    /// Number of bands in the index.
    pub bands: usize,
    /// Rows per band.
    pub rows: usize,
}

impl BandingPlan {
    /// Solve `p = 1 - (1 - s^r)^b` for the number of bands, rounding up.
    ///
    /// Valid only for thresholds strictly inside (0, 1) and `rows >= 1`;
    /// anything else is rejected before any hashing happens. The result is
    /// always at least one band. Callers that want manual control can build
    /// a [`BandingPlan`] directly instead.
    pub fn from_config(config: &JoinConfig) -> Result<Self> {
        let s = config.similarity_threshold;
        let p = config.detection_probability;
        if !(s > 0.0 && s < 1.0) {
            return Err(JoinError::InvalidParameter(format!(
                "similarity_threshold must be in (0, 1), got {s}"
            )));
        }
        if !(p > 0.0 && p < 1.0) {
            return Err(JoinError::InvalidParameter(format!(
                "detection_probability must be in (0, 1), got {p}"
            )));
        }
        if config.rows == 0 {
            return Err(JoinError::InvalidParameter(
                "rows must be >= 1".to_string(),
            ));
        }

        let strength = s.powf(config.rows as f64);
        let miss = 1.0 - strength;
        // For small thresholds s^r underflows past f64 epsilon, miss rounds
        // to exactly 1.0, and the exact formula wants more bands than any
        // plan can represent. Refuse instead of returning geometry that
        // cannot detect at the requested threshold.
        if miss >= 1.0 {
            return Err(JoinError::InvalidParameter(format!(
                "similarity_threshold {s} with {} rows needs an unrepresentable \
                 number of bands; raise the threshold or lower rows",
                config.rows
            )));
        }
        // miss can still underflow to 0.0 for s very close to 1; ln(0) = -inf
        // and the quotient collapses to 0, so the max(1) below applies.
        let bands = ((1.0 - p).ln() / miss.ln()).ceil() as usize;
        Ok(Self {
            bands: bands.max(1),
            rows: config.rows,
        })
    }

    /// Total number of hash functions (signature length), `bands * rows`.
    pub fn num_hashes(&self) -> usize {
        self.bands * self.rows
    }

    /// Probability that a pair with true Jaccard `s` becomes a candidate.
    pub fn candidate_probability(&self, s: f64) -> f64 {
        1.0 - (1.0 - s.powf(self.rows as f64)).powf(self.bands as f64)
    }
}
