//! MinHash signatures over vocabulary ids.
//!
//! ## Algorithm
//!
//! Each hash function is affine over the id domain:
//!
//! ```text
//! h(x) = ((a*x + b) mod prime) mod modulus
//! ```
//!
//! where `modulus` is the vocabulary size and `prime` is a Mersenne-form
//! number `2^t - 1` chosen strictly greater than the modulus. Reducing by
//! the larger prime first keeps the family close to a random permutation
//! of the id space, which is what the MinHash estimator needs:
//!
//! ```text
//! P[min h(A) = min h(B)] = |A ∩ B| / |A ∪ B| = J(A, B)
//! ```
//!
//! so the fraction of signature positions where two records agree is an
//! unbiased estimate of their Jaccard similarity.
//!
//! ## References
//!
//! - Broder (1997). "On the resemblance and containment of documents"
//! - Broder et al. (2000). "Min-wise independent permutations"

use rand::rngs::StdRng;
use rand::Rng;

use crate::error::{JoinError, Result};

/// Signature value reserved for the empty token set.
///
/// Real hash outputs are bounded by `modulus - 1`, always far below this,
/// so an empty signature can only band-collide with another empty
/// signature. That collision is intended: two records with no
/// in-vocabulary tokens are indistinguishable.
pub const EMPTY_SENTINEL: u64 = u64::MAX;

/// One affine hash function `((a*x + b) mod prime) mod modulus`.
#[derive(Debug, Clone, Copy)]
struct AffineHash {
    a: u64,
    b: u64,
    prime: u64,
    modulus: u64,
}

impl AffineHash {
    #[inline]
    fn eval(&self, x: u64) -> u64 {
        // u128 keeps a*x + b exact for any u64 coefficients.
        let v = (self.a as u128 * x as u128 + self.b as u128) % self.prime as u128;
        (v % self.modulus as u128) as u64
    }
}

/// An ordered family of `k` hash functions sharing one modulus.
///
/// The family is drawn once per run, before any signature is computed, and
/// is immutable afterwards.
#[derive(Debug, Clone)]
pub struct HashFamily {
    funcs: Vec<AffineHash>,
    modulus: u64,
}

impl HashFamily {
    /// Draw `k` functions with independent uniform coefficients,
    /// `a in [1, prime)` and `b in [0, prime)`.
    ///
    /// The RNG is the only source of non-determinism in the whole pipeline;
    /// pass a fixed-seed [`StdRng`] for reproducible signatures.
    /// `vocab_size = 0` has no usable modulus and is rejected, as is `k = 0`.
    pub fn generate(k: usize, vocab_size: u64, rng: &mut StdRng) -> Result<Self> {
        if k == 0 {
            return Err(JoinError::InvalidParameter(
                "hash family size must be >= 1".to_string(),
            ));
        }
        if vocab_size == 0 {
            return Err(JoinError::InvalidParameter(
                "vocabulary is empty, no hash modulus".to_string(),
            ));
        }
        let prime = mersenne_above(vocab_size);
        let funcs = (0..k)
            .map(|_| AffineHash {
                a: rng.random_range(1..prime),
                b: rng.random_range(0..prime),
                prime,
                modulus: vocab_size,
            })
            .collect();
        Ok(Self {
            funcs,
            modulus: vocab_size,
        })
    }

    /// Build a family from explicit `(a, b)` coefficient pairs.
    ///
    /// Intended for callers that need full control over the permutations,
    /// e.g. identity-like functions in tests. The prime is chosen the same
    /// way as in [`HashFamily::generate`].
    pub fn from_coefficients(coefficients: &[(u64, u64)], vocab_size: u64) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(JoinError::InvalidParameter(
                "hash family size must be >= 1".to_string(),
            ));
        }
        if vocab_size == 0 {
            return Err(JoinError::InvalidParameter(
                "vocabulary is empty, no hash modulus".to_string(),
            ));
        }
        let prime = mersenne_above(vocab_size);
        let funcs = coefficients
            .iter()
            .map(|&(a, b)| AffineHash {
                a,
                b,
                prime,
                modulus: vocab_size,
            })
            .collect();
        Ok(Self {
            funcs,
            modulus: vocab_size,
        })
    }

    /// Family whose signatures come out as pure sentinel rows.
    ///
    /// Used when the base corpus produced no tokens at all: every token-id
    /// set is necessarily empty, so the functions are never evaluated.
    pub(crate) fn degenerate(k: usize) -> Self {
        Self {
            funcs: vec![
                AffineHash {
                    a: 1,
                    b: 0,
                    prime: 3,
                    modulus: 1,
                };
                k
            ],
            modulus: 1,
        }
    }

    /// Compute the MinHash signature of a token-id set.
    ///
    /// Position `i` is the minimum of `h_i` over the ids; duplicates cannot
    /// change a minimum, and the empty set yields [`EMPTY_SENTINEL`] at
    /// every position.
    pub fn signature(&self, ids: &[u64]) -> Signature {
        let mut values = vec![EMPTY_SENTINEL; self.funcs.len()];
        for &id in ids {
            for (slot, h) in values.iter_mut().zip(&self.funcs) {
                let hashed = h.eval(id);
                if hashed < *slot {
                    *slot = hashed;
                }
            }
        }
        Signature { values }
    }

    /// Number of hash functions (signature length).
    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    /// True if the family holds no functions.
    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Shared modulus of every function (the vocabulary size).
    pub fn modulus(&self) -> u64 {
        self.modulus
    }
}

/// A fixed-length MinHash signature, indexed identically to its family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// The minimum hash value per function, or [`EMPTY_SENTINEL`].
    pub values: Vec<u64>,
}

impl Signature {
    /// Fraction of positions where two signatures agree.
    ///
    /// Estimates the Jaccard similarity of the underlying sets. Returns 0
    /// for signatures of different lengths.
    pub fn jaccard(&self, other: &Self) -> f64 {
        if self.values.len() != other.values.len() || self.values.is_empty() {
            return 0.0;
        }
        let matches = self
            .values
            .iter()
            .zip(other.values.iter())
            .filter(|(a, b)| a == b)
            .count();
        matches as f64 / self.values.len() as f64
    }

    /// Signature length.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for a zero-length signature.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Smallest Mersenne-form number `2^t - 1` strictly greater than `n`.
///
/// The starting exponent is `ceil(log2(n + 1))`; it is bumped until the
/// strict inequality holds, so the prime always exceeds the modulus and the
/// outer reduction cannot introduce systematic collisions.
fn mersenne_above(n: u64) -> u64 {
    let mut t = 1u32;
    while t < 64 && (1u128 << t) - 1 <= n as u128 {
        t += 1;
    }
    ((1u128 << t) - 1) as u64
}
