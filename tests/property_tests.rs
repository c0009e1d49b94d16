//! Property-based tests for minjoin components.
//!
//! Invariants that should hold regardless of input:
//! - signatures ignore duplicate ids and input order
//! - out-of-vocabulary tokens never reach a signature
//! - the planner always meets the requested detection probability
//! - the empty set always signs to the sentinel row

use minjoin::{BandingPlan, HashFamily, JoinConfig, Vocabulary, EMPTY_SENTINEL};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod signature_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn duplicates_never_change_a_signature(
            ids in prop::collection::vec(0u64..500, 0..40),
            seed in 0u64..1000,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let family = HashFamily::generate(32, 500, &mut rng).unwrap();

            let mut doubled = ids.clone();
            doubled.extend_from_slice(&ids);

            prop_assert_eq!(family.signature(&ids), family.signature(&doubled));
        }

        #[test]
        fn input_order_never_changes_a_signature(
            ids in prop::collection::vec(0u64..500, 0..40),
            seed in 0u64..1000,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let family = HashFamily::generate(32, 500, &mut rng).unwrap();

            let mut reversed = ids.clone();
            reversed.reverse();

            prop_assert_eq!(family.signature(&ids), family.signature(&reversed));
        }

        #[test]
        fn empty_set_always_signs_to_sentinel(
            k in 1usize..64,
            vocab_size in 1u64..10_000,
            seed in 0u64..1000,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let family = HashFamily::generate(k, vocab_size, &mut rng).unwrap();
            let sig = family.signature(&[]);
            prop_assert_eq!(sig.len(), k);
            prop_assert!(sig.values.iter().all(|&v| v == EMPTY_SENTINEL));
        }

        #[test]
        fn hash_outputs_stay_below_the_modulus(
            ids in prop::collection::vec(0u64..200, 1..40),
            seed in 0u64..1000,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let family = HashFamily::generate(16, 200, &mut rng).unwrap();
            let sig = family.signature(&ids);
            prop_assert!(sig.values.iter().all(|&v| v < 200));
        }
    }
}

mod vocabulary_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn oov_tokens_are_dropped_without_effect(
            tokens in prop::collection::vec("[a-d]{1,3}", 1..30),
        ) {
            let mut vocab = Vocabulary::new();
            for t in &tokens {
                vocab.register(t);
            }

            // "zz9" cannot be produced by the [a-d] alphabet above.
            let mut with_oov = tokens.clone();
            with_oov.push("zz9".to_string());

            prop_assert_eq!(vocab.token_ids(&tokens), vocab.token_ids(&with_oov));
        }

        #[test]
        fn registration_is_idempotent(
            tokens in prop::collection::vec("[a-f]{1,4}", 1..50),
        ) {
            let mut vocab = Vocabulary::new();
            let first: Vec<u64> = tokens.iter().map(|t| vocab.register(t)).collect();
            let second: Vec<u64> = tokens.iter().map(|t| vocab.register(t)).collect();
            prop_assert_eq!(first, second);
            prop_assert!(vocab.len() <= tokens.len());
        }
    }
}

mod planner_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn plan_always_meets_the_detection_probability(
            s in 0.01f64..0.95,
            p in 0.05f64..0.95,
            rows in 1usize..12,
        ) {
            let config = JoinConfig {
                similarity_threshold: s,
                detection_probability: p,
                rows,
                rng_seed: None,
            };
            match BandingPlan::from_config(&config) {
                Ok(plan) => {
                    prop_assert!(plan.bands >= 1);
                    // Rounding bands up can only raise the S-curve at s.
                    prop_assert!(plan.candidate_probability(s) >= p - 1e-9);
                }
                Err(_) => {
                    // Refusal is only allowed when s^r underflows so far
                    // that the required band count is unrepresentable.
                    prop_assert!(s.powf(rows as f64) < f64::EPSILON);
                }
            }
        }

        #[test]
        fn candidate_probability_is_a_probability(
            bands in 1usize..50,
            rows in 1usize..16,
            s in 0.0f64..=1.0,
        ) {
            let plan = BandingPlan { bands, rows };
            let prob = plan.candidate_probability(s);
            prop_assert!((0.0..=1.0).contains(&prob));
        }
    }
}
