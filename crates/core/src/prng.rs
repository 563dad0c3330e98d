//! The deterministic pseudohash PRNG (§4.1 PRNG Core).
//!
//! Two primitives compose every draw in the stream layer:
//!
//! - [`pseudohash`] mixes the bytes of a string key into a floating state,
//!   used once per named stream to derive that stream's starting state from
//!   the seed's hash.
//! - [`advance`] walks a state forward one step with no key; repeated calls
//!   are how a single stream produces its sequence of draws.
//!
//! [`VectorState`] performs the same two operations across 8 lanes in
//! lock-step. The ordering guarantee in §4.1 (`i`th draw of lane `k` equals
//! the `i`th scalar draw for the seed in lane `k`) holds because every lane
//! runs the identical scalar formula with no cross-lane interaction.

use crate::seed::Seed;

const MIX_A: f64 = 1.1239285023;
const ADVANCE_A: f64 = 1.72431234;
const ADVANCE_B: f64 = 2.134453429141;

/// Bit-exact (within this crate's own scalar/vector pair — see module docs)
/// keyed mix of `key`'s bytes into `state`, walked from the last byte to the
/// first. `state` must be non-zero; callers pass `1.0` for a fresh hash.
pub fn pseudohash(key: &str, state: f64) -> f64 {
    let mut num = if state == 0.0 { 1.0 } else { state };
    for (i, &byte) in key.as_bytes().iter().enumerate().rev() {
        let term = MIX_A / num * (byte as f64) * std::f64::consts::PI
            + std::f64::consts::PI * (i as f64 + 1.0);
        num = term.rem_euclid(1.0);
        if num == 0.0 {
            num = 1.0;
        }
    }
    num
}

/// Advances `state` one step with no key mixed in. The returned value is
/// itself a uniform draw in `[0, 1)`.
#[inline]
pub fn advance(state: f64) -> f64 {
    (ADVANCE_A + state * ADVANCE_B).abs().rem_euclid(1.0)
}

/// The seed-level hash every stream's initial state is derived from.
pub fn seed_hash(seed: &Seed) -> f64 {
    pseudohash(seed.as_str(), 1.0)
}

/// Derives a named stream's starting state from the seed hash and the
/// stream's string key (e.g. `"shop_joker_common2"`). Two reads at the same
/// `(seed, key)` always start from the same state (§3 Stream Descriptor).
pub fn stream_seed(seed_hash: f64, stream_key: &str) -> f64 {
    let keyed = pseudohash(stream_key, seed_hash);
    (keyed + seed_hash) / 2.0
}

/// `random(state) -> (state', u)` in `[0, 1)`.
#[inline]
pub fn random(state: f64) -> (f64, f64) {
    let next = advance(state);
    (next, next)
}

/// Selects an index by cumulative-sum comparison against `u * sum(weights)`.
/// Zero-weight entries can never be selected. Ties (a `target` landing
/// exactly on a cumulative boundary) break to the lower index because the
/// comparison is strict `<`.
pub fn choose_weighted(state: f64, weights: &[f64]) -> (f64, usize) {
    debug_assert!(!weights.is_empty(), "choose_weighted needs at least one weight");
    let (next_state, u) = random(state);
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return (next_state, 0);
    }
    let target = u * total;
    let mut cum = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cum += w;
        if target < cum {
            return (next_state, i);
        }
    }
    (next_state, weights.len() - 1)
}

/// Selects uniformly over `0..n` via `floor(u * n)`.
pub fn choose_uniform(state: f64, n: usize) -> (f64, usize) {
    debug_assert!(n > 0, "choose_uniform needs a non-empty range");
    let (next_state, u) = random(state);
    let idx = ((u * n as f64).floor() as usize).min(n - 1);
    (next_state, idx)
}

pub const LANES: usize = 8;

/// 8 lanes of PRNG state advanced in lock-step (§4.1 vector variant).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorState(pub [f64; LANES]);

impl VectorState {
    pub fn splat(state: f64) -> Self {
        VectorState([state; LANES])
    }

    pub fn from_seeds(seeds: &[f64; LANES], stream_key: &str) -> Self {
        let mut out = [0.0; LANES];
        for lane in 0..LANES {
            out[lane] = stream_seed(seeds[lane], stream_key);
        }
        VectorState(out)
    }

    /// Elementwise [`advance`]. Straight-line arithmetic over a fixed-size
    /// array so LLVM can auto-vectorize it on targets with a wide double
    /// vector, without requiring a specific SIMD feature at compile time.
    #[inline]
    pub fn advance(&self) -> VectorState {
        let mut out = [0.0; LANES];
        for lane in 0..LANES {
            out[lane] = advance(self.0[lane]);
        }
        VectorState(out)
    }

    #[inline]
    pub fn random(&self) -> (VectorState, [f64; LANES]) {
        let next = self.advance();
        (next, next.0)
    }

    pub fn choose_weighted(&self, weights: &[f64]) -> (VectorState, [usize; LANES]) {
        let (next, draws) = self.random();
        let total: f64 = weights.iter().sum();
        let mut indices = [0usize; LANES];
        for lane in 0..LANES {
            indices[lane] = if total <= 0.0 {
                0
            } else {
                let target = draws[lane] * total;
                let mut cum = 0.0;
                let mut found = weights.len() - 1;
                for (i, w) in weights.iter().enumerate() {
                    cum += w;
                    if target < cum {
                        found = i;
                        break;
                    }
                }
                found
            };
        }
        (next, indices)
    }

    pub fn choose_uniform(&self, n: usize) -> (VectorState, [usize; LANES]) {
        let (next, draws) = self.random();
        let mut indices = [0usize; LANES];
        for lane in 0..LANES {
            indices[lane] = ((draws[lane] * n as f64).floor() as usize).min(n - 1);
        }
        (next, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudohash_is_deterministic() {
        let a = pseudohash("shop_joker_common1", 1.0);
        let b = pseudohash("shop_joker_common1", 1.0);
        assert_eq!(a, b);
    }

    #[test]
    fn pseudohash_stays_in_unit_interval() {
        for key in ["", "x", "voucher1", "ALEEZTEE"] {
            let v = pseudohash(key, 1.0);
            assert!((0.0..1.0).contains(&v), "{key} produced {v}");
        }
    }

    #[test]
    fn advance_is_a_pure_function_of_state() {
        let s = stream_seed(seed_hash(&Seed::parse("ALEEZTEE").unwrap()), "tag1");
        assert_eq!(advance(s), advance(s));
    }

    #[test]
    fn distinct_keys_diverge() {
        let base = 1.0;
        assert_ne!(pseudohash("shop1", base), pseudohash("shop2", base));
    }

    #[test]
    fn choose_uniform_respects_bounds() {
        let mut state = 0.42;
        for _ in 0..256 {
            let (next, idx) = choose_uniform(state, 5);
            assert!(idx < 5);
            state = next;
        }
    }

    #[test]
    fn choose_weighted_never_picks_zero_weight() {
        let (_, idx) = choose_weighted(0.1, &[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(idx, 2);
    }

    #[test]
    fn vector_scalar_equivalence_random() {
        let seeds = [0.11, 0.22, 0.33, 0.44, 0.55, 0.66, 0.77, 0.88];
        let vector = VectorState(seeds);
        let (_, draws) = vector.random();
        for lane in 0..LANES {
            let (_, scalar_u) = random(seeds[lane]);
            assert_eq!(draws[lane], scalar_u, "lane {lane} diverged");
        }
    }

    #[test]
    fn vector_scalar_equivalence_choose_weighted() {
        let seeds = [0.05, 0.15, 0.25, 0.35, 0.45, 0.55, 0.65, 0.75];
        let weights = [1.0, 2.0, 3.0, 4.0];
        let vector = VectorState(seeds);
        let (_, indices) = vector.choose_weighted(&weights);
        for lane in 0..LANES {
            let (_, scalar_idx) = choose_weighted(seeds[lane], &weights);
            assert_eq!(indices[lane], scalar_idx, "lane {lane} diverged");
        }
    }

    #[test]
    fn vector_scalar_equivalence_over_many_steps() {
        // Pin the ordering guarantee across repeated draws, not just one.
        let seeds = [0.01, 0.02, 0.03, 0.04, 0.05, 0.06, 0.07, 0.08];
        let mut vector = VectorState(seeds);
        let mut scalars = seeds;
        for _ in 0..256 {
            let (next_vector, draws) = vector.random();
            for lane in 0..LANES {
                let (next_scalar, u) = random(scalars[lane]);
                assert_eq!(draws[lane], u);
                scalars[lane] = next_scalar;
            }
            vector = next_vector;
        }
    }

    #[test]
    fn stream_seed_is_a_pure_function_of_seed_and_key() {
        let seed = Seed::parse("AAAAAAAA").unwrap();
        let hash = seed_hash(&seed);
        assert_eq!(stream_seed(hash, "tag1"), stream_seed(hash, "tag1"));
        assert_ne!(stream_seed(hash, "tag1"), stream_seed(hash, "tag2"));
    }

    // §4.1's ordering guarantee ("the i'th draw of lane k equals the i'th
    // scalar draw") and §8's "vector-scalar equivalence" property, pinned
    // against arbitrary lane states rather than the handful of fixed vectors
    // above.
    mod vector_scalar_equivalence_property {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn random_advances_agree_lane_by_lane(seeds in prop::array::uniform8(0.0f64..1.0f64)) {
                let vector = VectorState(seeds);
                let (_, draws) = vector.random();
                for lane in 0..LANES {
                    let (_, scalar_u) = random(seeds[lane]);
                    prop_assert_eq!(draws[lane], scalar_u);
                }
            }

            #[test]
            fn choose_weighted_agrees_lane_by_lane(
                seeds in prop::array::uniform8(0.0f64..1.0f64),
                weights in prop::collection::vec(0.01f64..50.0, 1..8),
            ) {
                let vector = VectorState(seeds);
                let (_, indices) = vector.choose_weighted(&weights);
                for lane in 0..LANES {
                    let (_, scalar_idx) = choose_weighted(seeds[lane], &weights);
                    prop_assert_eq!(indices[lane], scalar_idx);
                }
            }

            #[test]
            fn choose_uniform_agrees_lane_by_lane(
                seeds in prop::array::uniform8(0.0f64..1.0f64),
                n in 1usize..64,
            ) {
                let vector = VectorState(seeds);
                let (_, indices) = vector.choose_uniform(n);
                for lane in 0..LANES {
                    let (_, scalar_idx) = choose_uniform(seeds[lane], n);
                    prop_assert_eq!(indices[lane], scalar_idx);
                }
            }

            #[test]
            fn sequences_of_advances_stay_in_lockstep(
                seeds in prop::array::uniform8(0.0f64..1.0f64),
                steps in 1usize..32,
            ) {
                let mut vector = VectorState(seeds);
                let mut scalars = seeds;
                for _ in 0..steps {
                    let (next_vector, draws) = vector.random();
                    for lane in 0..LANES {
                        let (next_scalar, u) = random(scalars[lane]);
                        prop_assert_eq!(draws[lane], u);
                        scalars[lane] = next_scalar;
                    }
                    vector = next_vector;
                }
            }
        }
    }
}
