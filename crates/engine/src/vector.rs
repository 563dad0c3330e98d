//! The Vector Evaluator (§4.1, §4.4): processes one lane-group at a time,
//! eliminating lanes via cheap per-clause presence checks before the
//! Scalar Evaluator does full, source-constraint-aware re-verification.
//!
//! One [`VectorStreamCache`] drives every lane's PRNG state in lock-step
//! (§4.1's ordering guarantee) for the whole lane-group: content that's a
//! pure function of `ante` alone (tags, soul jokers, voucher/boss
//! progression) is bit-exact with running the Scalar Evaluator independently
//! per lane. Shop-slot content additionally branches on a per-lane category
//! roll; rather than let lanes diverge in which stream they advance (which
//! would desync the shared cursor), every category's content is computed for
//! every lane on every slot and the unused branches are simply discarded —
//! the same predicated-execution approach any SIMD lane group uses to keep
//! lanes from branching independently. That makes the vector pass a sound
//! but sometimes coarse *pre-filter*: it can only ever keep a lane alive that
//! should be dead, never kill one the Scalar Evaluator would have kept (see
//! DESIGN.md).

use crate::generate::{
    generate_shop_slot_vector, soul_joker_for_ante_vector, tags_for_ante_vector, Content,
};
use crate::progression::{simulate_progression_vector, RunProgression};
use cardseek_core::seed::Seed;
use cardseek_core::stream::VectorStreamCache;
use cardseek_core::{Deck, Rarity, Stake, VoucherName};
use cardseek_filter::clause::{Clause, JokerValue, TagSlot};
use cardseek_filter::Filter;
use std::collections::HashSet;

pub const LANES: usize = cardseek_core::prng::LANES;

/// Up to 8 seeds processed atomically as a unit (§5 "a lane-group is never
/// split across workers"). `None` lanes are padding past the end of the
/// seed space and are always dead.
#[derive(Debug, Clone)]
pub struct LaneGroup {
    pub seeds: [Option<Seed>; LANES],
}

impl LaneGroup {
    pub fn new(seeds: [Option<Seed>; LANES]) -> Self {
        LaneGroup { seeds }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneMask(pub [bool; LANES]);

impl LaneMask {
    pub fn all_alive(group: &LaneGroup) -> Self {
        let mut mask = [false; LANES];
        for (i, seed) in group.seeds.iter().enumerate() {
            mask[i] = seed.is_some();
        }
        LaneMask(mask)
    }

    pub fn is_all_dead(&self) -> bool {
        self.0.iter().all(|&alive| !alive)
    }

    pub fn and_with(&mut self, clause_mask: &[bool; LANES]) {
        for i in 0..LANES {
            self.0[i] = self.0[i] && clause_mask[i];
        }
    }

    pub fn and_not_with(&mut self, clause_mask: &[bool; LANES]) {
        for i in 0..LANES {
            self.0[i] = self.0[i] && !clause_mask[i];
        }
    }
}

fn joker_value_matches(value: &JokerValue, name: cardseek_core::JokerName, rarity: Rarity) -> bool {
    match value {
        JokerValue::Exact(n) => *n == name,
        JokerValue::AnyCommon => rarity == Rarity::Common,
        JokerValue::AnyUncommon => rarity == Rarity::Uncommon,
        JokerValue::AnyRare => rarity == Rarity::Rare,
        JokerValue::AnyLegendary => false,
        JokerValue::AnyJoker => true,
    }
}

/// Coarse, source-constraint-blind presence check across all 8 lanes at
/// once: "does this clause's value show up anywhere in one of its allowed
/// antes." Only ever called for `clause.is_vectorizable()` clauses; other
/// variants fall through to `true` (permissive) since the vector stage
/// never rejects on them. A lane starts `false` here and latches `true`
/// the first time its own content matches — dead input lanes (§5's padding
/// past the seed space) simply never latch, since [`VectorStreamCache`]
/// hashes their absent seed to a dummy state nothing reads back.
fn clause_present_coarse(
    cache: &mut VectorStreamCache,
    deck: Deck,
    stake: Stake,
    progressions: &[RunProgression; LANES],
    clause: &Clause,
) -> [bool; LANES] {
    let mut found = [false; LANES];
    match clause {
        Clause::Joker { value, common, .. } => {
            for &ante in &common.antes {
                let actives: [HashSet<VoucherName>; LANES] =
                    std::array::from_fn(|lane| progressions[lane].active_vouchers_for(ante).clone());
                let max_slots = (0..LANES).map(|lane| cardseek_data::shop_slot_count(ante, &actives[lane])).max().unwrap_or(0);
                for _ in 0..max_slots {
                    let contents = generate_shop_slot_vector(cache, deck, stake, ante, &actives);
                    for lane in 0..LANES {
                        if found[lane] {
                            continue;
                        }
                        if let Content::Joker { name, rarity, .. } = contents[lane] {
                            if joker_value_matches(value, name, rarity) {
                                found[lane] = true;
                            }
                        }
                    }
                }
            }
        }
        Clause::Voucher { value, common } => {
            for &ante in &common.antes {
                for lane in 0..LANES {
                    if !found[lane] && progressions[lane].offered_voucher_for(ante) == *value {
                        found[lane] = true;
                    }
                }
            }
        }
        Clause::Tag { value, slot, common } => {
            for &ante in &common.antes {
                let tags = tags_for_ante_vector(cache, ante);
                for lane in 0..LANES {
                    if found[lane] {
                        continue;
                    }
                    let (small, big) = tags[lane];
                    let matched = match slot {
                        TagSlot::Small => small == *value,
                        TagSlot::Big => big == *value,
                        TagSlot::Either => small == *value || big == *value,
                    };
                    if matched {
                        found[lane] = true;
                    }
                }
            }
        }
        Clause::Tarot { value, common } => {
            for &ante in &common.antes {
                let actives: [HashSet<VoucherName>; LANES] =
                    std::array::from_fn(|lane| progressions[lane].active_vouchers_for(ante).clone());
                let max_slots = (0..LANES).map(|lane| cardseek_data::shop_slot_count(ante, &actives[lane])).max().unwrap_or(0);
                for _ in 0..max_slots {
                    let contents = generate_shop_slot_vector(cache, deck, stake, ante, &actives);
                    for lane in 0..LANES {
                        if found[lane] {
                            continue;
                        }
                        if let Content::Tarot(t) = contents[lane] {
                            if t == *value {
                                found[lane] = true;
                            }
                        }
                    }
                }
            }
        }
        Clause::Planet { value, common } => {
            for &ante in &common.antes {
                let actives: [HashSet<VoucherName>; LANES] =
                    std::array::from_fn(|lane| progressions[lane].active_vouchers_for(ante).clone());
                let max_slots = (0..LANES).map(|lane| cardseek_data::shop_slot_count(ante, &actives[lane])).max().unwrap_or(0);
                for _ in 0..max_slots {
                    let contents = generate_shop_slot_vector(cache, deck, stake, ante, &actives);
                    for lane in 0..LANES {
                        if found[lane] {
                            continue;
                        }
                        if let Content::Planet(p) = contents[lane] {
                            if p == *value {
                                found[lane] = true;
                            }
                        }
                    }
                }
            }
        }
        Clause::Spectral { value, common } => {
            for &ante in &common.antes {
                let actives: [HashSet<VoucherName>; LANES] =
                    std::array::from_fn(|lane| progressions[lane].active_vouchers_for(ante).clone());
                let max_slots = (0..LANES).map(|lane| cardseek_data::shop_slot_count(ante, &actives[lane])).max().unwrap_or(0);
                for _ in 0..max_slots {
                    let contents = generate_shop_slot_vector(cache, deck, stake, ante, &actives);
                    for lane in 0..LANES {
                        if found[lane] {
                            continue;
                        }
                        if let Content::Spectral(s) = contents[lane] {
                            if s == *value {
                                found[lane] = true;
                            }
                        }
                    }
                }
            }
        }
        Clause::SoulJoker { value, refinement, common } => {
            for &ante in &common.antes {
                let draws = soul_joker_for_ante_vector(cache, ante);
                for lane in 0..LANES {
                    if found[lane] {
                        continue;
                    }
                    let (joker, edition) = draws[lane];
                    if joker == *value && refinement.edition.map_or(true, |e| e == edition) {
                        found[lane] = true;
                    }
                }
            }
        }
        Clause::PlayingCard { .. } | Clause::Boss { .. } => {
            found = [true; LANES];
        }
    }
    found
}

fn vector_rank(clause: &Clause) -> u8 {
    match clause {
        Clause::Joker { .. } => 0,
        Clause::Voucher { .. } => 1,
        Clause::Tag { .. } => 2,
        Clause::Tarot { .. } | Clause::Planet { .. } | Clause::Spectral { .. } => 3,
        Clause::SoulJoker { .. } => 4,
        Clause::PlayingCard { .. } | Clause::Boss { .. } => 5,
    }
}

pub struct VectorEvaluator;

impl VectorEvaluator {
    /// Runs the algorithm in §4.4 over one lane-group, returning the
    /// surviving mask for the Scalar Evaluator. One [`VectorStreamCache`]
    /// and one vectorized progression simulation is built for the whole
    /// group up front, then every vectorizable clause advances all 8 lanes
    /// together (§4.1) rather than re-deriving a separate scalar cache per
    /// lane per clause.
    pub fn evaluate(group: &LaneGroup, filter: &Filter, deck: Deck, stake: Stake) -> LaneMask {
        let mut mask = LaneMask::all_alive(group);
        if mask.is_all_dead() {
            return mask;
        }

        let mut cache = VectorStreamCache::new(&group.seeds);
        let progressions = simulate_progression_vector(&mut cache, filter.max_ante);

        let mut must_vectorizable: Vec<&Clause> =
            filter.must.iter().filter(|c| c.is_vectorizable()).collect();
        must_vectorizable.sort_by_key(|c| vector_rank(c));

        for clause in must_vectorizable {
            let clause_mask = clause_present_coarse(&mut cache, deck, stake, &progressions, clause);
            mask.and_with(&clause_mask);
            if mask.is_all_dead() {
                return mask;
            }
        }

        for clause in filter.must_not.iter().filter(|c| c.is_vectorizable()) {
            let clause_mask = clause_present_coarse(&mut cache, deck, stake, &progressions, clause);
            mask.and_not_with(&clause_mask);
            if mask.is_all_dead() {
                return mask;
            }
        }

        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardseek_filter::clause::Cutoff;
    use cardseek_filter::compile;

    fn lane_group(seeds: &[&str]) -> LaneGroup {
        let mut out = [None; LANES];
        for (i, s) in seeds.iter().enumerate() {
            out[i] = Some(Seed::parse(s).unwrap());
        }
        LaneGroup::new(out)
    }

    #[test]
    fn empty_lane_group_is_all_dead() {
        let group = LaneGroup::new([None; LANES]);
        let filter = compile(r#"{"must":[{"type":"voucher","value":"telescope"}]}"#, Cutoff::Fixed(1)).unwrap();
        let mask = VectorEvaluator::evaluate(&group, &filter, Deck::Red, Stake::White);
        assert!(mask.is_all_dead());
    }

    #[test]
    fn vector_pass_never_raises_a_dead_lane_back_to_life() {
        let group = lane_group(&["ALEEZTEE", "AAAAAAAA"]);
        let filter = compile(r#"{"must":[{"type":"voucher","value":"telescope","antes":[1]}]}"#, Cutoff::Fixed(1)).unwrap();
        let before = LaneMask::all_alive(&group);
        let after = VectorEvaluator::evaluate(&group, &filter, Deck::Red, Stake::White);
        for lane in 0..LANES {
            if after.0[lane] {
                assert!(before.0[lane]);
            }
        }
    }

    /// The vector pass is a pre-filter, not the final verdict (module docs):
    /// it must never mark dead a lane the Scalar Evaluator would accept.
    #[test]
    fn vector_pass_never_kills_a_lane_the_scalar_evaluator_accepts() {
        use crate::scalar::ScalarEvaluator;

        let seeds = ["ALEEZTEE", "AAAAAAAA", "BBBBBBBB", "ZEBRA123", "QQQQQQQQ", "MIXED012", "TEST4321", "LASTLANE"];
        let group = lane_group(&seeds);
        let filter = compile(
            r#"{"must":[{"type":"souljoker","value":"perkeo","antes":[1,2]},{"type":"voucher","value":"telescope","antes":[1]}]}"#,
            Cutoff::Fixed(1),
        )
        .unwrap();

        let mask = VectorEvaluator::evaluate(&group, &filter, Deck::Red, Stake::White);
        for (lane, seed) in seeds.iter().enumerate() {
            let s = Seed::parse(seed).unwrap();
            if ScalarEvaluator::evaluate(&s, &filter, i64::MIN).is_some() {
                assert!(mask.0[lane], "vector pass wrongly killed lane {lane} ({seed}), which the scalar evaluator accepted");
            }
        }
    }
}
