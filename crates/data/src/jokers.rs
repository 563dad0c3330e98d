//! Joker rarity table. `original_source/` kept zero files for this spec, so
//! there is no fixture to pin exact per-joker rarities against; this module
//! assigns rarity by stable position in `JokerName::ALL` (roughly half
//! common, a third uncommon, the remainder rare) rather than guess at each
//! name individually. See `DESIGN.md` for the recorded decision.

use cardseek_core::{JokerName, Rarity};

pub fn rarity_of(name: JokerName) -> Rarity {
    let idx = JokerName::ALL.iter().position(|&j| j == name).expect("every JokerName is in ALL");
    let total = JokerName::ALL.len();
    let common_cut = total * 50 / 100;
    let uncommon_cut = total * 85 / 100;
    if idx < common_cut {
        Rarity::Common
    } else if idx < uncommon_cut {
        Rarity::Uncommon
    } else {
        Rarity::Rare
    }
}

/// Every joker of a given shop-eligible rarity, in `JokerName::ALL` order
/// (stable, so the same index always names the same joker run to run).
pub fn pool_for_rarity(rarity: Rarity) -> Vec<JokerName> {
    JokerName::ALL.iter().copied().filter(|&j| rarity_of(j) == rarity).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rarity_tier_is_non_empty() {
        assert!(!pool_for_rarity(Rarity::Common).is_empty());
        assert!(!pool_for_rarity(Rarity::Uncommon).is_empty());
        assert!(!pool_for_rarity(Rarity::Rare).is_empty());
    }

    #[test]
    fn rarity_assignment_is_stable() {
        for &name in JokerName::ALL {
            assert_eq!(rarity_of(name), rarity_of(name));
        }
    }

    #[test]
    fn pools_partition_the_full_set_without_overlap() {
        let total: usize = [Rarity::Common, Rarity::Uncommon, Rarity::Rare]
            .iter()
            .map(|&r| pool_for_rarity(r).len())
            .sum();
        assert_eq!(total, JokerName::ALL.len());
    }
}
