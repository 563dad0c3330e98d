//! Voucher stream support (§4.2 "Voucher stream", §6 `voucher_after`).

use cardseek_core::prng::LANES;
use cardseek_core::stream::{Stream, VectorStream};
use cardseek_core::VoucherName;
use std::collections::HashSet;

/// The full voucher pool in a fixed, stable order (needed so `choose_weighted`
/// draws are reproducible run to run). Each base voucher's corresponding
/// upgrade ("Plus"/tier-two voucher) only becomes eligible once its base is
/// already owned.
const VOUCHER_POOL: &[VoucherName] = &[
    VoucherName::Overstock,
    VoucherName::ClearanceSale,
    VoucherName::Hone,
    VoucherName::RerollSurplus,
    VoucherName::CrystalBall,
    VoucherName::Telescope,
    VoucherName::Grabber,
    VoucherName::Wasteful,
    VoucherName::TarotMerchant,
    VoucherName::PlanetMerchant,
    VoucherName::SeedMoney,
    VoucherName::Blank,
    VoucherName::MagicTrick,
    VoucherName::Hieroglyph,
    VoucherName::DirectorsCut,
    VoucherName::PaintBrush,
];

fn upgrade_of(base: VoucherName) -> Option<VoucherName> {
    match base {
        VoucherName::Overstock => Some(VoucherName::OverstockPlus),
        VoucherName::ClearanceSale => Some(VoucherName::Liquidation),
        VoucherName::Hone => Some(VoucherName::GlowUp),
        VoucherName::RerollSurplus => Some(VoucherName::RerollGlut),
        VoucherName::CrystalBall => Some(VoucherName::OmenGlobe),
        VoucherName::Telescope => Some(VoucherName::Observatory),
        VoucherName::Grabber => Some(VoucherName::NachoTong),
        VoucherName::Wasteful => Some(VoucherName::Recyclomancy),
        VoucherName::TarotMerchant => Some(VoucherName::TarotTycoon),
        VoucherName::PlanetMerchant => Some(VoucherName::PlanetTycoon),
        VoucherName::SeedMoney => Some(VoucherName::MoneyTree),
        VoucherName::Blank => Some(VoucherName::Antimatter),
        VoucherName::MagicTrick => Some(VoucherName::Illusion),
        VoucherName::Hieroglyph => Some(VoucherName::Petroglyph),
        VoucherName::DirectorsCut => Some(VoucherName::Retcon),
        VoucherName::PaintBrush => Some(VoucherName::Palette),
        _ => None,
    }
}

fn eligible_pool(active: &HashSet<VoucherName>) -> Vec<VoucherName> {
    let mut pool = Vec::new();
    for &base in VOUCHER_POOL {
        if !active.contains(&base) {
            pool.push(base);
        } else if let Some(upgrade) = upgrade_of(base) {
            if !active.contains(&upgrade) {
                pool.push(upgrade);
            }
        }
    }
    pool
}

/// `voucher_after(active_set, seed, ante) -> Voucher` (§6). `stream` is the
/// ante's voucher stream (§3 Stream Descriptor `kind = voucher`); already
/// re-rolls internally if the first draw names an owned voucher, matching
/// §4.2's "re-rolls the current if already owned".
pub fn voucher_after(active: &HashSet<VoucherName>, stream: &mut Stream) -> VoucherName {
    let pool = eligible_pool(active);
    if pool.is_empty() {
        // Every voucher owned: fall back to the full pool's first entry so
        // the stream still advances deterministically.
        stream.skip_unit();
        return VOUCHER_POOL[0];
    }
    let idx = stream.next_uniform(pool.len());
    pool[idx]
}

/// The 8-lane lock-step counterpart of [`voucher_after`]. Every lane
/// consumes exactly one draw from `stream` regardless of whether its own
/// pool is empty, so lane cursors can never drift relative to each other —
/// only the per-lane pool (pure function of that lane's `active` set) and
/// the per-lane index mapping differ.
pub fn voucher_after_vector(
    actives: &[HashSet<VoucherName>; LANES],
    stream: &mut VectorStream,
) -> [VoucherName; LANES] {
    let pools: Vec<Vec<VoucherName>> = actives.iter().map(eligible_pool).collect();
    let ns: [usize; LANES] = std::array::from_fn(|lane| pools[lane].len().max(1));
    let indices = stream.next_uniform_per_lane(ns);
    std::array::from_fn(|lane| {
        if pools[lane].is_empty() {
            VOUCHER_POOL[0]
        } else {
            pools[lane][indices[lane]]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardseek_core::seed::Seed;
    use cardseek_core::stream::{StreamCache, StreamDescriptor, StreamKind};

    #[test]
    fn never_offers_an_owned_voucher() {
        let seed = Seed::parse("AAAAAAAA").unwrap();
        let mut cache = StreamCache::new(&seed);
        let mut active = HashSet::new();
        active.insert(VoucherName::Overstock);
        active.insert(VoucherName::Hone);

        let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::Voucher, 1));
        let offered = voucher_after(&active, stream);
        assert_ne!(offered, VoucherName::Overstock);
        assert_ne!(offered, VoucherName::Hone);
    }

    #[test]
    fn upgrade_only_offered_after_base_is_owned() {
        let seed = Seed::parse("AAAAAAAA").unwrap();
        let mut cache = StreamCache::new(&seed);
        let active = HashSet::new();
        let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::Voucher, 1));
        let offered = voucher_after(&active, stream);
        assert_ne!(offered, VoucherName::OverstockPlus, "Plus tier needs the base owned first");
    }

    #[test]
    fn is_deterministic_for_the_same_seed_and_active_set() {
        let seed = Seed::parse("ALEEZTEE").unwrap();
        let active = HashSet::new();

        let mut cache_a = StreamCache::new(&seed);
        let a = voucher_after(&active, cache_a.get_or_create(StreamDescriptor::new(StreamKind::Voucher, 3)));

        let mut cache_b = StreamCache::new(&seed);
        let b = voucher_after(&active, cache_b.get_or_create(StreamDescriptor::new(StreamKind::Voucher, 3)));

        assert_eq!(a, b);
    }

    #[test]
    fn vector_draw_agrees_with_scalar_draw_lane_by_lane_even_with_divergent_active_sets() {
        use cardseek_core::stream::VectorStreamCache;

        let names = ["ALEEZTEE", "AAAAAAAA", "BBBBBBBB", "ZEBRA123", "QQQQQQQQ", "MIXED012", "TEST4321", "LASTLANE"];
        let seeds: [Option<Seed>; LANES] = std::array::from_fn(|i| Some(Seed::parse(names[i]).unwrap()));

        let mut actives: [HashSet<VoucherName>; LANES] = Default::default();
        actives[0].insert(VoucherName::Overstock);
        actives[0].insert(VoucherName::Hone);
        actives[3].insert(VoucherName::Telescope);

        let mut vector_cache = VectorStreamCache::new(&seeds);
        let vector_stream = vector_cache.get_or_create(StreamDescriptor::new(StreamKind::Voucher, 5));
        let vector_result = voucher_after_vector(&actives, vector_stream);

        for (lane, seed) in seeds.iter().enumerate() {
            let mut scalar_cache = StreamCache::new(seed.as_ref().unwrap());
            let scalar_stream = scalar_cache.get_or_create(StreamDescriptor::new(StreamKind::Voucher, 5));
            let scalar_result = voucher_after(&actives[lane], scalar_stream);
            assert_eq!(vector_result[lane], scalar_result, "lane {lane} diverged");
        }
    }
}
