//! The fixed legendary ("soul joker") set (§3 invariant: "a legendary-rarity
//! joker with category Joker encodes one of the fixed legendary set").

use cardseek_core::stream::Stream;
use cardseek_core::SoulJokerName;

pub const SOUL_JOKER_POOL: &[SoulJokerName] = &[
    SoulJokerName::Canio,
    SoulJokerName::Triboulet,
    SoulJokerName::Yorick,
    SoulJokerName::Chicot,
    SoulJokerName::Perkeo,
];

/// Every soul joker is equally likely (§4.2 "Soul joker stream"); the stream
/// itself is what makes repeated draws for the same seed/ante reproducible.
pub fn draw_soul_joker(stream: &mut Stream) -> SoulJokerName {
    let idx = stream.next_uniform(SOUL_JOKER_POOL.len());
    SOUL_JOKER_POOL[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardseek_core::seed::Seed;
    use cardseek_core::stream::{StreamCache, StreamDescriptor, StreamKind};

    #[test]
    fn always_draws_from_the_fixed_pool() {
        let seed = Seed::parse("ALEEZTEE").unwrap();
        let mut cache = StreamCache::new(&seed);
        let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::SoulJoker, 1));
        let joker = draw_soul_joker(stream);
        assert!(SOUL_JOKER_POOL.contains(&joker));
    }

    #[test]
    fn is_deterministic_per_seed_and_ante() {
        let seed = Seed::parse("ALEEZTEE").unwrap();
        let mut cache_a = StreamCache::new(&seed);
        let a = draw_soul_joker(cache_a.get_or_create(StreamDescriptor::new(StreamKind::SoulJoker, 2)));
        let mut cache_b = StreamCache::new(&seed);
        let b = draw_soul_joker(cache_b.get_or_create(StreamDescriptor::new(StreamKind::SoulJoker, 2)));
        assert_eq!(a, b);
    }
}
