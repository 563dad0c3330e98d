//! Content generation: turns the data module's tables and the core's
//! streams into concrete shop slots, pack items, tags, and soul jokers for
//! one ante. This is the layer spec.md §6's data-module interface implies
//! but doesn't give stream-level detail for — see `DESIGN.md`.

use cardseek_core::pack::{PackKind, PackWalker};
use cardseek_core::prng::LANES;
use cardseek_core::stream::{StreamCache, StreamDescriptor, StreamKind, VectorStreamCache};
use cardseek_core::{
    Deck, Edition, Enhancement, JokerName, PlanetName, Rank, Rarity, Seal, SoulJokerName,
    SpectralName, Stake, Suit, TagName, TarotName, VoucherName,
};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    Joker { name: JokerName, rarity: Rarity, edition: Edition },
    Tarot(TarotName),
    Planet(PlanetName),
    Spectral(SpectralName),
    PlayingCard { rank: Rank, suit: Suit, enhancement: Enhancement, seal: Seal, edition: Edition },
}

const RANKS: [Rank; 13] = [
    Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven, Rank::Eight,
    Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace,
];
const SUITS: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];
const ENHANCEMENTS: [Enhancement; 9] = [
    Enhancement::None, Enhancement::Bonus, Enhancement::Mult, Enhancement::Wild,
    Enhancement::Glass, Enhancement::Steel, Enhancement::Stone, Enhancement::Gold,
    Enhancement::Lucky,
];
const ENHANCEMENT_WEIGHTS: [f64; 9] = [70.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 3.0, 3.0];
const SEALS: [cardseek_core::Seal; 5] = [
    cardseek_core::Seal::None, cardseek_core::Seal::Gold, cardseek_core::Seal::Red,
    cardseek_core::Seal::Blue, cardseek_core::Seal::Purple,
];
const SEAL_WEIGHTS: [f64; 5] = [94.0, 1.5, 1.5, 1.5, 1.5];

fn generate_playing_card(cache: &mut StreamCache, ante: u8, kind: StreamKind) -> Content {
    let stream = cache.get_or_create(StreamDescriptor::new(kind, ante));
    let rank = RANKS[stream.next_uniform(RANKS.len())];
    let suit = SUITS[stream.next_uniform(SUITS.len())];
    let enhancement = ENHANCEMENTS[stream.next_weighted(&ENHANCEMENT_WEIGHTS)];
    let seal = SEALS[stream.next_weighted(&SEAL_WEIGHTS)];
    let edition = cardseek_data::edition_for_roll(stream.next_u());
    Content::PlayingCard { rank, suit, enhancement, seal, edition }
}

fn generate_joker(cache: &mut StreamCache, ante: u8) -> Content {
    let rarity_idx = {
        let weights = cardseek_data::joker_rarity_weights();
        let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::ShopSlotRarity, ante));
        stream.next_weighted(&weights[..3]) // legendary is soul-joker exclusive, never rolled here
    };
    let rarity = [Rarity::Common, Rarity::Uncommon, Rarity::Rare][rarity_idx];
    let joker_stream_kind = match rarity {
        Rarity::Common => StreamKind::ShopCommonJoker,
        Rarity::Uncommon => StreamKind::ShopUncommonJoker,
        _ => StreamKind::ShopRareJoker,
    };
    let pool = cardseek_data::pool_for_rarity(rarity);
    let name = {
        let stream = cache.get_or_create(StreamDescriptor::new(joker_stream_kind, ante));
        pool[stream.next_uniform(pool.len())]
    };
    let edition = {
        let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::ShopJokerEdition, ante));
        cardseek_data::edition_for_roll(stream.next_u())
    };
    Content::Joker { name, rarity, edition }
}

/// Generates the content of one shop slot (§4.2 shop generation). Category
/// is rolled first against `shop_weights`, then the category-specific
/// content is drawn from its own stream.
pub fn generate_shop_slot(
    cache: &mut StreamCache,
    deck: Deck,
    stake: Stake,
    ante: u8,
    active_vouchers: &HashSet<VoucherName>,
) -> Content {
    let weights = cardseek_data::shop_weights(deck, stake, ante, active_vouchers);
    let cat_idx = {
        let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::ShopSlotCategory, ante));
        stream.next_weighted(&weights.as_slice())
    };
    match cat_idx {
        0 => generate_joker(cache, ante),
        1 => {
            let pool: Vec<TarotName> =
                TarotName::ALL.iter().copied().filter(|t| *t != TarotName::TheSoul).collect();
            let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::TarotShop, ante));
            Content::Tarot(pool[stream.next_uniform(pool.len())])
        }
        2 => {
            let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::PlanetShop, ante));
            Content::Planet(PlanetName::ALL[stream.next_uniform(PlanetName::ALL.len())])
        }
        3 => {
            let pool: Vec<SpectralName> = SpectralName::ALL
                .iter()
                .copied()
                .filter(|s| !matches!(s, SpectralName::TheSoul | SpectralName::BlackHole))
                .collect();
            let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::SpectralShop, ante));
            Content::Spectral(pool[stream.next_uniform(pool.len())])
        }
        _ => generate_playing_card(cache, ante, StreamKind::PlayingCardStandardPack),
    }
}

/// Generates the content that would fill a booster pack of `kind`, once the
/// pack walker's header has already determined it's worth inspecting.
pub fn generate_pack_item(cache: &mut StreamCache, ante: u8, kind: PackKind) -> Content {
    match kind {
        PackKind::Arcana => {
            let stream = PackWalker::content_stream(cache, ante, PackKind::Arcana);
            Content::Tarot(TarotName::ALL[stream.next_uniform(TarotName::ALL.len())])
        }
        PackKind::Celestial => {
            let stream = PackWalker::content_stream(cache, ante, PackKind::Celestial);
            Content::Planet(PlanetName::ALL[stream.next_uniform(PlanetName::ALL.len())])
        }
        PackKind::Spectral => {
            let stream = PackWalker::content_stream(cache, ante, PackKind::Spectral);
            Content::Spectral(SpectralName::ALL[stream.next_uniform(SpectralName::ALL.len())])
        }
        PackKind::Buffoon => {
            let stream = PackWalker::content_stream(cache, ante, PackKind::Buffoon);
            let name = JokerName::ALL[stream.next_uniform(JokerName::ALL.len())];
            Content::Joker { name, rarity: cardseek_data::rarity_of(name), edition: Edition::None }
        }
        PackKind::Standard => generate_playing_card(cache, ante, StreamKind::PlayingCardStandardPack),
    }
}

/// Draws the soul joker identity and edition for `ante` (§4.4 "soul-joker
/// vector pre-filter": a pure function of seed × ante, independent of
/// whether The Soul/Black Hole actually surfaces this run).
pub fn soul_joker_for_ante(cache: &mut StreamCache, ante: u8) -> (SoulJokerName, Edition) {
    let joker = {
        let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::SoulJoker, ante));
        cardseek_data::draw_soul_joker(stream)
    };
    let edition = {
        let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::SoulJokerEdition, ante));
        cardseek_data::edition_for_roll(stream.next_u())
    };
    (joker, edition)
}

/// Draws both of `ante`'s blind tags (small first, then big), each on its
/// own cursor via the shared `Tag` stream kind's `modifier` field.
pub fn tags_for_ante(cache: &mut StreamCache, ante: u8) -> (TagName, TagName) {
    let small = {
        let stream = cache.get_or_create(StreamDescriptor::with_modifier(StreamKind::Tag, ante, 0));
        TagName::ALL[stream.next_uniform(TagName::ALL.len())]
    };
    let big = {
        let stream = cache.get_or_create(StreamDescriptor::with_modifier(StreamKind::Tag, ante, 1));
        TagName::ALL[stream.next_uniform(TagName::ALL.len())]
    };
    (small, big)
}

/// The 8-lane lock-step counterpart of [`generate_playing_card`]: one shared
/// stream cursor, every draw vectorized across all lanes.
fn generate_playing_card_vector(cache: &mut VectorStreamCache, ante: u8, kind: StreamKind) -> [Content; LANES] {
    let stream = cache.get_or_create(StreamDescriptor::new(kind, ante));
    let rank_idx = stream.next_uniform(RANKS.len());
    let suit_idx = stream.next_uniform(SUITS.len());
    let enh_idx = stream.next_weighted(&ENHANCEMENT_WEIGHTS);
    let seal_idx = stream.next_weighted(&SEAL_WEIGHTS);
    let edition_draw = stream.next_u();
    std::array::from_fn(|lane| Content::PlayingCard {
        rank: RANKS[rank_idx[lane]],
        suit: SUITS[suit_idx[lane]],
        enhancement: ENHANCEMENTS[enh_idx[lane]],
        seal: SEALS[seal_idx[lane]],
        edition: cardseek_data::edition_for_roll(edition_draw[lane]),
    })
}

/// The 8-lane lock-step counterpart of [`generate_joker`]. The rarity roll's
/// weights are lane-invariant (legendary is always excluded here), so one
/// shared weighted draw suffices; each rarity's name pool is drawn on its own
/// stream for every lane regardless of which rarity that lane actually
/// rolled, mirroring how a SIMD lane group executes every branch and selects
/// the result rather than diverging control flow (see `vector.rs` module
/// docs) — this only ever feeds the coarse vector pre-filter, never the
/// scalar evaluator's authoritative check.
fn generate_joker_vector(cache: &mut VectorStreamCache, ante: u8) -> [Content; LANES] {
    let weights = cardseek_data::joker_rarity_weights();
    let rarity_idx = cache
        .get_or_create(StreamDescriptor::new(StreamKind::ShopSlotRarity, ante))
        .next_weighted(&weights[..3]);
    let rarities: [Rarity; LANES] =
        std::array::from_fn(|lane| [Rarity::Common, Rarity::Uncommon, Rarity::Rare][rarity_idx[lane]]);

    let common_pool = cardseek_data::pool_for_rarity(Rarity::Common);
    let uncommon_pool = cardseek_data::pool_for_rarity(Rarity::Uncommon);
    let rare_pool = cardseek_data::pool_for_rarity(Rarity::Rare);
    let common_idx = cache
        .get_or_create(StreamDescriptor::new(StreamKind::ShopCommonJoker, ante))
        .next_uniform(common_pool.len());
    let uncommon_idx = cache
        .get_or_create(StreamDescriptor::new(StreamKind::ShopUncommonJoker, ante))
        .next_uniform(uncommon_pool.len());
    let rare_idx = cache
        .get_or_create(StreamDescriptor::new(StreamKind::ShopRareJoker, ante))
        .next_uniform(rare_pool.len());
    let edition_draw = cache
        .get_or_create(StreamDescriptor::new(StreamKind::ShopJokerEdition, ante))
        .next_u();

    std::array::from_fn(|lane| {
        let rarity = rarities[lane];
        let name = match rarity {
            Rarity::Common => common_pool[common_idx[lane]],
            Rarity::Uncommon => uncommon_pool[uncommon_idx[lane]],
            _ => rare_pool[rare_idx[lane]],
        };
        Content::Joker { name, rarity, edition: cardseek_data::edition_for_roll(edition_draw[lane]) }
    })
}

/// The 8-lane lock-step counterpart of [`generate_shop_slot`] (§4.4). Every
/// category's content is drawn for every lane on every call, same
/// branch-masking rationale as [`generate_joker_vector`]: lanes whose own
/// category roll differs from a given branch simply have that branch's
/// result discarded by the final `match` below, never read back by a
/// clause's presence check.
pub fn generate_shop_slot_vector(
    cache: &mut VectorStreamCache,
    deck: Deck,
    stake: Stake,
    ante: u8,
    active_vouchers: &[HashSet<VoucherName>; LANES],
) -> [Content; LANES] {
    let weight_sets: [Vec<f64>; LANES] =
        std::array::from_fn(|lane| cardseek_data::shop_weights(deck, stake, ante, &active_vouchers[lane]).as_slice().to_vec());
    let cat_idx = cache
        .get_or_create(StreamDescriptor::new(StreamKind::ShopSlotCategory, ante))
        .next_weighted_per_lane(&weight_sets);

    let joker = generate_joker_vector(cache, ante);
    let tarot_pool: Vec<TarotName> = TarotName::ALL.iter().copied().filter(|t| *t != TarotName::TheSoul).collect();
    let tarot_idx = cache.get_or_create(StreamDescriptor::new(StreamKind::TarotShop, ante)).next_uniform(tarot_pool.len());
    let planet_idx = cache.get_or_create(StreamDescriptor::new(StreamKind::PlanetShop, ante)).next_uniform(PlanetName::ALL.len());
    let spectral_pool: Vec<SpectralName> = SpectralName::ALL
        .iter()
        .copied()
        .filter(|s| !matches!(s, SpectralName::TheSoul | SpectralName::BlackHole))
        .collect();
    let spectral_idx =
        cache.get_or_create(StreamDescriptor::new(StreamKind::SpectralShop, ante)).next_uniform(spectral_pool.len());
    let playing_card = generate_playing_card_vector(cache, ante, StreamKind::PlayingCardStandardPack);

    std::array::from_fn(|lane| match cat_idx[lane] {
        0 => joker[lane],
        1 => Content::Tarot(tarot_pool[tarot_idx[lane]]),
        2 => Content::Planet(PlanetName::ALL[planet_idx[lane]]),
        3 => Content::Spectral(spectral_pool[spectral_idx[lane]]),
        _ => playing_card[lane],
    })
}

/// The 8-lane lock-step counterpart of [`soul_joker_for_ante`]. Unlike shop
/// slot generation this is a pure function of `ante` alone (no per-lane
/// pool/weight divergence), so it is bit-exact with running the scalar
/// version independently per lane.
pub fn soul_joker_for_ante_vector(cache: &mut VectorStreamCache, ante: u8) -> [(SoulJokerName, Edition); LANES] {
    let pool = cardseek_data::SOUL_JOKER_POOL;
    let joker_idx = cache.get_or_create(StreamDescriptor::new(StreamKind::SoulJoker, ante)).next_uniform(pool.len());
    let edition_draw =
        cache.get_or_create(StreamDescriptor::new(StreamKind::SoulJokerEdition, ante)).next_u();
    std::array::from_fn(|lane| (pool[joker_idx[lane]], cardseek_data::edition_for_roll(edition_draw[lane])))
}

/// The 8-lane lock-step counterpart of [`tags_for_ante`]; bit-exact with the
/// scalar version for the same reason as [`soul_joker_for_ante_vector`].
pub fn tags_for_ante_vector(cache: &mut VectorStreamCache, ante: u8) -> [(TagName, TagName); LANES] {
    let small_idx = cache
        .get_or_create(StreamDescriptor::with_modifier(StreamKind::Tag, ante, 0))
        .next_uniform(TagName::ALL.len());
    let big_idx = cache
        .get_or_create(StreamDescriptor::with_modifier(StreamKind::Tag, ante, 1))
        .next_uniform(TagName::ALL.len());
    std::array::from_fn(|lane| (TagName::ALL[small_idx[lane]], TagName::ALL[big_idx[lane]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardseek_core::seed::Seed;

    #[test]
    fn shop_slot_generation_is_deterministic() {
        let seed = Seed::parse("ALEEZTEE").unwrap();
        let active = HashSet::new();
        let mut cache_a = StreamCache::new(&seed);
        let a = generate_shop_slot(&mut cache_a, Deck::Red, Stake::White, 1, &active);
        let mut cache_b = StreamCache::new(&seed);
        let b = generate_shop_slot(&mut cache_b, Deck::Red, Stake::White, 1, &active);
        assert_eq!(a, b);
    }

    #[test]
    fn soul_joker_identity_is_a_function_of_seed_and_ante_only() {
        let seed = Seed::parse("ALEEZTEE").unwrap();
        let mut cache = StreamCache::new(&seed);
        let (joker_a, edition_a) = soul_joker_for_ante(&mut cache, 1);
        let mut cache2 = StreamCache::new(&seed);
        let (joker_b, edition_b) = soul_joker_for_ante(&mut cache2, 1);
        assert_eq!(joker_a, joker_b);
        assert_eq!(edition_a, edition_b);
    }

    #[test]
    fn tags_diverge_between_small_and_big_blind_in_general() {
        let seed = Seed::parse("AAAAAAAA").unwrap();
        let mut cache = StreamCache::new(&seed);
        let (small, big) = tags_for_ante(&mut cache, 3);
        // Not a hard invariant (they could coincide), but pinning both are
        // at least individually reproducible is useful here.
        let mut cache2 = StreamCache::new(&seed);
        let (small2, big2) = tags_for_ante(&mut cache2, 3);
        assert_eq!((small, big), (small2, big2));
    }

    fn lane_seeds() -> [Option<Seed>; LANES] {
        let names = ["ALEEZTEE", "AAAAAAAA", "BBBBBBBB", "ZEBRA123", "QQQQQQQQ", "MIXED012", "TEST4321", "LASTLANE"];
        std::array::from_fn(|i| Some(Seed::parse(names[i]).unwrap()))
    }

    #[test]
    fn vector_tags_agree_with_scalar_tags_lane_by_lane() {
        let seeds = lane_seeds();
        let mut vector_cache = VectorStreamCache::new(&seeds);
        let vector_tags = tags_for_ante_vector(&mut vector_cache, 3);
        for (lane, seed) in seeds.iter().enumerate() {
            let mut scalar_cache = StreamCache::new(seed.as_ref().unwrap());
            let scalar_tags = tags_for_ante(&mut scalar_cache, 3);
            assert_eq!(vector_tags[lane], scalar_tags, "lane {lane} diverged");
        }
    }

    #[test]
    fn vector_soul_joker_agrees_with_scalar_soul_joker_lane_by_lane() {
        let seeds = lane_seeds();
        let mut vector_cache = VectorStreamCache::new(&seeds);
        let vector_draws = soul_joker_for_ante_vector(&mut vector_cache, 2);
        for (lane, seed) in seeds.iter().enumerate() {
            let mut scalar_cache = StreamCache::new(seed.as_ref().unwrap());
            let scalar_draw = soul_joker_for_ante(&mut scalar_cache, 2);
            assert_eq!(vector_draws[lane], scalar_draw, "lane {lane} diverged");
        }
    }

    #[test]
    fn vector_shop_slot_lane_matches_scalar_when_every_lane_shares_the_same_active_vouchers() {
        // Shop-slot generation branches on a per-lane category roll, so it is
        // only bit-exact with the scalar path when every lane's active-voucher
        // set (and therefore its weight table) agrees; that's still the
        // common case this pins, while divergent-voucher lanes are covered
        // only by the coarse, permissive pre-filter contract in `vector.rs`.
        let seeds = lane_seeds();
        let active: HashSet<VoucherName> = HashSet::new();
        let actives: [HashSet<VoucherName>; LANES] = std::array::from_fn(|_| active.clone());
        let mut vector_cache = VectorStreamCache::new(&seeds);
        let vector_slots = generate_shop_slot_vector(&mut vector_cache, Deck::Red, Stake::White, 1, &actives);
        for (lane, seed) in seeds.iter().enumerate() {
            let mut scalar_cache = StreamCache::new(seed.as_ref().unwrap());
            let scalar_slot = generate_shop_slot(&mut scalar_cache, Deck::Red, Stake::White, 1, &active);
            assert_eq!(vector_slots[lane], scalar_slot, "lane {lane} diverged");
        }
    }
}
