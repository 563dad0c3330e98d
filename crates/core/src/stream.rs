//! Named PRNG streams and their cache (§3 Stream Descriptor, §4.2 Stream Layer).

use crate::prng::{advance, choose_uniform, choose_weighted, stream_seed, VectorState, LANES};
use crate::seed::Seed;
use std::collections::HashMap;

/// The sixteen stream kinds spec.md §3 enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StreamKind {
    ShopCommonJoker,
    ShopUncommonJoker,
    ShopRareJoker,
    ShopJokerEdition,
    TarotShop,
    TarotArcanaPack,
    PlanetShop,
    PlanetCelestialPack,
    SpectralShop,
    SpectralPack,
    SoulJoker,
    BoosterPack,
    Tag,
    Voucher,
    Boss,
    PlayingCardStandardPack,
    /// Which category (joker/tarot/planet/spectral/playing card) a shop slot
    /// resolves to. Not named explicitly in the stream descriptor examples;
    /// added so shop-slot generation has its own cursor rather than
    /// borrowing one of the content streams (§6 Data module interface only
    /// gives `shop_weights`, not the stream it's drawn against).
    ShopSlotCategory,
    /// Which rarity tier (common/uncommon/rare) a joker shop slot resolves
    /// to, drawn separately from the specific-joker-name streams.
    ShopSlotRarity,
    /// The edition roll for a soul joker, analogous to `ShopJokerEdition`
    /// but keyed to the dedicated soul-joker stream.
    SoulJokerEdition,
}

impl StreamKind {
    /// The base string key the reference runtime would hash on (used to seed
    /// this stream's starting state, distinctly from any other kind).
    pub fn base_key(&self) -> &'static str {
        match self {
            StreamKind::ShopCommonJoker => "shop_joker_common",
            StreamKind::ShopUncommonJoker => "shop_joker_uncommon",
            StreamKind::ShopRareJoker => "shop_joker_rare",
            StreamKind::ShopJokerEdition => "shop_joker_edition",
            StreamKind::TarotShop => "shop_tarot",
            StreamKind::TarotArcanaPack => "arcana_pack",
            StreamKind::PlanetShop => "shop_planet",
            StreamKind::PlanetCelestialPack => "celestial_pack",
            StreamKind::SpectralShop => "shop_spectral",
            StreamKind::SpectralPack => "spectral_pack",
            StreamKind::SoulJoker => "soul_joker",
            StreamKind::BoosterPack => "booster_pack",
            StreamKind::Tag => "tag",
            StreamKind::Voucher => "voucher",
            StreamKind::Boss => "boss",
            StreamKind::PlayingCardStandardPack => "standard_pack",
            StreamKind::ShopSlotCategory => "shop_slot_category",
            StreamKind::ShopSlotRarity => "shop_slot_rarity",
            StreamKind::SoulJokerEdition => "soul_joker_edition",
        }
    }
}

/// `(kind, ante, modifier)` uniquely identifies a stream (§3). `modifier`
/// distinguishes same-kind-same-ante streams that the reference runtime
/// hashes separately, e.g. a pack's per-slot edition roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamDescriptor {
    pub kind: StreamKind,
    pub ante: u8,
    pub modifier: u8,
}

impl StreamDescriptor {
    pub fn new(kind: StreamKind, ante: u8) -> Self {
        StreamDescriptor { kind, ante, modifier: 0 }
    }

    pub fn with_modifier(kind: StreamKind, ante: u8, modifier: u8) -> Self {
        StreamDescriptor { kind, ante, modifier }
    }

    fn key(&self) -> String {
        if self.modifier == 0 {
            format!("{}{}", self.kind.base_key(), self.ante)
        } else {
            format!("{}{}_{}", self.kind.base_key(), self.ante, self.modifier)
        }
    }
}

/// A cursor over a PRNG instance specialized to one purpose. Two reads at the
/// same `(seed, descriptor, position)` always yield the same value (§3
/// invariant): `state` only ever advances forward, deterministically.
#[derive(Debug, Clone)]
pub struct Stream {
    state: f64,
    position: u32,
}

impl Stream {
    pub fn new(seed_hash: f64, descriptor: &StreamDescriptor) -> Self {
        Stream {
            state: stream_seed(seed_hash, &descriptor.key()),
            position: 0,
        }
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn next_u(&mut self) -> f64 {
        self.state = advance(self.state);
        self.position += 1;
        self.state
    }

    pub fn next_weighted(&mut self, weights: &[f64]) -> usize {
        let (next_state, idx) = choose_weighted(self.state, weights);
        self.state = next_state;
        self.position += 1;
        idx
    }

    pub fn next_uniform(&mut self, n: usize) -> usize {
        let (next_state, idx) = choose_uniform(self.state, n);
        self.state = next_state;
        self.position += 1;
        idx
    }

    /// Advances the cursor by exactly one logical unit without consuming a
    /// draw from it, used by the pack walker (§4.5 invariant) when a pack's
    /// contents are uninteresting to the current clause but the per-pack
    /// stream position must still advance.
    pub fn skip_unit(&mut self) {
        self.state = advance(self.state);
        self.position += 1;
    }
}

/// Per-seed (or per-lane) cache mapping `(kind, ante)` to a materialized
/// stream. Constructed lazily on miss; eager caching plans a fixed set ahead
/// of time (§4.2 Caching, §4.3.5).
#[derive(Debug, Clone)]
pub struct StreamCache {
    seed_hash: f64,
    streams: HashMap<(StreamKind, u8, u8), Stream>,
}

impl StreamCache {
    pub fn new(seed: &Seed) -> Self {
        StreamCache {
            seed_hash: crate::prng::seed_hash(seed),
            streams: HashMap::new(),
        }
    }

    pub fn from_hash(seed_hash: f64) -> Self {
        StreamCache { seed_hash, streams: HashMap::new() }
    }

    /// Eagerly materializes every descriptor in `plan`, used by the rule
    /// compiler's cache plan (§4.3.5) before scalar evaluation begins.
    pub fn warm(&mut self, plan: &[StreamDescriptor]) {
        for descriptor in plan {
            self.get_or_create(*descriptor);
        }
    }

    pub fn get_or_create(&mut self, descriptor: StreamDescriptor) -> &mut Stream {
        let seed_hash = self.seed_hash;
        self.streams
            .entry((descriptor.kind, descriptor.ante, descriptor.modifier))
            .or_insert_with(|| Stream::new(seed_hash, &descriptor))
    }
}

/// The vector counterpart of [`Stream`]: the same named-stream cursor, but
/// advanced across all [`LANES`] lanes at once via [`VectorState`] (§4.1,
/// §4.4). One `advance` happens per draw regardless of what any individual
/// lane's draw is used for, so lane cursors never drift apart — a lane's
/// `position` is always identical to every other lane's, by construction.
#[derive(Debug, Clone)]
pub struct VectorStream {
    state: VectorState,
    position: u32,
}

impl VectorStream {
    fn new(seed_hashes: VectorState, descriptor: &StreamDescriptor) -> Self {
        let key = descriptor.key();
        let mut out = [0.0; LANES];
        for lane in 0..LANES {
            out[lane] = stream_seed(seed_hashes.0[lane], &key);
        }
        VectorStream { state: VectorState(out), position: 0 }
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn next_u(&mut self) -> [f64; LANES] {
        let (next, draws) = self.state.random();
        self.state = next;
        self.position += 1;
        draws
    }

    /// All lanes share one weight table (used when the weights don't depend
    /// on per-lane progression state, e.g. a fixed enhancement/seal table).
    pub fn next_weighted(&mut self, weights: &[f64]) -> [usize; LANES] {
        let (next, indices) = self.state.choose_weighted(weights);
        self.state = next;
        self.position += 1;
        indices
    }

    /// All lanes share one range (used when `n` doesn't depend on per-lane
    /// progression state, e.g. a fixed-size name pool).
    pub fn next_uniform(&mut self, n: usize) -> [usize; LANES] {
        let (next, indices) = self.state.choose_uniform(n);
        self.state = next;
        self.position += 1;
        indices
    }

    /// One shared vectorized draw, mapped to an index with each lane's own
    /// range. The randomness advances in lock-step; only the deterministic
    /// `floor(u * n)` mapping varies by lane, since which vouchers/bosses are
    /// still eligible is itself a function of that lane's own seed.
    pub fn next_uniform_per_lane(&mut self, ns: [usize; LANES]) -> [usize; LANES] {
        let (next, draws) = self.state.random();
        self.state = next;
        self.position += 1;
        let mut out = [0usize; LANES];
        for lane in 0..LANES {
            let n = ns[lane].max(1);
            out[lane] = ((draws[lane] * n as f64).floor() as usize).min(n - 1);
        }
        out
    }

    /// Per-lane weight tables sharing one vectorized draw, for content whose
    /// odds depend on that lane's own accumulated state (e.g. shop category
    /// weights under per-lane active vouchers).
    pub fn next_weighted_per_lane(&mut self, weight_sets: &[Vec<f64>; LANES]) -> [usize; LANES] {
        let (next, draws) = self.state.random();
        self.state = next;
        self.position += 1;
        let mut out = [0usize; LANES];
        for lane in 0..LANES {
            let weights = &weight_sets[lane];
            let total: f64 = weights.iter().sum();
            out[lane] = if total <= 0.0 || weights.is_empty() {
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
        out
    }

    pub fn skip_unit(&mut self) {
        let (next, _) = self.state.random();
        self.state = next;
        self.position += 1;
    }
}

/// The vector counterpart of [`StreamCache`]: one shared cursor per
/// `(kind, ante, modifier)`, driving all lanes of a lane-group together
/// (§4.4). `None` seed slots hash to a dummy state of `1.0` and are simply
/// never read back by the caller, which tracks liveness via `LaneMask`.
#[derive(Debug, Clone)]
pub struct VectorStreamCache {
    seed_hashes: VectorState,
    streams: HashMap<(StreamKind, u8, u8), VectorStream>,
}

impl VectorStreamCache {
    pub fn new(seeds: &[Option<Seed>; LANES]) -> Self {
        let mut hashes = [0.0; LANES];
        for lane in 0..LANES {
            hashes[lane] = seeds[lane].as_ref().map(crate::prng::seed_hash).unwrap_or(1.0);
        }
        VectorStreamCache { seed_hashes: VectorState(hashes), streams: HashMap::new() }
    }

    pub fn get_or_create(&mut self, descriptor: StreamDescriptor) -> &mut VectorStream {
        let hashes = self.seed_hashes;
        self.streams
            .entry((descriptor.kind, descriptor.ante, descriptor.modifier))
            .or_insert_with(|| VectorStream::new(hashes, &descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_descriptor_and_position_reproduces_value() {
        let seed = Seed::parse("ALEEZTEE").unwrap();
        let mut cache_a = StreamCache::new(&seed);
        let mut cache_b = StreamCache::new(&seed);
        let descriptor = StreamDescriptor::new(StreamKind::Tag, 1);

        let a = cache_a.get_or_create(descriptor).next_u();
        let b = cache_b.get_or_create(descriptor).next_u();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_antes_diverge() {
        let seed = Seed::parse("ALEEZTEE").unwrap();
        let mut cache = StreamCache::new(&seed);
        let v1 = cache.get_or_create(StreamDescriptor::new(StreamKind::Voucher, 1)).next_u();
        let v2 = cache.get_or_create(StreamDescriptor::new(StreamKind::Voucher, 2)).next_u();
        assert_ne!(v1, v2);
    }

    #[test]
    fn cache_is_idempotent_on_repeated_lookup() {
        let seed = Seed::parse("AAAAAAAA").unwrap();
        let mut cache = StreamCache::new(&seed);
        let descriptor = StreamDescriptor::new(StreamKind::Boss, 4);
        let first = cache.get_or_create(descriptor).next_u();
        // Look the stream up again without advancing; cursor position
        // must be preserved, not reset.
        assert_eq!(cache.get_or_create(descriptor).position(), 1);
        let _ = first;
    }

    #[test]
    fn skip_unit_advances_position_without_diverging_later_draws() {
        let seed = Seed::parse("AAAAAAAA").unwrap();
        let mut skipped = StreamCache::new(&seed);
        let mut direct = StreamCache::new(&seed);
        let descriptor = StreamDescriptor::new(StreamKind::BoosterPack, 1);

        skipped.get_or_create(descriptor).skip_unit();
        let after_skip = skipped.get_or_create(descriptor).next_u();

        let direct_stream = direct.get_or_create(descriptor);
        direct_stream.next_u();
        let after_direct = direct_stream.next_u();

        assert_eq!(after_skip, after_direct);
    }

    fn lane_seeds() -> [Option<Seed>; LANES] {
        let names = ["ALEEZTEE", "AAAAAAAA", "BBBBBBBB", "ZEBRA123", "QQQQQQQQ", "MIXED012", "TEST4321", "LASTLANE"];
        let mut out = [None; LANES];
        for (i, n) in names.iter().enumerate() {
            out[i] = Some(Seed::parse(n).unwrap());
        }
        out
    }

    #[test]
    fn vector_stream_agrees_with_per_lane_scalar_streams() {
        let seeds = lane_seeds();
        let mut vector_cache = VectorStreamCache::new(&seeds);
        let descriptor = StreamDescriptor::new(StreamKind::ShopSlotCategory, 2);
        let vector_draws = vector_cache.get_or_create(descriptor).next_u();

        for (lane, seed) in seeds.iter().enumerate() {
            let mut scalar = StreamCache::new(seed.as_ref().unwrap());
            let scalar_draw = scalar.get_or_create(descriptor).next_u();
            assert_eq!(vector_draws[lane], scalar_draw, "lane {lane} diverged");
        }
    }

    #[test]
    fn vector_stream_per_lane_uniform_matches_scalar_per_lane_n() {
        let seeds = lane_seeds();
        let mut vector_cache = VectorStreamCache::new(&seeds);
        let descriptor = StreamDescriptor::new(StreamKind::Voucher, 3);
        let ns = [1usize, 2, 3, 4, 5, 6, 7, 8];
        let vector_idx = vector_cache.get_or_create(descriptor).next_uniform_per_lane(ns);

        for (lane, seed) in seeds.iter().enumerate() {
            let mut scalar = StreamCache::new(seed.as_ref().unwrap());
            let scalar_idx = scalar.get_or_create(descriptor).next_uniform(ns[lane]);
            assert_eq!(vector_idx[lane], scalar_idx, "lane {lane} diverged");
        }
    }

    #[test]
    fn vector_stream_position_stays_identical_across_lanes_regardless_of_n() {
        let seeds = lane_seeds();
        let mut vector_cache = VectorStreamCache::new(&seeds);
        let descriptor = StreamDescriptor::new(StreamKind::Boss, 1);
        let stream = vector_cache.get_or_create(descriptor);
        stream.next_uniform_per_lane([1, 5, 2, 9, 3, 7, 4, 6]);
        assert_eq!(stream.position(), 1);
    }
}
