//! The pack-walker state machine (§4.5): `INIT -> PACK_HEADER -> PACK_CONTENT
//! -> NEXT_PACK -> DONE`. Shared by jokers, tarots, planets, spectrals and
//! soul jokers, since all of them can show up inside a booster pack.

use crate::stream::{Stream, StreamCache, StreamDescriptor, StreamKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackKind {
    Arcana,
    Buffoon,
    Celestial,
    Spectral,
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackSize {
    Normal,
    Jumbo,
    Mega,
}

impl PackSize {
    /// Number of cards offered; `Mega` doubles the pick count but not
    /// necessarily the option count for every kind, so this stays a plain
    /// lookup rather than a multiplier.
    pub fn option_count(&self) -> usize {
        match self {
            PackSize::Normal => 3,
            PackSize::Jumbo => 5,
            PackSize::Mega => 5,
        }
    }

    pub fn pick_count(&self) -> usize {
        match self {
            PackSize::Normal | PackSize::Jumbo => 1,
            PackSize::Mega => 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PackHeader {
    pub kind: PackKind,
    pub size: PackSize,
    pub slot: u8,
}

pub enum WalkControl {
    Continue,
    Stop,
}

/// A `(kind, size)` weighted option from the data module's
/// `pack_distribution(ante)` table (§6 Data module interface).
pub type PackDistribution = [((PackKind, PackSize), f64)];

pub struct PackWalker;

impl PackWalker {
    /// `PACK_HEADER`: reads this slot's pack type and size. Always consumes
    /// one draw from the ante's booster-pack stream, independent of what the
    /// caller does with the result — this is the cursor-advance invariant
    /// §4.5 and §8 ("pack walker synchrony") require.
    pub fn draw_header(
        cache: &mut StreamCache,
        ante: u8,
        slot: u8,
        distribution: &PackDistribution,
    ) -> PackHeader {
        let weights: Vec<f64> = distribution.iter().map(|(_, w)| *w).collect();
        let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::BoosterPack, ante));
        let idx = stream.next_weighted(&weights);
        let (kind, size) = distribution[idx.min(distribution.len() - 1)].0;
        PackHeader { kind, size, slot }
    }

    /// Walks `pack_count` pack slots for `ante`. `on_pack` is the
    /// `PACK_CONTENT` decision: it inspects (or skips) the pack's contents
    /// and returns whether to keep walking. `DONE` is reached either when
    /// every slot has been visited or `on_pack` returns `Stop`.
    pub fn walk<F>(cache: &mut StreamCache, ante: u8, pack_count: u8, distribution: &PackDistribution, mut on_pack: F)
    where
        F: FnMut(&mut StreamCache, PackHeader) -> WalkControl,
    {
        for slot in 0..pack_count {
            let header = Self::draw_header(cache, ante, slot, distribution);
            match on_pack(cache, header) {
                WalkControl::Continue => continue,
                WalkControl::Stop => break,
            }
        }
    }

    /// The content stream backing a given pack kind, so callers can fetch the
    /// right cursor once a header says the pack is worth inspecting.
    pub fn content_stream<'a>(cache: &'a mut StreamCache, ante: u8, kind: PackKind) -> &'a mut Stream {
        let stream_kind = match kind {
            PackKind::Arcana => StreamKind::TarotArcanaPack,
            PackKind::Buffoon => StreamKind::ShopCommonJoker, // buffoon packs share the joker pool
            PackKind::Celestial => StreamKind::PlanetCelestialPack,
            PackKind::Spectral => StreamKind::SpectralPack,
            PackKind::Standard => StreamKind::PlayingCardStandardPack,
        };
        cache.get_or_create(StreamDescriptor::new(stream_kind, ante))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;

    fn sample_distribution() -> Vec<((PackKind, PackSize), f64)> {
        vec![
            ((PackKind::Arcana, PackSize::Normal), 4.0),
            ((PackKind::Celestial, PackSize::Normal), 4.0),
            ((PackKind::Spectral, PackSize::Normal), 1.0),
            ((PackKind::Buffoon, PackSize::Normal), 3.0),
            ((PackKind::Standard, PackSize::Jumbo), 2.0),
        ]
    }

    #[test]
    fn cursor_advances_once_per_slot_regardless_of_inspection() {
        let seed = Seed::parse("AAAAAAAA").unwrap();
        let distribution = sample_distribution();

        let mut inspect_all = StreamCache::new(&seed);
        let mut visited_a = 0;
        PackWalker::walk(&mut inspect_all, 1, 6, &distribution, |_cache, _header| {
            visited_a += 1;
            WalkControl::Continue
        });

        let mut skip_all = StreamCache::new(&seed);
        let mut visited_b = 0;
        PackWalker::walk(&mut skip_all, 1, 6, &distribution, |_cache, _header| {
            visited_b += 1;
            WalkControl::Continue
        });

        assert_eq!(visited_a, 6);
        assert_eq!(visited_b, 6);
    }

    #[test]
    fn stop_control_ends_the_walk_early() {
        let seed = Seed::parse("AAAAAAAA").unwrap();
        let distribution = sample_distribution();
        let mut cache = StreamCache::new(&seed);
        let mut visited = 0;
        PackWalker::walk(&mut cache, 1, 6, &distribution, |_cache, _header| {
            visited += 1;
            if visited == 3 {
                WalkControl::Stop
            } else {
                WalkControl::Continue
            }
        });
        assert_eq!(visited, 3);
    }

    #[test]
    fn identical_seed_and_plan_produce_identical_headers() {
        let seed = Seed::parse("ALEEZTEE").unwrap();
        let distribution = sample_distribution();

        let mut cache_a = StreamCache::new(&seed);
        let mut kinds_a = Vec::new();
        PackWalker::walk(&mut cache_a, 2, 4, &distribution, |_cache, header| {
            kinds_a.push((header.kind, header.size));
            WalkControl::Continue
        });

        let mut cache_b = StreamCache::new(&seed);
        let mut kinds_b = Vec::new();
        PackWalker::walk(&mut cache_b, 2, 4, &distribution, |_cache, header| {
            kinds_b.push((header.kind, header.size));
            WalkControl::Continue
        });

        assert_eq!(kinds_a, kinds_b);
    }
}
