//! Boss stream support (§4.2 "Boss stream"): a global rotation across antes
//! with locked-boss memory — a boss already used in the run cannot repeat
//! until the pool is exhausted.

use cardseek_core::prng::LANES;
use cardseek_core::stream::{Stream, VectorStream};
use cardseek_core::BossName;

pub const BOSS_POOL: &[BossName] = &[
    BossName::TheHook,
    BossName::TheOx,
    BossName::TheHouse,
    BossName::TheWall,
    BossName::TheWheel,
    BossName::TheArm,
    BossName::TheClub,
    BossName::TheFish,
    BossName::ThePsychic,
    BossName::TheGoad,
    BossName::TheWater,
    BossName::TheWindow,
    BossName::TheManacle,
    BossName::TheEye,
    BossName::TheMouth,
    BossName::ThePlant,
    BossName::TheSerpent,
    BossName::ThePillar,
    BossName::TheFlint,
    BossName::TheNeedle,
    BossName::TheHead,
    BossName::TheTooth,
];

pub const FINISHER_POOL: &[BossName] = &[
    BossName::Amber,
    BossName::Cerulean,
    BossName::Crimson,
    BossName::Verdant,
    BossName::Violet,
];

/// Tracks which bosses have already appeared this run so the rotation never
/// repeats a boss until its pool (small vs. finisher) is exhausted.
#[derive(Debug, Clone, Default)]
pub struct BossHistory {
    used_small: Vec<BossName>,
    used_finisher: Vec<BossName>,
}

impl BossHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws the boss for `ante`. Antes that are a multiple of 8 pull from
    /// the small "finisher" pool (boss-of-the-wheel antes); all others pull
    /// from the main pool. Once every boss in the relevant pool has been
    /// used this run, the pool resets and can repeat (§4.2 invariant).
    pub fn draw(&mut self, ante: u8, stream: &mut Stream) -> BossName {
        let (pool, used) = if ante % 8 == 0 {
            (FINISHER_POOL, &mut self.used_finisher)
        } else {
            (BOSS_POOL, &mut self.used_small)
        };

        let mut eligible: Vec<BossName> = pool.iter().copied().filter(|b| !used.contains(b)).collect();
        if eligible.is_empty() {
            used.clear();
            eligible = pool.to_vec();
        }

        let idx = stream.next_uniform(eligible.len());
        let chosen = eligible[idx];
        used.push(chosen);
        chosen
    }
}

/// 8-lane lock-step history tracking, one [`BossHistory`] per lane. Every
/// lane consumes exactly one draw per call, same as the scalar version, so
/// an array of independent histories stays safe to drive off one shared
/// [`VectorStream`] cursor.
#[derive(Debug, Clone, Default)]
pub struct BossHistoryVector {
    lanes: [BossHistory; LANES],
}

impl BossHistoryVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, ante: u8, stream: &mut VectorStream) -> [BossName; LANES] {
        let finisher = ante % 8 == 0;
        let pool = if finisher { FINISHER_POOL } else { BOSS_POOL };

        let mut eligibles: Vec<Vec<BossName>> = Vec::with_capacity(LANES);
        for history in &self.lanes {
            let used = if finisher { &history.used_finisher } else { &history.used_small };
            let mut eligible: Vec<BossName> = pool.iter().copied().filter(|b| !used.contains(b)).collect();
            if eligible.is_empty() {
                eligible = pool.to_vec();
            }
            eligibles.push(eligible);
        }

        let ns: [usize; LANES] = std::array::from_fn(|lane| eligibles[lane].len());
        let indices = stream.next_uniform_per_lane(ns);

        std::array::from_fn(|lane| {
            let chosen = eligibles[lane][indices[lane]];
            let history = &mut self.lanes[lane];
            let used = if finisher { &mut history.used_finisher } else { &mut history.used_small };
            if used.len() == pool.len() {
                used.clear();
            }
            used.push(chosen);
            chosen
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardseek_core::seed::Seed;
    use cardseek_core::stream::{StreamCache, StreamDescriptor, StreamKind};

    #[test]
    fn never_repeats_a_boss_before_the_pool_is_exhausted() {
        let seed = Seed::parse("ALEEZTEE").unwrap();
        let mut cache = StreamCache::new(&seed);
        let mut history = BossHistory::new();
        let mut seen = Vec::new();

        for ante in 1..=BOSS_POOL.len() as u8 {
            if ante % 8 == 0 {
                continue;
            }
            let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::Boss, ante));
            let boss = history.draw(ante, stream);
            assert!(!seen.contains(&boss), "boss {boss:?} repeated before pool exhaustion");
            seen.push(boss);
        }
    }

    #[test]
    fn finisher_antes_draw_from_the_small_finisher_pool() {
        let seed = Seed::parse("AAAAAAAA").unwrap();
        let mut cache = StreamCache::new(&seed);
        let mut history = BossHistory::new();
        let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::Boss, 8));
        let boss = history.draw(8, stream);
        assert!(FINISHER_POOL.contains(&boss));
    }

    #[test]
    fn vector_draw_agrees_with_scalar_draw_lane_by_lane_across_a_full_rotation() {
        use cardseek_core::stream::VectorStreamCache;

        let names = ["ALEEZTEE", "AAAAAAAA", "BBBBBBBB", "ZEBRA123", "QQQQQQQQ", "MIXED012", "TEST4321", "LASTLANE"];
        let seeds: [Option<Seed>; LANES] = std::array::from_fn(|i| Some(Seed::parse(names[i]).unwrap()));

        let mut vector_cache = VectorStreamCache::new(&seeds);
        let mut vector_history = BossHistoryVector::new();

        let mut scalar_caches: [StreamCache; LANES] = std::array::from_fn(|i| StreamCache::new(seeds[i].as_ref().unwrap()));
        let mut scalar_histories: [BossHistory; LANES] = Default::default();

        for ante in 1..=16u8 {
            let vector_stream = vector_cache.get_or_create(StreamDescriptor::new(StreamKind::Boss, ante));
            let vector_result = vector_history.draw(ante, vector_stream);

            for lane in 0..LANES {
                let scalar_stream = scalar_caches[lane].get_or_create(StreamDescriptor::new(StreamKind::Boss, ante));
                let scalar_result = scalar_histories[lane].draw(ante, scalar_stream);
                assert_eq!(vector_result[lane], scalar_result, "ante {ante} lane {lane} diverged");
            }
        }
    }
}
