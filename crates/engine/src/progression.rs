//! Ante-by-ante voucher and boss progression. Both are stateful across
//! antes (a voucher once offered becomes "active" for every later ante's
//! shop odds and slot count; a boss can't repeat until its pool is
//! exhausted), so they're simulated once per seed up front rather than
//! re-derived independently by every clause check.
//!
//! This assumes every offered voucher is taken immediately — the simplest
//! progression consistent with a seed search that reasons about what's
//! *reachable*, not about a specific playthrough's choices (see DESIGN.md).

use cardseek_core::prng::LANES;
use cardseek_core::stream::{StreamCache, StreamDescriptor, StreamKind, VectorStreamCache};
use cardseek_core::{BossName, VoucherName};
use cardseek_data::{BossHistory, BossHistoryVector};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct RunProgression {
    /// Index `ante - 1`: the voucher set already active going into that
    /// ante's shop (i.e. accumulated from every earlier ante).
    pub active_vouchers_by_ante: Vec<HashSet<VoucherName>>,
    /// Index `ante - 1`: the voucher offered at that ante.
    pub offered_voucher_by_ante: Vec<VoucherName>,
    /// Index `ante - 1`: the boss drawn for that ante.
    pub boss_by_ante: Vec<BossName>,
}

impl RunProgression {
    pub fn active_vouchers_for(&self, ante: u8) -> &HashSet<VoucherName> {
        &self.active_vouchers_by_ante[(ante - 1) as usize]
    }

    pub fn offered_voucher_for(&self, ante: u8) -> VoucherName {
        self.offered_voucher_by_ante[(ante - 1) as usize]
    }

    pub fn boss_for(&self, ante: u8) -> BossName {
        self.boss_by_ante[(ante - 1) as usize]
    }
}

pub fn simulate_progression(cache: &mut StreamCache, max_ante: u8) -> RunProgression {
    let mut active = HashSet::new();
    let mut active_by_ante = Vec::with_capacity(max_ante as usize);
    let mut offered = Vec::with_capacity(max_ante as usize);
    let mut boss_by_ante = Vec::with_capacity(max_ante as usize);
    let mut boss_history = BossHistory::new();

    for ante in 1..=max_ante {
        active_by_ante.push(active.clone());

        let voucher = {
            let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::Voucher, ante));
            cardseek_data::voucher_after(&active, stream)
        };
        active.insert(voucher);
        offered.push(voucher);

        let boss = {
            let stream = cache.get_or_create(StreamDescriptor::new(StreamKind::Boss, ante));
            boss_history.draw(ante, stream)
        };
        boss_by_ante.push(boss);
    }

    RunProgression { active_vouchers_by_ante: active_by_ante, offered_voucher_by_ante: offered, boss_by_ante }
}

/// The 8-lane lock-step counterpart of [`simulate_progression`] (§4.4): one
/// [`VectorStreamCache`] drives all lanes' voucher and boss streams
/// together. Every lane consumes exactly one draw per ante from each
/// stream regardless of that lane's own active-voucher set or boss
/// history, so this stays bit-exact with running [`simulate_progression`]
/// independently per lane (see the equivalence test below).
pub fn simulate_progression_vector(cache: &mut VectorStreamCache, max_ante: u8) -> [RunProgression; LANES] {
    let mut actives: [HashSet<VoucherName>; LANES] = Default::default();
    let mut active_by_ante: [Vec<HashSet<VoucherName>>; LANES] =
        std::array::from_fn(|_| Vec::with_capacity(max_ante as usize));
    let mut offered: [Vec<VoucherName>; LANES] = std::array::from_fn(|_| Vec::with_capacity(max_ante as usize));
    let mut boss_by_ante: [Vec<BossName>; LANES] = std::array::from_fn(|_| Vec::with_capacity(max_ante as usize));
    let mut boss_history = BossHistoryVector::new();

    for ante in 1..=max_ante {
        for lane in 0..LANES {
            active_by_ante[lane].push(actives[lane].clone());
        }

        let voucher_stream = cache.get_or_create(StreamDescriptor::new(StreamKind::Voucher, ante));
        let vouchers = cardseek_data::voucher_after_vector(&actives, voucher_stream);
        for lane in 0..LANES {
            actives[lane].insert(vouchers[lane]);
            offered[lane].push(vouchers[lane]);
        }

        let boss_stream = cache.get_or_create(StreamDescriptor::new(StreamKind::Boss, ante));
        let bosses = boss_history.draw(ante, boss_stream);
        for lane in 0..LANES {
            boss_by_ante[lane].push(bosses[lane]);
        }
    }

    std::array::from_fn(|lane| RunProgression {
        active_vouchers_by_ante: std::mem::take(&mut active_by_ante[lane]),
        offered_voucher_by_ante: std::mem::take(&mut offered[lane]),
        boss_by_ante: std::mem::take(&mut boss_by_ante[lane]),
    })
}
