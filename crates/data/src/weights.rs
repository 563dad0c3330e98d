//! The shop/pack/rarity weight tables (§6 Data module interface:
//! `shop_weights`, `pack_distribution`, `joker_rarity_weights`). Treated by
//! spec.md §1 as "a constant data module the core consumes" — no IO, no
//! mutable state, just the tables the stream layer draws against.

use cardseek_core::pack::{PackKind, PackSize};
use cardseek_core::{Deck, VoucherName};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy)]
pub struct CategoryWeights {
    pub joker: f64,
    pub tarot: f64,
    pub planet: f64,
    pub spectral: f64,
    pub playing_card: f64,
}

impl CategoryWeights {
    pub fn as_slice(&self) -> [f64; 5] {
        [self.joker, self.tarot, self.planet, self.spectral, self.playing_card]
    }
}

const BASE_WEIGHTS: CategoryWeights = CategoryWeights {
    joker: 20.0,
    tarot: 4.0,
    planet: 4.0,
    spectral: 0.0,
    playing_card: 0.0,
};

/// `shop_weights(deck, stake, ante) -> CategoryWeights` (§6). `stake`
/// currently has no effect on shop category odds in the reference game, so
/// it is accepted for interface parity but unused; kept as a parameter so a
/// future stake-sensitive rule doesn't change the call site.
pub fn shop_weights(deck: Deck, _stake: cardseek_core::Stake, _ante: u8, active_vouchers: &HashSet<VoucherName>) -> CategoryWeights {
    let mut weights = BASE_WEIGHTS;

    if matches!(deck, Deck::Ghost) {
        // Ghost Deck adds a spectral-card shop rate of 2/30 (spec.md §4.2).
        weights.spectral += 2.0;
    }
    if active_vouchers.contains(&VoucherName::CrystalBall) {
        weights.tarot += 1.0;
    }
    if active_vouchers.contains(&VoucherName::OmenGlobe) {
        weights.spectral += 1.0;
    }

    weights
}

/// Number of shop card slots for `ante`, including the `Overstock` family's
/// extra slot(s) (§4.2).
pub fn shop_slot_count(ante: u8, active_vouchers: &HashSet<VoucherName>) -> usize {
    let mut slots = if ante == 1 { 4 } else { 6 };
    if active_vouchers.contains(&VoucherName::Overstock) {
        slots += 1;
    }
    if active_vouchers.contains(&VoucherName::OverstockPlus) {
        slots += 1;
    }
    slots
}

/// `(common, uncommon, rare, legendary)` weights. Legendary jokers never
/// appear in the shop proper (§3 invariant, §4.3.3 `shop_slots = ∅` default
/// for soul-joker clauses) so it is always zero here; soul jokers are drawn
/// from a dedicated stream (§4.2 Soul joker stream).
pub fn joker_rarity_weights() -> [f64; 4] {
    [70.0, 25.0, 5.0, 0.0]
}

/// `pack_distribution(ante) -> (type, size) weights` (§6). Ante 1 has no
/// Mega packs available yet (they unlock once a Hieroglyph/Petroglyph-style
/// voucher is owned in the reference game's progression); this module only
/// expresses the base per-ante table since voucher-driven unlocks are a shop
/// concern already threaded through `active_vouchers` upstream.
pub fn pack_distribution(ante: u8) -> Vec<((PackKind, PackSize), f64)> {
    let mega_weight = if ante == 1 { 0.0 } else { 1.5 };
    vec![
        ((PackKind::Arcana, PackSize::Normal), 4.0),
        ((PackKind::Arcana, PackSize::Jumbo), 2.0),
        ((PackKind::Arcana, PackSize::Mega), mega_weight),
        ((PackKind::Celestial, PackSize::Normal), 4.0),
        ((PackKind::Celestial, PackSize::Jumbo), 2.0),
        ((PackKind::Celestial, PackSize::Mega), mega_weight),
        ((PackKind::Buffoon, PackSize::Normal), 3.0),
        ((PackKind::Buffoon, PackSize::Jumbo), 1.5),
        ((PackKind::Buffoon, PackSize::Mega), mega_weight),
        ((PackKind::Spectral, PackSize::Normal), 1.0),
        ((PackKind::Spectral, PackSize::Jumbo), 0.5),
        ((PackKind::Standard, PackSize::Normal), 2.5),
        ((PackKind::Standard, PackSize::Jumbo), 1.5),
    ]
}

/// Number of booster pack slots for `ante` (§4.2: 4 for ante 1, 6 otherwise).
pub fn booster_slot_count(ante: u8) -> u8 {
    if ante == 1 {
        4
    } else {
        6
    }
}
