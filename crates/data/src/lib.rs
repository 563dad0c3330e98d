//! The game-specific tables the core consumes (§1, §6 Data module
//! interface): shop/pack/rarity weights, edition thresholds, voucher
//! progression, and boss rotation. Treated as a constant data module — no
//! IO, no JSON, no mutable process-wide state.

pub mod bosses;
pub mod editions;
pub mod jokers;
pub mod legendary;
pub mod vouchers;
pub mod weights;

pub use bosses::*;
pub use editions::*;
pub use jokers::*;
pub use legendary::*;
pub use vouchers::*;
pub use weights::*;
