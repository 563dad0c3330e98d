//! Deterministic PRNG, packed item representation, and named stream layer
//! for the seed search engine (spec.md §4.1, §3, §4.2). Keep this crate free
//! of JSON/IO/CLI concerns — those belong to `cardseek-filter` and
//! `cardseek-cli`.

pub mod enums;
pub mod item;
pub mod pack;
pub mod prng;
pub mod seed;
pub mod stream;

pub use enums::*;
pub use item::*;
pub use pack::*;
pub use prng::*;
pub use seed::*;
pub use stream::*;
