//! Engine-level error kinds (§7 error table: `StreamDesynced`,
//! `SeedEvalFailed`, `ResultQueueFull`, `Cancelled`). `ConfigInvalid` and
//! `DataMissing` belong to `cardseek-filter`'s compile step, not here.

use cardseek_core::seed::Seed;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The pack walker advanced a stream cursor the wrong number of times.
    /// Fatal per worker (§7): a desynced cursor poisons every later clause.
    #[error("stream desynced for ante {ante}: expected cursor position {expected}, got {actual}")]
    StreamDesynced { ante: u8, expected: u32, actual: u32 },

    /// An internal invariant was violated evaluating one seed. Recoverable:
    /// the seed is dropped and the worker continues (§7 policy).
    #[error("seed {seed} failed evaluation: {reason}")]
    SeedEvalFailed { seed: Seed, reason: String },

    /// The bounded result queue rejected a push after a brief block.
    #[error("result queue is full")]
    ResultQueueFull,
}
