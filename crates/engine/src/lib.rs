//! The search engine: turns a compiled `Filter` and a stream of seeds into
//! `MatchResult`s (§4.4, §4.5, §5). Two-stage evaluation — vector first,
//! scalar second — keeps the common case (a lane-group that fails an early,
//! cheap clause) from ever touching the pack-walker state machine.

pub mod context;
pub mod error;
pub mod generate;
pub mod progression;
pub mod result;
pub mod scalar;
pub mod sink;
pub mod vector;

pub use context::{Context, CutoffPolicy};
pub use error::EngineError;
pub use result::MatchResult;
pub use scalar::ScalarEvaluator;
pub use sink::{QueueMode, ResultSink};
pub use vector::{LaneGroup, LaneMask, VectorEvaluator, LANES};

use cardseek_core::seed::Seed;
use cardseek_filter::Filter;
use std::panic::AssertUnwindSafe;

/// The driver interface (§6 "Driver interface: evaluate(lane_group, filter)
/// -> LaneMask + results"): runs the vector pass over `group`, then the
/// scalar pass over every surviving lane, checking each candidate against
/// `ctx`'s active cutoff and recording acceptances as it goes. The caller
/// (the per-worker driver loop) owns pushing the returned results onto the
/// shared sink — this function only decides which seeds clear the bar.
///
/// Each lane's scalar re-verification is isolated in its own
/// `catch_unwind` (§7: `SeedEvalFailed` is recoverable at seed granularity —
/// an internal invariant violation on one seed must not cost the other 7
/// lanes their result). The vector pass above it is one lock-step
/// computation across all 8 lanes at once (§4.4), so a panic there has no
/// narrower unit than the whole group to fail at; see DESIGN.md.
pub fn evaluate(group: &LaneGroup, filter: &Filter, ctx: &Context) -> (LaneMask, Vec<MatchResult>) {
    let mask = VectorEvaluator::evaluate(group, filter, filter.deck, filter.stake);
    let mut results = Vec::new();

    for (lane, seed) in group.seeds.iter().enumerate() {
        if ctx.is_cancelled() {
            break;
        }
        if !mask.0[lane] {
            continue;
        }
        let seed: &Seed = match seed {
            Some(s) => s,
            None => continue,
        };

        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| ScalarEvaluator::evaluate(seed, filter, i64::MIN)));
        let matched = match outcome {
            Ok(matched) => matched,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                let err = EngineError::SeedEvalFailed { seed: *seed, reason };
                tracing::warn!("{err}");
                continue;
            }
        };

        // The scalar pass's own internal floor is always the most
        // permissive value; `ctx.accepts` applies the real cutoff (fixed or
        // auto-ceiling) afterward, since the ceiling can move between seeds
        // within the same lane-group.
        if let Some(result) = matched {
            if ctx.accepts(result.total_score) {
                ctx.record_accepted(result.total_score);
                results.push(result);
            }
        }
    }

    (mask, results)
}
