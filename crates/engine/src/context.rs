//! Per-run `Context` (§9 "pervasive singletons... re-architect as a per-run
//! `Context` passed by reference into every worker. No process-wide
//! state."). One `Context` is constructed by the driver and shared
//! read-only (aside from its atomics) across every worker thread.

use cardseek_filter::clause::Cutoff;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Cutoff policy a run was configured with (§4.5 "Auto-cutoff mode").
#[derive(Debug, Clone, Copy)]
pub enum CutoffPolicy {
    Fixed(i64),
    Auto { ceiling_deadline: Duration },
}

/// A compiled filter's `cutoff` (§4.3: fixed or auto, resolved at compile
/// time from the CLI flags the driver passed into `compile`) becomes the
/// `Context`'s policy directly; only the auto variant's millisecond deadline
/// needs converting to a `Duration`.
impl From<Cutoff> for CutoffPolicy {
    fn from(cutoff: Cutoff) -> Self {
        match cutoff {
            Cutoff::Fixed(n) => CutoffPolicy::Fixed(n),
            Cutoff::Auto { ceiling_deadline_ms } => {
                CutoffPolicy::Auto { ceiling_deadline: Duration::from_millis(ceiling_deadline_ms) }
            }
        }
    }
}

/// Auto-cutoff's shared atomics (§5 "Shared-resource policy" (iv)): the
/// first 10 accepted results establish a ceiling unconditionally, after
/// which only results at or above the running maximum are accepted. A
/// deadline freezes the ceiling but does not stop the search.
#[derive(Debug)]
struct AutoCutoffState {
    highest_score: AtomicI64,
    results_found: AtomicU64,
    deadline_reached: AtomicBool,
    started_at: Instant,
    deadline: Duration,
}

const CEILING_ESTABLISH_COUNT: u64 = 10;

impl AutoCutoffState {
    fn new(deadline: Duration) -> Self {
        AutoCutoffState {
            highest_score: AtomicI64::new(i64::MIN),
            results_found: AtomicU64::new(0),
            deadline_reached: AtomicBool::new(false),
            started_at: Instant::now(),
            deadline,
        }
    }

    fn deadline_elapsed(&self) -> bool {
        self.deadline_reached.load(Ordering::Relaxed)
            || self.started_at.elapsed() >= self.deadline
    }

    /// Whether `score` would currently be accepted, without recording it.
    fn would_accept(&self, score: i64) -> bool {
        let found = self.results_found.load(Ordering::Acquire);
        if found < CEILING_ESTABLISH_COUNT {
            return true;
        }
        score >= self.highest_score.load(Ordering::Acquire)
    }

    /// Records an accepted result, updating the ceiling via compare-and-swap
    /// (§5: "Auto-cutoff state... shared atomics; compare-and-swap
    /// updates."). Once the deadline has passed the ceiling is frozen: the
    /// running maximum no longer rises, but the search keeps accepting
    /// results at or above it (§5: "the search continues").
    fn record(&self, score: i64) {
        self.results_found.fetch_add(1, Ordering::AcqRel);
        if self.deadline_elapsed() {
            self.deadline_reached.store(true, Ordering::Relaxed);
            return;
        }
        let mut current = self.highest_score.load(Ordering::Acquire);
        while score > current {
            match self.highest_score.compare_exchange_weak(
                current,
                score,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }
}

/// Shared, per-run state passed by reference into every worker thread.
/// Nothing here is process-wide: a fresh `Context` is built per invocation
/// of the search (§9 design note).
#[derive(Debug)]
pub struct Context {
    cancelled: AtomicBool,
    cutoff: CutoffPolicy,
    auto: Option<AutoCutoffState>,
}

impl Context {
    pub fn new(cutoff: CutoffPolicy) -> Self {
        let auto = match cutoff {
            CutoffPolicy::Auto { ceiling_deadline } => Some(AutoCutoffState::new(ceiling_deadline)),
            CutoffPolicy::Fixed(_) => None,
        };
        Context { cancelled: AtomicBool::new(false), cutoff, auto }
    }

    /// Checked between seeds and between clauses of the same seed (§4.6).
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether `total_score` currently clears the active cutoff. Fixed mode
    /// is a plain comparison; auto mode defers to the shared ceiling state.
    pub fn accepts(&self, total_score: i64) -> bool {
        match (&self.cutoff, &self.auto) {
            (CutoffPolicy::Fixed(threshold), _) => total_score >= *threshold,
            (CutoffPolicy::Auto { .. }, Some(auto)) => auto.would_accept(total_score),
            (CutoffPolicy::Auto { .. }, None) => unreachable!("auto cutoff always carries state"),
        }
    }

    /// Must be called exactly once per accepted result, after `accepts`
    /// returned true, so the running maximum reflects only results actually
    /// emitted (§8 "Auto-cutoff monotonicity").
    pub fn record_accepted(&self, total_score: i64) {
        if let Some(auto) = &self.auto {
            auto.record(total_score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_cutoff_compares_against_the_configured_constant() {
        let ctx = Context::new(CutoffPolicy::Fixed(5));
        assert!(!ctx.accepts(4));
        assert!(ctx.accepts(5));
        assert!(ctx.accepts(100));
    }

    #[test]
    fn auto_cutoff_accepts_the_first_ten_unconditionally() {
        let ctx = Context::new(CutoffPolicy::Auto { ceiling_deadline: Duration::from_secs(10) });
        for score in [1, 2, 3, 1, 1, 1, 1, 1, 1, 1] {
            assert!(ctx.accepts(score));
            ctx.record_accepted(score);
        }
    }

    #[test]
    fn auto_cutoff_rejects_below_ceiling_after_warmup() {
        let ctx = Context::new(CutoffPolicy::Auto { ceiling_deadline: Duration::from_secs(10) });
        for _ in 0..10 {
            ctx.record_accepted(10);
        }
        assert!(!ctx.accepts(5));
        assert!(ctx.accepts(10));
        assert!(ctx.accepts(20));
    }

    #[test]
    fn cancellation_flag_round_trips() {
        let ctx = Context::new(CutoffPolicy::Fixed(0));
        assert!(!ctx.is_cancelled());
        ctx.cancel();
        assert!(ctx.is_cancelled());
    }
}
