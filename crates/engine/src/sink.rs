//! The Result Sink: a lock-free multi-producer queue (§5 "Result queue:
//! single instance, lock-free"; §7 `ResultQueueFull`). Bounded-blocking,
//! bounded-dropping, and unbounded variants are all the same type, chosen
//! at construction (§9 supplemented feature: the spec names both
//! `ResultQueueFull` policies but not a default).

use crate::error::EngineError;
use crate::result::MatchResult;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub enum QueueMode {
    Unbounded,
    /// `blocking = true`: `push` blocks briefly then reports `ResultQueueFull`.
    /// `blocking = false`: full pushes are dropped and counted instead.
    Bounded { capacity: usize, blocking: bool },
}

const BLOCK_TIMEOUT: Duration = Duration::from_millis(50);

pub struct ResultSink {
    tx: Sender<MatchResult>,
    rx: Receiver<MatchResult>,
    blocking: bool,
    dropped: AtomicU64,
}

impl ResultSink {
    pub fn new(mode: QueueMode) -> Self {
        let (tx, rx, blocking) = match mode {
            QueueMode::Unbounded => {
                let (tx, rx) = unbounded();
                (tx, rx, true)
            }
            QueueMode::Bounded { capacity, blocking } => {
                let (tx, rx) = bounded(capacity);
                (tx, rx, blocking)
            }
        };
        ResultSink { tx, rx, blocking, dropped: AtomicU64::new(0) }
    }

    /// A cloneable handle each worker thread can push through independently
    /// (§5: per-worker producers, single shared consumer side).
    pub fn sender(&self) -> Sender<MatchResult> {
        self.tx.clone()
    }

    pub fn push(sender: &Sender<MatchResult>, blocking: bool, dropped: &AtomicU64, result: MatchResult) -> Result<(), EngineError> {
        if blocking {
            sender.send_timeout(result, BLOCK_TIMEOUT).map_err(|_| EngineError::ResultQueueFull)
        } else {
            match sender.try_send(result) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => {
                    dropped.fetch_add(1, Ordering::Relaxed);
                    Ok(())
                }
                Err(TrySendError::Disconnected(_)) => Err(EngineError::ResultQueueFull),
            }
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    pub fn dropped_handle(&self) -> &AtomicU64 {
        &self.dropped
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Drains whatever is currently queued without blocking (§7 `Cancelled`:
    /// "Clean shutdown: drain queue, return aggregate stats").
    pub fn drain_available(&self) -> Vec<MatchResult> {
        let mut out = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            out.push(result);
        }
        out
    }
}
