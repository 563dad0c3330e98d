//! The reference driver (§1 "external collaborators", §6 Driver interface,
//! CLI/driver flags): enumerates the scalar seed space, fans lane-groups out
//! across a per-core worker pool, and drains the Result Sink to a CSV
//! stream. This binary is deliberately thin — every filter-evaluation
//! decision lives in `cardseek-engine`; this crate only wires seed
//! enumeration, threading, and output around it.

use anyhow::Context as _;
use cardseek_core::seed::{Seed, SEED_SPACE_SIZE};
use cardseek_core::{Deck, Stake};
use cardseek_engine::vector::LANES;
use cardseek_engine::{Context, CutoffPolicy, LaneGroup, QueueMode, ResultSink};
use cardseek_filter::clause::Cutoff;
use cardseek_filter::Filter;
use clap::Parser;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// High-throughput seed search over a declarative filter (spec.md §1).
#[derive(Debug, Parser)]
#[command(name = "cardseek", version, about)]
struct Cli {
    /// Path to the filter JSON (§6 Filter JSON).
    #[arg(long)]
    config: PathBuf,

    /// Fixed score cutoff. Ignored if `--auto-cutoff` is set. Defaults to 1
    /// (the scoring floor every passing seed already meets).
    #[arg(long)]
    cutoff: Option<i64>,

    /// Enables running-max cutoff mode (§4.5 "Auto-cutoff mode") instead of
    /// a fixed threshold.
    #[arg(long)]
    auto_cutoff: bool,

    /// Wall-clock deadline, in milliseconds, after which the auto-cutoff
    /// ceiling freezes (§4.5, §5). Defaults to 10000ms per spec.md.
    #[arg(long, default_value_t = 10_000)]
    auto_cutoff_deadline_ms: u64,

    /// Worker thread count. `0` means "one per core" (§9 supplemented
    /// feature).
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Overrides the filter JSON's `deck`.
    #[arg(long)]
    deck: Option<String>,

    /// Overrides the filter JSON's `stake`.
    #[arg(long)]
    stake: Option<String>,

    /// Caps the number of seeds scanned (reference-driver ergonomic; the
    /// full seed space is 34^8 ≈ 1.79 trillion seeds and is otherwise
    /// scanned until cancelled). Rounded up to a whole number of lane-groups.
    #[arg(long)]
    limit: Option<u64>,

    /// Writes matches here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn init_logging() {
    let filter = std::env::var("RULATRO_SEARCH_LOG").unwrap_or_else(|_| "cardseek_cli=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[derive(Debug, Default)]
struct RunStats {
    seeds_evaluated: AtomicU64,
    seeds_matched: AtomicU64,
    seeds_dropped: AtomicU64,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let filter = match load_filter(&cli) {
        Ok(filter) => filter,
        Err(err) => {
            tracing::error!("{err:#}");
            return ExitCode::from(1);
        }
    };

    match run_search(&cli, filter) {
        Ok(()) => ExitCode::from(0),
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(2)
        }
    }
}

/// The filter JSON has no cutoff key (§6: cutoff is CLI/driver-only), so the
/// compiler takes it as a parameter rather than reading it from the text.
fn cutoff_from_cli(cli: &Cli) -> Cutoff {
    if cli.auto_cutoff {
        Cutoff::Auto { ceiling_deadline_ms: cli.auto_cutoff_deadline_ms }
    } else {
        Cutoff::Fixed(cli.cutoff.unwrap_or(1))
    }
}

/// Loads and compiles the filter, applying the `--deck`/`--stake` overrides
/// (§6 CLI/driver flags). Any failure here is a `ConfigInvalid` per §7 and
/// is fatal before any search runs.
fn load_filter(cli: &Cli) -> anyhow::Result<Filter> {
    let text = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("reading filter config {}", cli.config.display()))?;
    let mut filter = cardseek_filter::compile(&text, cutoff_from_cli(cli)).with_context(|| {
        format!(
            "compiling filter config {} (see the clause path and known-value list above)",
            cli.config.display()
        )
    })?;

    if let Some(deck) = &cli.deck {
        filter.deck = Deck::from_str(deck).with_context(|| format!("--deck {deck:?}"))?;
    }
    if let Some(stake) = &cli.stake {
        filter.stake = Stake::from_str(stake).with_context(|| format!("--stake {stake:?}"))?;
    }
    Ok(filter)
}

fn run_search(cli: &Cli, filter: Filter) -> anyhow::Result<()> {
    // The compiled filter already carries the cutoff `--cutoff`/`--auto-cutoff`
    // resolved to at `load_filter` time; `Context` just needs it converted
    // from the filter crate's `Cutoff` to the engine's `CutoffPolicy`.
    let cutoff = CutoffPolicy::from(filter.cutoff);

    let ctx = Arc::new(Context::new(cutoff));
    let sink = Arc::new(ResultSink::new(QueueMode::Unbounded));
    let stats = Arc::new(RunStats::default());
    let filter = Arc::new(filter);

    let lane_group_count = match cli.limit {
        Some(limit) => limit.div_ceil(LANES as u64),
        None => SEED_SPACE_SIZE.div_ceil(LANES as u64),
    };

    let pool = {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if cli.threads > 0 {
            builder = builder.num_threads(cli.threads);
        }
        builder.build().context("building worker thread pool")?
    };

    tracing::info!(
        lane_group_count,
        threads = cli.threads,
        cutoff = %cutoff_summary(&cutoff),
        "starting search"
    );

    let sender = sink.sender();
    let started = Instant::now();
    pool.install(|| {
        use rayon::prelude::*;
        (0..lane_group_count).into_par_iter().for_each(|group_index| {
            if ctx.is_cancelled() {
                return;
            }
            evaluate_lane_group(group_index, &filter, &ctx, &sink, &sender, &stats);
        });
    });
    let elapsed = started.elapsed();

    write_results(cli, &sink)?;

    tracing::info!(
        seeds_evaluated = stats.seeds_evaluated.load(Ordering::Relaxed),
        seeds_matched = stats.seeds_matched.load(Ordering::Relaxed),
        seeds_dropped = stats.seeds_dropped.load(Ordering::Relaxed),
        dropped_from_queue = sink.dropped_count(),
        elapsed_ms = elapsed.as_millis() as u64,
        "search complete"
    );

    Ok(())
}

fn cutoff_summary(cutoff: &CutoffPolicy) -> String {
    match cutoff {
        CutoffPolicy::Fixed(n) => format!("fixed({n})"),
        CutoffPolicy::Auto { ceiling_deadline } => format!("auto({}ms)", ceiling_deadline.as_millis()),
    }
}

/// Evaluates one lane-group and pushes any matches to the sink.
///
/// `cardseek_engine::evaluate` already isolates each seed's scalar
/// re-verification behind its own `catch_unwind`, logging `SeedEvalFailed`
/// and dropping only that seed (§7). The `catch_unwind` here is the outer
/// net for the one thing that isn't per-seed: the vector pass is a single
/// lock-step computation across the whole group, so a panic inside it still
/// costs every lane in the group, not just one; see DESIGN.md.
fn evaluate_lane_group(
    group_index: u64,
    filter: &Filter,
    ctx: &Context,
    sink: &ResultSink,
    sender: &crossbeam_channel::Sender<cardseek_engine::MatchResult>,
    stats: &RunStats,
) {
    let mut seeds: [Option<Seed>; LANES] = [None; LANES];
    let mut live = 0usize;
    for (lane, slot) in seeds.iter_mut().enumerate() {
        let index = group_index * LANES as u64 + lane as u64;
        if index < SEED_SPACE_SIZE {
            *slot = Some(Seed::from_index(index));
            live += 1;
        }
    }
    if live == 0 {
        return;
    }
    let group = LaneGroup::new(seeds);

    let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| cardseek_engine::evaluate(&group, filter, ctx)));

    match outcome {
        Ok((_, results)) => {
            stats.seeds_evaluated.fetch_add(live as u64, Ordering::Relaxed);
            if !results.is_empty() {
                stats.seeds_matched.fetch_add(results.len() as u64, Ordering::Relaxed);
                for result in results {
                    if let Err(err) = ResultSink::push(sender, sink.is_blocking(), sink.dropped_handle(), result) {
                        tracing::warn!("{err}");
                    }
                }
            }
        }
        Err(_) => {
            stats.seeds_dropped.fetch_add(live as u64, Ordering::Relaxed);
            tracing::warn!(group_index, "lane-group evaluation panicked; seeds dropped");
        }
    }
}

/// Result Sink output (§6 "a line-per-match CSV stream
/// `|<seed>,<total_score>[,<per_should_count>...]`").
fn write_results(cli: &Cli, sink: &ResultSink) -> anyhow::Result<()> {
    use std::io::Write;

    let results = sink.drain_available();
    let mut out: Box<dyn Write> = match &cli.out {
        Some(path) => Box::new(std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?),
        None => Box::new(std::io::stdout().lock()),
    };

    for result in results {
        write!(out, "|{},{}", result.seed, result.total_score)?;
        for score in &result.per_clause_scores {
            write!(out, ",{score}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
