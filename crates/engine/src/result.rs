//! Match Result (§3 "Match Result").

use cardseek_core::seed::Seed;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub seed: Seed,
    pub total_score: i64,
    /// One count per `SHOULD` clause, in filter order (§4.5 step 3).
    pub per_clause_scores: Vec<i64>,
}
