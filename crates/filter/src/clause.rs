//! The compiled `Clause` and `Filter` types (§3 Filter, §9 "re-architect as
//! a tagged-variant `Clause::{...}`").

use cardseek_core::{
    BossName, Edition, Enhancement, JokerName, PlanetName, Rank, Seal, SoulJokerName,
    SpectralName, Suit, TagName, TarotName, VoucherName,
};
use std::collections::BTreeSet;

/// A value that can be an exact enum member or one of the rarity wildcards
/// (§3 Filter: "a typed value (enum of the category), or a wildcard"). Only
/// `Joker` clauses use this — jokers are the only category with rarity
/// tiers a wildcard can usefully range over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JokerValue {
    Exact(JokerName),
    AnyCommon,
    AnyUncommon,
    AnyRare,
    AnyLegendary,
    AnyJoker,
}

/// Whether a `Tag` clause is pinned to the small blind, the big blind, or
/// either (§3 category tags `SmallBlindTag`/`BigBlindTag` fold into this
/// single `Tag` variant with a slot restriction, rather than three
/// independent enum arms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSlot {
    Either,
    Small,
    Big,
}

/// Shop-slot / pack-slot / tag / mega-pack source constraints (§3 Filter,
/// §6 `FilterItem.sources`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConstraints {
    pub shop_slots: BTreeSet<u16>,
    pub pack_slots: BTreeSet<u8>,
    pub tags_enabled: bool,
    pub require_mega: bool,
}

impl Default for SourceConstraints {
    fn default() -> Self {
        SourceConstraints {
            shop_slots: (0..=5u16).collect(),
            pack_slots: (0..=5u8).collect(),
            tags_enabled: true,
            require_mega: false,
        }
    }
}

/// Optional per-item refinements (§3 Filter: "optional edition, sticker set,
/// rank/suit/seal/enhancement refinements"). `None` means "unconstrained",
/// not "must be absent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Refinement {
    pub edition: Option<Edition>,
    pub eternal: Option<bool>,
    pub perishable: Option<bool>,
    pub rental: Option<bool>,
    pub rank: Option<Rank>,
    pub suit: Option<Suit>,
    pub seal: Option<Seal>,
    pub enhancement: Option<Enhancement>,
}

/// Fields shared by every clause variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseCommon {
    pub antes: BTreeSet<u8>,
    pub sources: SourceConstraints,
    pub score: i64,
    pub min: Option<u32>,
    /// Precomputed by the rule compiler (§4.3.4); never recomputed by the
    /// evaluators.
    pub vectorizable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Joker { value: JokerValue, refinement: Refinement, common: ClauseCommon },
    SoulJoker { value: SoulJokerName, refinement: Refinement, common: ClauseCommon },
    Tarot { value: TarotName, common: ClauseCommon },
    Planet { value: PlanetName, common: ClauseCommon },
    Spectral { value: SpectralName, common: ClauseCommon },
    PlayingCard { refinement: Refinement, common: ClauseCommon },
    Tag { value: TagName, slot: TagSlot, common: ClauseCommon },
    Voucher { value: VoucherName, common: ClauseCommon },
    Boss { value: BossName, common: ClauseCommon },
}

impl Clause {
    pub fn common(&self) -> &ClauseCommon {
        match self {
            Clause::Joker { common, .. }
            | Clause::SoulJoker { common, .. }
            | Clause::Tarot { common, .. }
            | Clause::Planet { common, .. }
            | Clause::Spectral { common, .. }
            | Clause::PlayingCard { common, .. }
            | Clause::Tag { common, .. }
            | Clause::Voucher { common, .. }
            | Clause::Boss { common, .. } => common,
        }
    }

    pub fn is_vectorizable(&self) -> bool {
        self.common().vectorizable
    }

    pub fn score(&self) -> i64 {
        self.common().score
    }
}

/// Which ordered list (§3 Filter: "three ordered vectors of `Clause`") a
/// compiled clause belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseRole {
    Must,
    Should,
    MustNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cutoff {
    Fixed(i64),
    Auto { ceiling_deadline_ms: u64 },
}

/// A compiled, immutable filter (§3 Filter). Once built by the rule
/// compiler it is shared read-only across every worker lane (§5).
#[derive(Debug, Clone)]
pub struct Filter {
    pub name: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub deck: cardseek_core::Deck,
    pub stake: cardseek_core::Stake,
    pub max_ante: u8,
    pub must: Vec<Clause>,
    pub should: Vec<Clause>,
    pub must_not: Vec<Clause>,
    pub cutoff: Cutoff,
    /// `(stream-kind, ante)` pairs to cache eagerly (§4.3.5).
    pub cache_plan: Vec<cardseek_core::stream::StreamDescriptor>,
}

impl Filter {
    pub fn all_clauses(&self) -> impl Iterator<Item = (ClauseRole, &Clause)> {
        self.must
            .iter()
            .map(|c| (ClauseRole::Must, c))
            .chain(self.should.iter().map(|c| (ClauseRole::Should, c)))
            .chain(self.must_not.iter().map(|c| (ClauseRole::MustNot, c)))
    }
}
