//! The Rule Compiler (§4.3): parses JSON, resolves every string to an enum
//! exactly once, applies defaults, classifies clauses as vectorizable or
//! not, and plans which streams to cache eagerly.

use crate::clause::{
    Clause, ClauseCommon, Cutoff, Filter, JokerValue, Refinement, SourceConstraints, TagSlot,
};
use crate::schema::{RawFilterFile, RawFilterItem, RawSources};
use cardseek_core::stream::{StreamDescriptor, StreamKind};
use cardseek_core::{
    BossName, Deck, Edition, Enhancement, EnumParseError, JokerName, PlanetName, Rank, Seal,
    SoulJokerName, SpectralName, Stake, Suit, TagName, TarotName, VoucherName,
};
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid filter JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("clause {path}: unknown {category} value {value:?}; known values: {known}")]
    UnknownEnum { path: String, category: &'static str, value: String, known: String },
    #[error("clause {path}: unknown item type {kind:?}; expected one of: joker, souljoker, tarotcard, planetcard, spectralcard, smallblindtag, bigblindtag, voucher, playingcard, boss")]
    UnknownItemKind { path: String, kind: String },
    #[error("clause {path}: `value` is required for item type {kind:?}")]
    MissingValue { path: String, kind: String },
}

impl From<(String, EnumParseError)> for CompileError {
    fn from((path, err): (String, EnumParseError)) -> Self {
        CompileError::UnknownEnum {
            path,
            category: err.category,
            value: err.value,
            known: err.known,
        }
    }
}

const DEFAULT_MAX_ANTE: u8 = 8;

fn default_antes() -> BTreeSet<u8> {
    (1..=DEFAULT_MAX_ANTE).collect()
}

fn parse_antes(raw: &Option<Vec<u8>>) -> BTreeSet<u8> {
    match raw {
        Some(list) if !list.is_empty() => list.iter().copied().collect(),
        _ => default_antes(),
    }
}

fn parse_sources(raw: &Option<RawSources>, soul_joker: bool) -> SourceConstraints {
    let mut sources = SourceConstraints::default();
    if soul_joker {
        // §4.3.3: legendary jokers never appear in shops.
        sources.shop_slots.clear();
    }
    if let Some(raw) = raw {
        if let Some(slots) = &raw.shop_slots {
            sources.shop_slots = slots.iter().copied().collect();
        }
        if let Some(slots) = &raw.pack_slots {
            sources.pack_slots = slots.iter().copied().collect();
        }
        if let Some(tags) = raw.tags {
            sources.tags_enabled = tags;
        }
        if let Some(mega) = raw.require_mega {
            sources.require_mega = mega;
        }
    }
    sources
}

fn parse_refinement(raw: &RawFilterItem, path: &str) -> Result<Refinement, CompileError> {
    let edition = match &raw.edition {
        Some(s) => Some(parse_enum::<Edition>(s, path)?),
        None => None,
    };
    let rank = match &raw.rank {
        Some(s) => Some(parse_enum::<Rank>(s, path)?),
        None => None,
    };
    let suit = match &raw.suit {
        Some(s) => Some(parse_enum::<Suit>(s, path)?),
        None => None,
    };
    let seal = match &raw.seal {
        Some(s) => Some(parse_enum::<Seal>(s, path)?),
        None => None,
    };
    let enhancement = match &raw.enhancement {
        Some(s) => Some(parse_enum::<Enhancement>(s, path)?),
        None => None,
    };

    let mut refinement = Refinement { edition, rank, suit, seal, enhancement, ..Default::default() };
    for sticker in &raw.stickers {
        match sticker.to_ascii_lowercase().as_str() {
            "eternal" => refinement.eternal = Some(true),
            "perishable" => refinement.perishable = Some(true),
            "rental" => refinement.rental = Some(true),
            other => {
                return Err(CompileError::UnknownEnum {
                    path: path.to_string(),
                    category: "sticker",
                    value: other.to_string(),
                    known: "eternal, perishable, rental".to_string(),
                })
            }
        }
    }
    Ok(refinement)
}

/// Generic enum-parsing helper shared by every category: attaches the
/// clause path to whatever [`EnumParseError`] the `FromStr` impl produced.
fn parse_enum<T>(value: &str, path: &str) -> Result<T, CompileError>
where
    T: FromStr<Err = EnumParseError>,
{
    T::from_str(value).map_err(|err| CompileError::from((path.to_string(), err)))
}

fn parse_joker_value(value: &str, path: &str) -> Result<JokerValue, CompileError> {
    match value {
        "anyCommon" => Ok(JokerValue::AnyCommon),
        "anyUncommon" => Ok(JokerValue::AnyUncommon),
        "anyRare" => Ok(JokerValue::AnyRare),
        "anyLegendary" => Ok(JokerValue::AnyLegendary),
        "anyJoker" => Ok(JokerValue::AnyJoker),
        exact => Ok(JokerValue::Exact(parse_enum::<JokerName>(exact, path)?)),
    }
}

fn compile_clause(raw: &RawFilterItem, path: String) -> Result<Clause, CompileError> {
    let antes = parse_antes(&raw.antes);
    let score = raw.score.unwrap_or(0);
    let min = raw.min;
    let refinement = parse_refinement(raw, &path)?;

    let require_value = || raw.value.as_deref().ok_or_else(|| CompileError::MissingValue {
        path: path.clone(),
        kind: raw.kind.clone(),
    });

    let clause = match raw.kind.as_str() {
        "joker" => {
            let value = parse_joker_value(require_value()?, &path)?;
            let vectorizable = matches!(value, JokerValue::Exact(_)) && refinement == Refinement::default() && min.is_none();
            Clause::Joker {
                value,
                refinement,
                common: ClauseCommon { antes, sources: parse_sources(&raw.sources, false), score, min, vectorizable },
            }
        }
        "souljoker" => {
            let value = parse_enum::<SoulJokerName>(require_value()?, &path)?;
            Clause::SoulJoker {
                value,
                refinement,
                common: ClauseCommon {
                    antes,
                    sources: parse_sources(&raw.sources, true),
                    score,
                    min,
                    // Soul-joker identity is seed×ante-only (§4.4), so it
                    // always vectorizes for the pre-filter pass even though
                    // full confirmation stays scalar.
                    vectorizable: true,
                },
            }
        }
        "tarotcard" => {
            let value = parse_enum::<TarotName>(require_value()?, &path)?;
            Clause::Tarot {
                value,
                common: ClauseCommon { antes, sources: parse_sources(&raw.sources, false), score, min, vectorizable: min.is_none() },
            }
        }
        "planetcard" => {
            let value = parse_enum::<PlanetName>(require_value()?, &path)?;
            Clause::Planet {
                value,
                common: ClauseCommon { antes, sources: parse_sources(&raw.sources, false), score, min, vectorizable: min.is_none() },
            }
        }
        "spectralcard" => {
            let value = parse_enum::<SpectralName>(require_value()?, &path)?;
            Clause::Spectral {
                value,
                common: ClauseCommon { antes, sources: parse_sources(&raw.sources, false), score, min, vectorizable: min.is_none() },
            }
        }
        "playingcard" => Clause::PlayingCard {
            refinement,
            common: ClauseCommon { antes, sources: parse_sources(&raw.sources, false), score, min, vectorizable: false },
        },
        "smallblindtag" | "bigblindtag" | "tag" => {
            let value = parse_enum::<TagName>(require_value()?, &path)?;
            let slot = match raw.kind.as_str() {
                "smallblindtag" => TagSlot::Small,
                "bigblindtag" => TagSlot::Big,
                _ => TagSlot::Either,
            };
            Clause::Tag {
                value,
                slot,
                common: ClauseCommon { antes, sources: parse_sources(&raw.sources, false), score, min, vectorizable: true },
            }
        }
        "voucher" => {
            let value = parse_enum::<VoucherName>(require_value()?, &path)?;
            Clause::Voucher {
                value,
                common: ClauseCommon { antes, sources: parse_sources(&raw.sources, false), score, min, vectorizable: true },
            }
        }
        "boss" => {
            let value = parse_enum::<BossName>(require_value()?, &path)?;
            Clause::Boss {
                value,
                // §4.3.4's vectorizable category list omits boss checks —
                // the boss rotation depends on run-wide history
                // (`BossHistory`), which only the scalar evaluator tracks.
                common: ClauseCommon { antes, sources: parse_sources(&raw.sources, false), score, min, vectorizable: false },
            }
        }
        other => {
            return Err(CompileError::UnknownItemKind { path, kind: other.to_string() });
        }
    };
    Ok(clause)
}

fn compile_list(items: &[RawFilterItem], role: &str) -> Result<Vec<Clause>, CompileError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| compile_clause(item, format!("{role}[{i}]")))
        .collect()
}

/// Builds the eager-cache plan from every clause regardless of role (§4.3.5:
/// a `MUST_NOT` still needs its streams cached just as eagerly as a `MUST`).
fn plan_cache(filter: &Filter) -> Vec<StreamDescriptor> {
    let mut plan = BTreeSet::new();
    for (_role, clause) in filter.all_clauses() {
        for ante in &clause.common().antes {
            let kinds: &[StreamKind] = match clause {
                Clause::Joker { .. } => &[StreamKind::ShopCommonJoker, StreamKind::ShopUncommonJoker, StreamKind::ShopRareJoker, StreamKind::BoosterPack],
                Clause::SoulJoker { .. } => &[StreamKind::SoulJoker, StreamKind::BoosterPack],
                Clause::Tarot { .. } => &[StreamKind::TarotShop, StreamKind::TarotArcanaPack, StreamKind::BoosterPack],
                Clause::Planet { .. } => &[StreamKind::PlanetShop, StreamKind::PlanetCelestialPack, StreamKind::BoosterPack],
                Clause::Spectral { .. } => &[StreamKind::SpectralShop, StreamKind::SpectralPack, StreamKind::BoosterPack],
                Clause::PlayingCard { .. } => &[StreamKind::PlayingCardStandardPack, StreamKind::BoosterPack],
                Clause::Tag { .. } => &[StreamKind::Tag],
                Clause::Voucher { .. } => &[StreamKind::Voucher],
                Clause::Boss { .. } => &[StreamKind::Boss],
            };
            for kind in kinds {
                plan.insert((*kind, *ante));
            }
        }
    }
    plan.into_iter().map(|(kind, ante)| StreamDescriptor::new(kind, ante)).collect()
}

/// Compiles a Filter JSON document (§4.3) with the driver-supplied cutoff
/// (§6 "CLI/driver flags": `--cutoff`/`--auto-cutoff` are driver-only, the
/// filter JSON has no cutoff key). Re-running `compile` on the same
/// `(json, cutoff)` pair is idempotent by construction: it is a pure
/// function of its input with no shared mutable state (§8 "Idempotence of
/// compilation").
pub fn compile(json: &str, cutoff: Cutoff) -> Result<Filter, CompileError> {
    let raw: RawFilterFile = serde_json::from_str(json)?;

    let deck = resolve_deck(&raw)?;
    let stake = resolve_stake(&raw)?;
    let max_ante = raw.filter.as_ref().and_then(|f| f.max_ante).unwrap_or(DEFAULT_MAX_ANTE);

    let must = compile_list(&raw.must, "must")?;
    let mut should = compile_list(&raw.should, "should")?;
    let must_not = compile_list(&raw.must_not, "mustNot")?;

    // §4.3.6: MUST/SHOULD copy law — scoring floor.
    if should.is_empty() && !must.is_empty() {
        should = must.clone();
    }

    let mut filter = Filter {
        name: raw.name,
        author: raw.author,
        description: raw.description,
        deck,
        stake,
        max_ante,
        must,
        should,
        must_not,
        cutoff,
        cache_plan: Vec::new(),
    };
    filter.cache_plan = plan_cache(&filter);

    tracing::debug!(
        must = filter.must.len(),
        should = filter.should.len(),
        must_not = filter.must_not.len(),
        vectorizable = filter.all_clauses().filter(|(_, c)| c.is_vectorizable()).count(),
        cached_streams = filter.cache_plan.len(),
        "compiled filter"
    );

    Ok(filter)
}

fn resolve_deck(raw: &RawFilterFile) -> Result<Deck, CompileError> {
    let text = raw
        .filter
        .as_ref()
        .and_then(|f| f.deck.clone())
        .or_else(|| raw.deck.clone());
    match text {
        Some(s) => parse_enum::<Deck>(&s, "deck"),
        None => Ok(Deck::Red),
    }
}

fn resolve_stake(raw: &RawFilterFile) -> Result<Stake, CompileError> {
    let text = raw
        .filter
        .as_ref()
        .and_then(|f| f.stake.clone())
        .or_else(|| raw.stake.clone());
    match text {
        Some(s) => parse_enum::<Stake>(&s, "stake"),
        None => Ok(Stake::White),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERKEO_NEGATIVE: &str = r#"{
        "deck": "red", "stake": "white",
        "must": [
            {"type": "souljoker", "value": "perkeo", "edition": "negative", "antes": [1, 2]}
        ]
    }"#;

    #[test]
    fn compiles_the_perkeo_negative_scenario() {
        let filter = compile(PERKEO_NEGATIVE, Cutoff::Fixed(1)).unwrap();
        assert_eq!(filter.must.len(), 1);
        assert_eq!(filter.should.len(), 1, "empty SHOULD copies MUST (§4.3.6)");
        assert_eq!(filter.deck, Deck::Red);
    }

    #[test]
    fn must_without_should_copies_into_should() {
        let json = r#"{"must": [{"type": "voucher", "value": "telescope", "score": 3}]}"#;
        let filter = compile(json, Cutoff::Fixed(1)).unwrap();
        assert_eq!(filter.should.len(), 1);
        assert_eq!(filter.should[0].score(), 3);
    }

    #[test]
    fn explicit_should_is_not_overwritten() {
        let json = r#"{
            "must": [{"type": "voucher", "value": "telescope"}],
            "should": [{"type": "voucher", "value": "observatory", "score": 5}]
        }"#;
        let filter = compile(json, Cutoff::Fixed(1)).unwrap();
        assert_eq!(filter.should.len(), 1);
        assert_eq!(filter.should[0].score(), 5);
    }

    #[test]
    fn unknown_enum_value_is_a_fatal_compile_error() {
        let json = r#"{"must": [{"type": "voucher", "value": "not_a_real_voucher"}]}"#;
        let err = compile(json, Cutoff::Fixed(1)).unwrap_err();
        match err {
            CompileError::UnknownEnum { category, known, .. } => {
                assert_eq!(category, "voucher");
                assert!(known.contains("telescope"));
            }
            other => panic!("expected UnknownEnum, got {other:?}"),
        }
    }

    #[test]
    fn soul_joker_clauses_default_to_empty_shop_slots() {
        let json = r#"{"must": [{"type": "souljoker", "value": "perkeo"}]}"#;
        let filter = compile(json, Cutoff::Fixed(1)).unwrap();
        match &filter.must[0] {
            Clause::SoulJoker { common, .. } => assert!(common.sources.shop_slots.is_empty()),
            _ => panic!("expected SoulJoker clause"),
        }
    }

    #[test]
    fn default_antes_are_one_through_eight() {
        let json = r#"{"must": [{"type": "voucher", "value": "telescope"}]}"#;
        let filter = compile(json, Cutoff::Fixed(1)).unwrap();
        assert_eq!(filter.must[0].common().antes, default_antes());
    }

    #[test]
    fn compile_is_idempotent() {
        let a = compile(PERKEO_NEGATIVE, Cutoff::Fixed(1)).unwrap();
        let b = compile(PERKEO_NEGATIVE, Cutoff::Fixed(1)).unwrap();
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        assert!(compile(r#"{"unexpectedKey": true}"#, Cutoff::Fixed(1)).is_err());
    }

    #[test]
    fn playing_card_clauses_are_never_vectorizable() {
        let json = r#"{"must": [{"type": "playingcard", "rank": "ace", "suit": "spades"}]}"#;
        let filter = compile(json, Cutoff::Fixed(1)).unwrap();
        assert!(!filter.must[0].is_vectorizable());
    }

    // §8 "Idempotence of compilation: compile(compile(filter)) ≡
    // compile(filter)" and the "Ante-set OR" default-resolution path,
    // exercised over arbitrary ante subsets rather than one fixed JSON
    // literal.
    mod compile_properties {
        use super::*;
        use proptest::prelude::*;

        fn filter_json(antes: &[u8], score: i64) -> String {
            let antes_json: Vec<String> = antes.iter().map(|a| a.to_string()).collect();
            format!(
                r#"{{"must": [{{"type": "voucher", "value": "telescope", "antes": [{}], "score": {}}}]}}"#,
                antes_json.join(","),
                score
            )
        }

        proptest! {
            #[test]
            fn compile_is_idempotent_over_arbitrary_ante_sets(
                antes in prop::collection::vec(1u8..=8, 1..8),
                score in -100i64..100,
            ) {
                let json = filter_json(&antes, score);
                let a = compile(&json, Cutoff::Fixed(1)).unwrap();
                let b = compile(&json, Cutoff::Fixed(1)).unwrap();
                prop_assert_eq!(format!("{a:?}"), format!("{b:?}"));
            }

            #[test]
            fn compiled_ante_set_matches_the_requested_antes_exactly(
                antes in prop::collection::vec(1u8..=8, 1..8),
            ) {
                let json = filter_json(&antes, 1);
                let filter = compile(&json, Cutoff::Fixed(1)).unwrap();
                let expected: std::collections::BTreeSet<u8> = antes.iter().copied().collect();
                prop_assert_eq!(filter.must[0].common().antes.clone(), expected);
            }
        }
    }
}
