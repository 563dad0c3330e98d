//! The raw Filter JSON schema (§6). Unknown keys are errors (§4.3.1) —
//! every struct here is `deny_unknown_fields`. This is the only module in
//! the workspace that touches text (§4.3: "The compiler is the only
//! component that touches text").

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFilterFile {
    pub name: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub deck: Option<String>,
    pub stake: Option<String>,
    pub filter: Option<RawFilterSection>,
    #[serde(default)]
    pub must: Vec<RawFilterItem>,
    #[serde(default)]
    pub should: Vec<RawFilterItem>,
    #[serde(default, rename = "mustNot")]
    pub must_not: Vec<RawFilterItem>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFilterSection {
    pub deck: Option<String>,
    pub stake: Option<String>,
    #[serde(rename = "maxAnte")]
    pub max_ante: Option<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFilterItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Option<String>,
    pub antes: Option<Vec<u8>>,
    pub score: Option<i64>,
    pub min: Option<u32>,
    pub edition: Option<String>,
    #[serde(default)]
    pub stickers: Vec<String>,
    pub suit: Option<String>,
    pub rank: Option<String>,
    pub seal: Option<String>,
    pub enhancement: Option<String>,
    pub sources: Option<RawSources>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSources {
    #[serde(rename = "shopSlots")]
    pub shop_slots: Option<Vec<u16>>,
    #[serde(rename = "packSlots")]
    pub pack_slots: Option<Vec<u8>>,
    pub tags: Option<bool>,
    #[serde(rename = "requireMega")]
    pub require_mega: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_perkeo_negative_scenario() {
        let json = r#"{
            "deck": "red", "stake": "white",
            "must": [
                {"type": "souljoker", "value": "perkeo", "edition": "negative", "antes": [1, 2]}
            ]
        }"#;
        let parsed: RawFilterFile = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.must.len(), 1);
        assert_eq!(parsed.must[0].kind, "souljoker");
        assert_eq!(parsed.must[0].value.as_deref(), Some("perkeo"));
    }

    #[test]
    fn rejects_unknown_top_level_keys() {
        let json = r#"{"mustt": []}"#;
        assert!(serde_json::from_str::<RawFilterFile>(json).is_err());
    }

    #[test]
    fn rejects_unknown_filter_item_keys() {
        let json = r#"{"must": [{"type": "joker", "typoField": 1}]}"#;
        assert!(serde_json::from_str::<RawFilterFile>(json).is_err());
    }
}
