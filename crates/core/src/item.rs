//! The packed `Item` representation (§3 Item (packed)).

use crate::enums::EnumParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// bits 12-15
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Category {
    Joker = 0,
    Tarot = 1,
    Planet = 2,
    Spectral = 3,
    PlayingCard = 4,
    Invalid = 15,
}

/// bits 8-11
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rarity {
    None = 0,
    Common = 1,
    Uncommon = 2,
    Rare = 3,
    Legendary = 4,
}

/// bits 16-18
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Edition {
    None = 0,
    Foil = 1,
    Holographic = 2,
    Polychrome = 3,
    Negative = 4,
}

/// bits 19-21
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Enhancement {
    None = 0,
    Bonus = 1,
    Mult = 2,
    Wild = 3,
    Glass = 4,
    Steel = 5,
    Stone = 6,
    Gold = 7,
    Lucky = 8,
}

/// bits 22-24
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seal {
    None = 0,
    Gold = 1,
    Red = 2,
    Blue = 3,
    Purple = 4,
}

/// bits 25-27, combinable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Stickers {
    pub eternal: bool,
    pub perishable: bool,
    pub rental: bool,
}

impl Stickers {
    const ETERNAL_BIT: u32 = 1 << 25;
    const PERISHABLE_BIT: u32 = 1 << 26;
    const RENTAL_BIT: u32 = 1 << 27;

    fn to_bits(self) -> u32 {
        (if self.eternal { Self::ETERNAL_BIT } else { 0 })
            | (if self.perishable { Self::PERISHABLE_BIT } else { 0 })
            | (if self.rental { Self::RENTAL_BIT } else { 0 })
    }

    fn from_bits(bits: u32) -> Self {
        Stickers {
            eternal: bits & Self::ETERNAL_BIT != 0,
            perishable: bits & Self::PERISHABLE_BIT != 0,
            rental: bits & Self::RENTAL_BIT != 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Spades = 0,
    Hearts = 1,
    Clubs = 2,
    Diamonds = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

/// A 32-bit packed item (§3). Field layout follows spec.md's bit table
/// exactly; rank/suit share the top nibble-and-a-half since a playing card
/// never also carries a base-type index outside `0..=1` (rank/suit are
/// mutually exclusive with "base type index" for the `PlayingCard` category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Item(u32);

const BASE_TYPE_MASK: u32 = 0xFF;
const RARITY_SHIFT: u32 = 8;
const RARITY_MASK: u32 = 0xF << RARITY_SHIFT;
const CATEGORY_SHIFT: u32 = 12;
const CATEGORY_MASK: u32 = 0xF << CATEGORY_SHIFT;
const EDITION_SHIFT: u32 = 16;
const EDITION_MASK: u32 = 0x7 << EDITION_SHIFT;
const ENHANCEMENT_SHIFT: u32 = 19;
const ENHANCEMENT_MASK: u32 = 0x7 << ENHANCEMENT_SHIFT;
const SEAL_SHIFT: u32 = 22;
const SEAL_MASK: u32 = 0x7 << SEAL_SHIFT;
const STICKER_MASK: u32 = 0x7 << 25;
const RANK_SUIT_SHIFT: u32 = 28;

impl Item {
    pub fn joker(base_type: u8, rarity: Rarity, edition: Edition, stickers: Stickers) -> Self {
        let mut bits = base_type as u32;
        bits |= (rarity as u32) << RARITY_SHIFT;
        bits |= (Category::Joker as u32) << CATEGORY_SHIFT;
        bits |= (edition as u32) << EDITION_SHIFT;
        bits |= stickers.to_bits();
        Item(bits)
    }

    pub fn consumable(category: Category, base_type: u8, is_soul_marker: bool) -> Self {
        debug_assert!(matches!(
            category,
            Category::Tarot | Category::Planet | Category::Spectral
        ));
        let mut bits = base_type as u32;
        bits |= (category as u32) << CATEGORY_SHIFT;
        if is_soul_marker {
            // The Soul (tarot) and The Black Hole (spectral) flag themselves
            // in the otherwise-unused rarity nibble, since consumables carry
            // no rarity of their own.
            bits |= 0xF << RARITY_SHIFT;
        }
        Item(bits)
    }

    /// Playing cards have no joker-style "base type"; rank is stored there
    /// instead (8 bits is ample for 0..=12), and suit occupies the rank/suit
    /// nibble from spec.md's bit table.
    pub fn playing_card(rank: Rank, suit: Suit, enhancement: Enhancement, seal: Seal, edition: Edition) -> Self {
        let mut bits = rank as u32;
        bits |= (Category::PlayingCard as u32) << CATEGORY_SHIFT;
        bits |= (edition as u32) << EDITION_SHIFT;
        bits |= (enhancement as u32) << ENHANCEMENT_SHIFT;
        bits |= (seal as u32) << SEAL_SHIFT;
        bits |= (suit as u32) << RANK_SUIT_SHIFT;
        Item(bits)
    }

    pub fn base_type(&self) -> u8 {
        (self.0 & BASE_TYPE_MASK) as u8
    }

    pub fn category(&self) -> Category {
        match (self.0 & CATEGORY_MASK) >> CATEGORY_SHIFT {
            0 => Category::Joker,
            1 => Category::Tarot,
            2 => Category::Planet,
            3 => Category::Spectral,
            4 => Category::PlayingCard,
            _ => Category::Invalid,
        }
    }

    pub fn rarity(&self) -> Rarity {
        match (self.0 & RARITY_MASK) >> RARITY_SHIFT {
            1 => Rarity::Common,
            2 => Rarity::Uncommon,
            3 => Rarity::Rare,
            4 => Rarity::Legendary,
            _ => Rarity::None,
        }
    }

    pub fn is_soul_marker(&self) -> bool {
        matches!(self.category(), Category::Tarot | Category::Spectral)
            && (self.0 & RARITY_MASK) >> RARITY_SHIFT == 0xF
    }

    pub fn edition(&self) -> Edition {
        match (self.0 & EDITION_MASK) >> EDITION_SHIFT {
            1 => Edition::Foil,
            2 => Edition::Holographic,
            3 => Edition::Polychrome,
            4 => Edition::Negative,
            _ => Edition::None,
        }
    }

    pub fn enhancement(&self) -> Enhancement {
        match (self.0 & ENHANCEMENT_MASK) >> ENHANCEMENT_SHIFT {
            1 => Enhancement::Bonus,
            2 => Enhancement::Mult,
            3 => Enhancement::Wild,
            4 => Enhancement::Glass,
            5 => Enhancement::Steel,
            6 => Enhancement::Stone,
            7 => Enhancement::Gold,
            8 => Enhancement::Lucky,
            _ => Enhancement::None,
        }
    }

    pub fn seal(&self) -> Seal {
        match (self.0 & SEAL_MASK) >> SEAL_SHIFT {
            1 => Seal::Gold,
            2 => Seal::Red,
            3 => Seal::Blue,
            4 => Seal::Purple,
            _ => Seal::None,
        }
    }

    pub fn stickers(&self) -> Stickers {
        Stickers::from_bits(self.0 & STICKER_MASK)
    }

    pub fn rank(&self) -> Option<Rank> {
        if self.category() != Category::PlayingCard {
            return None;
        }
        Rank::from_raw(self.base_type())
    }

    pub fn suit(&self) -> Option<Suit> {
        if self.category() != Category::PlayingCard {
            return None;
        }
        match (self.0 >> RANK_SUIT_SHIFT) & 0x3 {
            0 => Some(Suit::Spades),
            1 => Some(Suit::Hearts),
            2 => Some(Suit::Clubs),
            3 => Some(Suit::Diamonds),
            _ => None,
        }
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

macro_rules! text_enum {
    ($name:ident, $category:literal, [$($variant:ident => $text:literal),+ $(,)?]) => {
        impl $name {
            fn as_text(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_text())
            }
        }

        impl FromStr for $name {
            type Err = EnumParseError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(if s.eq_ignore_ascii_case($text) { return Ok($name::$variant); })+
                Err(EnumParseError {
                    category: $category,
                    value: s.to_string(),
                    known: [$($text),+].join(", "),
                })
            }
        }
    };
}

text_enum!(Edition, "edition", [
    None => "none", Foil => "foil", Holographic => "holographic",
    Polychrome => "polychrome", Negative => "negative",
]);

text_enum!(Enhancement, "enhancement", [
    None => "none", Bonus => "bonus", Mult => "mult", Wild => "wild",
    Glass => "glass", Steel => "steel", Stone => "stone", Gold => "gold", Lucky => "lucky",
]);

text_enum!(Seal, "seal", [
    None => "none", Gold => "gold", Red => "red", Blue => "blue", Purple => "purple",
]);

text_enum!(Suit, "suit", [
    Spades => "spades", Hearts => "hearts", Clubs => "clubs", Diamonds => "diamonds",
]);

text_enum!(Rank, "rank", [
    Two => "2", Three => "3", Four => "4", Five => "5", Six => "6", Seven => "7",
    Eight => "8", Nine => "9", Ten => "10", Jack => "jack", Queen => "queen",
    King => "king", Ace => "ace",
]);

impl Rank {
    fn from_raw(raw: u8) -> Option<Rank> {
        match raw {
            0 => Some(Rank::Two),
            1 => Some(Rank::Three),
            2 => Some(Rank::Four),
            3 => Some(Rank::Five),
            4 => Some(Rank::Six),
            5 => Some(Rank::Seven),
            6 => Some(Rank::Eight),
            7 => Some(Rank::Nine),
            8 => Some(Rank::Ten),
            9 => Some(Rank::Jack),
            10 => Some(Rank::Queen),
            11 => Some(Rank::King),
            12 => Some(Rank::Ace),
            _ => None,
        }
    }
}
