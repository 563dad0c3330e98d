//! Canonical enum identities for every category the filter can reference.
//! These are the "enum of the category" values spec.md §3 says a `Clause`
//! carries; `cardseek-data` supplies the weights and probabilities that
//! select among them, but the identity list itself is part of the type
//! system every other crate dispatches on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {category} value: {value:?} (known values: {known})")]
pub struct EnumParseError {
    pub category: &'static str,
    pub value: String,
    pub known: String,
}

macro_rules! string_enum {
    ($name:ident, $category:literal, [$($variant:ident => $text:literal),+ $(,)?]) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = EnumParseError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(if s.eq_ignore_ascii_case($text) { return Ok($name::$variant); })+
                Err(EnumParseError {
                    category: $category,
                    value: s.to_string(),
                    known: $name::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", "),
                })
            }
        }
    };
}

string_enum!(Deck, "deck", [
    Red => "red", Blue => "blue", Yellow => "yellow", Green => "green",
    Black => "black", Magic => "magic", Nebula => "nebula", Ghost => "ghost",
    Abandoned => "abandoned", Checkered => "checkered", Zodiac => "zodiac",
    Painted => "painted", Anaglyph => "anaglyph", Plasma => "plasma", Erratic => "erratic",
]);

string_enum!(Stake, "stake", [
    White => "white", Red => "red", Green => "green", Black => "black",
    Blue => "blue", Purple => "purple", Orange => "orange", Gold => "gold",
]);

string_enum!(JokerName, "joker", [
    Joker => "joker", GreedyJoker => "greedyJoker", LustyJoker => "lustyJoker",
    WrathfulJoker => "wrathfulJoker", GluttonousJoker => "gluttonousJoker",
    JollyJoker => "jollyJoker", ZanyJoker => "zanyJoker", MadJoker => "madJoker",
    CrazyJoker => "crazyJoker", DrollJoker => "drollJoker", Blueprint => "blueprint",
    Brainstorm => "brainstorm", Mime => "mime", RideTheBus => "rideTheBus",
    Hiker => "hiker", FacelessJoker => "facelessJoker", GrosMichel => "grosMichel",
    EvenSteven => "evenSteven", OddTodd => "oddTodd", Scary => "scaryFace",
    Banner => "banner", MysticSummit => "mysticSummit", Loyalty => "loyaltyCard",
    Misprint => "misprint", DuskJoker => "duskJoker", RaisedFist => "raisedFist",
    Chaos => "chaosTheClown", Fibonacci => "fibonacci", SteelJoker => "steelJoker",
    Abstract => "abstractJoker", DelayedGrat => "delayedGratification",
    Hack => "hack", Stuntman => "stuntman", InvisibleJoker => "invisibleJoker",
    DNA => "dna", Cartomancer => "cartomancer", Hallucination => "hallucination",
    Baron => "baron", GiftCard => "giftCard", Constellation => "constellation",
    Hologram => "hologram", CloudNine => "cloudNine", Rocket => "rocket",
    Obelisk => "obelisk", MidasMask => "midasMask", Luchador => "luchador",
    Photograph => "photograph", GiftJoker => "giftJoker", TurtleBean => "turtleBean",
    Erosion => "erosion", Reserved => "reservedParking", MailIn => "mailInRebate",
    ToTheMoon => "toTheMoon", Hologram2 => "hallucinationAlt", SixthSense => "sixthSense",
    Shortcut => "shortcut", Egg => "egg", Burglar => "burglar", Blackboard => "blackboard",
    Runner => "runner", IceCream => "iceCream", DNA2 => "dnaAlt", Splash => "splash",
    BlueJoker => "blueJoker", SockAndBuskin => "sockAndBuskin", Troubadour => "troubadour",
    Certificate => "certificate", SmearedJoker => "smearedJoker", Throwback => "throwback",
    RoughGem => "roughGem", Bloodstone => "bloodstone", Arrowhead => "arrowhead",
    OnyxAgate => "onyxAgate", GlassJoker => "glassJoker", Showman => "showman",
    FlowerPot => "flowerPot", Seltzer => "seltzer", RainbowJoker => "rainbowJoker",
    Vampire => "vampire", Shoot => "shootTheMoon", DrivenDiver => "drivenDiver",
    HitTheRoad => "hitTheRoad", CardSharp => "cardSharp", Madness => "madness",
    Cloud9Alt => "satellite", Bootstraps => "bootstraps",
]);

string_enum!(SoulJokerName, "souljoker", [
    Canio => "canio", Triboulet => "triboulet", Yorick => "yorick",
    Chicot => "chicot", Perkeo => "perkeo",
]);

string_enum!(TarotName, "tarotcard", [
    TheFool => "theFool", TheMagician => "theMagician", TheHighPriestess => "theHighPriestess",
    TheEmpress => "theEmpress", TheEmperor => "theEmperor", TheHierophant => "theHierophant",
    TheLovers => "theLovers", TheChariot => "theChariot", Justice => "justice",
    TheHermit => "theHermit", TheWheelOfFortune => "theWheelOfFortune", Strength => "strength",
    TheHangedMan => "theHangedMan", Death => "death", Temperance => "temperance",
    TheDevil => "theDevil", TheTower => "theTower", TheStar => "theStar",
    TheMoon => "theMoon", TheSun => "theSun", Judgement => "judgement",
    TheWorld => "theWorld", TheSoul => "theSoul",
]);

string_enum!(PlanetName, "planetcard", [
    Pluto => "pluto", Mercury => "mercury", Uranus => "uranus", Venus => "venus",
    Saturn => "saturn", Jupiter => "jupiter", Earth => "earth", Mars => "mars",
    Neptune => "neptune", PlanetX => "planetX", Ceres => "ceres", Eris => "eris",
]);

string_enum!(SpectralName, "spectralcard", [
    Familiar => "familiar", Grim => "grim", Incantation => "incantation",
    Talisman => "talisman", Aura => "aura", Wraith => "wraith", Sigil => "sigil",
    Ouija => "ouija", Ectoplasm => "ectoplasm", Immolate => "immolate",
    Ankh => "ankh", DejaVu => "dejaVu", Hex => "hex", Trance => "trance",
    Medium => "medium", Cryptid => "cryptid", TheSoul => "theSoul",
    BlackHole => "blackHole",
]);

string_enum!(VoucherName, "voucher", [
    Overstock => "overstock", OverstockPlus => "overstockPlus",
    ClearanceSale => "clearanceSale", Liquidation => "liquidation",
    Hone => "hone", GlowUp => "glowUp", RerollSurplus => "rerollSurplus",
    RerollGlut => "rerollGlut", CrystalBall => "crystalBall", OmenGlobe => "omenGlobe",
    Telescope => "telescope", Observatory => "observatory", Grabber => "grabber",
    NachoTong => "nachoTong", Wasteful => "wasteful", Recyclomancy => "recyclomancy",
    TarotMerchant => "tarotMerchant", TarotTycoon => "tarotTycoon",
    PlanetMerchant => "planetMerchant", PlanetTycoon => "planetTycoon",
    SeedMoney => "seedMoney", MoneyTree => "moneyTree", Blank => "blank",
    Antimatter => "antimatter", MagicTrick => "magicTrick", Illusion => "illusion",
    Hieroglyph => "hieroglyph", Petroglyph => "petroglyph", DirectorsCut => "directorsCut",
    Retcon => "retcon", PaintBrush => "paintBrush", Palette => "palette",
]);

string_enum!(TagName, "tag", [
    UncommonTag => "uncommonTag", RareTag => "rareTag", NegativeTag => "negativeTag",
    FoilTag => "foilTag", HolographicTag => "holographicTag", PolychromeTag => "polychromeTag",
    InvestmentTag => "investmentTag", VoucherTag => "voucherTag", BossTag => "bossTag",
    StandardTag => "standardTag", CharmTag => "charmTag", MeteorTag => "meteorTag",
    BuffoonTag => "buffoonTag", HandyTag => "handyTag", GarbageTag => "garbageTag",
    EtherealTag => "etherealTag", CouponTag => "couponTag", DoubleTag => "doubleTag",
    JuggleTag => "juggleTag", D6Tag => "d6Tag", TopUpTag => "topUpTag",
    SpeedTag => "speedTag", OrbitalTag => "orbitalTag", EconomyTag => "economyTag",
]);

string_enum!(BossName, "boss", [
    TheHook => "theHook", TheOx => "theOx", TheHouse => "theHouse", TheWall => "theWall",
    TheWheel => "theWheel", TheArm => "theArm", TheClub => "theClub", TheFish => "theFish",
    ThePsychic => "thePsychic", TheGoad => "theGoad", TheWater => "theWater",
    TheWindow => "theWindow", TheManacle => "theManacle", TheEye => "theEye",
    TheMouth => "theMouth", ThePlant => "thePlant", TheSerpent => "theSerpent",
    ThePillar => "thePillar", TheFlint => "theFlint", TheNeedle => "theNeedle",
    TheHead => "theHead", TheTooth => "theTooth", TheCrimson => "theCrimsonHeart",
    Amber => "amberAcorn", Cerulean => "ceruleanBell", Crimson => "crimsonHeart",
    Verdant => "verdantLeaf", Violet => "violetVessel",
]);
