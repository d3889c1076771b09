use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Difficulty rating of a step, in tenths.
///
/// The scale follows the ratings of SudokuExplainer: a hidden single in a block is `1.2`,
/// an X-Wing `3.2`, chains start at `6.6`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Difficulty(u32);

impl Difficulty {
    /// Difficulty of an empty analysis
    pub const ZERO: Difficulty = Difficulty(0);

    /// Constructs a difficulty from tenths, i.e. `23` is `2.3`.
    pub const fn from_tenths(tenths: u32) -> Self {
        Difficulty(tenths)
    }

    /// Returns the difficulty in tenths.
    pub fn tenths(self) -> u32 {
        self.0
    }

    /// Returns the difficulty as a floating point number.
    pub fn as_f32(self) -> f32 {
        self.0 as f32 / 10.0
    }
}

impl Add for Difficulty {
    type Output = Difficulty;

    fn add(self, other: Difficulty) -> Difficulty {
        Difficulty(self.0 + other.0)
    }
}

impl AddAssign for Difficulty {
    fn add_assign(&mut self, other: Difficulty) {
        self.0 += other.0;
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// The solving techniques that steps can be found for.
///
/// The order of the variants is the order of the name table; it has no influence
/// on the order in which techniques are tried.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Technique {
    FullHouse,
    HiddenSingleBlock,
    HiddenSingleLine,
    NakedSingle,
    Pointing,
    Claiming,
    NakedPair,
    NakedTriple,
    NakedQuad,
    HiddenPair,
    HiddenTriple,
    HiddenQuad,
    XWing,
    Swordfish,
    Jellyfish,
    Squirmbag,
    Whale,
    Leviathan,
    FinnedXWing,
    FinnedSwordfish,
    FinnedJellyfish,
    XyWing,
    XyzWing,
    UniqueRectangleType1,
    UniqueRectangleType2,
    BugPlusOne,
    AlsXz,
    AlsXzDoublyLinked,
    XChain,
    XyChain,
    Aic,
    DiscontinuousNiceLoop,
    ContinuousNiceLoop,
    GroupedXChain,
    GroupedAic,
    GroupedDiscontinuousNiceLoop,
    GroupedContinuousNiceLoop,
    CellForcingChain,
    RegionForcingChain,
    BruteForce,
}

// name and base difficulty in tenths, one entry per variant in declaration order
#[rustfmt::skip]
static TECHNIQUES: [(Technique, &str, u32); 40] = [
    (Technique::FullHouse,                    "Full House",                       10),
    (Technique::HiddenSingleBlock,            "Hidden Single (Block)",            12),
    (Technique::HiddenSingleLine,             "Hidden Single (Line)",             15),
    (Technique::NakedSingle,                  "Naked Single",                     23),
    (Technique::Pointing,                     "Pointing",                         26),
    (Technique::Claiming,                     "Claiming",                         28),
    (Technique::NakedPair,                    "Naked Pair",                       30),
    (Technique::NakedTriple,                  "Naked Triple",                     36),
    (Technique::NakedQuad,                    "Naked Quad",                       50),
    (Technique::HiddenPair,                   "Hidden Pair",                      34),
    (Technique::HiddenTriple,                 "Hidden Triple",                    40),
    (Technique::HiddenQuad,                   "Hidden Quad",                      54),
    (Technique::XWing,                        "X-Wing",                           32),
    (Technique::Swordfish,                    "Swordfish",                        38),
    (Technique::Jellyfish,                    "Jellyfish",                        52),
    (Technique::Squirmbag,                    "Squirmbag",                        60),
    (Technique::Whale,                        "Whale",                            63),
    (Technique::Leviathan,                    "Leviathan",                        66),
    (Technique::FinnedXWing,                  "Finned X-Wing",                    34),
    (Technique::FinnedSwordfish,              "Finned Swordfish",                 40),
    (Technique::FinnedJellyfish,              "Finned Jellyfish",                 54),
    (Technique::XyWing,                       "XY-Wing",                          42),
    (Technique::XyzWing,                      "XYZ-Wing",                         44),
    (Technique::UniqueRectangleType1,         "Unique Rectangle Type 1",          45),
    (Technique::UniqueRectangleType2,         "Unique Rectangle Type 2",          46),
    (Technique::BugPlusOne,                   "BUG+1",                            56),
    (Technique::AlsXz,                        "ALS-XZ",                           55),
    (Technique::AlsXzDoublyLinked,            "ALS-XZ (Doubly Linked)",           57),
    (Technique::XChain,                       "X-Chain",                          66),
    (Technique::XyChain,                      "XY-Chain",                         68),
    (Technique::Aic,                          "AIC",                              70),
    (Technique::DiscontinuousNiceLoop,        "Discontinuous Nice Loop",          70),
    (Technique::ContinuousNiceLoop,           "Continuous Nice Loop",             70),
    (Technique::GroupedXChain,                "Grouped X-Chain",                  68),
    (Technique::GroupedAic,                   "Grouped AIC",                      72),
    (Technique::GroupedDiscontinuousNiceLoop, "Grouped Discontinuous Nice Loop",  72),
    (Technique::GroupedContinuousNiceLoop,    "Grouped Continuous Nice Loop",     72),
    (Technique::CellForcingChain,             "Cell Forcing Chain",               82),
    (Technique::RegionForcingChain,           "Region Forcing Chain",             82),
    (Technique::BruteForce,                   "Brute Force",                     100),
];

impl Technique {
    /// All techniques, in declaration order.
    pub fn all() -> impl Iterator<Item = Technique> {
        TECHNIQUES.iter().map(|&(technique, _, _)| technique)
    }

    fn entry(self) -> &'static (Technique, &'static str, u32) {
        let entry = &TECHNIQUES[self as usize];
        debug_assert_eq!(entry.0, self);
        entry
    }

    /// Human readable name of the technique.
    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// Difficulty of the simplest step of this technique.
    pub fn base_difficulty(self) -> Difficulty {
        Difficulty(self.entry().2)
    }

    /// Looks up a technique by its name. Case and surrounding whitespace are ignored.
    pub fn from_name(name: &str) -> Option<Technique> {
        let name = name.trim();
        TECHNIQUES
            .iter()
            .find(|(_, entry_name, _)| entry_name.eq_ignore_ascii_case(name))
            .map(|&(technique, _, _)| technique)
    }

    /// Checks whether the technique is one of the singles that place a digit directly.
    pub fn is_single(self) -> bool {
        use self::Technique::*;
        matches!(self, FullHouse | HiddenSingleBlock | HiddenSingleLine | NakedSingle)
    }

    /// Checks whether the technique is found by the chaining engine.
    pub fn is_chain(self) -> bool {
        use self::Technique::*;
        matches!(
            self,
            XChain
                | XyChain
                | Aic
                | DiscontinuousNiceLoop
                | ContinuousNiceLoop
                | GroupedXChain
                | GroupedAic
                | GroupedDiscontinuousNiceLoop
                | GroupedContinuousNiceLoop
                | CellForcingChain
                | RegionForcingChain
        )
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Error for [`Technique::from_str`]
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown technique \"{0}\"")]
pub struct UnknownTechnique(pub String);

impl FromStr for Technique {
    type Err = UnknownTechnique;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Technique::from_name(s).ok_or_else(|| UnknownTechnique(s.to_owned()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn table_matches_declaration_order() {
        assert_eq!(Technique::iter().count(), TECHNIQUES.len());
        for (i, technique) in Technique::iter().enumerate() {
            assert_eq!(TECHNIQUES[i].0, technique);
        }
    }

    #[test]
    fn names_roundtrip() {
        for technique in Technique::iter() {
            let name = technique.to_string();
            assert_eq!(name.parse::<Technique>(), Ok(technique));
            assert_eq!(Technique::from_name(&name.to_lowercase()), Some(technique));
        }
        assert!("Gordonian Polygon".parse::<Technique>().is_err());
    }

    #[test]
    fn difficulty_display() {
        assert_eq!(Technique::XWing.base_difficulty().to_string(), "3.2");
        assert_eq!(Difficulty::from_tenths(100).to_string(), "10.0");
        let mut total = Difficulty::ZERO;
        total += Technique::NakedSingle.base_difficulty();
        assert_eq!(total + Difficulty::from_tenths(7), Difficulty::from_tenths(30));
    }

    #[test]
    fn singles_are_easiest() {
        for technique in Technique::iter().filter(|t| !t.is_single()) {
            assert!(technique.base_difficulty() > Technique::HiddenSingleLine.base_difficulty());
        }
    }
}
