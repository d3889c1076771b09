use super::Technique;

/// Settings of an [`Analyzer`](super::Analyzer).
///
/// ```
/// use sudoku_logic::analysis::{AnalyzerConfig, Technique};
///
/// let config = AnalyzerConfig::default()
///     .with_max_fish_size(3)
///     .with_techniques(&[Technique::NakedSingle, Technique::HiddenSingleBlock]);
/// assert!(config.is_enabled(Technique::NakedSingle));
/// assert!(!config.is_enabled(Technique::Swordfish));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalyzerConfig {
    /// Apply every step found by a searcher in one pass instead of only the first one.
    pub full_applying: bool,
    /// Skip searchers flagged as slow.
    pub ignore_slow: bool,
    /// Reject puzzles without a unique solution before searching.
    pub validate_uniqueness: bool,
    /// Check every step against the solution before applying it.
    pub verify_steps: bool,
    /// Maximum number of nodes in a chain.
    pub max_chain_length: usize,
    /// Largest basic fish searched for, `2..=7`.
    pub max_fish_size: u8,
    /// Largest almost locked set in cells.
    pub max_als_size: u8,
    /// Fill in the solution digit of a cell when no technique applies.
    pub brute_force_fallback: bool,
    /// Techniques that may be used. `None` enables all of them.
    pub techniques: Option<Vec<Technique>>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            full_applying: false,
            ignore_slow: false,
            validate_uniqueness: true,
            verify_steps: true,
            max_chain_length: 20,
            max_fish_size: 4,
            max_als_size: 4,
            brute_force_fallback: false,
            techniques: None,
        }
    }
}

impl AnalyzerConfig {
    /// Minimum size of a basic fish
    pub const MIN_FISH_SIZE: u8 = 2;
    /// Maximum size of a basic fish
    pub const MAX_FISH_SIZE: u8 = 7;

    #[allow(missing_docs)]
    pub fn with_full_applying(mut self, full_applying: bool) -> Self {
        self.full_applying = full_applying;
        self
    }

    #[allow(missing_docs)]
    pub fn with_ignore_slow(mut self, ignore_slow: bool) -> Self {
        self.ignore_slow = ignore_slow;
        self
    }

    #[allow(missing_docs)]
    pub fn with_validate_uniqueness(mut self, validate_uniqueness: bool) -> Self {
        self.validate_uniqueness = validate_uniqueness;
        self
    }

    #[allow(missing_docs)]
    pub fn with_verify_steps(mut self, verify_steps: bool) -> Self {
        self.verify_steps = verify_steps;
        self
    }

    #[allow(missing_docs)]
    pub fn with_max_chain_length(mut self, max_chain_length: usize) -> Self {
        self.max_chain_length = max_chain_length;
        self
    }

    /// Sets the largest basic fish, clamped to `2..=7`.
    pub fn with_max_fish_size(mut self, max_fish_size: u8) -> Self {
        self.max_fish_size = max_fish_size.max(Self::MIN_FISH_SIZE).min(Self::MAX_FISH_SIZE);
        self
    }

    #[allow(missing_docs)]
    pub fn with_max_als_size(mut self, max_als_size: u8) -> Self {
        self.max_als_size = max_als_size;
        self
    }

    #[allow(missing_docs)]
    pub fn with_brute_force_fallback(mut self, brute_force_fallback: bool) -> Self {
        self.brute_force_fallback = brute_force_fallback;
        self
    }

    /// Restricts the analysis to `techniques`.
    pub fn with_techniques(mut self, techniques: &[Technique]) -> Self {
        self.techniques = Some(techniques.to_vec());
        self
    }

    /// Checks whether `technique` may be used.
    pub fn is_enabled(&self, technique: Technique) -> bool {
        if technique == Technique::BruteForce && !self.brute_force_fallback {
            return false;
        }
        match &self.techniques {
            Some(techniques) => techniques.contains(&technique),
            None => true,
        }
    }

    // out of range sizes from deserialized configs are clamped
    pub(crate) fn fish_size_limit(&self) -> u8 {
        self.max_fish_size.max(Self::MIN_FISH_SIZE).min(Self::MAX_FISH_SIZE)
    }
}
