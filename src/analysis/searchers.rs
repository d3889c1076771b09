//! Step searchers and the registry that orders them
//!
//! Every searcher looks for one family of techniques and reports its findings to an
//! [`AnalysisContext`]. Searchers never modify the grid.
mod prelude;

pub(crate) mod almost_locked_sets;
pub(crate) mod basic_fish;
pub(crate) mod brute_force;
pub(crate) mod chaining;
pub(crate) mod finned_fish;
pub(crate) mod hidden_subsets;
pub(crate) mod locked_candidates;
pub(crate) mod naked_subsets;
pub(crate) mod singles;
pub(crate) mod uniqueness;
pub(crate) mod wings;

use crate::analysis::{AnalysisContext, AnalyzerConfig, Technique};
use crate::errors::Contradiction;
use std::fmt;
use std::ops::BitOr;

/// Runtime properties of a searcher.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SearcherFlags(u8);

impl SearcherFlags {
    #[allow(missing_docs)]
    pub const NONE: SearcherFlags = SearcherFlags(0);
    /// High time complexity, skipped with [`AnalyzerConfig::ignore_slow`]
    pub const SLOW: SearcherFlags = SearcherFlags(1);
    /// Only places digits, used for singles-only solving
    pub const DIRECT_ONLY: SearcherFlags = SearcherFlags(1 << 1);
    /// Steps are not checked against the solution
    pub const SKIP_VERIFICATION: SearcherFlags = SearcherFlags(1 << 2);
    /// Can't search without the solution of the puzzle
    pub const NEEDS_SOLUTION: SearcherFlags = SearcherFlags(1 << 3);

    /// Checks whether all flags of `other` are set.
    pub fn contains(self, other: SearcherFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SearcherFlags {
    type Output = SearcherFlags;

    fn bitor(self, other: SearcherFlags) -> SearcherFlags {
        SearcherFlags(self.0 | other.0)
    }
}

/// A searcher for one family of techniques.
pub trait StepSearcher: Send + Sync {
    /// Name for diagnostics
    fn name(&self) -> &'static str;

    /// The techniques whose steps this searcher reports
    fn techniques(&self) -> &[Technique];

    /// Searchers run in ascending priority
    fn priority(&self) -> u16;

    #[allow(missing_docs)]
    fn flags(&self) -> SearcherFlags {
        SearcherFlags::NONE
    }

    /// Reports all steps found in the grid of `ctx` until [`AnalysisContext::add`] asks to stop.
    ///
    /// An error means the grid was found to have no solution.
    fn search(&self, ctx: &mut AnalysisContext) -> Result<(), Contradiction>;
}

impl fmt::Debug for dyn StepSearcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StepSearcher")
            .field("name", &self.name())
            .field("priority", &self.priority())
            .finish()
    }
}

/// Priority ordered table of all searchers enabled by a configuration.
#[derive(Debug)]
pub struct SearcherRegistry {
    searchers: Vec<Box<dyn StepSearcher>>,
}

impl SearcherRegistry {
    /// Builds the searchers for `config`. Searchers whose techniques are all disabled
    /// are left out, as are slow searchers if `ignore_slow` is set.
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        use self::basic_fish::BasicFishSearcher;
        use self::chaining::{ChainingSearcher, ForcingChainSearcher, LinkTypes};
        use self::hidden_subsets::HiddenSubsetSearcher;
        use self::naked_subsets::NakedSubsetSearcher;

        let mut searchers: Vec<Box<dyn StepSearcher>> = vec![
            Box::new(singles::SinglesSearcher),
            Box::new(singles::NakedSingleSearcher),
            Box::new(locked_candidates::LockedCandidatesSearcher),
            Box::new(NakedSubsetSearcher::new(2)),
            Box::new(BasicFishSearcher::new(2)),
            Box::new(HiddenSubsetSearcher::new(2)),
            Box::new(NakedSubsetSearcher::new(3)),
            Box::new(HiddenSubsetSearcher::new(3)),
            Box::new(wings::XyWingSearcher),
            Box::new(wings::XyzWingSearcher),
            Box::new(uniqueness::UniqueRectangleSearcher),
            Box::new(NakedSubsetSearcher::new(4)),
            Box::new(HiddenSubsetSearcher::new(4)),
            Box::new(finned_fish::FinnedFishSearcher),
            Box::new(uniqueness::BugSearcher),
            Box::new(almost_locked_sets::AlsXzSearcher),
            Box::new(ChainingSearcher::new(LinkTypes::SINGLE_DIGIT)),
            Box::new(ChainingSearcher::new(LinkTypes::NORMAL)),
            Box::new(ChainingSearcher::new(LinkTypes::GROUPED)),
            Box::new(ForcingChainSearcher),
            Box::new(brute_force::BruteForceSearcher),
        ];
        for size in 3..=config.fish_size_limit() {
            searchers.push(Box::new(BasicFishSearcher::new(size)));
        }

        searchers.retain(|searcher| {
            !(config.ignore_slow && searcher.flags().contains(SearcherFlags::SLOW))
                && searcher.techniques().iter().any(|&t| config.is_enabled(t))
        });
        searchers.sort_by_key(|searcher| searcher.priority());

        SearcherRegistry { searchers }
    }

    #[cfg(test)]
    pub(crate) fn with_searchers(mut searchers: Vec<Box<dyn StepSearcher>>) -> Self {
        searchers.sort_by_key(|searcher| searcher.priority());
        SearcherRegistry { searchers }
    }

    /// Searchers in the order they are run.
    pub fn searchers(&self) -> &[Box<dyn StepSearcher>] {
        &self.searchers
    }

    /// The first searcher that reports steps of `technique`.
    pub fn for_technique(&self, technique: Technique) -> Option<&dyn StepSearcher> {
        self.searchers
            .iter()
            .find(|searcher| searcher.techniques().contains(&technique))
            .map(|searcher| &**searcher)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.searchers.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.searchers.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn registry_is_priority_ordered() {
        let registry = SearcherRegistry::from_config(&AnalyzerConfig::default());
        let priorities: Vec<_> = registry.searchers().iter().map(|s| s.priority()).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert_eq!(registry.searchers()[0].name(), "Singles");
        // brute force is off by default
        assert!(registry.for_technique(Technique::BruteForce).is_none());
        assert!(registry.for_technique(Technique::Squirmbag).is_none());
    }

    #[test]
    fn registry_respects_config() {
        let config = AnalyzerConfig::default()
            .with_techniques(&[Technique::NakedSingle, Technique::XWing])
            .with_max_fish_size(6);
        let registry = SearcherRegistry::from_config(&config);
        let names: Vec<_> = registry.searchers().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Naked Single", "X-Wing"]);

        let registry = SearcherRegistry::from_config(&AnalyzerConfig::default().with_max_fish_size(6));
        assert!(registry.for_technique(Technique::Whale).is_some());
        assert!(registry.for_technique(Technique::Leviathan).is_none());

        let registry = SearcherRegistry::from_config(&AnalyzerConfig::default());
        assert_eq!(registry.searchers().last().map(|s| s.name()), Some("Forcing Chains"));

        let registry = SearcherRegistry::from_config(&AnalyzerConfig::default().with_ignore_slow(true));
        assert!(registry.for_technique(Technique::GroupedAic).is_none());
        assert!(registry.for_technique(Technique::RegionForcingChain).is_none());
        assert!(registry.for_technique(Technique::Aic).is_some());
    }

    #[test]
    fn fish_size_limit_gates_small_fish() {
        let registry = SearcherRegistry::from_config(&AnalyzerConfig::default().with_max_fish_size(2));
        assert!(registry.for_technique(Technique::XWing).is_some());
        assert!(registry.for_technique(Technique::Swordfish).is_none());
        assert!(registry.for_technique(Technique::Jellyfish).is_none());

        let registry = SearcherRegistry::from_config(&AnalyzerConfig::default().with_max_fish_size(3));
        assert!(registry.for_technique(Technique::Swordfish).is_some());
        assert!(registry.for_technique(Technique::Jellyfish).is_none());

        let registry = SearcherRegistry::from_config(&AnalyzerConfig::default());
        assert!(registry.for_technique(Technique::Jellyfish).is_some());
        assert!(registry.for_technique(Technique::Squirmbag).is_none());
    }
}
