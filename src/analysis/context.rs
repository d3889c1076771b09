use super::{AnalyzerConfig, Conclusion, GridMaps, Step, Technique};
use crate::board::Grid;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation signal for a running analysis.
///
/// Clones share the same signal, so one clone can be handed to the analysis
/// while another one is kept to cancel it.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Running searches stop at their next poll.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[allow(missing_docs)]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Whether a search stops at the first step or collects all of them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SearchMode {
    /// Stop at the first step with an applicable conclusion
    FindOne,
    /// Accumulate every step
    CollectAll,
}

/// Everything a searcher needs for one search call.
///
/// Searchers read the grid and its maps and report steps through [`AnalysisContext::add`],
/// which validates them against the grid.
pub struct AnalysisContext<'a> {
    grid: &'a Grid,
    maps: &'a GridMaps,
    config: &'a AnalyzerConfig,
    mode: SearchMode,
    token: Option<&'a CancellationToken>,
    solution: Option<&'a Grid>,
    steps: Vec<Step>,
    seen: HashSet<Vec<Conclusion>>,
}

impl<'a> AnalysisContext<'a> {
    #[allow(missing_docs)]
    pub fn new(grid: &'a Grid, maps: &'a GridMaps, config: &'a AnalyzerConfig, mode: SearchMode) -> Self {
        AnalysisContext {
            grid,
            maps,
            config,
            mode,
            token: None,
            solution: None,
            steps: vec![],
            seen: HashSet::new(),
        }
    }

    #[allow(missing_docs)]
    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Makes the solution available to searchers that need it.
    pub fn with_solution(mut self, solution: Option<&'a Grid>) -> Self {
        self.solution = solution;
        self
    }

    #[allow(missing_docs)]
    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    #[allow(missing_docs)]
    pub fn maps(&self) -> &'a GridMaps {
        self.maps
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &'a AnalyzerConfig {
        self.config
    }

    #[allow(missing_docs)]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    #[allow(missing_docs)]
    pub fn solution(&self) -> Option<&'a Grid> {
        self.solution
    }

    #[allow(missing_docs)]
    pub fn is_cancelled(&self) -> bool {
        self.token.map_or(false, CancellationToken::is_cancelled)
    }

    /// Checks whether the technique is enabled in the configuration.
    pub fn is_enabled(&self, technique: Technique) -> bool {
        self.config.is_enabled(technique)
    }

    /// Checks whether the search should end, because the first step was found
    /// in find-one mode or the analysis was cancelled.
    pub fn should_stop(&self) -> bool {
        (self.mode == SearchMode::FindOne && !self.steps.is_empty()) || self.is_cancelled()
    }

    /// Reports a step. Conclusions that don't change the grid are dropped, as are
    /// steps without conclusions, steps of disabled techniques and steps whose
    /// conclusions were already reported.
    ///
    /// Returns `true` if the searcher should stop.
    pub fn add(&mut self, mut step: Step) -> bool {
        if !self.is_enabled(step.technique()) {
            return self.should_stop();
        }
        let grid = self.grid;
        step.retain_conclusions(|conclusion| conclusion.is_applicable(grid));
        if step.conclusions().is_empty() || !self.seen.insert(step.conclusions().to_vec()) {
            return self.should_stop();
        }
        self.steps.push(step);
        self.should_stop()
    }

    #[allow(missing_docs)]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[allow(missing_docs)]
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analysis::StepDetail;
    use crate::board::{Cell, Digit};

    fn elimination_step(cell: u8, digit: u8) -> Step {
        Step::new(
            Technique::NakedSingle,
            vec![Conclusion::elimination(Cell::new(cell), Digit::new(digit))],
            StepDetail::Single {
                cell: Cell::new(cell),
                digit: Digit::new(digit),
                house: None,
            },
        )
    }

    #[test]
    fn drops_stale_and_duplicate_steps() {
        let mut grid = Grid::empty();
        grid.set_digit(Cell::new(0), Digit::new(1)).unwrap();
        let maps = GridMaps::new(&grid);
        let config = AnalyzerConfig::default();
        let mut ctx = AnalysisContext::new(&grid, &maps, &config, SearchMode::CollectAll);

        // r1c2 can't hold 1 anymore
        assert!(!ctx.add(elimination_step(1, 1)));
        assert!(ctx.steps().is_empty());

        assert!(!ctx.add(elimination_step(1, 2)));
        assert!(!ctx.add(elimination_step(1, 2)));
        assert_eq!(ctx.steps().len(), 1);
    }

    #[test]
    fn find_one_stops_after_first() {
        let grid = Grid::empty();
        let maps = GridMaps::new(&grid);
        let config = AnalyzerConfig::default();
        let mut ctx = AnalysisContext::new(&grid, &maps, &config, SearchMode::FindOne);
        assert!(!ctx.should_stop());
        assert!(ctx.add(elimination_step(3, 4)));
    }

    #[test]
    fn cancellation_is_shared() {
        let token = CancellationToken::new();
        let grid = Grid::empty();
        let maps = GridMaps::new(&grid);
        let config = AnalyzerConfig::default();
        let ctx = AnalysisContext::new(&grid, &maps, &config, SearchMode::CollectAll).with_cancellation(&token);
        token.clone().cancel();
        assert!(ctx.should_stop());
    }
}
