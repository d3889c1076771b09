//! Backdoors: single conclusions that make a puzzle solvable with singles
use super::{AnalysisContext, AnalyzerConfig, Conclusion, FailureReason, GridMaps, SearchMode, SearcherFlags, SearcherRegistry};
use crate::board::Grid;
use crate::brute_force::Uniqueness;
use tracing::debug;

/// Finds all assignments and eliminations that agree with the solution and after which
/// the puzzle can be solved with singles alone.
///
/// A puzzle that singles already solve has no backdoors.
pub fn find_backdoors(grid: &Grid) -> Result<Vec<Conclusion>, FailureReason> {
    grid.check_consistency().map_err(FailureReason::InvalidPuzzle)?;
    let solution = match grid.uniqueness() {
        Uniqueness::Unique(solution) => solution,
        Uniqueness::NoSolution => return Err(FailureReason::NoSolution),
        Uniqueness::Multiple => return Err(FailureReason::MultipleSolutions),
    };

    let config = AnalyzerConfig::default()
        .with_validate_uniqueness(false)
        .with_verify_steps(false);
    let registry = SearcherRegistry::from_config(&config);
    let singles = SinglesSolver {
        config: &config,
        registry: &registry,
    };
    if singles.solves(*grid) {
        return Ok(vec![]);
    }

    let mut backdoors = vec![];
    for cell in grid.empty_cells() {
        for digit in grid.candidates(cell) {
            let conclusion = match solution.digit(cell) == Some(digit) {
                true => Conclusion::assignment(cell, digit),
                false => Conclusion::elimination(cell, digit),
            };
            let mut attempt = *grid;
            if attempt.apply(&[conclusion]).is_ok() && singles.solves(attempt) {
                backdoors.push(conclusion);
            }
        }
    }
    debug!(count = backdoors.len(), "backdoors found");
    Ok(backdoors)
}

// applies the searchers that only place digits until none applies
struct SinglesSolver<'a> {
    config: &'a AnalyzerConfig,
    registry: &'a SearcherRegistry,
}

impl SinglesSolver<'_> {
    fn solves(&self, mut grid: Grid) -> bool {
        let searchers: Vec<_> = self
            .registry
            .searchers()
            .iter()
            .filter(|searcher| searcher.flags().contains(SearcherFlags::DIRECT_ONLY))
            .collect();

        'solve: while !grid.is_solved() {
            let maps = GridMaps::new(&grid);
            for searcher in &searchers {
                let mut ctx = AnalysisContext::new(&grid, &maps, self.config, SearchMode::CollectAll);
                if searcher.search(&mut ctx).is_err() {
                    return false;
                }
                let conclusions: Vec<Conclusion> = ctx
                    .into_steps()
                    .iter()
                    .flat_map(|step| step.conclusions().iter().copied())
                    .collect();
                if conclusions.is_empty() {
                    continue;
                }
                for conclusion in conclusions {
                    if conclusion.is_applicable(&grid) && grid.apply(&[conclusion]).is_err() {
                        return false;
                    }
                }
                continue 'solve;
            }
            return false;
        }
        true
    }
}
