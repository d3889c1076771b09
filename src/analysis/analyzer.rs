use super::{
    AnalysisContext, AnalyzerConfig, CancellationToken, Conclusion, Difficulty, GridMaps, SearchMode, SearcherFlags,
    SearcherRegistry, Step, Technique,
};
use crate::board::Grid;
use crate::brute_force::{BacktrackingSolver, BruteForceSolver, Uniqueness};
use crate::consts::N_CANDIDATES;
use crate::errors::Contradiction;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, error, trace, warn};

/// Upper bound of solve loop iterations. Every iteration removes at least one of the
/// 729 candidates, so a correct analysis never reaches it.
pub const MAX_ITERATIONS: usize = N_CANDIDATES;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Searching,
    StepFound,
    Applying,
    Solved,
    Stuck,
    Cancelled,
    Failed,
}

fn transition(state: &mut State, next: State) {
    trace!(from = ?*state, to = ?next, "analyzer state");
    *state = next;
}

/// Why an analysis failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    /// The puzzle itself contradicts the rules
    #[error("invalid puzzle: {0}")]
    InvalidPuzzle(Contradiction),
    /// The puzzle has no solution
    #[error("the puzzle has no solution")]
    NoSolution,
    /// The puzzle has more than one solution
    #[error("the puzzle has more than one solution")]
    MultipleSolutions,
    /// A step concluded something that disagrees with the solution
    #[error("{technique} concluded {conclusion}, which contradicts the solution")]
    WrongStep {
        #[allow(missing_docs)]
        technique: Technique,
        #[allow(missing_docs)]
        conclusion: Conclusion,
    },
    /// Applying a step or searching the grid led to a contradiction
    #[error("contradiction after {}: {error}", .technique.map_or("search", Technique::name))]
    Contradiction {
        /// Technique of the step being applied, unset if a searcher found the contradiction
        technique: Option<Technique>,
        #[allow(missing_docs)]
        error: Contradiction,
    },
    /// The solve loop didn't terminate in [`MAX_ITERATIONS`]
    #[error("iteration limit reached")]
    IterationLimit,
}

/// How an analysis ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// All cells are filled
    Solved,
    /// No enabled technique applies anymore
    Stuck,
    /// Cancelled through a [`CancellationToken`]
    Cancelled,
    #[allow(missing_docs)]
    Failed(FailureReason),
}

/// Steps applied by an analysis, the grid they lead to and how it ended.
#[derive(Clone, Debug)]
pub struct AnalysisResult {
    outcome: Outcome,
    puzzle: Grid,
    grid: Grid,
    solution: Option<Grid>,
    steps: Vec<Step>,
    grids_before: Vec<Grid>,
    max_difficulty: Difficulty,
    total_difficulty: Difficulty,
    elapsed: Duration,
}

impl AnalysisResult {
    fn new(puzzle: Grid) -> Self {
        AnalysisResult {
            outcome: Outcome::Stuck,
            puzzle,
            grid: puzzle,
            solution: None,
            steps: vec![],
            grids_before: vec![],
            max_difficulty: Difficulty::ZERO,
            total_difficulty: Difficulty::ZERO,
            elapsed: Duration::default(),
        }
    }

    fn record(&mut self, step: Step, before: Grid) {
        self.max_difficulty = self.max_difficulty.max(step.difficulty());
        self.total_difficulty += step.difficulty();
        self.steps.push(step);
        self.grids_before.push(before);
    }

    #[allow(missing_docs)]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[allow(missing_docs)]
    pub fn is_solved(&self) -> bool {
        self.outcome == Outcome::Solved
    }

    /// The grid the analysis started from
    pub fn puzzle(&self) -> &Grid {
        &self.puzzle
    }

    /// The grid after all applied steps
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The solution, if the analysis reached it or looked it up for verification.
    pub fn solution(&self) -> Option<&Grid> {
        self.solution.as_ref()
    }

    /// Applied steps, in order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The grid each step was applied to, parallel to [`steps`](Self::steps).
    pub fn grids_before(&self) -> &[Grid] {
        &self.grids_before
    }

    #[allow(missing_docs)]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Difficulty of the hardest applied step, the rating of the puzzle
    pub fn max_difficulty(&self) -> Difficulty {
        self.max_difficulty
    }

    #[allow(missing_docs)]
    pub fn total_difficulty(&self) -> Difficulty {
        self.total_difficulty
    }

    /// Number of applied steps per technique
    pub fn technique_counts(&self) -> BTreeMap<Technique, usize> {
        let mut counts = BTreeMap::new();
        for step in &self.steps {
            *counts.entry(step.technique()).or_insert(0) += 1;
        }
        counts
    }

    /// The first of the steps with the highest difficulty
    pub fn hardest_step(&self) -> Option<&Step> {
        self.steps
            .iter()
            .rev()
            .max_by_key(|step| step.difficulty())
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.outcome {
            Outcome::Solved => write!(f, "solved")?,
            Outcome::Stuck => write!(f, "stuck")?,
            Outcome::Cancelled => write!(f, "cancelled")?,
            Outcome::Failed(reason) => write!(f, "failed: {}", reason)?,
        }
        writeln!(
            f,
            " after {} steps in {:.1?}, difficulty {} (total {})",
            self.steps.len(),
            self.elapsed,
            self.max_difficulty,
            self.total_difficulty
        )?;
        for (technique, count) in self.technique_counts() {
            writeln!(f, "{:>4} x {}", count, technique)?;
        }
        Ok(())
    }
}

/// Solves puzzles step by step with the enabled techniques.
///
/// ```
/// use sudoku_logic::analysis::{Analyzer, Outcome};
/// use sudoku_logic::Grid;
///
/// let grid = Grid::from_str_line(
///     "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..",
/// ).unwrap();
/// let result = Analyzer::default().analyze(&grid);
/// assert_eq!(result.outcome(), Outcome::Solved);
/// assert!(result.max_difficulty().tenths() <= 30);
/// ```
pub struct Analyzer {
    config: AnalyzerConfig,
    registry: SearcherRegistry,
    solver: Box<dyn BruteForceSolver>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::new(AnalyzerConfig::default())
    }
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish()
    }
}

impl Analyzer {
    #[allow(missing_docs)]
    pub fn new(config: AnalyzerConfig) -> Self {
        let registry = SearcherRegistry::from_config(&config);
        Analyzer {
            config,
            registry,
            solver: Box::new(BacktrackingSolver),
        }
    }

    /// Replaces the solver used for the uniqueness check and step verification.
    pub fn with_solver(mut self, solver: impl BruteForceSolver + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    #[allow(missing_docs)]
    pub fn registry(&self) -> &SearcherRegistry {
        &self.registry
    }

    /// Applies steps until the grid is solved or no technique applies anymore.
    pub fn analyze(&self, grid: &Grid) -> AnalysisResult {
        self.run(grid, None)
    }

    /// Like [`analyze`](Self::analyze), but stops early once `token` is cancelled.
    /// The result then holds the steps applied so far.
    pub fn analyze_with_cancel(&self, grid: &Grid, token: &CancellationToken) -> AnalysisResult {
        self.run(grid, Some(token))
    }

    /// Returns the steps of the first searcher that finds any, without applying them.
    ///
    /// In [`SearchMode::FindOne`] that is a single step, in [`SearchMode::CollectAll`]
    /// every step of that searcher.
    pub fn find_steps(&self, grid: &Grid, mode: SearchMode) -> Result<Vec<Step>, Contradiction> {
        grid.check_consistency()?;
        let solution = match self.needs_solution() {
            true => match self.solver.solve(grid) {
                Uniqueness::Unique(solution) => Some(solution),
                _ => None,
            },
            false => None,
        };
        let maps = GridMaps::new(grid);
        let found = self.search(grid, &maps, mode, None, solution.as_ref())?;
        Ok(found.map_or_else(Vec::new, |(_, steps)| steps))
    }

    /// The easiest next step.
    pub fn hint(&self, grid: &Grid) -> Option<Step> {
        self.find_steps(grid, SearchMode::FindOne).ok()?.into_iter().next()
    }

    fn needs_solution(&self) -> bool {
        self.registry
            .searchers()
            .iter()
            .any(|searcher| searcher.flags().contains(SearcherFlags::NEEDS_SOLUTION))
    }

    // the solution, if needed. Errors if the puzzle is rejected.
    fn solution(&self, grid: &Grid) -> Result<Option<Grid>, FailureReason> {
        let config = &self.config;
        if !(config.validate_uniqueness || config.verify_steps || self.needs_solution()) {
            return Ok(None);
        }
        match (self.solver.solve(grid), config.validate_uniqueness) {
            (Uniqueness::Unique(solution), _) => Ok(Some(solution)),
            (Uniqueness::NoSolution, true) => Err(FailureReason::NoSolution),
            (Uniqueness::Multiple, true) => Err(FailureReason::MultipleSolutions),
            (_, false) => Ok(None),
        }
    }

    fn run(&self, puzzle: &Grid, token: Option<&CancellationToken>) -> AnalysisResult {
        let start = Instant::now();
        let mut result = AnalysisResult::new(*puzzle);
        let mut state = State::Idle;
        let outcome = self.solve_loop(&mut result, &mut state, token);
        if outcome == Outcome::Solved {
            result.solution = Some(result.grid);
        }
        result.elapsed = start.elapsed();

        let final_state = match outcome {
            Outcome::Solved => State::Solved,
            Outcome::Stuck => State::Stuck,
            Outcome::Cancelled => State::Cancelled,
            Outcome::Failed(reason) => {
                warn!(%reason, "analysis failed");
                State::Failed
            }
        };
        transition(&mut state, final_state);
        result.outcome = outcome;
        result
    }

    fn solve_loop(&self, result: &mut AnalysisResult, state: &mut State, token: Option<&CancellationToken>) -> Outcome {
        if let Err(contradiction) = result.grid.check_consistency() {
            return Outcome::Failed(FailureReason::InvalidPuzzle(contradiction));
        }
        let solution = match self.solution(&result.grid) {
            Ok(solution) => solution,
            Err(reason) => return Outcome::Failed(reason),
        };
        result.solution = solution;
        let mode = match self.config.full_applying {
            true => SearchMode::CollectAll,
            false => SearchMode::FindOne,
        };
        let is_cancelled = || token.map_or(false, CancellationToken::is_cancelled);

        for _ in 0..MAX_ITERATIONS {
            if result.grid.is_solved() {
                return Outcome::Solved;
            }
            if is_cancelled() {
                return Outcome::Cancelled;
            }
            transition(state, State::Searching);
            let maps = GridMaps::new(&result.grid);
            let (flags, steps) = match self.search(&result.grid, &maps, mode, token, solution.as_ref()) {
                Ok(Some(found)) => found,
                Ok(None) if is_cancelled() => return Outcome::Cancelled,
                Ok(None) => return Outcome::Stuck,
                Err(error) => {
                    return Outcome::Failed(FailureReason::Contradiction { technique: None, error });
                }
            };

            transition(state, State::StepFound);
            let verify = self.config.verify_steps && !flags.contains(SearcherFlags::SKIP_VERIFICATION);
            for step in steps {
                if let (true, Some(solution)) = (verify, &solution) {
                    let wrong = step.conclusions().iter().find(|c| !c.agrees_with(solution));
                    if let Some(&conclusion) = wrong {
                        warn!(%step, "step contradicts the solution");
                        return Outcome::Failed(FailureReason::WrongStep {
                            technique: step.technique(),
                            conclusion,
                        });
                    }
                }

                transition(state, State::Applying);
                // earlier steps of the same pass may have made some conclusions stale
                let conclusions: Vec<Conclusion> = step
                    .conclusions()
                    .iter()
                    .copied()
                    .filter(|conclusion| conclusion.is_applicable(&result.grid))
                    .collect();
                if conclusions.is_empty() {
                    continue;
                }
                let before = result.grid;
                if let Err(error) = result.grid.apply(&conclusions) {
                    return Outcome::Failed(FailureReason::Contradiction {
                        technique: Some(step.technique()),
                        error,
                    });
                }
                debug_assert!(
                    result.grid.candidate_count() < before.candidate_count()
                        || result.grid.filled_count() > before.filled_count(),
                    "step without progress: {}",
                    step
                );
                debug!(%step, "applied");
                result.record(step, before);
            }
        }
        Outcome::Failed(FailureReason::IterationLimit)
    }

    // steps of the first searcher that finds any, with its flags
    fn search(
        &self,
        grid: &Grid,
        maps: &GridMaps,
        mode: SearchMode,
        token: Option<&CancellationToken>,
        solution: Option<&Grid>,
    ) -> Result<Option<(SearcherFlags, Vec<Step>)>, Contradiction> {
        for searcher in self.registry.searchers() {
            if token.map_or(false, CancellationToken::is_cancelled) {
                return Ok(None);
            }
            let flags = searcher.flags();
            if flags.contains(SearcherFlags::NEEDS_SOLUTION) && solution.is_none() {
                continue;
            }
            let mut ctx = AnalysisContext::new(grid, maps, &self.config, mode).with_solution(solution);
            if let Some(token) = token {
                ctx = ctx.with_cancellation(token);
            }

            trace!(searcher = searcher.name(), "searching");
            match panic::catch_unwind(AssertUnwindSafe(|| searcher.search(&mut ctx))) {
                Ok(Ok(())) => {}
                Ok(Err(contradiction)) => return Err(contradiction),
                Err(_) => {
                    error!(searcher = searcher.name(), "searcher panicked");
                    continue;
                }
            }
            let steps = ctx.into_steps();
            if !steps.is_empty() {
                return Ok(Some((flags, steps)));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analysis::searchers::singles::{NakedSingleSearcher, SinglesSearcher};
    use crate::analysis::StepSearcher;
    use crate::board::{Candidate, Cell};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const EASY: &str = "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..";

    fn grid(line: &str) -> Grid {
        Grid::from_str_line(line).unwrap()
    }

    #[test]
    fn solves_easy_puzzle() {
        let puzzle = grid(EASY);
        let result = Analyzer::default().analyze(&puzzle);
        assert_eq!(result.outcome(), Outcome::Solved);
        assert_eq!(Some(*result.grid()), puzzle.solution());
        assert_eq!(result.solution(), Some(result.grid()));
        assert_eq!(result.puzzle(), &puzzle);
        assert_eq!(result.grids_before().len(), result.steps().len());
        assert_eq!(result.grids_before().first(), Some(&puzzle));
        assert!(result.max_difficulty() <= Difficulty::from_tenths(30));
        let counts = result.technique_counts();
        assert_eq!(counts.values().sum::<usize>(), result.steps().len());
        assert_eq!(
            result.hardest_step().map(Step::difficulty),
            Some(result.max_difficulty())
        );
    }

    #[test]
    fn rejects_puzzle_with_two_solutions() {
        // a valid solution without its 1s and 2s, which can be swapped
        let line: String = (0..81)
            .map(|cell| {
                let (row, col) = (cell / 9, cell % 9);
                match (row * 3 + row / 3 + col) % 9 + 1 {
                    1 | 2 => '.',
                    digit => (b'0' + digit as u8) as char,
                }
            })
            .collect();
        let puzzle = grid(&line);
        assert_eq!(puzzle.uniqueness(), Uniqueness::Multiple);

        let result = Analyzer::default().analyze(&puzzle);
        assert_eq!(result.outcome(), Outcome::Failed(FailureReason::MultipleSolutions));
        assert!(result.steps().is_empty());
        assert_eq!(result.grid(), &puzzle);
    }

    #[test]
    fn stuck_without_techniques() {
        let config = AnalyzerConfig::default().with_techniques(&[Technique::XWing]);
        let result = Analyzer::new(config).analyze(&grid(EASY));
        assert_eq!(result.outcome(), Outcome::Stuck);
        assert!(!result.steps().is_empty());
        assert!(result.steps().iter().all(|step| step.technique() == Technique::XWing));
        assert_ne!(result.grid(), &grid(EASY));

        // BUG+1 needs all but one empty cell to be bivalue
        let config = AnalyzerConfig::default().with_techniques(&[Technique::BugPlusOne]);
        let result = Analyzer::new(config).analyze(&grid(EASY));
        assert_eq!(result.outcome(), Outcome::Stuck);
        assert!(result.steps().is_empty());
        assert_eq!(result.grid(), &grid(EASY));
    }

    #[test]
    fn invalid_puzzle() {
        let mut line = EASY.to_string();
        // a second 3 in r1
        line.replace_range(0..1, "3");
        let result = Analyzer::default().analyze(&grid(&line));
        assert!(matches!(
            result.outcome(),
            Outcome::Failed(FailureReason::InvalidPuzzle(_))
        ));
    }

    #[test]
    fn eliminated_solution_digit_leaves_no_solution() {
        let puzzle = grid(EASY);
        let solution = puzzle.solution().unwrap();
        let mut broken = puzzle;
        let digit = solution.digit(Cell::new(0)).unwrap();
        broken.eliminate(Candidate::new(0, digit.get())).unwrap();
        let result = Analyzer::default().analyze(&broken);
        assert_eq!(result.outcome(), Outcome::Failed(FailureReason::NoSolution));
    }

    #[test]
    fn cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let result = Analyzer::default().analyze_with_cancel(&grid(EASY), &token);
        assert_eq!(result.outcome(), Outcome::Cancelled);
        assert!(result.steps().is_empty());
    }

    struct PanickingSearcher;

    impl StepSearcher for PanickingSearcher {
        fn name(&self) -> &'static str {
            "Panicking"
        }

        fn techniques(&self) -> &[Technique] {
            &[Technique::FullHouse]
        }

        fn priority(&self) -> u16 {
            0
        }

        fn search(&self, _: &mut AnalysisContext) -> Result<(), Contradiction> {
            panic!("searcher bug")
        }
    }

    // finds nothing, but cancels the analysis on its `after`-th call
    struct CancellingSearcher {
        token: CancellationToken,
        calls: AtomicUsize,
        after: usize,
    }

    impl StepSearcher for CancellingSearcher {
        fn name(&self) -> &'static str {
            "Cancelling"
        }

        fn techniques(&self) -> &[Technique] {
            &[Technique::FullHouse]
        }

        fn priority(&self) -> u16 {
            0
        }

        fn search(&self, _: &mut AnalysisContext) -> Result<(), Contradiction> {
            if self.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.after {
                self.token.cancel();
            }
            Ok(())
        }
    }

    fn analyzer_with(searchers: Vec<Box<dyn StepSearcher>>) -> Analyzer {
        Analyzer {
            registry: SearcherRegistry::with_searchers(searchers),
            ..Analyzer::default()
        }
    }

    #[test]
    fn panicking_searcher_finds_nothing() {
        let analyzer = analyzer_with(vec![
            Box::new(PanickingSearcher),
            Box::new(SinglesSearcher),
            Box::new(NakedSingleSearcher),
        ]);
        let result = analyzer.analyze(&grid(EASY));
        assert_eq!(result.outcome(), Outcome::Solved);
        assert!(result.steps().iter().all(|step| step.technique().is_single()));

        let analyzer = analyzer_with(vec![Box::new(PanickingSearcher)]);
        let result = analyzer.analyze(&grid(EASY));
        assert_eq!(result.outcome(), Outcome::Stuck);
        assert_eq!(result.grid(), &grid(EASY));
    }

    #[test]
    fn cancelled_while_running() {
        let token = CancellationToken::new();
        let analyzer = analyzer_with(vec![
            Box::new(CancellingSearcher {
                token: token.clone(),
                calls: AtomicUsize::new(0),
                after: 6,
            }),
            Box::new(SinglesSearcher),
            Box::new(NakedSingleSearcher),
        ]);
        let puzzle = grid(EASY);
        let result = analyzer.analyze_with_cancel(&puzzle, &token);
        assert_eq!(result.outcome(), Outcome::Cancelled);
        assert_eq!(result.steps().len(), 5);
        assert!(!result.grid().is_solved());

        // the grid is exactly the puzzle with the recorded steps applied
        let mut replay = puzzle;
        for (step, before) in result.steps().iter().zip(result.grids_before()) {
            assert_eq!(&replay, before);
            let conclusions: Vec<Conclusion> = step
                .conclusions()
                .iter()
                .copied()
                .filter(|conclusion| conclusion.is_applicable(&replay))
                .collect();
            replay.apply(&conclusions).unwrap();
        }
        assert_eq!(&replay, result.grid());
        assert!(result.grid().check_consistency().is_ok());
    }

    #[test]
    fn full_applying() {
        let puzzle = grid(EASY);
        let config = AnalyzerConfig::default().with_full_applying(true);
        let result = Analyzer::new(config).analyze(&puzzle);
        assert_eq!(result.outcome(), Outcome::Solved);
    }

    #[test]
    fn hint_is_a_single() {
        let step = Analyzer::default().hint(&grid(EASY)).unwrap();
        assert!(step.technique().is_single());
        let all = Analyzer::default().find_steps(&grid(EASY), SearchMode::CollectAll).unwrap();
        assert!(all.len() > 1);
        assert!(all.iter().all(|step| step.technique().is_single()));
    }

    #[test]
    fn brute_force_fallback() {
        let puzzle = grid("8..........36......7..9.2...5...7.......457.....1...3...1....68..85...1..9....4..");
        let config = AnalyzerConfig::default()
            .with_techniques(&[Technique::NakedSingle, Technique::BruteForce])
            .with_brute_force_fallback(true);
        let result = Analyzer::new(config).analyze(&puzzle);
        assert_eq!(result.outcome(), Outcome::Solved);
        assert!(result.technique_counts().contains_key(&Technique::BruteForce));
    }
}
