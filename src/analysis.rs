//! Logical analysis of sudokus
//!
//! The [`Analyzer`] repeatedly asks the step searchers for the easiest applicable
//! step, checks it against the solution and applies it, until the grid is solved
//! or no enabled technique applies anymore. Every step is rated, the hardest step
//! is the difficulty of the puzzle.
mod analyzer;
mod backdoor;
mod conclusion;
mod config;
mod context;
mod maps;
pub mod searchers;
mod step;
mod technique;

#[rustfmt::skip]
pub use self::{
    analyzer::{Analyzer, AnalysisResult, FailureReason, Outcome, MAX_ITERATIONS},
    backdoor::find_backdoors,
    conclusion::{Conclusion, ConclusionKind},
    config::AnalyzerConfig,
    context::{AnalysisContext, CancellationToken, SearchMode},
    maps::GridMaps,
    searchers::{SearcherFlags, SearcherRegistry, StepSearcher},
    step::{ChainNode, Step, StepDetail},
    technique::{Difficulty, Technique, UnknownTechnique},
};
