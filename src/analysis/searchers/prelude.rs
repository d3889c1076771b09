pub(crate) use super::{SearcherFlags, StepSearcher};
pub(crate) use crate::analysis::{AnalysisContext, Conclusion, GridMaps, Step, StepDetail, Technique};
pub(crate) use crate::bitset::{Iter as SetIter, Set};
pub(crate) use crate::errors::Contradiction;
#[rustfmt::skip]
pub(crate) use crate::board::{
    Digit,
    positions::{
        Cell,
        Line,
        Chute,
        MiniLine,
        Position,
        House,
        IntoHouse,
    },
};
