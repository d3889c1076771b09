pub(crate) const N_CELLS: usize = 81;
pub(crate) const N_CANDIDATES: usize = 729;

// house numbering: rows 0..9, cols 9..18, blocks 18..27
pub(crate) const COL_OFFSET: u8 = 9;
pub(crate) const BLOCK_OFFSET: u8 = 18;
