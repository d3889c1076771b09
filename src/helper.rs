//! Fixed size arrays that are indexed by positions instead of `usize`
use crate::board::{Cell, Digit, House};
use crate::consts::N_CELLS;
use std::ops::{Deref, DerefMut, Index, IndexMut};

macro_rules! position_array {
    ($(#[$attr:meta])* $name:ident[$position:ty; $len:expr]) => {
        $(#[$attr])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub(crate) struct $name<T>(pub [T; $len]);

        impl<T> Deref for $name<T> {
            type Target = [T; $len];

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<T> DerefMut for $name<T> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl<T, P: Into<$position>> Index<P> for $name<T> {
            type Output = T;

            #[inline(always)]
            fn index(&self, position: P) -> &T {
                &self.0[position.into().as_index()]
            }
        }

        impl<T, P: Into<$position>> IndexMut<P> for $name<T> {
            #[inline(always)]
            fn index_mut(&mut self, position: P) -> &mut T {
                &mut self.0[position.into().as_index()]
            }
        }
    };
}

position_array! {
    /// One slot per cell
    CellArray[Cell; N_CELLS]
}

position_array! {
    /// One slot per house. Rows, columns and blocks index it directly.
    HouseArray[House; 27]
}

position_array! {
    /// One slot per digit
    DigitArray[Digit; 9]
}
