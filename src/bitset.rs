//! Typed, fixed-size bitsets
//!
//! Deduction works on sets of [`Digit`s](crate::board::Digit), cells and houses everywhere.
//! [`Set<T>`] stores them as a single integer while keeping sets of different element types
//! apart at compile time.

use crate::board::{Cell, Digit, House, Line, Position};
use crate::errors::Contradiction;
use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// Bitset over the elements of `T`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Set<T: SetElement>(pub(crate) T::Storage);

/// Iterator over the elements of a [`Set`] in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Iter<T: SetElement>(T::Storage);

/// Integer types backing a [`Set`]
#[allow(missing_docs)]
pub trait Bits:
    Copy
    + Eq
    + Ord
    + Hash
    + fmt::Debug
    + fmt::Binary
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    const ZERO: Self;

    fn bit(index: u8) -> Self;
    fn count(self) -> u32;
    /// Clears the lowest set bit and returns its index.
    fn pop_lowest(&mut self) -> Option<u8>;
}

macro_rules! impl_bits {
    ($($int:ty),*) => {$(
        impl Bits for $int {
            const ZERO: Self = 0;

            #[inline(always)]
            fn bit(index: u8) -> Self {
                1 << index
            }

            #[inline(always)]
            fn count(self) -> u32 {
                self.count_ones()
            }

            #[inline(always)]
            fn pop_lowest(&mut self) -> Option<u8> {
                if *self == 0 {
                    return None;
                }
                let index = self.trailing_zeros() as u8;
                *self &= *self - 1;
                Some(index)
            }
        }
    )*};
}

impl_bits!(u16, u32, u128);

/// Types that can be stored in a [`Set`]
pub trait SetElement: Copy + sealed::Sealed {
    /// Integer with one bit per possible element
    type Storage: Bits;
    /// Mask of all possible elements
    const ALL: Self::Storage;

    /// Bit index of this element
    fn bit_index(self) -> u8;
    /// Inverse of [`SetElement::bit_index`]
    fn from_bit_index(index: u8) -> Self;
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! set_element {
    ($( $type:ty => $storage:ty, $all:expr, $from_index:expr; )*) => {$(
        impl sealed::Sealed for $type {}

        impl SetElement for $type {
            type Storage = $storage;
            const ALL: $storage = $all;

            #[inline(always)]
            fn bit_index(self) -> u8 {
                self.as_index() as u8
            }

            #[inline(always)]
            fn from_bit_index(index: u8) -> Self {
                $from_index(index)
            }
        }

        impl $type {
            /// Returns the set containing only this element.
            pub fn as_set(self) -> Set<Self> {
                Set(<$storage>::bit(self.bit_index()))
            }
        }
    )*};
}

set_element! {
    Cell => u128, (1 << 81) - 1, Cell::new;
    Digit => u16, 0o777, Digit::from_index;
    // rows and columns
    Line => u32, 0o777_777, Line::new;
    // rows, columns and blocks
    House => u32, 0o777_777_777, House::new;
    Position<Line> => u16, 0o777, Position::new;
    Position<House> => u16, 0o777, Position::new;
}

impl<T: SetElement> Set<T> {
    /// Set of every possible element
    pub const ALL: Set<T> = Set(T::ALL);

    /// Empty set
    pub const NONE: Set<T> = Set(<T::Storage as Bits>::ZERO);

    /// Raw bits of the set, element `i` is bit `i`.
    pub fn bits(self) -> T::Storage {
        self.0
    }

    /// Elements of `self` that aren't in `other`.
    pub fn without(self, other: Self) -> Self {
        Set(self.0 & !other.0)
    }

    /// Removes all elements of `other` from this set.
    pub fn remove(&mut self, other: Self) {
        *self = self.without(other);
    }

    #[allow(missing_docs)]
    pub fn overlaps(&self, other: Self) -> bool {
        !(*self & other).is_empty()
    }

    /// Checks whether every element of `other` is in this set.
    pub fn contains(&self, other: impl Into<Self>) -> bool {
        let other = other.into();
        self.0 & other.0 == other.0
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> u8 {
        self.0.count() as u8
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.0 == <T::Storage as Bits>::ZERO
    }

    #[allow(missing_docs)]
    pub fn is_full(&self) -> bool {
        self.0 == T::ALL
    }

    /// `Ok(Some(_))` for a set of one element, `Ok(None)` for several and `Err(Empty)`
    /// for none.
    pub fn unique(self) -> Result<Option<T>, Empty> {
        match self.len() {
            0 => Err(Empty),
            1 => Ok(self.first()),
            _ => Ok(None),
        }
    }

    /// Lowest element of the set
    pub fn first(self) -> Option<T> {
        self.into_iter().next()
    }
}

/// Error of [`Set::unique`] for empty sets
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Empty;

impl Set<Digit> {
    /// Like [`Set::unique`], with an empty set reported as a contradiction in `cell`.
    pub(crate) fn unique_or_contradiction(self, cell: Cell) -> Result<Option<Digit>, Contradiction> {
        self.unique().map_err(|Empty| Contradiction::NoCandidates { cell })
    }
}

impl<T: SetElement> Iterator for Iter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.pop_lowest().map(T::from_bit_index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count() as usize;
        (len, Some(len))
    }
}

impl<T: SetElement> ExactSizeIterator for Iter<T> {}

impl<T: SetElement> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        Iter(self.0)
    }
}

impl<T: SetElement> From<T> for Set<T> {
    fn from(element: T) -> Self {
        Set(<T::Storage as Bits>::bit(element.bit_index()))
    }
}

impl<T: SetElement> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().fold(Set::NONE, |set, element| set | element)
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////
//                                  Bitops
///////////////////////////////////////////////////////////////////////////////////////////////

macro_rules! bitops {
    ($( $op:ident :: $op_fn:ident, $assign:ident :: $assign_fn:ident; )*) => {$(
        impl<T: SetElement> $op for Set<T> {
            type Output = Self;

            #[inline(always)]
            fn $op_fn(self, other: Self) -> Self {
                Set($op::$op_fn(self.0, other.0))
            }
        }

        impl<T: SetElement> $op<T> for Set<T> {
            type Output = Self;

            #[inline(always)]
            fn $op_fn(self, other: T) -> Self {
                $op::$op_fn(self, Set::from(other))
            }
        }

        impl<T: SetElement> $assign for Set<T> {
            #[inline(always)]
            fn $assign_fn(&mut self, other: Self) {
                *self = $op::$op_fn(*self, other);
            }
        }

        impl<T: SetElement> $assign<T> for Set<T> {
            #[inline(always)]
            fn $assign_fn(&mut self, other: T) {
                *self = $op::$op_fn(*self, Set::from(other));
            }
        }
    )*};
}

bitops! {
    BitAnd::bitand, BitAndAssign::bitand_assign;
    BitOr::bitor, BitOrAssign::bitor_assign;
    BitXor::bitxor, BitXorAssign::bitxor_assign;
}

impl<T: SetElement> Not for Set<T> {
    type Output = Self;

    fn not(self) -> Self {
        Set::ALL.without(self)
    }
}

impl<T: SetElement> fmt::Binary for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

impl fmt::Display for Set<Digit> {
    // candidates as they appear in pencilmarks: 1379
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.into_iter().try_for_each(|digit| write!(f, "{}", digit))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unique() {
        assert_eq!(Set::<Digit>::NONE.unique(), Err(Empty));
        assert_eq!(Digit::new(4).as_set().unique(), Ok(Some(Digit::new(4))));
        assert_eq!((Digit::new(4).as_set() | Digit::new(7)).unique(), Ok(None));
    }

    #[test]
    fn not_stays_in_range() {
        let set = Digit::new(1).as_set() | Digit::new(9);
        let inverse = !set;
        assert_eq!(inverse.len(), 7);
        assert!(!inverse.contains(Digit::new(1)));
        assert_eq!(!Set::<Cell>::NONE, Set::<Cell>::ALL);
        assert_eq!(Set::<Cell>::ALL.len(), 81);
    }

    #[test]
    fn iteration_order_and_collect() {
        let cells: Set<Cell> = [Cell::new(80), Cell::new(3), Cell::new(40)].iter().copied().collect();
        let collected: Vec<u8> = cells.into_iter().map(Cell::get).collect();
        assert_eq!(collected, vec![3, 40, 80]);
        assert_eq!(cells.into_iter().len(), 3);
    }

    #[test]
    fn display_digits() {
        let digits = Digit::new(2).as_set() | Digit::new(5) | Digit::new(9);
        assert_eq!(digits.to_string(), "259");
    }
}
