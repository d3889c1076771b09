use std::convert::TryFrom;
use std::fmt;
use std::num::NonZeroU8;

/// One of the digits `1..=9`.
///
/// Digits are stored as is, their index in arrays and bitsets is `digit - 1`.
#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Digit(NonZeroU8);

impl Digit {
    /// # Panics
    /// If `digit` is outside of `1..=9`.
    pub fn new(digit: u8) -> Self {
        Digit::try_from(digit).unwrap_or_else(|_| panic!("digit {} out of range 1..=9", digit))
    }

    pub(crate) fn from_index(index: u8) -> Self {
        Digit::new(index + 1)
    }

    /// All digits in ascending order
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=9).map(Digit::new)
    }

    #[allow(missing_docs)]
    pub fn get(self) -> u8 {
        self.0.get()
    }

    /// Index in `0..9`
    pub fn as_index(self) -> usize {
        usize::from(self.get() - 1)
    }
}

/// Error for digits outside of `1..=9`
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("digit {0} out of range 1..=9")]
pub struct DigitOutOfRange(pub u8);

impl TryFrom<u8> for Digit {
    type Error = DigitOutOfRange;

    fn try_from(digit: u8) -> Result<Self, Self::Error> {
        match digit {
            1..=9 => NonZeroU8::new(digit).map(Digit).ok_or(DigitOutOfRange(digit)),
            _ => Err(DigitOutOfRange(digit)),
        }
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn range() {
        assert_eq!(Digit::try_from(0), Err(DigitOutOfRange(0)));
        assert_eq!(Digit::try_from(10), Err(DigitOutOfRange(10)));
        assert_eq!(Digit::try_from(9).map(Digit::as_index), Ok(8));
        assert_eq!(Digit::all().count(), 9);
    }
}
