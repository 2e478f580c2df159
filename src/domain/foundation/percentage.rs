//! Percentage value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A whole-number value between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a new Percentage, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Creates a Percentage, returning error if out of range.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if value > 100 {
            return Err(ValidationError::out_of_range(
                "percentage",
                0,
                100,
                i32::from(value),
            ));
        }
        Ok(Self(value))
    }

    /// Rounds `part / whole` to the nearest whole percent, halves rounding up.
    ///
    /// An empty whole is 0%. A part larger than the whole clamps to 100%.
    pub fn from_ratio(part: usize, whole: usize) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        let part = part.min(whole) as u128;
        let whole = whole as u128;
        let rounded = (200 * part + whole) / (2 * whole);
        Self::new(rounded as u8)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_new_clamps_to_100() {
        assert_eq!(Percentage::new(101).value(), 100);
        assert_eq!(Percentage::new(255).value(), 100);
    }

    #[test]
    fn percentage_try_new_rejects_over_100() {
        match Percentage::try_new(101) {
            Err(ValidationError::OutOfRange { field, actual, .. }) => {
                assert_eq!(field, "percentage");
                assert_eq!(actual, 101);
            }
            other => panic!("Expected OutOfRange error, got {:?}", other),
        }
    }

    #[test]
    fn from_ratio_rounds_to_nearest() {
        assert_eq!(Percentage::from_ratio(1, 3).value(), 33);
        assert_eq!(Percentage::from_ratio(2, 3).value(), 67);
        assert_eq!(Percentage::from_ratio(3, 4).value(), 75);
        assert_eq!(Percentage::from_ratio(3, 3), Percentage::HUNDRED);
    }

    #[test]
    fn from_ratio_rounds_halves_up() {
        // 1/8 = 12.5%
        assert_eq!(Percentage::from_ratio(1, 8).value(), 13);
        // 1/200 = 0.5%
        assert_eq!(Percentage::from_ratio(1, 200).value(), 1);
    }

    #[test]
    fn from_ratio_handles_empty_and_overflowing_parts() {
        assert_eq!(Percentage::from_ratio(0, 0), Percentage::ZERO);
        assert_eq!(Percentage::from_ratio(5, 0), Percentage::ZERO);
        assert_eq!(Percentage::from_ratio(7, 3), Percentage::HUNDRED);
    }

    #[test]
    fn percentage_displays_and_serializes() {
        assert_eq!(format!("{}", Percentage::new(75)), "75%");
        assert_eq!(serde_json::to_string(&Percentage::new(42)).unwrap(), "42");
    }
}
