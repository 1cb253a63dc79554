//! Cart line quantities.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`] or [`QuantityAction`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities start at one; a zero-quantity line does not exist.
    #[error("quantity must be at least 1")]
    Zero,
    /// Unknown quantity action.
    #[error("invalid quantity action: {0} (expected \"add\" or \"minus\")")]
    InvalidAction(String),
}

/// A line-item quantity, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Zero` if `value` is 0.
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 {
            return Err(QuantityError::Zero);
        }
        Ok(Self(value))
    }

    /// The underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// One more, saturating at `u32::MAX`.
    #[must_use]
    pub const fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One less, never going below 1.
    #[must_use]
    pub const fn decrement(self) -> Self {
        if self.0 > 1 { Self(self.0 - 1) } else { Self::ONE }
    }

    /// Apply an `add`/`minus` action.
    #[must_use]
    pub const fn apply(self, action: QuantityAction) -> Self {
        match action {
            QuantityAction::Add => self.increment(),
            QuantityAction::Minus => self.decrement(),
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a quantity update from the cart UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityAction {
    Add,
    Minus,
}

impl fmt::Display for QuantityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Minus => write!(f, "minus"),
        }
    }
}

impl core::str::FromStr for QuantityAction {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "minus" => Ok(Self::Minus),
            _ => Err(QuantityError::InvalidAction(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rejected() {
        assert_eq!(Quantity::new(0), Err(QuantityError::Zero));
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }

    #[test]
    fn test_decrement_floors_at_one() {
        assert_eq!(Quantity::ONE.decrement(), Quantity::ONE);
        assert_eq!(Quantity::new(3).unwrap().decrement().get(), 2);
    }

    #[test]
    fn test_increment_saturates() {
        assert_eq!(Quantity::new(u32::MAX).unwrap().increment().get(), u32::MAX);
    }

    #[test]
    fn test_apply_action() {
        let q = Quantity::new(2).unwrap();
        assert_eq!(q.apply(QuantityAction::Add).get(), 3);
        assert_eq!(q.apply(QuantityAction::Minus).get(), 1);
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("add".parse::<QuantityAction>().unwrap(), QuantityAction::Add);
        assert_eq!(
            "minus".parse::<QuantityAction>().unwrap(),
            QuantityAction::Minus
        );
        assert!(matches!(
            "remove".parse::<QuantityAction>(),
            Err(QuantityError::InvalidAction(_))
        ));
    }
}
