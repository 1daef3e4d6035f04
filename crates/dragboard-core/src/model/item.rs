use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::BoardError;

const ITEM_PREFIX: &str = "item-";

/// Parity of an item's numeric suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    #[must_use]
    pub const fn of(n: u64) -> Self {
        if n % 2 == 0 { Self::Even } else { Self::Odd }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Even => "even",
            Self::Odd => "odd",
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated item identifier of the form `item-<n>`.
///
/// The numeric suffix is parsed once at construction so parity checks on the
/// drag-update path never re-parse text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId {
    raw: String,
    number: u64,
}

impl ItemId {
    /// Parse an id, rejecting anything that is not `item-` followed by digits.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidItemId`] for malformed input.
    pub fn parse(input: &str) -> Result<Self, BoardError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix(ITEM_PREFIX)
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| BoardError::InvalidItemId(input.to_string()))?;
        let number = digits
            .parse::<u64>()
            .map_err(|_| BoardError::InvalidItemId(input.to_string()))?;
        Ok(Self {
            raw: trimmed.to_string(),
            number,
        })
    }

    /// Canonical id for the `n`th item.
    #[must_use]
    pub fn numbered(n: u64) -> Self {
        Self {
            raw: format!("{ITEM_PREFIX}{n}"),
            number: n,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric suffix.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    #[must_use]
    pub const fn parity(&self) -> Parity {
        Parity::of(self.number)
    }

    #[must_use]
    pub const fn is_even(&self) -> bool {
        matches!(self.parity(), Parity::Even)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ItemId {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = BoardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.raw
    }
}

/// Atomic draggable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub content: String,
}

impl Item {
    #[must_use]
    pub const fn new(id: ItemId, content: String) -> Self {
        Self { id, content }
    }

    /// Seed item `n`: id `item-<n>`, content `item <n>`.
    #[must_use]
    pub fn numbered(n: u64) -> Self {
        Self {
            id: ItemId::numbered(n),
            content: format!("item {n}"),
        }
    }
}
