use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::BoardError;

/// The fixed set of lists on a board.
///
/// Lists are addressed by enum, never by free-form string, so a lookup can
/// only fail while parsing external input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ListId {
    First,
    Second,
    Third,
    Fourth,
}

impl ListId {
    pub const ALL: [Self; 4] = [Self::First, Self::Second, Self::Third, Self::Fourth];

    /// Zero-based position of the list on the board.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
            Self::Fourth => 3,
        }
    }

    #[must_use]
    pub const fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            2 => Some(Self::Third),
            3 => Some(Self::Fourth),
            _ => None,
        }
    }

    /// Stable machine slug.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::First => "list-1",
            Self::Second => "list-2",
            Self::Third => "list-3",
            Self::Fourth => "list-4",
        }
    }

    /// Display title for renderers.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::First => "Column 1",
            Self::Second => "Column 2",
            Self::Third => "Column 3",
            Self::Fourth => "Column 4",
        }
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for ListId {
    type Err = BoardError;

    /// Accepts `list-<n>`, `column-<n>`, `droppable<n>`, or a bare `<n>` for
    /// `n` in `1..=4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        let number = ["list-", "column-", "droppable"]
            .iter()
            .find_map(|prefix| normalized.strip_prefix(prefix))
            .unwrap_or(&normalized);

        match number {
            "1" => Ok(Self::First),
            "2" => Ok(Self::Second),
            "3" => Ok(Self::Third),
            "4" => Ok(Self::Fourth),
            _ => Err(BoardError::UnknownList(s.to_string())),
        }
    }
}

impl TryFrom<String> for ListId {
    type Error = BoardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ListId> for String {
    fn from(id: ListId) -> Self {
        id.slug().to_string()
    }
}

/// A slot within a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub list: ListId,
    pub index: usize,
}

impl Location {
    #[must_use]
    pub const fn new(list: ListId, index: usize) -> Self {
        Self { list, index }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.list, self.index)
    }
}
