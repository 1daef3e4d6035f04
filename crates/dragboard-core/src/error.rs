use std::fmt;

use crate::model::{ItemId, ListId};

/// Machine-readable error codes for renderer- and script-friendly reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnknownList,
    InvalidItemId,
    IndexOutOfRange,
    ItemNotInList,
    ItemNotFound,
    DuplicateItem,
    EmptyGroup,
    ConfigParseError,
    ScriptParseError,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnknownList => "E1001",
            Self::InvalidItemId => "E1002",
            Self::IndexOutOfRange => "E2001",
            Self::ItemNotInList => "E2002",
            Self::ItemNotFound => "E2003",
            Self::DuplicateItem => "E2004",
            Self::EmptyGroup => "E2005",
            Self::ConfigParseError => "E3001",
            Self::ScriptParseError => "E3002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::UnknownList => "Unknown list identifier",
            Self::InvalidItemId => "Malformed item id",
            Self::IndexOutOfRange => "Index out of range",
            Self::ItemNotInList => "Item not in the stated list",
            Self::ItemNotFound => "Item not found",
            Self::DuplicateItem => "Duplicate item id",
            Self::EmptyGroup => "Group move with no movable items",
            Self::ConfigParseError => "Config file parse error",
            Self::ScriptParseError => "Gesture script parse error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::UnknownList => Some("Use one of list-1, list-2, list-3, list-4."),
            Self::InvalidItemId => Some("Item ids look like `item-<n>` with a non-negative n."),
            Self::IndexOutOfRange | Self::ItemNotInList => {
                Some("The drag event is stale; re-read the board snapshot and retry.")
            }
            Self::ItemNotFound | Self::DuplicateItem | Self::EmptyGroup => None,
            Self::ConfigParseError => Some("Fix syntax in .dragboard/config.toml and retry."),
            Self::ScriptParseError => {
                Some("Each script line must be one JSON gesture event with a \"type\" field.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Rejected registry or selection operation.
///
/// Every operation that returns one of these leaves the board exactly as it
/// was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("unknown list identifier '{0}'")]
    UnknownList(String),

    #[error("invalid item id '{0}'")]
    InvalidItemId(String),

    #[error("index {index} out of range for {list} (len {len})")]
    IndexOutOfRange { list: ListId, index: usize, len: usize },

    #[error("{item} is not in {list}")]
    ItemNotInList { item: ItemId, list: ListId },

    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("duplicate item id: {0}")]
    DuplicateItem(ItemId),

    #[error("none of the selected items are on the board")]
    EmptyGroup,
}

impl BoardError {
    /// Map to the stable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownList(_) => ErrorCode::UnknownList,
            Self::InvalidItemId(_) => ErrorCode::InvalidItemId,
            Self::IndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
            Self::ItemNotInList { .. } => ErrorCode::ItemNotInList,
            Self::ItemNotFound(_) => ErrorCode::ItemNotFound,
            Self::DuplicateItem(_) => ErrorCode::DuplicateItem,
            Self::EmptyGroup => ErrorCode::EmptyGroup,
        }
    }
}
