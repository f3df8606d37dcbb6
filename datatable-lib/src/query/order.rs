//! Sort direction.

use serde::Deserialize;
use serde::Serialize;

/// Sort direction, serialized as `1` (ascending) or `-1` (descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9).
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
}

impl SortOrder {
    /// Returns the wire value: `1` or `-1`.
    pub fn as_i8(self) -> i8 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

impl From<SortOrder> for i8 {
    fn from(order: SortOrder) -> Self {
        order.as_i8()
    }
}

impl TryFrom<i8> for SortOrder {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SortOrder::Ascending),
            -1 => Ok(SortOrder::Descending),
            other => Err(format!("invalid sort order {}, expected 1 or -1", other)),
        }
    }
}
