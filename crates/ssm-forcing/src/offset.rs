//! Mapping from model time labels to forcing-table rows.

use std::fmt;

/// Integer added to a model time label to obtain a 1-based forcing row
/// number.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeIndexOffset(pub i64);

impl TimeIndexOffset {
    /// Derive `t_idx` from the first time label of a series.
    ///
    /// | origin | `t_idx`         |
    /// |--------|-----------------|
    /// | 0      | 1               |
    /// | 1      | 0               |
    /// | other  | `-(origin - 1)` |
    ///
    /// All three cases are the same rule, so the series' first time always
    /// maps to row 1.
    pub fn from_origin(origin: i64) -> Self {
        match origin {
            0 => TimeIndexOffset(1),
            1 => TimeIndexOffset(0),
            o => TimeIndexOffset(-(o - 1)),
        }
    }

    /// 1-based row number for `time`.
    #[inline]
    pub fn row_number(self, time: i64) -> i64 {
        time + self.0
    }
}

impl fmt::Display for TimeIndexOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t_idx={}", self.0)
    }
}
