//! Configuration options for table processing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Strategy for eliminating missing feature values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingValueMethod {
    /// Leave missing values in place.
    #[default]
    NoAction,
    /// Drop every row containing a missing value.
    DeleteRows,
    /// Drop every feature column containing a missing value.
    DeleteColumns,
    /// Fill with the mean of the column's present values.
    ReplaceByColumnMean,
    /// Fill with the median of the column's present values.
    ReplaceByColumnMedian,
    /// Fill with zero.
    ReplaceByZero,
    /// Fill by linear interpolation along row order.
    LinearInterpolation,
}

impl MissingValueMethod {
    pub const ALL: [Self; 7] = [
        Self::NoAction,
        Self::DeleteRows,
        Self::DeleteColumns,
        Self::ReplaceByColumnMean,
        Self::ReplaceByColumnMedian,
        Self::ReplaceByZero,
        Self::LinearInterpolation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoAction => "NoAction",
            Self::DeleteRows => "DeleteRows",
            Self::DeleteColumns => "DeleteColumns",
            Self::ReplaceByColumnMean => "ReplaceByColumnMean",
            Self::ReplaceByColumnMedian => "ReplaceByColumnMedian",
            Self::ReplaceByZero => "ReplaceByZero",
            Self::LinearInterpolation => "LinearInterpolation",
        }
    }

    /// Fill and interpolation methods can leave values behind; deletions cannot.
    pub fn is_fill(self) -> bool {
        matches!(
            self,
            Self::ReplaceByColumnMean
                | Self::ReplaceByColumnMedian
                | Self::ReplaceByZero
                | Self::LinearInterpolation
        )
    }
}

impl fmt::Display for MissingValueMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingValueMethod {
    type Err = ModelError;

    /// Case-insensitive. `None` is a synonym for `NoAction` and
    /// `ReplaceColumnMedian` for `ReplaceByColumnMedian`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self::NoAction);
        }
        if trimmed.eq_ignore_ascii_case("ReplaceColumnMedian") {
            return Ok(Self::ReplaceByColumnMedian);
        }
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownMissingValueMethod(value.to_string()))
    }
}
