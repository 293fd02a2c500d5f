//! Offset-based pagination.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, LaunchpadError};

/// Offset-based pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPagination {
    /// Number of items to skip.
    pub offset: u64,
    /// Maximum number of items to return.
    pub limit: u64,
}

impl OffsetPagination {
    /// Create pagination, clamping the limit to `1..=MAX_PAGE_SIZE`.
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, super::MAX_PAGE_SIZE),
        }
    }

    /// Build pagination from optional, signed client arguments.
    ///
    /// Missing values fall back to the first page of the default size.
    /// Negative values and a zero limit are rejected; oversized limits are clamped.
    pub fn from_args(offset: Option<i32>, limit: Option<i32>) -> Result<Self, LaunchpadError> {
        let offset = match offset {
            None => 0,
            Some(o) if o < 0 => {
                return Err(LaunchpadError::new(
                    ErrorCode::InvalidInput,
                    "Offset must not be negative",
                ))
            }
            Some(o) => o as u64,
        };

        let limit = match limit {
            None => super::DEFAULT_PAGE_SIZE,
            Some(l) if l < 1 => {
                return Err(LaunchpadError::new(
                    ErrorCode::InvalidInput,
                    "Limit must be at least 1",
                ))
            }
            Some(l) => l as u64,
        };

        Ok(Self::new(offset, limit))
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Whether more items exist beyond this window.
    pub fn has_next(&self, total_items: u64) -> bool {
        self.offset.saturating_add(self.limit) < total_items
    }

    /// Apply pagination to an iterator.
    pub fn paginate_iter<T, I: Iterator<Item = T>>(&self, iter: I) -> Vec<T> {
        iter.skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}

impl Default for OffsetPagination {
    fn default() -> Self {
        Self::new(0, super::DEFAULT_PAGE_SIZE)
    }
}
