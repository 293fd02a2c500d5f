//! Pagination utilities for list operations.
//!
//! Lists are windowed with an `offset`/`limit` pair over a stable order.
//!
//! # Usage
//!
//! ```rust,ignore
//! use launchpad_core::pagination::OffsetPagination;
//!
//! let page = OffsetPagination::from_args(Some(40), Some(20))?;
//! let forums = repository.find(filter, page).await?;
//! ```

mod offset;

pub use offset::OffsetPagination;

/// Default page size if not specified.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed page size.
pub const MAX_PAGE_SIZE: u64 = 100;
