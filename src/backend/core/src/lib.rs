#![allow(clippy::result_large_err)]
//! # Launchpad Core
//!
//! Backend of a modular product discovery platform.
//!
//! ## Architecture
//!
//! - **Aspects**: feature modules (people, forums, products, launches,
//!   reviews, upvotes) that own their entities, services and GraphQL objects
//! - **Platform**: composes aspects into a shell of routes, navigation and
//!   extension slots, checking aspect dependencies
//! - **Store**: document store over memory or PostgreSQL, wrapped by typed
//!   repositories
//! - **Search**: full-text index that aspects push their records into
//! - **GraphQL**: one schema merged from every aspect, served over Axum
//! - **Observability**: structured logging, tracing and Prometheus metrics

pub mod api;
pub mod aspects;
pub mod config;
pub mod error;
pub mod graphql;
pub mod middleware;
pub mod observability;
pub mod pagination;
pub mod platform;
pub mod rbac;
pub mod repository;
pub mod search;
pub mod store;
pub mod validation;

pub use error::{ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity, LaunchpadError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::aspects::{compose, Services};
    pub use crate::error::{ErrorCode, LaunchpadError, Result};
    pub use crate::pagination::OffsetPagination;
    pub use crate::platform::{Aspect, Platform, Registrar};
    pub use crate::rbac::{Actor, Role};
    pub use crate::repository::{Entity, Repository};
    pub use crate::search::{Indexable, SearchService};
    pub use crate::store::{DocumentStore, Filter, MemoryStore, SharedStore};
    pub use crate::validation::{Validate, ValidationErrors, ValidationResult};
}
