//! Role-based access control.
//!
//! Services receive an [`Actor`] built from the request's authentication
//! context and call the guards before touching a repository:
//!
//! - mutations need a signed-in actor (`UNAUTHORIZED` otherwise)
//! - edits and deletes need the author or an admin (`ACCESS_DENIED` otherwise)
//! - administrative operations need the admin role
//!
//! # Usage
//!
//! ```rust,ignore
//! use launchpad_core::rbac::{ensure_admin_or_author, Actor};
//!
//! let forum = repo.get(id).await?;
//! ensure_admin_or_author(&actor, &forum.author_id)?;
//! ```

pub mod actor;
pub mod roles;

pub use actor::{ensure_admin, ensure_admin_or_author, ensure_authenticated, ensure_moderator, Actor};
pub use roles::Role;
