//! Aspect composition.
//!
//! Each feature aspect registers routes and slot items into a shared
//! [`PlatformShell`] and seeds its fixtures on startup. The composed shell is
//! published to front-ends as the platform [`Manifest`].
//!
//! ```text
//! Platform::compose([people, forums, products, launches, reviews, upvotes])
//!     └─ for each aspect, in order
//!          ├─ every dependency already registered?
//!          └─ aspect.register(Registrar { aspect id, shell })
//! ```

pub mod slot;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

pub use slot::{Slot, SlotEntry};

use crate::aspects::Services;
use crate::error::{ErrorCode, LaunchpadError, Result};
use crate::observability::LaunchpadEvent;
use crate::search::{SearchService, SearchType};

/// Aspect id of the platform itself, owner of the shared slots.
pub const PLATFORM_ASPECT: &str = "platform";

// ═══════════════════════════════════════════════════════════════════════════════
// Slot Items
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub path: String,
    pub name: String,
    /// Whether the page needs a signed-in user.
    pub requires_auth: bool,
}

impl Route {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            requires_auth: false,
        }
    }

    pub fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub label: String,
    pub path: String,
}

impl NavItem {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// A tab on a user's profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileTab {
    pub key: String,
    pub label: String,
    /// GraphQL field the tab loads its content from.
    pub query: String,
}

impl ProfileTab {
    pub fn new(key: impl Into<String>, label: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            query: query.into(),
        }
    }
}

/// A section on a product's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSection {
    pub key: String,
    pub title: String,
    /// GraphQL field the section loads its content from.
    pub query: String,
}

impl ProductSection {
    pub fn new(key: impl Into<String>, title: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            query: query.into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Shell
// ═══════════════════════════════════════════════════════════════════════════════

/// Every slot aspects can contribute to.
#[derive(Debug, Clone)]
pub struct PlatformShell {
    pub routes: Slot<Route>,
    pub navigation: Slot<NavItem>,
    pub profile_tabs: Slot<ProfileTab>,
    pub product_sections: Slot<ProductSection>,
    pub search_types: Slot<SearchType>,
    registered: Vec<RegisteredAspect>,
}

impl Default for PlatformShell {
    fn default() -> Self {
        Self {
            routes: Slot::new("routes"),
            navigation: Slot::new("navigation"),
            profile_tabs: Slot::owned_by("profile_tabs", "people"),
            product_sections: Slot::owned_by("product_sections", "products"),
            search_types: Slot::new("search_types"),
            registered: Vec::new(),
        }
    }
}

impl PlatformShell {
    pub fn is_registered(&self, aspect: &str) -> bool {
        aspect == PLATFORM_ASPECT || self.registered.iter().any(|a| a.id == aspect)
    }

    /// Aspects in registration order.
    pub fn aspects(&self) -> &[RegisteredAspect] {
        &self.registered
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredAspect {
    pub id: String,
    pub dependencies: Vec<String>,
}

/// The shell as seen by one aspect while it registers.
///
/// Items are tagged with the aspect's id. Contributing to a slot owned by
/// another aspect requires that aspect to be registered already.
pub struct Registrar<'a> {
    aspect: &'a str,
    shell: &'a mut PlatformShell,
}

impl<'a> Registrar<'a> {
    fn check_owner<T>(aspect: &str, shell: &PlatformShell, slot: &Slot<T>) -> Result<()> {
        match slot.owner() {
            Some(owner) if owner != aspect && !shell.is_registered(owner) => {
                Err(LaunchpadError::with_internal(
                    ErrorCode::MissingAspectDependency,
                    format!("Aspect '{}' requires '{}'", aspect, owner),
                    format!("slot '{}' is owned by '{}'", slot.name(), owner),
                ))
            }
            _ => Ok(()),
        }
    }

    pub fn aspect(&self) -> &str {
        self.aspect
    }

    pub fn route(&mut self, route: Route) -> &mut Self {
        self.shell.routes.register(self.aspect, route);
        self
    }

    pub fn navigation(&mut self, item: NavItem) -> &mut Self {
        self.shell.navigation.register(self.aspect, item);
        self
    }

    pub fn profile_tab(&mut self, tab: ProfileTab) -> Result<&mut Self> {
        Self::check_owner(self.aspect, self.shell, &self.shell.profile_tabs)?;
        self.shell.profile_tabs.register(self.aspect, tab);
        Ok(self)
    }

    pub fn product_section(&mut self, section: ProductSection) -> Result<&mut Self> {
        Self::check_owner(self.aspect, self.shell, &self.shell.product_sections)?;
        self.shell.product_sections.register(self.aspect, section);
        Ok(self)
    }

    pub fn search_type(&mut self, name: &str, label: &str, route: &str) -> &mut Self {
        let search_type = SearchType::new(name, label, route, self.aspect);
        self.shell.search_types.register(self.aspect, search_type);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Aspect
// ═══════════════════════════════════════════════════════════════════════════════

/// A self-contained feature module.
#[async_trait]
pub trait Aspect: Send + Sync {
    fn id(&self) -> &'static str;

    /// Aspects that must be registered before this one.
    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    /// Contribute routes and slot items.
    fn register(&self, shell: &mut Registrar<'_>) -> Result<()>;

    /// Insert fixtures into empty collections. Returns the number of records added.
    async fn seed(&self, _services: &Services) -> Result<usize> {
        Ok(0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Platform
// ═══════════════════════════════════════════════════════════════════════════════

/// Composed aspects and the shell they registered into.
#[derive(Clone)]
pub struct Platform {
    aspects: Vec<Arc<dyn Aspect>>,
    shell: PlatformShell,
}

impl Platform {
    /// Register aspects in the given order.
    pub fn compose(aspects: Vec<Arc<dyn Aspect>>) -> Result<Self> {
        let mut shell = PlatformShell::default();
        let mut seen = HashSet::new();

        for aspect in &aspects {
            let id = aspect.id();
            if !seen.insert(id) || id == PLATFORM_ASPECT {
                return Err(LaunchpadError::new(
                    ErrorCode::AspectAlreadyRegistered,
                    format!("Aspect '{}' is already registered", id),
                ));
            }

            if let Some(missing) = aspect
                .dependencies()
                .iter()
                .find(|dep| !shell.is_registered(dep))
            {
                return Err(LaunchpadError::new(
                    ErrorCode::MissingAspectDependency,
                    format!("Aspect '{}' requires '{}' to be registered first", id, missing),
                ));
            }

            let routes_before = shell.routes.len();
            aspect.register(&mut Registrar {
                aspect: id,
                shell: &mut shell,
            })?;

            shell.registered.push(RegisteredAspect {
                id: id.to_string(),
                dependencies: aspect.dependencies().iter().map(|d| d.to_string()).collect(),
            });

            LaunchpadEvent::AspectRegistered {
                aspect: id.to_string(),
                routes: shell.routes.len() - routes_before,
            }
            .log();
        }

        Ok(Self { aspects, shell })
    }

    pub fn shell(&self) -> &PlatformShell {
        &self.shell
    }

    /// Register every contributed search type with the search service.
    pub fn install_search_types(&self, search: &SearchService) -> Result<()> {
        for search_type in self.shell.search_types.items() {
            search.register_search_type(search_type.clone())?;
        }
        Ok(())
    }

    /// Seed fixtures aspect by aspect, in registration order.
    pub async fn seed(&self, services: &Services) -> Result<usize> {
        let mut total = 0;
        for aspect in &self.aspects {
            let added = aspect.seed(services).await?;
            tracing::debug!(aspect = aspect.id(), added, "Aspect seeded");
            total += added;
        }
        Ok(total)
    }

    pub fn manifest(&self) -> Manifest {
        let shell = &self.shell;
        Manifest {
            version: env!("CARGO_PKG_VERSION"),
            aspects: shell.registered.clone(),
            routes: shell.routes.entries().to_vec(),
            navigation: shell.navigation.entries().to_vec(),
            profile_tabs: shell.profile_tabs.entries().to_vec(),
            product_sections: shell.product_sections.entries().to_vec(),
            search_types: shell.search_types.items().cloned().collect(),
        }
    }
}

/// Everything a front-end shell needs to render the composed platform.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: &'static str,
    pub aspects: Vec<RegisteredAspect>,
    pub routes: Vec<SlotEntry<Route>>,
    pub navigation: Vec<SlotEntry<NavItem>>,
    pub profile_tabs: Vec<SlotEntry<ProfileTab>>,
    pub product_sections: Vec<SlotEntry<ProductSection>>,
    pub search_types: Vec<SearchType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestAspect {
        id: &'static str,
        deps: &'static [&'static str],
        tab: bool,
    }

    #[async_trait]
    impl Aspect for TestAspect {
        fn id(&self) -> &'static str {
            self.id
        }

        fn dependencies(&self) -> &'static [&'static str] {
            self.deps
        }

        fn register(&self, shell: &mut Registrar<'_>) -> Result<()> {
            shell.route(Route::new(format!("/{}", self.id), self.id));
            if self.tab {
                shell.profile_tab(ProfileTab::new(self.id, self.id, self.id))?;
            }
            Ok(())
        }
    }

    fn aspect(id: &'static str, deps: &'static [&'static str], tab: bool) -> Arc<dyn Aspect> {
        Arc::new(TestAspect { id, deps, tab })
    }

    #[test]
    fn test_compose_in_order() {
        let platform = Platform::compose(vec![
            aspect("people", &[], true),
            aspect("products", &["people"], true),
        ])
        .unwrap();

        let paths: Vec<_> = platform.shell().routes.items().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/people", "/products"]);

        let manifest = serde_json::to_value(platform.manifest()).unwrap();
        assert_eq!(manifest["profileTabs"][1]["aspect"], "products");
        assert_eq!(manifest["aspects"][1]["dependencies"][0], "people");
    }

    #[test]
    fn test_missing_dependency_rejected() {
        let err = Platform::compose(vec![
            aspect("products", &["people"], false),
            aspect("people", &[], false),
        ])
        .err()
        .unwrap();
        assert_eq!(err.code(), ErrorCode::MissingAspectDependency);
    }

    #[test]
    fn test_owned_slot_requires_owner() {
        let err = Platform::compose(vec![aspect("products", &[], true)]).err().unwrap();
        assert_eq!(err.code(), ErrorCode::MissingAspectDependency);
    }

    #[test]
    fn test_duplicate_aspect_rejected() {
        let err = Platform::compose(vec![aspect("people", &[], false), aspect("people", &[], false)])
            .err()
            .unwrap();
        assert_eq!(err.code(), ErrorCode::AspectAlreadyRegistered);
    }
}
