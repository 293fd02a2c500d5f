//! Append-only registries aspects contribute items to.

use serde::Serialize;

/// One contributed item and the aspect that contributed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotEntry<T> {
    pub aspect: String,
    #[serde(flatten)]
    pub item: T,
}

/// Ordered registry of pluggable items. Items are never removed or reordered.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    name: &'static str,
    owner: Option<&'static str>,
    entries: Vec<SlotEntry<T>>,
}

impl<T> Slot<T> {
    /// Slot owned by the platform itself.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            owner: None,
            entries: Vec::new(),
        }
    }

    /// Slot owned by an aspect. Contributors must depend on the owner.
    pub fn owned_by(name: &'static str, owner: &'static str) -> Self {
        Self {
            name,
            owner: Some(owner),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn owner(&self) -> Option<&'static str> {
        self.owner
    }

    pub fn register(&mut self, aspect: impl Into<String>, item: T) {
        self.entries.push(SlotEntry {
            aspect: aspect.into(),
            item,
        });
    }

    /// Items in registration order.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.item)
    }

    pub fn entries(&self) -> &[SlotEntry<T>] {
        &self.entries
    }

    /// Items contributed by one aspect.
    pub fn contributed_by<'a>(&'a self, aspect: &'a str) -> impl Iterator<Item = &'a T> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.aspect == aspect)
            .map(|e| &e.item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
