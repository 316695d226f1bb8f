//! Catalog registries for host-registered game variants.
//!
//! A catalog is a closed set of named values of one type (rabbit color morphs,
//! for example). The host registers every value once at startup through
//! [`CatalogRegistry::register`], freezes the registry, and plugins then look
//! values up by id. Named handle sets such as [`RabbitTypes`] are resolved from
//! a frozen registry so that no slot is ever left unbound.
use std::collections::HashMap;
use std::fmt::Debug;

use tracing::debug;

use crate::error::{Error, Result};

pub mod rabbit;

pub use rabbit::{RabbitType, RabbitTypes};

pub type CatalogId = String;

/// A value that lives in a catalog.
pub trait CatalogType: Clone + Debug + Send + Sync {
    /// Namespaced identifier, e.g. `minecraft:brown`.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;
}

/// Registry mapping catalog ids to values, iterated in registration order.
#[derive(Debug)]
pub struct CatalogRegistry<T: CatalogType> {
    label: &'static str,
    index: HashMap<CatalogId, usize>,
    values: Vec<T>,
    frozen: bool,
}

impl<T: CatalogType> CatalogRegistry<T> {
    /// Creates an empty registry. `label` only appears in logs.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            index: HashMap::new(),
            values: Vec::new(),
            frozen: false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Registers a value under its id.
    ///
    /// Fails if the id is taken or the registry has been frozen.
    pub fn register(&mut self, value: T) -> Result<()> {
        let id = value.id().to_owned();
        if self.frozen {
            return Err(Error::RegistryFrozen { id });
        }
        if self.index.contains_key(&id) {
            return Err(Error::DuplicateCatalogType { id });
        }
        debug!("Registered {} '{}'.", self.label, id);
        self.index.insert(id, self.values.len());
        self.values.push(value);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.values[i])
    }

    /// Like [`CatalogRegistry::get`], but an unknown id is an error.
    pub fn require(&self, id: &str) -> Result<T> {
        self.get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownCatalogType { id: id.to_owned() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stops accepting registrations. Idempotent.
    pub fn freeze(&mut self) {
        if !self.frozen {
            debug!(
                "Froze {} registry with {} entries.",
                self.label,
                self.values.len()
            );
        }
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Color {
        id: String,
    }

    impl Color {
        fn new(id: &str) -> Self {
            Self { id: id.to_owned() }
        }
    }

    impl CatalogType for Color {
        fn id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.id
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = CatalogRegistry::new("color");
        registry.register(Color::new("a:red")).unwrap();
        registry.register(Color::new("a:blue")).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("a:red"));
        assert_eq!(registry.get("a:blue"), Some(&Color::new("a:blue")));
        assert!(registry.get("a:green").is_none());
    }

    #[test]
    fn iteration_follows_registration_order() {
        let mut registry = CatalogRegistry::new("color");
        for id in ["z:last", "a:first", "m:middle"] {
            registry.register(Color::new(id)).unwrap();
        }
        let ids: Vec<_> = registry.iter().map(|c| c.id().to_owned()).collect();
        assert_eq!(ids, vec!["z:last", "a:first", "m:middle"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = CatalogRegistry::new("color");
        registry.register(Color::new("a:red")).unwrap();
        let err = registry.register(Color::new("a:red")).unwrap_err();
        assert!(matches!(err, Error::DuplicateCatalogType { ref id } if id == "a:red"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn frozen_registry_refuses_new_values() {
        let mut registry = CatalogRegistry::new("color");
        registry.register(Color::new("a:red")).unwrap();
        registry.freeze();
        registry.freeze();
        assert!(registry.is_frozen());
        assert!(matches!(
            registry.register(Color::new("a:blue")),
            Err(Error::RegistryFrozen { .. })
        ));
        assert!(registry.get("a:red").is_some());
    }

    #[test]
    fn require_reports_unknown_id() {
        let registry: CatalogRegistry<Color> = CatalogRegistry::new("color");
        assert!(registry.is_empty());
        assert!(matches!(
            registry.require("a:none"),
            Err(Error::UnknownCatalogType { ref id }) if id == "a:none"
        ));
    }
}
