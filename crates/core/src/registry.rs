use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Explicitly-initialized service locator.
///
/// Holds one instance per type.  Built once at startup, passed by reference
/// to consumers — no hidden process-wide globals, so tests can construct
/// their own registries with fakes.
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service, replacing any previous instance of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, service: T) {
        self.services.insert(TypeId::of::<T>(), Box::new(service));
    }

    /// Look up a service by type.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|s| s.downcast_ref::<T>())
    }

    /// Whether a service of this type has been registered.
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Fake(u32);

    #[test]
    fn insert_and_get() {
        let mut registry = ServiceRegistry::new();
        registry.insert(Fake(7));
        assert_eq!(registry.get::<Fake>(), Some(&Fake(7)));
    }

    #[test]
    fn missing_service_is_none() {
        let registry = ServiceRegistry::new();
        assert!(registry.get::<Fake>().is_none());
        assert!(!registry.contains::<Fake>());
    }

    #[test]
    fn insert_replaces_previous_instance() {
        let mut registry = ServiceRegistry::new();
        registry.insert(Fake(1));
        registry.insert(Fake(2));
        assert_eq!(registry.get::<Fake>(), Some(&Fake(2)));
        assert!(registry.contains::<Fake>());
    }
}
