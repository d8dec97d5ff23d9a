//! String-keyed prefab registries: how rule authors and config-driven
//! setups resolve an ability, trigger, or win condition by name rather
//! than constructing it in code.

use indexmap::IndexMap;

use crate::error::EngineError;

/// A factory for a single named prefab of `T`.
pub type Factory<T> = Box<dyn Fn() -> T>;

/// Maps prefab names to factories, so a builder or config file can say
/// `"mafia_kill"` instead of constructing a `MafiaKill` value directly.
pub struct KindRegistry<T> {
    factories: IndexMap<String, Factory<T>>,
}

impl<T> KindRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// Registers a prefab under `name`, overwriting any previous factory
    /// with the same name.
    pub fn insert(&mut self, name: impl Into<String>, factory: Factory<T>) {
        self.factories.insert(name.into(), factory);
    }

    /// Builds a fresh instance of the prefab named `name`.
    pub fn build(&self, name: &str) -> Result<T, EngineError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| EngineError::UnknownKind(name.to_string()))
    }

    /// Every registered prefab name, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(|name| name.as_str())
    }
}

impl<T> Default for KindRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_is_an_error() {
        let registry: KindRegistry<u32> = KindRegistry::new();
        assert_eq!(
            registry.build("nope").unwrap_err(),
            EngineError::UnknownKind("nope".to_string())
        );
    }

    #[test]
    fn registered_name_builds_fresh_instances() {
        let mut registry: KindRegistry<Vec<u32>> = KindRegistry::new();
        registry.insert("empty", Box::new(Vec::new));
        assert_eq!(registry.build("empty").unwrap(), Vec::<u32>::new());
    }
}
