//! Per-unit class model registry.

use rustc_hash::FxHashMap;

use crate::model::ClassModel;

/// Append-only arena of class models, keyed by class name.
///
/// Owned by a single unit run and discarded after emission; never shared
/// across units. Insertion order is the declaration order from the source;
/// the resolution pass additionally records the dependency order (base
/// before derived, embedded value types before their embedder) that
/// emission follows.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: Vec<ClassModel>,
    by_name: FxHashMap<String, usize>,
    emission_order: Vec<usize>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under its name. Returns `false` when the name is
    /// already taken; the caller decides how to report that.
    pub fn register(&mut self, model: ClassModel) -> bool {
        if self.by_name.contains_key(&model.name) {
            return false;
        }
        let index = self.models.len();
        self.by_name.insert(model.name.clone(), index);
        self.models.push(model);
        true
    }

    /// Whether a class of this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Look up a model by name.
    pub fn get(&self, name: &str) -> Option<&ClassModel> {
        self.by_name.get(name).map(|&i| &self.models[i])
    }

    /// Look up a model by name, mutably. Only the pipeline run that owns
    /// the registry does this; placed models are read-only to consumers.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ClassModel> {
        self.by_name.get(name).map(|&i| &mut self.models[i])
    }

    /// Number of registered classes, skipped ones included.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// All registered class names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name.as_str())
    }

    /// All models in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassModel> {
        self.models.iter()
    }

    /// Record that a class finished resolution; emission follows this order.
    pub fn push_emission(&mut self, name: &str) {
        if let Some(&index) = self.by_name.get(name) {
            self.emission_order.push(index);
        }
    }

    /// Resolved models in dependency order.
    pub fn emission_order(&self) -> impl Iterator<Item = &ClassModel> {
        self.emission_order.iter().map(|&i| &self.models[i])
    }

    /// Names of resolved models in dependency order. Borrow-friendly for
    /// callers that also need mutable access while iterating.
    pub fn emission_names(&self) -> Vec<String> {
        self.emission_order
            .iter()
            .map(|&i| self.models[i].name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_duplicates() {
        let mut registry = ModelRegistry::new();
        assert!(registry.register(ClassModel::placeholder("LED")));
        assert!(!registry.register(ClassModel::placeholder("LED")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn emission_order_is_explicit() {
        let mut registry = ModelRegistry::new();
        registry.register(ClassModel::placeholder("Sensor"));
        registry.register(ClassModel::placeholder("Device"));

        // Dependency order differs from declaration order.
        registry.push_emission("Device");
        registry.push_emission("Sensor");

        let names: Vec<_> = registry.emission_order().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Device", "Sensor"]);

        let declared: Vec<_> = registry.names().collect();
        assert_eq!(declared, vec!["Sensor", "Device"]);
    }
}
