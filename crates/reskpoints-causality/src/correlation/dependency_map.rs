//! Static component dependency map supplied by the caller.

use std::collections::{BTreeMap, BTreeSet};

/// `component → components it depends on`. Adjacency is symmetric.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
    depends_on: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[dependencies]` config table.
    pub fn from_config(table: &BTreeMap<String, Vec<String>>) -> Self {
        let mut map = Self::new();
        for (dependent, dependencies) in table {
            for dependency in dependencies {
                map.add_dependency(dependent, dependency);
            }
        }
        map
    }

    /// Record that `dependent` depends on `dependency`. Self-dependencies are ignored.
    pub fn add_dependency(&mut self, dependent: &str, dependency: &str) {
        if dependent == dependency {
            return;
        }
        self.depends_on
            .entry(dependent.to_string())
            .or_default()
            .insert(dependency.to_string());
    }

    /// Builder form of [`add_dependency`](Self::add_dependency).
    pub fn with_dependency(mut self, dependent: &str, dependency: &str) -> Self {
        self.add_dependency(dependent, dependency);
        self
    }

    pub fn depends_on(&self, dependent: &str, dependency: &str) -> bool {
        self.depends_on
            .get(dependent)
            .is_some_and(|deps| deps.contains(dependency))
    }

    /// Either component depends on the other.
    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        self.depends_on(a, b) || self.depends_on(b, a)
    }

    pub fn dependencies_of(&self, component: &str) -> impl Iterator<Item = &str> {
        self.depends_on
            .get(component)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.depends_on.is_empty()
    }
}
