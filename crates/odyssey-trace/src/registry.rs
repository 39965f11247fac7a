//! Generator registry: the read-only map from algorithm id to generator.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::catalog::{AlgorithmDescriptor, Catalog, Category, Complexity};
use crate::error::{Error, Result};
use crate::generators;
use crate::seed::Seed;
use crate::snapshot::View;
use crate::trace::Trace;

/// A generator: a pure function from a seed to a trace.
pub type GenerateFn = fn(&Seed) -> Result<Trace>;

/// One registered algorithm.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub time: &'static str,
    pub space: &'static str,
    generate: GenerateFn,
}

impl Entry {
    /// Describe one generator; `(time, space)` are big-O strings.
    pub fn new(
        id: &'static str,
        name: &'static str,
        category: Category,
        (time, space): (&'static str, &'static str),
        generate: GenerateFn,
    ) -> Self {
        Self {
            id,
            name,
            category,
            time,
            space,
            generate,
        }
    }

    /// Run the generator.
    pub fn generate(&self, seed: &Seed) -> Result<Trace> {
        (self.generate)(seed)
    }

    /// Content API descriptor built from this entry's own metadata.
    pub fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor {
            id: self.id.to_string(),
            name: self.name.to_string(),
            category: self.category.to_string(),
            complexity: Complexity::new(self.time, self.space),
            description: String::new(),
            code: BTreeMap::new(),
        }
    }
}

/// Registry of generators, keyed by algorithm id.
///
/// Built once and then only read; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<&'static str, Entry>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in generator.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        generators::register_all(&mut registry);
        debug!(generators = registry.len(), "built generator registry");
        registry
    }

    /// Add an entry; a later entry with the same id replaces the earlier one.
    pub fn insert(&mut self, entry: Entry) {
        if self.entries.insert(entry.id, entry).is_some() {
            warn!(id = entry.id, "replaced existing generator");
        }
    }

    /// Look up the entry for `id`.
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    /// Whether a generator is registered for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of registered generators.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no generator is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Every entry, ordered by id.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Entries of one category, ordered by id.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Entry> {
        self.entries.values().filter(move |e| e.category == category)
    }

    /// Catalog describing every registered generator.
    pub fn catalog(&self) -> Catalog {
        let mut descriptors: Vec<AlgorithmDescriptor> =
            self.entries.values().map(Entry::descriptor).collect();
        descriptors.sort_by_key(|d| {
            (
                d.category.parse::<Category>().ok(),
                d.id.clone(),
            )
        });
        Catalog::new(descriptors)
    }

    /// Generate the trace for `id`.
    pub fn generate(&self, id: &str, seed: &Seed) -> Result<Trace> {
        let entry = self
            .get(id)
            .ok_or_else(|| Error::UnknownAlgorithm(id.to_string()))?;
        debug!(algorithm = id, seed = seed.shape(), "generating trace");
        let trace = entry.generate(seed)?;
        debug!(algorithm = id, steps = trace.len(), "generated trace");
        Ok(trace)
    }

    /// Generate the trace for `id`, falling back to the one-step unsupported
    /// trace when no generator is registered.
    ///
    /// Seed errors for a registered generator still propagate.
    pub fn generate_or_unsupported(&self, id: &str, seed: &Seed) -> Result<Trace> {
        if self.contains(id) {
            return self.generate(id, seed);
        }
        debug!(algorithm = id, "no generator, using unsupported trace");
        Ok(Trace::unsupported(id, View::array(&seed.preview())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::UNSUPPORTED_MESSAGE;

    #[test]
    fn standard_registry_covers_every_category() {
        let registry = Registry::standard();
        assert_eq!(registry.len(), 64);
        for category in Category::ALL {
            assert!(
                registry.in_category(category).count() > 0,
                "no generators for {category}"
            );
        }
    }

    #[test]
    fn unknown_id_is_an_error() {
        let registry = Registry::standard();
        let err = registry.generate("bogo", &Seed::from(vec![1])).unwrap_err();
        assert!(matches!(err, Error::UnknownAlgorithm(id) if id == "bogo"));
    }

    #[test]
    fn unknown_id_falls_back_to_unsupported_trace() {
        let registry = Registry::standard();
        let trace = registry
            .generate_or_unsupported("bogo", &Seed::from(vec![3, 1]))
            .unwrap();
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.first().message, UNSUPPORTED_MESSAGE);
        assert!(trace.first().highlights.is_empty());
        assert_eq!(trace.first().view, View::array(&[3, 1]));
    }

    #[test]
    fn fallback_does_not_hide_seed_errors() {
        let registry = Registry::standard();
        let graph = Seed::Graph(crate::seed::GraphSeed::default());
        assert!(registry.generate_or_unsupported("bubble", &graph).is_err());
    }

    #[test]
    fn catalog_lists_registered_generators() {
        let registry = Registry::standard();
        let catalog = registry.catalog();
        assert_eq!(catalog.len(), registry.len());
        let bubble = catalog.get("bubble").unwrap();
        assert_eq!(bubble.category, "sorting");
        assert_eq!(catalog.categories().first(), Some(&"sorting"));
    }

    #[test]
    fn later_insert_replaces_earlier() {
        fn one(_: &Seed) -> Result<Trace> {
            Ok(Trace::unsupported("x", View::array(&[1])))
        }
        fn two(_: &Seed) -> Result<Trace> {
            Ok(Trace::unsupported("x", View::array(&[2])))
        }
        let mut registry = Registry::new();
        registry.insert(Entry::new("x", "X", Category::Arrays, ("O(1)", "O(1)"), one));
        registry.insert(Entry::new("x", "X", Category::Arrays, ("O(1)", "O(1)"), two));
        assert_eq!(registry.len(), 1);
        let trace = registry.generate("x", &Seed::from(vec![])).unwrap();
        assert_eq!(trace.first().view, View::array(&[2]));
    }
}
