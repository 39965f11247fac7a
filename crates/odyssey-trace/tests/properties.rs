//! Property tests over the whole generator catalog.

use odyssey_trace::{
    random_seed, Category, GraphSeed, Highlight, Registry, Seed, SeedConfig, View, ViewKind,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn expected_view(category: Category) -> ViewKind {
    match category {
        Category::Trees => ViewKind::Tree,
        Category::Graphs => ViewKind::Graph,
        Category::LinkedLists | Category::Stacks | Category::Queues => ViewKind::List,
        Category::Hashing => ViewKind::Buckets,
        _ => ViewKind::Array,
    }
}

fn small_sequence() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-50i64..100, 0..=16)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_generator_is_deterministic(values in small_sequence()) {
        let registry = Registry::standard();
        let seed = Seed::from(values);
        for id in registry.ids() {
            let first = registry.generate(id, &seed).unwrap();
            let second = registry.generate(id, &seed).unwrap();
            prop_assert_eq!(first, second, "{} differs between runs", id);
        }
    }

    #[test]
    fn every_trace_is_non_empty(values in small_sequence()) {
        let registry = Registry::standard();
        let seed = Seed::from(values);
        for id in registry.ids() {
            let trace = registry.generate(id, &seed).unwrap();
            prop_assert!(!trace.is_empty(), "{} produced no steps", id);
            prop_assert_eq!(trace.algorithm(), id);
        }
    }

    #[test]
    fn every_generator_handles_full_i64_range(
        values in prop::collection::vec(any::<i64>(), 0..=16),
    ) {
        let registry = Registry::standard();
        let seed = Seed::from(values);
        for id in registry.ids() {
            let trace = registry.generate(id, &seed);
            prop_assert!(trace.is_ok(), "{} rejected {:?}", id, seed);
        }
    }

    #[test]
    fn sorts_end_sorted(values in prop::collection::vec(-1000i64..1000, 0..=32)) {
        let registry = Registry::standard();
        let mut expected = values.clone();
        expected.sort();
        for entry in registry.in_category(Category::Sorting) {
            let trace = entry.generate(&Seed::from(values.clone())).unwrap();
            let last = trace.last();
            prop_assert_eq!(&last.view, &View::array(&expected), "{}", entry.id);
            let full: Vec<usize> = (0..values.len()).collect();
            prop_assert_eq!(last.highlighted(Highlight::Sorted), full.as_slice());
        }
    }

    #[test]
    fn views_match_category(values in small_sequence()) {
        let registry = Registry::standard();
        let seed = Seed::from(values);
        for entry in registry.entries() {
            let kind = expected_view(entry.category);
            let trace = entry.generate(&seed).unwrap();
            for step in trace.iter() {
                prop_assert_eq!(step.view.kind(), kind, "{}: {}", entry.id, step.message);
            }
        }
    }

    #[test]
    fn searches_find_present_targets(
        mut values in prop::collection::vec(0i64..500, 1..=24),
        pick in any::<prop::sample::Index>(),
    ) {
        values.sort();
        values.dedup();
        let target = values[pick.index(values.len())];
        let registry = Registry::standard();
        for id in ["linear-search", "binary-search", "jump-search", "interpolation-search"] {
            let trace = registry.generate(id, &Seed::with_target(values.clone(), target)).unwrap();
            let found = trace.last().highlighted(Highlight::Found);
            prop_assert_eq!(found.len(), 1, "{} missed {}", id, target);
            prop_assert_eq!(values[found[0]], target);
        }
    }

    #[test]
    fn generated_seeds_are_accepted(seed in any::<u64>(), size in 0usize..20) {
        let registry = Registry::standard();
        let config = SeedConfig::default().with_seed(seed).with_size(size);
        let mut rng = StdRng::seed_from_u64(seed);
        for category in Category::ALL {
            let input = random_seed(category, &config, &mut rng);
            for entry in registry.in_category(category) {
                prop_assert!(entry.generate(&input).is_ok(), "{} rejected {:?}", entry.id, input);
            }
        }
    }
}

#[test]
fn bubble_scenario() {
    let trace = Registry::standard()
        .generate("bubble", &Seed::from(vec![5, 3, 8, 1]))
        .unwrap();
    let first = trace.first();
    assert_eq!(first.highlighted(Highlight::Comparing), &[0, 1]);
    assert!(first.message.contains("Comparing 5 and 3"));
    assert_eq!(trace.last().view, View::array(&[1, 3, 5, 8]));
    assert_eq!(trace.last().highlighted(Highlight::Sorted), &[0, 1, 2, 3]);
}

#[test]
fn linear_search_singleton_scenario() {
    let trace = Registry::standard()
        .generate("linear-search", &Seed::with_target(vec![10], 10))
        .unwrap();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace.steps()[0].highlighted(Highlight::Comparing), &[0]);
    assert_eq!(trace.steps()[1].highlighted(Highlight::Found), &[0]);
}

#[test]
fn extreme_values_scenario() {
    let registry = Registry::standard();
    let seeds = [
        vec![i64::MAX, 1, 2],
        vec![i64::MIN, -1, 3],
        vec![i64::MAX, i64::MAX],
        vec![i64::MIN, i64::MAX, i64::MIN, i64::MAX],
    ];
    for values in seeds {
        let seed = Seed::from(values);
        for id in registry.ids() {
            let trace = registry.generate(id, &seed).unwrap();
            assert!(!trace.is_empty(), "{id} produced no steps for {seed:?}");
        }
    }
}

#[test]
fn graph_generators_accept_graph_seeds() {
    let registry = Registry::standard();
    let seed = Seed::from(GraphSeed::default());
    for entry in registry.in_category(Category::Graphs) {
        let trace = entry.generate(&seed).unwrap();
        assert!(trace.len() > 1, "{} only produced {} steps", entry.id, trace.len());
    }
}

#[test]
fn unsupported_ids_get_a_single_step() {
    let trace = Registry::standard()
        .generate_or_unsupported("red-black-tree", &Seed::from(vec![1, 2]))
        .unwrap();
    assert_eq!(trace.len(), 1);
    assert_eq!(trace.first().message, odyssey_trace::UNSUPPORTED_MESSAGE);
}
