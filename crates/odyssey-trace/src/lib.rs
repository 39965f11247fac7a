//! Odyssey Trace Generation
//!
//! Turns an algorithm and an input into a finite, replayable sequence of
//! snapshots. Playback never re-runs an algorithm; it only moves a cursor over
//! a trace produced here.
//!
//! # Design
//!
//! A generator is a pure function `fn(&Seed) -> Result<Trace>`. It works on a
//! private copy of the seed and emits one [`Snapshot`] per meaningful
//! transition into a [`Recorder`]. The same seed always yields the same trace.
//!
//! Each snapshot carries exactly one [`View`] (array, tree, graph, list or
//! buckets), named [`Highlights`], free-form annotations and a message. A
//! generator commits to one view variant for every step it emits.
//!
//! # Registry
//!
//! [`Registry::standard`] maps every built-in algorithm id to its generator.
//! Ids with no generator get a one-step trace carrying [`UNSUPPORTED_MESSAGE`]
//! from [`Registry::generate_or_unsupported`].
//!
//! ```
//! use odyssey_trace::{Highlight, Registry, Seed};
//!
//! let registry = Registry::standard();
//! let trace = registry.generate("bubble", &Seed::from(vec![5, 3, 8, 1])).unwrap();
//! assert_eq!(trace.last().message, "Array is sorted!");
//! assert_eq!(trace.last().highlighted(Highlight::Sorted), &[0, 1, 2, 3]);
//! ```

mod catalog;
mod error;
mod generators;
mod registry;
mod seed;
mod snapshot;
mod trace;

pub use catalog::{AlgorithmDescriptor, Catalog, Category, Complexity, VisualizationType};
pub use error::{Error, Result};
pub use registry::{Entry, GenerateFn, Registry};
pub use seed::{
    derive_index, random_graph, random_seed, random_sequence, GraphSeed, Seed, SeedConfig,
    MAX_GRAPH_NODES, MAX_SEQUENCE_LEN, MAX_TREE_NODES,
};
pub use snapshot::{Cell, Highlight, Highlights, ListKind, Markers, Scalar, Snapshot, View, ViewKind};
pub use trace::{Recorder, Trace, UNSUPPORTED_MESSAGE};
