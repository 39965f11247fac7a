//! Traces and the recorder generators emit into.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::snapshot::{Snapshot, View};

/// Advisory shown when no generator exists for an algorithm.
pub const UNSUPPORTED_MESSAGE: &str = "Visualization coming soon for this algorithm!";

/// An ordered, finite, non-empty sequence of snapshots.
///
/// Built once by a generator and never mutated afterwards; consumers only get
/// shared references to its steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    algorithm: String,
    steps: Vec<Snapshot>,
}

impl Trace {
    /// Build a trace, rejecting an empty step list.
    pub fn from_steps(algorithm: impl Into<String>, steps: Vec<Snapshot>) -> Result<Self> {
        let algorithm = algorithm.into();
        if steps.is_empty() {
            return Err(Error::EmptyTrace(algorithm));
        }
        Ok(Self { algorithm, steps })
    }

    /// The single-step informational trace used when an algorithm has no generator.
    pub fn unsupported(algorithm: impl Into<String>, view: View) -> Self {
        Self {
            algorithm: algorithm.into(),
            steps: vec![Snapshot::new(view, UNSUPPORTED_MESSAGE).at_line(0)],
        }
    }

    /// Id of the algorithm that produced this trace.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Number of steps; always at least 1.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a constructed trace.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the final step.
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Step at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.steps.get(index)
    }

    /// The opening step. Traces are never empty.
    pub fn first(&self) -> &Snapshot {
        &self.steps[0]
    }

    /// The final step.
    pub fn last(&self) -> &Snapshot {
        &self.steps[self.last_index()]
    }

    /// All steps in order.
    pub fn steps(&self) -> &[Snapshot] {
        &self.steps
    }

    /// Iterate over the steps in order.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.steps.iter()
    }
}

/// Snapshot sink handed to generators and their recursive helpers.
///
/// Steps are kept in emission order; there is no reordering or batching.
#[derive(Debug)]
pub struct Recorder {
    algorithm: &'static str,
    steps: Vec<Snapshot>,
}

impl Recorder {
    /// Start an empty recording for `algorithm`.
    pub fn new(algorithm: &'static str) -> Self {
        Self {
            algorithm,
            steps: Vec::new(),
        }
    }

    /// Id of the algorithm being recorded.
    pub fn algorithm(&self) -> &'static str {
        self.algorithm
    }

    /// Append one snapshot.
    pub fn emit(&mut self, snapshot: Snapshot) {
        self.steps.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Seal the recording into a trace.
    pub fn finish(self) -> Result<Trace> {
        Trace::from_steps(self.algorithm, self.steps)
    }
}
