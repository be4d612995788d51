//! Snapshots - What the engines show the outside world
//!
//! A snapshot borrows the engine's state for the duration of one sink call.
//! Sinks may render, record or ignore it.

use std::collections::BTreeSet;

use contagion_core::{ContagionResult, NodeId, NodeState};
use contagion_graph::Adjacency;

/// Immutable view of every node's state at one point of a run
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a, S> {
    /// Human-readable caption ("Initial Graph", "Round 3", ...)
    pub title: &'a str,
    /// The adjacency view the engine runs on
    pub graph: &'a Adjacency<'a>,
    /// State of node `i` is `states[i]`
    pub states: &'a [S],
    /// Vaccinated node indices, for engines that have them
    pub vaccinated: Option<&'a BTreeSet<usize>>,
}

impl<'a, S: NodeState> Snapshot<'a, S> {
    /// Node labels, in index order
    pub fn labels(&self) -> &'a [NodeId] {
        self.graph.labels()
    }

    /// State of a node by label
    pub fn state_of(&self, node: &str) -> Option<S> {
        self.graph
            .index_of(node)
            .and_then(|i| self.states.get(i).copied())
    }

    /// Number of nodes in `state`
    pub fn count(&self, state: S) -> usize {
        self.states.iter().filter(|&&s| s == state).count()
    }

    /// Is node `i` in the vaccinated overlay?
    pub fn is_vaccinated(&self, i: usize) -> bool {
        self.vaccinated.map_or(false, |v| v.contains(&i))
    }
}

/// Presentation sink - receives every snapshot an engine emits
pub trait SnapshotSink<S> {
    fn on_snapshot(&mut self, snapshot: &Snapshot<'_, S>) -> ContagionResult<()>;
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl<S> SnapshotSink<S> for NullSink {
    fn on_snapshot(&mut self, _snapshot: &Snapshot<'_, S>) -> ContagionResult<()> {
        Ok(())
    }
}

/// Owned copy of a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSnapshot<S> {
    pub title: String,
    pub labels: Vec<NodeId>,
    pub states: Vec<S>,
    pub vaccinated: Vec<usize>,
}

impl<S: NodeState> RecordedSnapshot<S> {
    /// State of a node by label
    pub fn state_of(&self, node: &str) -> Option<S> {
        self.labels
            .iter()
            .position(|l| l.as_str() == node)
            .and_then(|i| self.states.get(i).copied())
    }

    /// Number of nodes in `state`
    pub fn count(&self, state: S) -> usize {
        self.states.iter().filter(|&&s| s == state).count()
    }
}

/// Sink that keeps every snapshot it receives
#[derive(Debug, Clone)]
pub struct RecordingSink<S> {
    pub frames: Vec<RecordedSnapshot<S>>,
}

impl<S> RecordingSink<S> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.frames.iter().map(|f| f.title.as_str()).collect()
    }
}

impl<S> Default for RecordingSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NodeState> SnapshotSink<S> for RecordingSink<S> {
    fn on_snapshot(&mut self, snapshot: &Snapshot<'_, S>) -> ContagionResult<()> {
        self.frames.push(RecordedSnapshot {
            title: snapshot.title.to_string(),
            labels: snapshot.labels().to_vec(),
            states: snapshot.states.to_vec(),
            vaccinated: snapshot
                .vaccinated
                .map(|v| v.iter().copied().collect())
                .unwrap_or_default(),
        });
        Ok(())
    }
}
