//! Node states and the store both engines operate on
//!
//! Each state enum carries a stable `#[repr(u8)]` integer code. The store
//! itself is index based: the graph view enumerates nodes once and engines
//! address them by position.

use std::fmt::Debug;

/// A per-node state; `state as u8` yields its integer code
pub trait NodeState: Copy + Eq + Debug {}

/// Cascade node state - monotone, `Active` is absorbing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CascadeState {
    #[default]
    Inactive = 0,
    Active = 1,
}

impl NodeState for CascadeState {}

/// Epidemic node state
///
/// Susceptible -> Infected -> Recovered -> Susceptible is a cycle.
/// `Sheltered` is imposed from outside and overrides the natural progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum EpidemicState {
    #[default]
    Susceptible = 0,
    Infected = 1,
    Recovered = 2,
    Sheltered = 3,
}

impl NodeState for EpidemicState {}

/// Node state store - exactly one state per node index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStateStore<S> {
    states: Vec<S>,
}

impl<S: NodeState> NodeStateStore<S> {
    /// Create a store with every node in `initial`
    pub fn new(node_count: usize, initial: S) -> Self {
        Self {
            states: vec![initial; node_count],
        }
    }

    /// Number of nodes tracked
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Set the state of a node, returning the previous one
    pub fn set(&mut self, index: usize, state: S) -> Option<S> {
        self.states
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, state))
    }

    /// All states, in node index order
    pub fn as_slice(&self) -> &[S] {
        &self.states
    }

    /// Immutable copy taken at the start of a round or day
    pub fn snapshot(&self) -> Vec<S> {
        self.states.clone()
    }
}
