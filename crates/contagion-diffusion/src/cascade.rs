//! Cascade - Deterministic threshold diffusion
//!
//! A node activates once the fraction of its active neighbours reaches the
//! threshold. Rounds are synchronous: every decision in a round reads the
//! states as they were when the round began, and all activations of the
//! round are applied together. The run ends with the first round that
//! activates nobody.
//!
//! Edge semantics are undirected. An isolated node has no neighbour ratio
//! and never activates through diffusion, whatever the threshold.

use std::collections::HashMap;

use contagion_core::{CascadeState, ContagionResult, NodeId, NodeStateStore};
use contagion_graph::{Adjacency, Graph};
use tracing::{debug, info};

use crate::shelter::resolve_known;
use crate::{CascadeConfig, Snapshot, SnapshotSink};

/// Result of a cascade run
#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    /// Nodes activated in each productive round, in node order
    pub rounds: Vec<Vec<NodeId>>,
    /// Initiators that were found in the graph
    pub initiators: Vec<NodeId>,
    /// Initiators that were not found in the graph
    pub skipped: Vec<NodeId>,
    /// State of every node when the cascade stopped
    pub final_states: HashMap<NodeId, CascadeState>,
}

impl CascadeOutcome {
    /// Rounds that activated at least one node
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Rounds executed, counting the final round that found nothing
    pub fn rounds_executed(&self) -> usize {
        self.rounds.len() + 1
    }

    /// Nodes activated by diffusion (initiators excluded)
    pub fn total_activated(&self) -> usize {
        self.rounds.iter().map(Vec::len).sum()
    }

    /// Cumulative diffusion activations after each productive round
    pub fn cumulative_activations(&self) -> Vec<usize> {
        self.rounds
            .iter()
            .scan(0, |total, round| {
                *total += round.len();
                Some(*total)
            })
            .collect()
    }

    /// Active nodes at the end, initiators included
    pub fn active_count(&self) -> usize {
        self.final_states
            .values()
            .filter(|&&s| s == CascadeState::Active)
            .count()
    }

    pub fn state_of(&self, node: &str) -> Option<CascadeState> {
        self.final_states.get(node).copied()
    }
}

/// Threshold cascade engine over the undirected view of a graph
#[derive(Debug)]
pub struct CascadeEngine<'g> {
    graph: Adjacency<'g>,
    config: CascadeConfig,
}

impl<'g> CascadeEngine<'g> {
    /// Create an engine; fails if the threshold is outside [0, 1]
    pub fn new(graph: &'g Graph, config: CascadeConfig) -> ContagionResult<Self> {
        config.validate()?;
        Ok(Self {
            graph: graph.undirected(),
            config,
        })
    }

    /// Run to fixpoint from `initiators`.
    ///
    /// Unknown initiators are logged and skipped. `sink` receives the initial
    /// state and the state after every executed round.
    pub fn run<K>(&self, initiators: &[NodeId], sink: &mut K) -> ContagionResult<CascadeOutcome>
    where
        K: SnapshotSink<CascadeState> + ?Sized,
    {
        let threshold = self.config.threshold;
        let mut states = NodeStateStore::new(self.graph.node_count(), CascadeState::Inactive);

        let (seeds, skipped) = resolve_known(&self.graph, initiators, "Initiator");
        for &i in &seeds {
            states.set(i, CascadeState::Active);
        }

        self.emit(sink, "Initial Graph", &states)?;

        let mut rounds = Vec::new();
        let mut round = 0usize;
        loop {
            round += 1;
            let start = states.snapshot();
            let mut activated = Vec::new();

            for node in self.graph.indices() {
                if start[node] != CascadeState::Inactive {
                    continue;
                }
                let label = self.graph.label(node);
                let degree = self.graph.degree(node);
                if degree == 0 {
                    debug!("For node {}, no neighbours, so {} remains inactive", label, label);
                    continue;
                }

                let active = self
                    .graph
                    .neighbors(node)
                    .iter()
                    .filter(|&&n| start[n] == CascadeState::Active)
                    .count();
                let p = active as f64 / degree as f64;

                if p >= threshold {
                    debug!(
                        "For node {}, p:{:.3} >= threshold:{}, so {} becomes active",
                        label, p, threshold, label
                    );
                    activated.push(node);
                } else {
                    debug!(
                        "For node {}, p:{:.3} < threshold:{}, so {} remains inactive",
                        label, p, threshold, label
                    );
                }
            }

            for &node in &activated {
                states.set(node, CascadeState::Active);
            }

            let labels: Vec<NodeId> = activated
                .iter()
                .map(|&i| self.graph.label(i).clone())
                .collect();
            info!("Round {} finished. Newly activated nodes: {:?}", round, labels);

            self.emit(sink, &format!("Round {}", round), &states)?;

            if labels.is_empty() {
                break;
            }
            rounds.push(labels);
        }

        info!(
            "Cascade simulation completed in {} rounds since no new nodes were activated",
            round
        );

        Ok(CascadeOutcome {
            rounds,
            initiators: seeds.iter().map(|&i| self.graph.label(i).clone()).collect(),
            skipped,
            final_states: self.label_states(&states),
        })
    }

    fn emit<K>(
        &self,
        sink: &mut K,
        title: &str,
        states: &NodeStateStore<CascadeState>,
    ) -> ContagionResult<()>
    where
        K: SnapshotSink<CascadeState> + ?Sized,
    {
        sink.on_snapshot(&Snapshot {
            title,
            graph: &self.graph,
            states: states.as_slice(),
            vaccinated: None,
        })
    }

    fn label_states(&self, states: &NodeStateStore<CascadeState>) -> HashMap<NodeId, CascadeState> {
        self.graph
            .labels()
            .iter()
            .cloned()
            .zip(states.as_slice().iter().copied())
            .collect()
    }
}
