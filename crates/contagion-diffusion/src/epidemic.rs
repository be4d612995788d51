//! Epidemic - Stochastic susceptible/infected/recovered spread
//!
//! Every day runs four steps in a fixed order:
//!
//! 1. Infection timers advance; nodes past the infection lifespan recover.
//! 2. Recovery timers advance; nodes past the recovery lifespan become
//!    susceptible again.
//! 3. Every infected node tries to infect each susceptible, non-sheltered
//!    successor once. Trials read the states as they were when this step
//!    began, and the new infections are committed together afterwards.
//! 4. The day's new infections are recorded.
//!
//! Sheltered nodes are held in `Sheltered` for the whole run. If one was
//! infected before sheltering (an initiator), its infection timer stays
//! frozen at its value instead of advancing in the background.

use std::collections::{BTreeSet, HashMap};

use contagion_core::{ContagionResult, EpidemicState, NodeId, NodeStateStore};
use contagion_graph::{Adjacency, Graph};
use rand::Rng;
use tracing::{debug, info};

use crate::shelter::{resolve_known, sample_proportion};
use crate::{DiseaseTimers, EpidemicConfig, Snapshot, SnapshotSink};

/// What happened on one simulated day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayReport {
    /// 1-based day number
    pub day: u32,
    /// Nodes infected today, in node order
    pub new_infections: Vec<NodeId>,
    /// Nodes that recovered today
    pub recovered: Vec<NodeId>,
    /// Nodes that became susceptible again today
    pub susceptible_again: Vec<NodeId>,
}

/// Result of an epidemic run
#[derive(Debug, Clone)]
pub struct EpidemicOutcome {
    pub days: Vec<DayReport>,
    /// Initiators that were found in the graph
    pub initiators: Vec<NodeId>,
    pub vaccinated: Vec<NodeId>,
    pub sheltered: Vec<NodeId>,
    /// Initiator and shelter identifiers that were not found in the graph
    pub skipped: Vec<NodeId>,
    /// State of every node after the last day
    pub final_states: HashMap<NodeId, EpidemicState>,
}

impl EpidemicOutcome {
    /// New infections per day
    pub fn new_infections_per_day(&self) -> Vec<usize> {
        self.days.iter().map(|d| d.new_infections.len()).collect()
    }

    /// New infections over the whole run (initiators excluded)
    pub fn total_infections(&self) -> usize {
        self.days.iter().map(|d| d.new_infections.len()).sum()
    }

    /// Earliest day with the most new infections
    pub fn peak_day(&self) -> Option<&DayReport> {
        self.days
            .iter()
            .rev()
            .max_by_key(|d| d.new_infections.len())
    }

    /// Was `node` newly infected on any day?
    pub fn was_infected(&self, node: &str) -> bool {
        self.days
            .iter()
            .any(|d| d.new_infections.iter().any(|n| n.as_str() == node))
    }

    pub fn state_of(&self, node: &str) -> Option<EpidemicState> {
        self.final_states.get(node).copied()
    }
}

/// Epidemic engine over the directed view of a graph
#[derive(Debug)]
pub struct EpidemicEngine<'g> {
    graph: Adjacency<'g>,
    config: EpidemicConfig,
}

impl<'g> EpidemicEngine<'g> {
    /// Create an engine; fails if any probability is outside [0, 1]
    pub fn new(graph: &'g Graph, config: EpidemicConfig) -> ContagionResult<Self> {
        config.validate()?;
        Ok(Self {
            graph: graph.directed(),
            config,
        })
    }

    pub fn config(&self) -> &EpidemicConfig {
        &self.config
    }

    /// Run for the configured number of days.
    ///
    /// `rng` drives vaccination sampling, shelter sampling and every
    /// infection trial, in that order. Unknown initiators and shelter
    /// entries are logged and skipped.
    pub fn run<R, K>(
        &self,
        initiators: &[NodeId],
        rng: &mut R,
        sink: &mut K,
    ) -> ContagionResult<EpidemicOutcome>
    where
        R: Rng + ?Sized,
        K: SnapshotSink<EpidemicState> + ?Sized,
    {
        let config = &self.config;
        let n = self.graph.node_count();
        let mut states = NodeStateStore::new(n, EpidemicState::Susceptible);
        let mut timers = DiseaseTimers::new();

        let (seeds, mut skipped) = resolve_known(&self.graph, initiators, "Initiator");
        for &i in &seeds {
            states.set(i, EpidemicState::Infected);
            timers.infect(i);
        }

        let vaccinated = sample_proportion(n, config.vaccination, rng);
        info!("Vaccinated Nodes: {:?}", self.labels(&vaccinated));

        let (sheltered, unknown) = config.shelter.resolve(&self.graph, rng);
        skipped.extend(unknown);
        for &i in &sheltered {
            states.set(i, EpidemicState::Sheltered);
        }
        info!("Sheltered Nodes: {:?}", self.labels(&sheltered));

        self.emit(sink, "Initial Graph", &states, &vaccinated)?;

        let mut days = Vec::new();
        for day in 1..=config.days {
            for &i in &sheltered {
                states.set(i, EpidemicState::Sheltered);
            }

            let recovered = timers.progress_infections(config.infection_lifespan, &sheltered);
            for &i in &recovered {
                states.set(i, EpidemicState::Recovered);
                info!("Node {} has recovered.", self.graph.label(i));
            }

            let released = timers.progress_recoveries(config.recovery_lifespan);
            for &i in &released {
                if !sheltered.contains(&i) {
                    states.set(i, EpidemicState::Susceptible);
                }
                info!("Node {} has become susceptible again.", self.graph.label(i));
            }

            let infected = self.spread(&states, &sheltered, &vaccinated, rng);
            for &i in &infected {
                states.set(i, EpidemicState::Infected);
                timers.infect(i);
            }

            let report = DayReport {
                day,
                new_infections: self.labels(&infected),
                recovered: self.labels(&recovered),
                susceptible_again: self.labels(&released),
            };
            info!("New infections: {:?}", report.new_infections);
            let title = format!("Day {}: {} new infections.", day, infected.len());
            info!("{}", title);

            self.emit(sink, &title, &states, &vaccinated)?;
            days.push(report);
        }

        info!("COVID simulation completed over {} days.", config.days);

        Ok(EpidemicOutcome {
            days,
            initiators: self.labels(&seeds),
            vaccinated: self.labels(&vaccinated),
            sheltered: self.labels(&sheltered),
            skipped,
            final_states: self
                .graph
                .labels()
                .iter()
                .cloned()
                .zip(states.as_slice().iter().copied())
                .collect(),
        })
    }

    /// One day of infection trials against the state at the start of the step
    fn spread<R: Rng + ?Sized>(
        &self,
        states: &NodeStateStore<EpidemicState>,
        sheltered: &BTreeSet<usize>,
        vaccinated: &BTreeSet<usize>,
        rng: &mut R,
    ) -> BTreeSet<usize> {
        let start = states.snapshot();
        let mut infected = BTreeSet::new();

        for node in self.graph.indices() {
            if start[node] != EpidemicState::Infected {
                continue;
            }
            for &neighbor in self.graph.neighbors(node) {
                if start[neighbor] != EpidemicState::Susceptible || sheltered.contains(&neighbor) {
                    continue;
                }
                let p = self.config.contact_probability(vaccinated.contains(&neighbor));
                if rng.gen::<f64>() < p {
                    debug!(
                        "Node {} infected {}",
                        self.graph.label(node),
                        self.graph.label(neighbor)
                    );
                    infected.insert(neighbor);
                }
            }
        }

        infected
    }

    fn emit<K>(
        &self,
        sink: &mut K,
        title: &str,
        states: &NodeStateStore<EpidemicState>,
        vaccinated: &BTreeSet<usize>,
    ) -> ContagionResult<()>
    where
        K: SnapshotSink<EpidemicState> + ?Sized,
    {
        sink.on_snapshot(&Snapshot {
            title,
            graph: &self.graph,
            states: states.as_slice(),
            vaccinated: Some(vaccinated),
        })
    }

    fn labels<'a>(&self, nodes: impl IntoIterator<Item = &'a usize>) -> Vec<NodeId> {
        nodes
            .into_iter()
            .map(|&i| self.graph.label(i).clone())
            .collect()
    }
}
