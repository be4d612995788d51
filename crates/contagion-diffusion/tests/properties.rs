//! Property tests for the cascade and epidemic engines

use std::collections::BTreeSet;

use contagion_core::{CascadeState, EpidemicState, NodeId};
use contagion_diffusion::{
    CascadeConfig, CascadeEngine, EpidemicConfig, EpidemicEngine, RecordingSink, ShelterSpec,
};
use contagion_graph::Graph;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Random undirected graph on `0..n` with possibly isolated nodes
fn graph_strategy() -> impl Strategy<Value = Graph> {
    (1usize..24).prop_flat_map(|n| {
        prop::collection::vec((0..n as u64, 0..n as u64), 0..n * 2).prop_map(move |edges| {
            let mut graph = Graph::new(false);
            for i in 0..n as u64 {
                graph.add_node(NodeId::from(i));
            }
            for (a, b) in edges {
                graph.add_edge(NodeId::from(a), NodeId::from(b));
            }
            graph
        })
    })
}

fn initiators(graph: &Graph, picks: &[usize]) -> Vec<NodeId> {
    picks
        .iter()
        .map(|&p| graph.nodes()[p % graph.node_count()].clone())
        .collect()
}

proptest! {
    #[test]
    fn cascade_is_monotone_and_terminates(
        graph in graph_strategy(),
        picks in prop::collection::vec(any::<usize>(), 0..4),
        threshold in 0.0f64..=1.0,
    ) {
        let engine = CascadeEngine::new(&graph, CascadeConfig::new(threshold)).unwrap();
        let mut sink = RecordingSink::new();
        let outcome = engine.run(&initiators(&graph, &picks), &mut sink).unwrap();

        // at most one productive round per node
        prop_assert!(outcome.round_count() <= graph.node_count());

        for pair in sink.frames.windows(2) {
            for (before, after) in pair[0].states.iter().zip(&pair[1].states) {
                let deactivated =
                    *before == CascadeState::Active && *after == CascadeState::Inactive;
                prop_assert!(!deactivated);
            }
            prop_assert!(
                pair[1].count(CascadeState::Active) >= pair[0].count(CascadeState::Active)
            );
        }

        // every node activates at most once
        let mut seen = BTreeSet::new();
        for node in outcome.rounds.iter().flatten() {
            prop_assert!(seen.insert(node.clone()));
        }
    }

    #[test]
    fn cascade_threshold_zero_reaches_whole_component(
        graph in graph_strategy(),
        pick in any::<usize>(),
    ) {
        let seeds = initiators(&graph, &[pick]);
        let engine = CascadeEngine::new(&graph, CascadeConfig::new(0.0)).unwrap();
        let outcome = engine.run(&seeds, &mut contagion_diffusion::NullSink).unwrap();

        // breadth-first reachability from the initiator
        let adj = graph.undirected();
        let start = adj.index_of(seeds[0].as_str()).unwrap();
        let mut reached = BTreeSet::from([start]);
        let mut frontier = vec![start];
        while let Some(node) = frontier.pop() {
            for &n in adj.neighbors(node) {
                if reached.insert(n) {
                    frontier.push(n);
                }
            }
        }

        for &i in &reached {
            prop_assert_eq!(outcome.state_of(adj.label(i).as_str()), Some(CascadeState::Active));
        }
    }

    #[test]
    fn epidemic_without_probability_stays_silent(
        graph in graph_strategy(),
        picks in prop::collection::vec(any::<usize>(), 1..4),
        days in 0u32..20,
        seed in any::<u64>(),
    ) {
        let config = EpidemicConfig::default().with_days(days).with_vaccination(0.5);
        let engine = EpidemicEngine::new(&graph, config).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = engine
            .run(&initiators(&graph, &picks), &mut rng, &mut contagion_diffusion::NullSink)
            .unwrap();

        prop_assert_eq!(outcome.new_infections_per_day(), vec![0; days as usize]);
    }

    #[test]
    fn epidemic_never_infects_sheltered_nodes(
        graph in graph_strategy(),
        picks in prop::collection::vec(any::<usize>(), 1..4),
        shelter in 0.0f64..=1.0,
        p in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let config = EpidemicConfig::default()
            .with_infection_probability(p)
            .with_shelter(ShelterSpec::Proportion(shelter))
            .with_days(12);
        let engine = EpidemicEngine::new(&graph, config).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sink = RecordingSink::new();
        let outcome = engine.run(&initiators(&graph, &picks), &mut rng, &mut sink).unwrap();

        for node in &outcome.sheltered {
            prop_assert!(!outcome.was_infected(node.as_str()));
            for frame in &sink.frames {
                prop_assert_eq!(frame.state_of(node.as_str()), Some(EpidemicState::Sheltered));
            }
        }
    }
}
