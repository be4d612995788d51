//! Shelter and vaccination set selection
//!
//! Both sets are chosen once, before day 1, and never change during a run.

use std::collections::BTreeSet;

use contagion_core::{ensure_unit_interval, ContagionError, ContagionResult, NodeId};
use contagion_graph::Adjacency;
use rand::seq::index;
use rand::Rng;
use tracing::warn;

use crate::config::parse_node_token;

const SHELTER_USAGE: &str =
    "must be a number between 0 and 1 OR a list of nodes with brackets (ex. --shelter [1,2,5])";

/// Which nodes are sheltered
#[derive(Debug, Clone, PartialEq)]
pub enum ShelterSpec {
    /// Sample this proportion of all nodes uniformly at random
    Proportion(f64),
    /// Exactly these nodes
    Nodes(Vec<NodeId>),
}

impl ShelterSpec {
    /// Parse `[1,2,5]` (explicit list) or `0.25` (proportion)
    pub fn parse(spec: &str) -> ContagionResult<Self> {
        let spec = spec.trim();

        if let Some(inner) = spec.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            if inner.trim().is_empty() {
                return Ok(ShelterSpec::Nodes(Vec::new()));
            }
            let nodes = inner
                .split(',')
                .map(|token| parse_node_token("shelter", token))
                .collect::<ContagionResult<Vec<_>>>()?;
            return Ok(ShelterSpec::Nodes(nodes));
        }

        if spec.contains(',') {
            return Err(ContagionError::invalid("shelter", SHELTER_USAGE));
        }
        let proportion = spec
            .parse::<f64>()
            .map_err(|_| ContagionError::invalid("shelter", SHELTER_USAGE))?;
        ensure_unit_interval("shelter", proportion)?;
        Ok(ShelterSpec::Proportion(proportion))
    }

    /// Resolve to node indices.
    ///
    /// Explicit identifiers missing from the graph are reported and skipped;
    /// they come back in the second element.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        graph: &Adjacency<'_>,
        rng: &mut R,
    ) -> (BTreeSet<usize>, Vec<NodeId>) {
        match self {
            ShelterSpec::Proportion(p) => {
                (sample_proportion(graph.node_count(), *p, rng), Vec::new())
            }
            ShelterSpec::Nodes(nodes) => resolve_known(graph, nodes, "Sheltered"),
        }
    }
}

/// Pick `round(proportion * n)` of `n` node indices uniformly without replacement
pub fn sample_proportion<R: Rng + ?Sized>(
    n: usize,
    proportion: f64,
    rng: &mut R,
) -> BTreeSet<usize> {
    let amount = ((proportion * n as f64).round() as usize).min(n);
    if amount == 0 {
        return BTreeSet::new();
    }
    index::sample(rng, n, amount).into_iter().collect()
}

/// Map labels to indices, warning about and returning the unknown ones
pub(crate) fn resolve_known(
    graph: &Adjacency<'_>,
    nodes: &[NodeId],
    role: &str,
) -> (BTreeSet<usize>, Vec<NodeId>) {
    let mut known = BTreeSet::new();
    let mut skipped = Vec::new();

    for node in nodes {
        match graph.index_of(node.as_str()) {
            Some(i) => {
                known.insert(i);
            }
            None => {
                let err = ContagionError::UnknownNode(node.clone());
                warn!("{} node skipped: {}", role, err);
                skipped.push(node.clone());
            }
        }
    }

    (known, skipped)
}
