//! Power-law cluster graph generation (Holme–Kim).
//!
//! Growth with preferential attachment plus a triad-formation step:
//! start from `m` isolated core nodes; every new node attaches `m` edges,
//! the first to a degree-weighted random target and each further one either
//! closing a triangle through the last target (probability `p`) or going to
//! the next preferential target.

use crate::components::{AgentId, NetworkGraph, NeighborQuery};
use crate::error::ConfigurationError;
use crate::rng::RandomSource;

/// Generates a power-law cluster graph with nodes `0..n`.
///
/// Every new node adds at most `m` edges; fewer only when a preferential
/// target was already reached through a triangle.
pub fn powerlaw_cluster_graph(
    n: usize,
    m: usize,
    p: f64,
    rng: &mut RandomSource,
) -> Result<NetworkGraph, ConfigurationError> {
    if m == 0 {
        return Err(ConfigurationError::ZeroAttachment);
    }
    if m > n {
        return Err(ConfigurationError::AttachmentExceedsPopulation {
            side: "subgraph",
            attachment: m,
            size: n,
        });
    }
    ConfigurationError::check_range("cluster_prob", p, 0.0, 1.0)?;

    let mut graph = NetworkGraph::with_nodes(n);
    // Each node appears once per incident edge, so uniform choice from this
    // list is degree-proportional.
    let mut repeated: Vec<AgentId> = (0..m).map(AgentId).collect();

    for index in m..n {
        let source = AgentId(index);
        let mut targets = random_subset(&repeated, m, rng);
        let Some(mut target) = targets.pop() else {
            break;
        };
        link(&mut graph, source, target);
        repeated.push(target);

        let mut count = 1;
        while count < m {
            if rng.chance(p) {
                let neighborhood: Vec<AgentId> = graph
                    .neighbors(target)
                    .unwrap_or(&[])
                    .iter()
                    .copied()
                    .filter(|&nbr| nbr != source && !graph.has_edge(source, nbr))
                    .collect();
                if let Some(&nbr) = rng.choose(&neighborhood) {
                    link(&mut graph, source, nbr);
                    repeated.push(nbr);
                    count += 1;
                    continue;
                }
            }
            let Some(next) = targets.pop() else {
                break;
            };
            target = next;
            link(&mut graph, source, target);
            repeated.push(target);
            count += 1;
        }
        repeated.extend(std::iter::repeat(source).take(m));
    }

    Ok(graph)
}

/// `m` distinct elements of `seq`, drawn uniformly with rejection.
/// `seq` must contain at least `m` distinct values.
fn random_subset(seq: &[AgentId], m: usize, rng: &mut RandomSource) -> Vec<AgentId> {
    let mut picked: Vec<AgentId> = Vec::with_capacity(m);
    while picked.len() < m {
        match rng.choose(seq) {
            Some(&candidate) if !picked.contains(&candidate) => picked.push(candidate),
            Some(_) => {}
            None => break,
        }
    }
    picked
}

// Endpoints are valid nodes and distinct by construction; a repeated edge
// is a no-op.
fn link(graph: &mut NetworkGraph, u: AgentId, v: AgentId) {
    let _ = graph.add_edge(u, v);
}
