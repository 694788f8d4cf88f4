use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::min;

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::algo::max_flow::MaxFlowError;
use crate::algo::MaxFlow;
use crate::capacity::Capacity;
use crate::network::FlowNetwork;

/// A source-to-sink sequence of edges, each with positive residual capacity at the time it was
/// found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AugmentingPath(Vec<EdgeIndex>);

impl AugmentingPath {
    pub fn edges(&self) -> &[EdgeIndex] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Finds a shortest (fewest edges) augmenting path from `source` to `sink` with a breadth-first
/// search over residual capacities, or `None` if the sink is unreachable.
///
/// The visited markers and predecessor edges are local to each call.
pub fn augmenting_path<C: Capacity>(
    network: &FlowNetwork<C>,
    source: NodeIndex,
    sink: NodeIndex,
) -> Option<AugmentingPath> {
    let n = network.vertex_count();
    if source == sink || source.index() >= n || sink.index() >= n {
        return None;
    }

    let mut visited = vec![false; n];
    let mut predecessor: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; n];
    let mut queue = VecDeque::from([source]);
    visited[source.index()] = true;

    'search: while let Some(u) = queue.pop_front() {
        for e in network.outgoing(u) {
            let v = e.target();
            if visited[v.index()] || e.weight().residual() <= C::zero() {
                continue;
            }

            visited[v.index()] = true;
            predecessor[v.index()] = Some((u, e.id()));
            if v == sink {
                break 'search;
            }
            queue.push_back(v);
        }
    }

    if !visited[sink.index()] {
        return None;
    }

    // walk back from the sink; the source is the only visited vertex without a predecessor
    let mut edges = Vec::new();
    let mut v = sink;
    while let Some((u, e)) = predecessor[v.index()] {
        edges.push(e);
        v = u;
    }
    edges.reverse();

    Some(AugmentingPath(edges))
}

/// Pushes the bottleneck residual capacity of `path` along every edge of it (and takes it off
/// every paired reverse edge). Returns the bottleneck.
pub fn augment<C: Capacity>(
    network: &mut FlowNetwork<C>,
    path: &AugmentingPath,
) -> Result<C, MaxFlowError> {
    let bottleneck = path
        .edges()
        .iter()
        .try_fold(None, |acc: Option<C>, &e| -> Result<_, MaxFlowError> {
            let residual = network.residual(e)?;
            Ok(Some(acc.map_or(residual, |b| min(b, residual))))
        })?
        .ok_or(MaxFlowError::DegeneratePath)?;

    if bottleneck <= C::zero() {
        return Err(MaxFlowError::DegeneratePath);
    }

    for &e in path.edges() {
        network.push_flow(e, bottleneck)?;
    }

    Ok(bottleneck)
}

/// Edmonds-Karp: repeat shortest augmenting paths until none is left.
///
/// Since every path found is a shortest one, the number of augmentations is bounded by
/// `O(V * E)` regardless of the capacities.
#[derive(Clone, Debug, Default)]
pub struct EdmondsKarp {
    augmentations: usize,
}

impl EdmondsKarp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of augmentations performed by the last run.
    pub fn augmentations(&self) -> usize {
        self.augmentations
    }
}

impl<C: Capacity> MaxFlow<C> for EdmondsKarp {
    type Error = MaxFlowError;

    fn max_flow(&mut self, network: &mut FlowNetwork<C>) -> Result<C, Self::Error> {
        let source = network.source()?;
        let sink = network.sink()?;

        self.augmentations = 0;
        while let Some(path) = augmenting_path(network, source, sink) {
            let bottleneck = augment(network, &path)?;
            self.augmentations += 1;
            log::trace!("augmented {} edge path by {}", path.len(), bottleneck);
        }

        let flow = network.total_flow()?;
        log::debug!(
            "max flow = {flow} after {} augmentations",
            self.augmentations
        );

        Ok(flow)
    }
}
