use alloc::collections::btree_map::Entry;
use alloc::collections::BTreeMap;

use petgraph::graph::{DiGraph, EdgeIndex, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::algo::max_flow::MaxFlowError;
use crate::capacity::Capacity;
use crate::node::Node;

/// An edge of the residual graph.
///
/// Every edge added through [`FlowNetwork::add_edge`] comes with a synthetic reverse edge of zero
/// capacity; the two always carry opposite flows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowEdge<C> {
    capacity: C,
    flow: C,
    reverse: EdgeIndex,
    synthetic: bool,
}

impl<C: Capacity> FlowEdge<C> {
    pub fn capacity(&self) -> C {
        self.capacity
    }

    pub fn flow(&self) -> C {
        self.flow
    }

    /// The paired edge pointing the other way.
    pub fn reverse(&self) -> EdgeIndex {
        self.reverse
    }

    /// `true` for the zero-capacity edges created alongside the requested ones.
    pub fn is_reverse(&self) -> bool {
        self.synthetic
    }

    pub fn residual(&self) -> C {
        self.capacity - self.flow
    }
}

/// A capacitated directed graph with residual bookkeeping.
///
/// Vertices are keyed by their [`Node`] role and addressed by dense `NodeIndex` ids; edges live in
/// petgraph's edge arena and refer to their reverse by `EdgeIndex`.
#[derive(Clone, Debug)]
pub struct FlowNetwork<C> {
    graph: DiGraph<Node, FlowEdge<C>>,
    vertices: BTreeMap<Node, NodeIndex>,
}

impl<C> Default for FlowNetwork<C> {
    fn default() -> Self {
        Self {
            graph: DiGraph::default(),
            vertices: BTreeMap::new(),
        }
    }
}

impl<C: Capacity> FlowNetwork<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex for `role`, or returns the existing one.
    pub fn add_vertex(&mut self, role: Node) -> NodeIndex {
        match self.vertices.entry(role) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => *e.insert(self.graph.add_node(role)),
        }
    }

    /// Adds an edge `from -> to` together with its reverse and returns the forward edge.
    pub fn add_edge(&mut self, from: Node, to: Node, capacity: C) -> Result<EdgeIndex, MaxFlowError> {
        let u = self.vertex(from).ok_or(MaxFlowError::UnknownVertex(from))?;
        let v = self.vertex(to).ok_or(MaxFlowError::UnknownVertex(to))?;
        if capacity < C::zero() {
            return Err(MaxFlowError::NegativeCapacity);
        }

        let forward = self.graph.add_edge(
            u,
            v,
            FlowEdge {
                capacity,
                flow: C::zero(),
                reverse: EdgeIndex::end(),
                synthetic: false,
            },
        );
        let reverse = self.graph.add_edge(
            v,
            u,
            FlowEdge {
                capacity: C::zero(),
                flow: C::zero(),
                reverse: forward,
                synthetic: true,
            },
        );
        self.graph[forward].reverse = reverse;

        Ok(forward)
    }

    pub fn vertex(&self, role: Node) -> Option<NodeIndex> {
        self.vertices.get(&role).copied()
    }

    pub fn role(&self, vertex: NodeIndex) -> Option<Node> {
        self.graph.node_weight(vertex).copied()
    }

    pub fn source(&self) -> Result<NodeIndex, MaxFlowError> {
        self.vertex(Node::Source).ok_or(MaxFlowError::MissingTerminal)
    }

    pub fn sink(&self) -> Result<NodeIndex, MaxFlowError> {
        self.vertex(Node::Sink).ok_or(MaxFlowError::MissingTerminal)
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges, reverse edges included.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn edge(&self, edge: EdgeIndex) -> Result<&FlowEdge<C>, MaxFlowError> {
        self.graph
            .edge_weight(edge)
            .ok_or(MaxFlowError::UnknownEdge(edge.index()))
    }

    pub fn residual(&self, edge: EdgeIndex) -> Result<C, MaxFlowError> {
        self.edge(edge).map(FlowEdge::residual)
    }

    /// The edges leaving `vertex`, reverse edges included.
    pub fn outgoing(
        &self,
        vertex: NodeIndex,
    ) -> impl Iterator<Item = EdgeReference<'_, FlowEdge<C>>> + '_ {
        self.graph.edges(vertex)
    }

    /// All edges of the network, reverse edges included.
    pub fn edges(&self) -> impl Iterator<Item = EdgeReference<'_, FlowEdge<C>>> + '_ {
        self.graph.edge_references()
    }

    /// Sends `delta` more units along `edge`, taking them off its reverse.
    pub fn push_flow(&mut self, edge: EdgeIndex, delta: C) -> Result<(), MaxFlowError> {
        let (residual, reverse) = {
            let e = self.edge(edge)?;
            (e.residual(), e.reverse)
        };
        if delta > residual {
            return Err(MaxFlowError::CapacityExceeded(edge.index()));
        }

        let back = self
            .graph
            .edge_weight(reverse)
            .ok_or(MaxFlowError::BrokenInvariant(edge.index()))?
            .flow
            .checked_add(&-delta)
            .ok_or(MaxFlowError::ArithmeticOverflow)?;
        let forward = self.graph[edge]
            .flow
            .checked_add(&delta)
            .ok_or(MaxFlowError::ArithmeticOverflow)?;

        self.graph[edge].flow = forward;
        self.graph[reverse].flow = back;
        debug_assert!(self.graph[reverse].flow == -self.graph[edge].flow);

        Ok(())
    }

    /// Sum of the flow leaving the source.
    pub fn total_flow(&self) -> Result<C, MaxFlowError> {
        let source = self.source()?;
        Ok(self.outgoing(source).map(|e| e.weight().flow).sum())
    }

    /// Checks capacity bounds and skew symmetry on every edge.
    pub fn check_invariants(&self) -> Result<(), MaxFlowError> {
        for e in self.edges() {
            let edge = e.weight();
            let broken = MaxFlowError::BrokenInvariant(e.id().index());
            let reverse = self.graph.edge_weight(edge.reverse).ok_or(broken)?;
            let (from, to) = self.graph.edge_endpoints(edge.reverse).ok_or(broken)?;

            if reverse.reverse != e.id()
                || from != e.target()
                || to != e.source()
                || reverse.flow != -edge.flow
                || edge.flow > edge.capacity
                || (!edge.synthetic && edge.flow < C::zero())
            {
                return Err(broken);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> FlowNetwork<i32> {
        let mut network = FlowNetwork::new();
        network.add_vertex(Node::Source);
        network.add_vertex(Node::Person(0));
        network.add_vertex(Node::Sink);
        network
    }

    #[test]
    fn add_vertex_is_idempotent_per_role() {
        let mut network = line();
        let person = network.vertex(Node::Person(0));

        assert_eq!(Some(network.add_vertex(Node::Person(0))), person);
        assert_eq!(network.vertex_count(), 3);
        assert_eq!(network.role(person.unwrap()), Some(Node::Person(0)));
    }

    #[test]
    fn add_edge_creates_reverse_pair() {
        let mut network = line();
        let forward = network.add_edge(Node::Source, Node::Person(0), 3).unwrap();
        let edge = network.edge(forward).unwrap().clone();
        let reverse = network.edge(edge.reverse()).unwrap();

        assert_eq!(network.edge_count(), 2);
        assert_eq!(edge.capacity(), 3);
        assert!(!edge.is_reverse());
        assert!(reverse.is_reverse());
        assert_eq!(reverse.capacity(), 0);
        assert_eq!(reverse.reverse(), forward);
        assert!(network.check_invariants().is_ok());
    }

    #[test]
    fn add_edge_rejects_unknown_vertex() {
        let mut network = line();

        assert_eq!(
            network.add_edge(Node::Source, Node::Aggregator, 1),
            Err(MaxFlowError::UnknownVertex(Node::Aggregator))
        );
        assert_eq!(
            network.add_edge(Node::Source, Node::Sink, -1),
            Err(MaxFlowError::NegativeCapacity)
        );
    }

    #[test]
    fn push_flow_keeps_skew_symmetry() {
        let mut network = line();
        let first = network.add_edge(Node::Source, Node::Person(0), 2).unwrap();
        network.add_edge(Node::Person(0), Node::Sink, 5).unwrap();

        network.push_flow(first, 2).unwrap();
        let edge = network.edge(first).unwrap();
        let reverse = network.edge(edge.reverse()).unwrap();

        assert_eq!(edge.flow(), 2);
        assert_eq!(edge.residual(), 0);
        assert_eq!(reverse.flow(), -2);
        assert_eq!(reverse.residual(), 2);
        assert_eq!(network.total_flow(), Ok(2));
        assert!(network.check_invariants().is_ok());
    }

    #[test]
    fn push_flow_rejects_excess() {
        let mut network = line();
        let first = network.add_edge(Node::Source, Node::Person(0), 1).unwrap();

        assert_eq!(
            network.push_flow(first, 2),
            Err(MaxFlowError::CapacityExceeded(first.index()))
        );
        assert_eq!(network.edge(first).unwrap().flow(), 0);
    }

    #[test]
    fn unknown_edge_is_reported() {
        let network = line();

        assert_eq!(
            network.residual(EdgeIndex::new(7)),
            Err(MaxFlowError::UnknownEdge(7))
        );
    }
}
