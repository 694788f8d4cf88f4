use displaydoc::Display;

use crate::node::Node;

/// Failures of the residual-graph bookkeeping. None of these depend on the allocation input; each
/// one means the network was built or updated incorrectly.
#[derive(Debug, Display, Clone, Copy, Eq, PartialEq)]
pub enum MaxFlowError {
    /// Arithmetic overflow while updating flow
    ArithmeticOverflow,
    /// Vertex {0:?} is not part of the network
    UnknownVertex(Node),
    /// Edge {0} is not part of the network
    UnknownEdge(usize),
    /// Edge capacities must be non-negative
    NegativeCapacity,
    /// Pushing flow would exceed the residual capacity of edge {0}
    CapacityExceeded(usize),
    /// Network has no source or no sink
    MissingTerminal,
    /// Augmenting path is empty or has a non-positive bottleneck
    DegeneratePath,
    /// Edge {0} violates the capacity bound or skew symmetry
    BrokenInvariant(usize),
}
