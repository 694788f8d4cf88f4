use serde::{Deserialize, Serialize};

/// The role a vertex plays in the allocation network.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum Node {
    Source,
    Sink,
    /// A person, by index into the preference lists.
    Person(usize),
    /// The driver slot of a group.
    Driver(usize),
    /// The seat slot of a group.
    Seat(usize),
    /// Pools the seat slots of every group before the sink.
    Aggregator,
}
