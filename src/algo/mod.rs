use core::fmt::Debug;

use crate::network::FlowNetwork;

pub mod edmonds_karp;
pub mod max_flow;

/// A maximum flow algorithm working in place on a residual network.
pub trait MaxFlow<C> {
    type Error: Debug;

    /// Saturate `network` from its source to its sink and return the value of the resulting flow.
    fn max_flow(&mut self, network: &mut FlowNetwork<C>) -> Result<C, Self::Error>;
}
