#![no_std]
#![deny(
    warnings,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod algo;
pub mod allocation;
pub mod builder;
pub mod capacity;
pub mod error;
pub mod feasibility;
pub mod impls;
pub mod network;
pub mod node;
pub mod policy;
pub mod request;

use alloc::vec::Vec;

pub use crate::algo::edmonds_karp::EdmondsKarp;
pub use crate::algo::MaxFlow;
pub use crate::allocation::{Allocation, Group, Outcome};
pub use crate::builder::{CarpoolNetwork, NetworkBuilder};
pub use crate::error::Error;
pub use crate::feasibility::Infeasibility;
pub use crate::impls::default::DefaultAllocator;
pub use crate::network::FlowNetwork;
pub use crate::node::Node;
pub use crate::policy::GroupPolicy;
pub use crate::request::Request;

/// Splits people into groups that each get their required drivers.
pub trait Allocator {
    type Error;

    /// Either allocate everyone in `request`, or explain why that is impossible.
    fn run(&mut self, request: &Request) -> Result<Outcome, Self::Error>;

    /// Verify an outcome previously returned by `run` for the same request.
    fn check(&self, request: &Request, outcome: &Outcome) -> Result<(), Self::Error>;
}

/// Allocates people to cars of at most five, each driven by two licensed people.
///
/// `preferences[p]` lists the cars person `p` accepts; `licenses` lists the people who may drive.
/// Returns `Ok(None)` when no allocation exists, and an error when the input references a car or
/// a person that does not exist.
pub fn allocate<L>(preferences: Vec<Vec<usize>>, licenses: L) -> Result<Option<Vec<Vec<usize>>>, Error>
where
    L: IntoIterator<Item = usize>,
{
    let request = Request::new(preferences, licenses)?;
    let outcome = DefaultAllocator::default().run(&request)?;
    Ok(outcome.into_allocation().map(Allocation::into_groups))
}
