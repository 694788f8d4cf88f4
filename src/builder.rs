use alloc::vec::Vec;

use itertools::Itertools;

use crate::error::Error;
use crate::network::FlowNetwork;
use crate::node::Node;
use crate::policy::GroupPolicy;
use crate::request::Request;

/// Turns a request into the flow network whose maximum flow solves it.
pub trait NetworkBuilder {
    fn build(&mut self, request: &Request, policy: &GroupPolicy) -> Result<FlowNetwork<i32>, Error>;
}

/// The layered person/driver/seat network.
///
/// ```text
///                      +--1--> Driver(g) --drivers_per_group-----------------+
/// Source --1--> Person +                                                     +--> Sink
///                      +--1--> Seat(g) --seats_per_group--> Aggregator --N-dG+
/// ```
///
/// Only licensed people get edges into driver slots. Every edge is created with its zero-capacity
/// reverse, so the network is its own residual graph.
#[derive(Clone, Copy, Debug, Default)]
pub struct CarpoolNetwork;

fn capacity(value: usize) -> Result<i32, Error> {
    i32::try_from(value).map_err(|_| Error::CapacityOverflow(value))
}

impl NetworkBuilder for CarpoolNetwork {
    fn build(&mut self, request: &Request, policy: &GroupPolicy) -> Result<FlowNetwork<i32>, Error> {
        let people = request.people();
        let groups = policy.groups(people);
        let drivers = capacity(policy.drivers_per_group)?;
        let seats = capacity(policy.seats_per_group())?;
        let pooled = capacity(policy.aggregator_capacity(people))?;

        let mut network = FlowNetwork::new();
        network.add_vertex(Node::Source);
        network.add_vertex(Node::Sink);
        (0..people).for_each(|p| {
            network.add_vertex(Node::Person(p));
        });
        (0..groups).for_each(|g| {
            network.add_vertex(Node::Driver(g));
            network.add_vertex(Node::Seat(g));
        });
        network.add_vertex(Node::Aggregator);

        let preferences: Vec<Vec<usize>> = request
            .preferences()
            .iter()
            .map(|accepted| {
                if policy.dedup_preferences {
                    accepted.iter().copied().unique().collect()
                } else {
                    accepted.clone()
                }
            })
            .collect();

        // each person is placed at most once
        for p in 0..people {
            network.add_edge(Node::Source, Node::Person(p), 1)?;
        }

        for g in 0..groups {
            network.add_edge(Node::Driver(g), Node::Sink, drivers)?;
        }
        for (p, accepted) in preferences.iter().enumerate() {
            if request.is_licensed(p) {
                for &g in accepted {
                    network.add_edge(Node::Person(p), Node::Driver(g), 1)?;
                }
            }
        }

        for (p, accepted) in preferences.iter().enumerate() {
            for &g in accepted {
                network.add_edge(Node::Person(p), Node::Seat(g), 1)?;
            }
        }
        for g in 0..groups {
            network.add_edge(Node::Seat(g), Node::Aggregator, seats)?;
        }
        network.add_edge(Node::Aggregator, Node::Sink, pooled)?;

        log::debug!(
            "network for {people} people in {groups} groups: {} vertices, {} edges",
            network.vertex_count(),
            network.edge_count()
        );

        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use petgraph::visit::EdgeRef;

    use super::*;

    fn scenario() -> Request {
        let preferences = vec![
            vec![0],
            vec![1],
            vec![0, 1],
            vec![0, 1],
            vec![1, 0],
            vec![1],
            vec![1, 0],
            vec![0, 1],
            vec![1],
        ];
        Request::new(preferences, [0, 1, 4, 5, 8]).unwrap()
    }

    fn capacity_between(network: &FlowNetwork<i32>, from: Node, to: Node) -> Vec<i32> {
        let (u, v) = (network.vertex(from).unwrap(), network.vertex(to).unwrap());
        network
            .outgoing(u)
            .filter(|e| e.target() == v && !e.weight().is_reverse())
            .map(|e| e.weight().capacity())
            .collect()
    }

    #[test]
    fn builds_layered_topology() {
        let network = CarpoolNetwork
            .build(&scenario(), &GroupPolicy::default())
            .unwrap();

        // source, sink, 9 people, 2 driver slots, 2 seat slots, aggregator
        assert_eq!(network.vertex_count(), 16);
        // 9 source edges, 2 driver->sink, 6 licensed preferences, 14 preferences, 2 seat->aggregator,
        // 1 aggregator->sink; each with its reverse
        assert_eq!(network.edge_count(), 2 * 34);

        assert_eq!(capacity_between(&network, Node::Source, Node::Person(3)), [1]);
        assert_eq!(capacity_between(&network, Node::Driver(1), Node::Sink), [2]);
        assert_eq!(capacity_between(&network, Node::Seat(0), Node::Aggregator), [3]);
        assert_eq!(capacity_between(&network, Node::Aggregator, Node::Sink), [5]);
        assert_eq!(capacity_between(&network, Node::Person(4), Node::Driver(0)), [1]);
        assert_eq!(capacity_between(&network, Node::Person(4), Node::Seat(0)), [1]);
        assert!(capacity_between(&network, Node::Person(2), Node::Driver(0)).is_empty());
        assert!(network.check_invariants().is_ok());
    }

    #[test]
    fn duplicate_preferences_follow_policy() {
        let request = Request::new(vec![vec![0, 0], vec![0]], [0]).unwrap();
        let literal = GroupPolicy {
            dedup_preferences: false,
            ..Default::default()
        };

        let deduped = CarpoolNetwork
            .build(&request, &GroupPolicy::default())
            .unwrap();
        let parallel = CarpoolNetwork.build(&request, &literal).unwrap();

        assert_eq!(capacity_between(&deduped, Node::Person(0), Node::Seat(0)), [1]);
        assert_eq!(capacity_between(&parallel, Node::Person(0), Node::Seat(0)), [1, 1]);
        assert_eq!(capacity_between(&parallel, Node::Person(0), Node::Driver(0)), [1, 1]);
    }
}
