use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::algo::max_flow::MaxFlowError;
use crate::error::Error;
use crate::feasibility::Infeasibility;
use crate::network::FlowNetwork;
use crate::node::Node;
use crate::policy::GroupPolicy;
use crate::request::Request;

/// The people placed in one group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    index: usize,
    drivers: Vec<usize>,
    passengers: Vec<usize>,
}

impl Group {
    pub fn new(index: usize, drivers: Vec<usize>, passengers: Vec<usize>) -> Self {
        Self {
            index,
            drivers,
            passengers,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn drivers(&self) -> &[usize] {
        &self.drivers
    }

    pub fn passengers(&self) -> &[usize] {
        &self.passengers
    }

    /// Drivers first, then passengers.
    pub fn members(&self) -> impl Iterator<Item = usize> + '_ {
        self.drivers.iter().chain(self.passengers.iter()).copied()
    }

    pub fn len(&self) -> usize {
        self.drivers.len() + self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    groups: Vec<Group>,
}

impl Allocation {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Number of people placed.
    pub fn people(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Plain membership lists, indexed by group.
    pub fn into_groups(self) -> Vec<Vec<usize>> {
        self.groups
            .into_iter()
            .map(|g| g.members().collect())
            .collect()
    }

    /// Reads group membership off a saturated network: a person belongs to group `g` if its edge
    /// into `Driver(g)` or `Seat(g)` carries flow.
    pub fn decode(network: &FlowNetwork<i32>, people: usize, groups: usize) -> Result<Self, Error> {
        let mut decoded: Vec<_> = (0..groups)
            .map(|g| Group::new(g, Vec::new(), Vec::new()))
            .collect();

        for person in 0..people {
            let role = Node::Person(person);
            let vertex = network
                .vertex(role)
                .ok_or(MaxFlowError::UnknownVertex(role))?;

            let mut assignments = 0;
            for e in network.outgoing(vertex).filter(|e| e.weight().flow() > 0) {
                let target = network
                    .role(e.target())
                    .ok_or(MaxFlowError::UnknownEdge(e.id().index()))?;
                match target {
                    Node::Driver(g) if g < groups => decoded[g].drivers.push(person),
                    Node::Seat(g) if g < groups => decoded[g].passengers.push(person),
                    _ => {
                        return Err(Error::AlgoSpecific(format!(
                            "unexpected flow from person {person} into {target:?}"
                        )))
                    }
                }
                assignments += 1;
            }

            if assignments != 1 {
                return Err(Error::BrokenAssignment {
                    person,
                    assignments,
                });
            }
        }

        // people are visited in index order, so every list is sorted
        Ok(Self::new(decoded))
    }

    /// Verifies that this allocation answers `request` under `policy`.
    pub fn check(&self, request: &Request, policy: &GroupPolicy) -> Result<(), Error> {
        let people = request.people();
        let groups = policy.groups(people);
        if self.groups.len() != groups {
            return Err(Error::InvalidAllocation(format!(
                "expected {groups} groups, got {}",
                self.groups.len()
            )));
        }

        let mut seen = vec![false; people];
        for (position, group) in self.groups.iter().enumerate() {
            let g = group.index;
            if g != position {
                return Err(Error::InvalidAllocation(format!(
                    "group at position {position} has index {g}"
                )));
            }
            if group.len() > policy.max_group_size {
                return Err(Error::InvalidAllocation(format!(
                    "group {g} has {} members, at most {} allowed",
                    group.len(),
                    policy.max_group_size
                )));
            }
            if group.drivers.len() != policy.drivers_per_group {
                return Err(Error::InvalidAllocation(format!(
                    "group {g} has {} drivers, {} required",
                    group.drivers.len(),
                    policy.drivers_per_group
                )));
            }
            if let Some(p) = group.drivers.iter().find(|&&p| !request.is_licensed(p)) {
                return Err(Error::InvalidAllocation(format!(
                    "person {p} drives group {g} without a license"
                )));
            }

            for p in group.members() {
                match seen.get_mut(p) {
                    None => {
                        return Err(Error::InvalidAllocation(format!(
                            "person {p} is not part of the request"
                        )))
                    }
                    Some(true) => {
                        return Err(Error::InvalidAllocation(format!(
                            "person {p} is placed more than once"
                        )))
                    }
                    Some(placed) => *placed = true,
                }
                if !request.preferences_of(p).contains(&g) {
                    return Err(Error::InvalidAllocation(format!(
                        "person {p} does not accept group {g}"
                    )));
                }
            }
        }

        match seen.iter().position(|placed| !placed) {
            Some(p) => Err(Error::InvalidAllocation(format!("person {p} is not placed"))),
            None => Ok(()),
        }
    }
}

/// The answer to a request: an allocation, or the reason there is none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Allocated(Allocation),
    NoSolution(Infeasibility),
}

impl Outcome {
    pub fn is_allocated(&self) -> bool {
        matches!(self, Self::Allocated(_))
    }

    pub fn allocation(&self) -> Option<&Allocation> {
        match self {
            Self::Allocated(a) => Some(a),
            Self::NoSolution(_) => None,
        }
    }

    pub fn into_allocation(self) -> Option<Allocation> {
        match self {
            Self::Allocated(a) => Some(a),
            Self::NoSolution(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::edmonds_karp::EdmondsKarp;
    use crate::algo::MaxFlow;
    use crate::builder::{CarpoolNetwork, NetworkBuilder};

    fn request() -> Request {
        Request::new(
            vec![vec![0], vec![0], vec![0], vec![0, 1], vec![1], vec![1], vec![1]],
            [0, 1, 4, 5],
        )
        .unwrap()
    }

    #[test]
    fn decodes_saturated_network() {
        let request = request();
        let policy = GroupPolicy::default();
        let mut network = CarpoolNetwork.build(&request, &policy).unwrap();
        EdmondsKarp::new().max_flow(&mut network).unwrap();

        let allocation = Allocation::decode(&network, 7, 2).unwrap();

        assert_eq!(allocation.people(), 7);
        assert_eq!(allocation.groups()[0].drivers(), &[0, 1]);
        assert_eq!(allocation.groups()[1].drivers(), &[4, 5]);
        assert!(allocation.check(&request, &policy).is_ok());
    }

    #[test]
    fn decode_rejects_unplaced_person() {
        let request = request();
        let network = CarpoolNetwork
            .build(&request, &GroupPolicy::default())
            .unwrap();

        assert_eq!(
            Allocation::decode(&network, 7, 2),
            Err(Error::BrokenAssignment {
                person: 0,
                assignments: 0
            })
        );
    }

    #[test]
    fn members_list_drivers_first() {
        let allocation = Allocation::new(vec![
            Group::new(0, vec![0, 1], vec![2, 3]),
            Group::new(1, vec![4, 5], vec![6]),
        ]);

        assert_eq!(allocation.groups()[1].members().collect::<Vec<_>>(), [4, 5, 6]);
        assert_eq!(
            allocation.into_groups(),
            vec![vec![0, 1, 2, 3], vec![4, 5, 6]]
        );
    }

    #[test]
    fn check_catches_broken_allocations() {
        let request = request();
        let policy = GroupPolicy::default();

        let unlicensed = Allocation::new(vec![
            Group::new(0, vec![0, 2], vec![1, 3]),
            Group::new(1, vec![4, 5], vec![6]),
        ]);
        let duplicated = Allocation::new(vec![
            Group::new(0, vec![0, 1], vec![2, 3]),
            Group::new(1, vec![4, 5], vec![3, 6]),
        ]);
        let unwanted = Allocation::new(vec![
            Group::new(0, vec![0, 1], vec![2, 6]),
            Group::new(1, vec![4, 5], vec![3]),
        ]);
        let missing = Allocation::new(vec![
            Group::new(0, vec![0, 1], vec![2]),
            Group::new(1, vec![4, 5], vec![6]),
        ]);

        for allocation in [unlicensed, duplicated, unwanted, missing] {
            assert!(matches!(
                allocation.check(&request, &policy),
                Err(Error::InvalidAllocation(_))
            ));
        }
    }
}
