use displaydoc::Display;
use serde::{Deserialize, Serialize};

use crate::policy::GroupPolicy;
use crate::request::Request;

/// Why a request has no allocation.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
pub enum Infeasibility {
    /// Only {people} people, at least {required} are needed to fill the groups with drivers
    TooFewPeople { people: usize, required: usize },
    /// Only {licensed} licensed drivers for {groups} groups
    TooFewDrivers { licensed: usize, groups: usize },
    /// Max flow of {flow} does not place all {required} people
    Unsaturated { flow: usize, required: usize },
}

/// Cheap necessary conditions checked before any network is built. Returns the number of groups.
pub fn precheck(request: &Request, policy: &GroupPolicy) -> Result<usize, Infeasibility> {
    let people = request.people();
    let groups = policy.groups(people);
    let required = policy.min_people(people);

    if people < required {
        Err(Infeasibility::TooFewPeople { people, required })
    } else if request.licensed_count() < groups {
        Err(Infeasibility::TooFewDrivers {
            licensed: request.licensed_count(),
            groups,
        })
    } else {
        Ok(groups)
    }
}

/// An allocation exists only if the max flow saturates every person.
pub fn postcheck(flow: usize, people: usize) -> Result<(), Infeasibility> {
    if flow < people {
        Err(Infeasibility::Unsaturated {
            flow,
            required: people,
        })
    } else {
        Ok(())
    }
}
