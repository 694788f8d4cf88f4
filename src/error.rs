use alloc::format;
use alloc::string::String;

use displaydoc::Display;

use crate::algo::max_flow::MaxFlowError;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Error {
    /// Person {person} prefers group {group}, but there are only {groups} groups
    GroupOutOfRange {
        person: usize,
        group: usize,
        groups: usize,
    },
    /// Licensed person {person} is not one of the {people} people being allocated
    LicenseOutOfRange { person: usize, people: usize },
    /// Invalid group policy: {0}
    InvalidPolicy(&'static str),
    /// Value {0} does not fit the capacity type
    CapacityOverflow(usize),
    /// Max flow algorithm specific error: {0}
    AlgoSpecific(String),
    /// Person {person} carries flow into {assignments} groups, expected exactly one
    BrokenAssignment { person: usize, assignments: usize },
    /// Invalid allocation: {0}
    InvalidAllocation(String),
}

impl From<MaxFlowError> for Error {
    fn from(e: MaxFlowError) -> Self {
        Self::AlgoSpecific(format!("{e}"))
    }
}
