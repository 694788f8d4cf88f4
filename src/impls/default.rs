use alloc::format;

use crate::algo::edmonds_karp::EdmondsKarp;
use crate::algo::MaxFlow;
use crate::allocation::{Allocation, Outcome};
use crate::builder::{CarpoolNetwork, NetworkBuilder};
use crate::error::Error;
use crate::feasibility::{postcheck, precheck};
use crate::policy::GroupPolicy;
use crate::request::Request;
use crate::Allocator;

#[derive(Clone, Debug)]
pub struct DefaultAllocator<B, Algo> {
    builder: B,
    algo: Algo,
    policy: GroupPolicy,
}

impl<B, Algo> DefaultAllocator<B, Algo> {
    pub fn new(builder: B, algo: Algo, policy: GroupPolicy) -> Self {
        Self {
            builder,
            algo,
            policy,
        }
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn algo(&self) -> &Algo {
        &self.algo
    }

    pub fn policy(&self) -> &GroupPolicy {
        &self.policy
    }
}

impl Default for DefaultAllocator<CarpoolNetwork, EdmondsKarp> {
    fn default() -> Self {
        Self::new(CarpoolNetwork, EdmondsKarp::new(), GroupPolicy::default())
    }
}

impl<B, Algo> Allocator for DefaultAllocator<B, Algo>
where
    B: NetworkBuilder,
    Algo: MaxFlow<i32>,
{
    type Error = Error;

    fn run(&mut self, request: &Request) -> Result<Outcome, Self::Error> {
        self.policy.validate()?;
        request.validate(&self.policy)?;

        let people = request.people();
        let groups = match precheck(request, &self.policy) {
            Ok(groups) => groups,
            Err(reason) => {
                log::info!("no solution: {reason}");
                return Ok(Outcome::NoSolution(reason));
            }
        };

        let mut network = self.builder.build(request, &self.policy)?;

        // run the max-flow algo
        let flow = self
            .algo
            .max_flow(&mut network)
            .map_err(|e| Error::AlgoSpecific(format!("{e:?}")))?;
        network.check_invariants()?;

        let flow = usize::try_from(flow)
            .ok()
            .filter(|flow| *flow <= people)
            .ok_or_else(|| Error::AlgoSpecific(format!("max flow {flow} out of range")))?;

        log::info!("----------------------------------");
        log::info!("         People = {people}");
        log::info!("         Groups = {groups}");
        log::info!("       Licensed = {}", request.licensed_count());
        log::info!("       Max flow = {flow}");

        if let Err(reason) = postcheck(flow, people) {
            log::info!("no solution: {reason}");
            return Ok(Outcome::NoSolution(reason));
        }

        let allocation = Allocation::decode(&network, people, groups)?;
        allocation.groups().iter().for_each(|g| {
            log::debug!(
                "group {}: drivers {:?}, passengers {:?}",
                g.index(),
                g.drivers(),
                g.passengers()
            );
        });

        Ok(Outcome::Allocated(allocation))
    }

    fn check(&self, request: &Request, outcome: &Outcome) -> Result<(), Self::Error> {
        match outcome {
            Outcome::Allocated(allocation) => allocation.check(request, &self.policy),
            Outcome::NoSolution(_) => Ok(()),
        }
    }
}
