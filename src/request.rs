use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::policy::GroupPolicy;

/// The people to allocate: who accepts which groups, and who may drive.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RawRequest", into = "RawRequest")]
pub struct Request {
    preferences: Vec<Vec<usize>>,
    licenses: BTreeSet<usize>,
}

impl Request {
    /// Builds a request checked against the default [`GroupPolicy`].
    pub fn new<L>(preferences: Vec<Vec<usize>>, licenses: L) -> Result<Self, Error>
    where
        L: IntoIterator<Item = usize>,
    {
        Self::with_policy(preferences, licenses, &GroupPolicy::default())
    }

    pub fn with_policy<L>(
        preferences: Vec<Vec<usize>>,
        licenses: L,
        policy: &GroupPolicy,
    ) -> Result<Self, Error>
    where
        L: IntoIterator<Item = usize>,
    {
        let request = Self {
            preferences,
            licenses: licenses.into_iter().collect(),
        };
        request.validate(policy)?;
        Ok(request)
    }

    /// Checks that every referenced group and licensed person exists.
    ///
    /// These are caller errors; they are never reported as "no solution".
    pub fn validate(&self, policy: &GroupPolicy) -> Result<(), Error> {
        let groups = policy.groups(self.people());

        for (person, preferences) in self.preferences.iter().enumerate() {
            if let Some(&group) = preferences.iter().find(|&&g| g >= groups) {
                return Err(Error::GroupOutOfRange {
                    person,
                    group,
                    groups,
                });
            }
        }

        self.validate_licenses()
    }

    /// The policy independent part of [`Request::validate`].
    fn validate_licenses(&self) -> Result<(), Error> {
        let people = self.people();
        match self.licenses.iter().find(|&&p| p >= people) {
            Some(&person) => Err(Error::LicenseOutOfRange { person, people }),
            None => Ok(()),
        }
    }

    pub fn people(&self) -> usize {
        self.preferences.len()
    }

    pub fn preferences(&self) -> &[Vec<usize>] {
        &self.preferences
    }

    /// Acceptable groups of `person`, empty for unknown people.
    pub fn preferences_of(&self, person: usize) -> &[usize] {
        self.preferences
            .get(person)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn licenses(&self) -> &BTreeSet<usize> {
        &self.licenses
    }

    pub fn is_licensed(&self, person: usize) -> bool {
        self.licenses.contains(&person)
    }

    pub fn licensed_count(&self) -> usize {
        self.licenses.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawRequest {
    pub preferences: Vec<Vec<usize>>,
    #[serde(default)]
    pub licenses: Vec<usize>,
}

impl TryFrom<RawRequest> for Request {
    type Error = Error;

    /// Group indices depend on the policy in use, so only licenses are checked here; the
    /// allocator validates the rest against its own policy.
    fn try_from(r: RawRequest) -> Result<Self, Self::Error> {
        let request = Self {
            preferences: r.preferences,
            licenses: r.licenses.into_iter().collect(),
        };
        request.validate_licenses()?;
        Ok(request)
    }
}

impl From<Request> for RawRequest {
    fn from(r: Request) -> Self {
        Self {
            preferences: r.preferences,
            licenses: r.licenses.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn licenses_are_a_set() {
        let request = Request::new(vec![vec![0], vec![0], vec![0]], [2, 0, 2]).unwrap();

        assert_eq!(request.people(), 3);
        assert_eq!(request.licensed_count(), 2);
        assert!(request.is_licensed(0));
        assert!(!request.is_licensed(1));
        assert_eq!(request.preferences_of(1), &[0]);
        assert!(request.preferences_of(3).is_empty());
    }

    #[test]
    fn rejects_unknown_group() {
        // six people make two groups, so group 2 does not exist
        let preferences = vec![vec![0], vec![1], vec![0, 2], vec![0], vec![1], vec![1]];

        assert_eq!(
            Request::new(preferences, [0, 1]),
            Err(Error::GroupOutOfRange {
                person: 2,
                group: 2,
                groups: 2
            })
        );
    }

    #[test]
    fn rejects_unknown_license() {
        assert_eq!(
            Request::new(vec![vec![0], vec![0]], [0, 5]),
            Err(Error::LicenseOutOfRange {
                person: 5,
                people: 2
            })
        );
    }

    #[test]
    fn group_range_follows_policy() {
        let preferences = vec![vec![0], vec![1], vec![1], vec![0]];
        let pairs = GroupPolicy {
            max_group_size: 2,
            ..Default::default()
        };

        assert!(Request::new(preferences.clone(), [0, 1]).is_err());
        assert!(Request::with_policy(preferences, [0, 1], &pairs).is_ok());
    }
}
