use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Shape of the groups people are split into.
///
/// The defaults describe cars: two licensed drivers and at most five occupants per car.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupPolicy {
    /// Exact number of licensed drivers every group needs.
    pub drivers_per_group: usize,
    /// Maximum number of people in a group, drivers included.
    pub max_group_size: usize,
    /// Collapse repeated group indices within one person's preferences.
    pub dedup_preferences: bool,
}

impl Default for GroupPolicy {
    fn default() -> Self {
        Self {
            drivers_per_group: 2,
            max_group_size: 5,
            dedup_preferences: true,
        }
    }
}

impl GroupPolicy {
    pub fn validate(&self) -> Result<(), Error> {
        if self.drivers_per_group == 0 {
            Err(Error::InvalidPolicy("a group needs at least one driver"))
        } else if self.max_group_size < self.drivers_per_group {
            Err(Error::InvalidPolicy(
                "maximum group size is smaller than the number of drivers",
            ))
        } else {
            Ok(())
        }
    }

    /// Number of groups needed for `people` people, i.e. `ceil(people / max_group_size)`.
    pub fn groups(&self, people: usize) -> usize {
        people.div_ceil(self.max_group_size.max(1))
    }

    /// Non-driver seats in a single group.
    pub fn seats_per_group(&self) -> usize {
        self.max_group_size.saturating_sub(self.drivers_per_group)
    }

    /// Non-driver seats across all groups: everyone who is not one of the required drivers.
    pub fn aggregator_capacity(&self, people: usize) -> usize {
        people.saturating_sub(self.drivers_per_group * self.groups(people))
    }

    /// Fewest people for which an allocation can exist.
    pub fn min_people(&self, people: usize) -> usize {
        self.drivers_per_group * self.groups(people).max(1)
    }
}
