//! Day state: the counter, the status meters and what was consumed today.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound of the hunger and thirst meters.
pub const MAX_STATUS: f32 = 100.0;

/// A resource that can be consumed once per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Drinking water raises thirst.
    Water,
    /// Eating raises hunger.
    Food,
    /// Turning the generator on.
    Generator,
}

impl Resource {
    /// Every resource, in declaration order.
    pub const ALL: [Self; 3] = [Self::Water, Self::Food, Self::Generator];

    const fn bit(self) -> u8 {
        match self {
            Self::Water => 0b001,
            Self::Food => 0b010,
            Self::Generator => 0b100,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Water => "water",
            Self::Food => "food",
            Self::Generator => "generator",
        })
    }
}

/// Small set of resources. Serializes as a list.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Resource>", into = "Vec<Resource>")]
pub struct ResourceSet(u8);

impl ResourceSet {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Adds `resource`. Returns `false` if it was already present.
    pub fn insert(&mut self, resource: Resource) -> bool {
        let fresh = !self.contains(resource);
        self.0 |= resource.bit();
        fresh
    }

    /// Whether `resource` is present.
    #[must_use]
    pub const fn contains(self, resource: Resource) -> bool {
        self.0 & resource.bit() != 0
    }

    /// Whether every member of `other` is present.
    #[must_use]
    pub const fn is_superset(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Members of `self` absent from `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Whether the set has no members.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Removes every member.
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Resource> {
        Resource::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl FromIterator<Resource> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        let mut set = Self::empty();
        for resource in iter {
            set.insert(resource);
        }
        set
    }
}

impl From<Vec<Resource>> for ResourceSet {
    fn from(resources: Vec<Resource>) -> Self {
        resources.into_iter().collect()
    }
}

impl From<ResourceSet> for Vec<Resource> {
    fn from(set: ResourceSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Debug for ResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// The protagonist's day-scoped status.
///
/// Only the day-cycle machine mutates this; everyone else gets a shared
/// reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayState {
    /// Current day, starting at 1.
    pub day: u32,
    /// Hunger meter in `[0, 100]`.
    pub hunger: f32,
    /// Thirst meter in `[0, 100]`.
    pub thirst: f32,
    /// Resources consumed today.
    pub resources: ResourceSet,
    /// Whether the bed will accept the player.
    pub sleep_ready: bool,
}

impl Default for DayState {
    fn default() -> Self {
        Self::on_day(1)
    }
}

impl DayState {
    /// A fresh state on `day` (at least 1) with nothing consumed.
    #[must_use]
    pub fn on_day(day: u32) -> Self {
        Self {
            day: day.max(1),
            hunger: 0.0,
            thirst: 0.0,
            resources: ResourceSet::empty(),
            sleep_ready: false,
        }
    }

    /// Whether `resource` was already consumed today.
    #[must_use]
    pub const fn has_consumed(&self, resource: Resource) -> bool {
        self.resources.contains(resource)
    }

    /// Records a consumption. Water and food raise their meter by `amount`,
    /// capped at `MAX_STATUS`. Returns `false` and changes nothing if the
    /// resource was already consumed today.
    pub(crate) fn consume(&mut self, resource: Resource, amount: f32) -> bool {
        if !self.resources.insert(resource) {
            return false;
        }
        match resource {
            Resource::Water => self.thirst = (self.thirst + amount).clamp(0.0, MAX_STATUS),
            Resource::Food => self.hunger = (self.hunger + amount).clamp(0.0, MAX_STATUS),
            Resource::Generator => {}
        }
        true
    }

    /// Moves to the next day and resets every per-day value. Returns the new day.
    pub(crate) fn advance_day(&mut self) -> u32 {
        self.day += 1;
        self.hunger = 0.0;
        self.thirst = 0.0;
        self.resources.clear();
        self.sleep_ready = false;
        self.day
    }
}
