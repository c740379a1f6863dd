//! Per-day readiness: which resources must be consumed before sleeping.

use serde::{Deserialize, Serialize};

use super::state::{DayState, Resource, ResourceSet};

/// A day whose requirement differs from the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessOverride {
    /// The day the override applies to.
    pub day: u32,
    /// Resources required on that day.
    pub requires: ResourceSet,
}

/// Readiness predicate over consumed resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessRules {
    /// Requirement on days without an override.
    #[serde(default = "default_requirement")]
    pub default: ResourceSet,
    /// Day-specific requirements. The first match wins.
    #[serde(default)]
    pub overrides: Vec<ReadinessOverride>,
}

fn default_requirement() -> ResourceSet {
    [Resource::Water, Resource::Food].into_iter().collect()
}

impl Default for ReadinessRules {
    fn default() -> Self {
        Self {
            default: default_requirement(),
            overrides: vec![ReadinessOverride {
                day: 2,
                requires: Resource::ALL.into_iter().collect(),
            }],
        }
    }
}

impl ReadinessRules {
    /// Resources that must be consumed on `day`.
    #[must_use]
    pub fn required_for(&self, day: u32) -> ResourceSet {
        self.overrides
            .iter()
            .find(|o| o.day == day)
            .map_or(self.default, |o| o.requires)
    }

    /// Required resources not yet consumed in `state`.
    #[must_use]
    pub fn missing(&self, state: &DayState) -> ResourceSet {
        self.required_for(state.day).difference(state.resources)
    }

    /// Whether `state` satisfies its day's requirement.
    #[must_use]
    pub fn is_satisfied(&self, state: &DayState) -> bool {
        self.missing(state).is_empty()
    }
}
