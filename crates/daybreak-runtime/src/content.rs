//! The content bundle a session is built from.

use std::collections::HashSet;
use std::path::Path;

use daybreak_core::error::DomainError;
use daybreak_day_cycle::domain::content::DayCycleContent;
use daybreak_day_cycle::domain::doors::DoorsContent;
use daybreak_interaction::domain::zone::{InteractionZone, ZoneTag};
use daybreak_sequence::domain::cutscene::TriggerScript;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;

/// Stock content compiled into the binary.
pub const DEFAULT_CONTENT: &str = include_str!("../content/default.yaml");

/// Day cycle, doors, triggers and prompt overrides for one scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameContent {
    /// Day-cycle timings, dialogue and rules.
    #[serde(default)]
    pub day_cycle: DayCycleContent,
    /// Door volumes and the keycard pickup.
    #[serde(default)]
    pub doors: DoorsContent,
    /// One-shot dialogue and cutscene triggers.
    #[serde(default)]
    pub triggers: Vec<TriggerScript>,
    /// Prompt text overrides, one per zone tag.
    #[serde(default)]
    pub zones: Vec<InteractionZone>,
}

impl GameContent {
    /// Parses and validates content YAML.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Content` if the YAML does not match the content
    /// schema and `AppError::InvalidContent` if it is inconsistent.
    pub fn from_yaml(text: &str) -> Result<Self, AppError> {
        let content: Self = serde_yaml::from_str(text).map_err(AppError::Content)?;
        content.validate()?;
        Ok(content)
    }

    /// The stock content.
    ///
    /// # Errors
    ///
    /// Fails only if the embedded YAML is broken.
    pub fn embedded() -> Result<Self, AppError> {
        Self::from_yaml(DEFAULT_CONTENT)
    }

    /// Loads content from `path`, or the stock content when `None`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be read, otherwise as
    /// [`GameContent::from_yaml`].
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => {
                info!(path = %path.display(), "loading content");
                Self::from_yaml(&std::fs::read_to_string(path)?)
            }
            None => Self::embedded(),
        }
    }

    /// The zone to present for `tag`: its configured prompt, or the default.
    #[must_use]
    pub fn zone(&self, tag: ZoneTag) -> InteractionZone {
        zone_for(&self.zones, tag)
    }

    fn validate(&self) -> Result<(), DomainError> {
        let mut doors = HashSet::new();
        if let Some(dup) = self.doors.doors.iter().find(|d| !doors.insert(d.id.as_str())) {
            return Err(DomainError::Validation(format!("door {:?} defined twice", dup.id)));
        }
        let mut triggers = HashSet::new();
        if let Some(dup) = self.triggers.iter().find(|t| !triggers.insert(t.id.as_str())) {
            return Err(DomainError::Validation(format!(
                "trigger {:?} defined twice",
                dup.id
            )));
        }
        if let Some(special) = &self.day_cycle.special_day {
            if special.day == 0 {
                return Err(DomainError::Validation("special day must be 1 or later".to_owned()));
            }
            let chatter = &special.chatter;
            if chatter.min_interval < 0.0 || chatter.min_interval > chatter.max_interval {
                return Err(DomainError::Validation(format!(
                    "chatter interval [{}, {}] is not a valid range",
                    chatter.min_interval, chatter.max_interval
                )));
            }
            if special.next_scene.trim().is_empty() {
                return Err(DomainError::Validation("special day needs a next scene".to_owned()));
            }
        }
        Ok(())
    }
}

/// The zone in `zones` tagged `tag`, or one with the tag's default prompt.
#[must_use]
pub fn zone_for(zones: &[InteractionZone], tag: ZoneTag) -> InteractionZone {
    zones
        .iter()
        .find(|z| z.tag == tag)
        .cloned()
        .unwrap_or_else(|| InteractionZone::new(tag))
}
