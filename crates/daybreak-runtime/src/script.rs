//! Timed input scripts: what the player does, and when.

use std::collections::VecDeque;
use std::path::Path;

use daybreak_core::error::DomainError;
use daybreak_interaction::domain::zone::ZoneTag;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;

/// Demo playthrough of the stock content.
pub const DEMO_SCRIPT: &str = include_str!("../content/demo_script.yaml");

/// One thing the overlap or input collaborator reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Input {
    /// The player walked into an interaction zone.
    EnterZone {
        /// Zone tag.
        tag: ZoneTag,
    },
    /// The player walked out of an interaction zone.
    ExitZone {
        /// Zone tag.
        tag: ZoneTag,
    },
    /// The action key was pressed.
    ActionKey,
    /// The player walked into a door volume.
    EnterDoor {
        /// Door id.
        id: String,
    },
    /// The player walked out of a door volume.
    ExitDoor {
        /// Door id.
        id: String,
    },
    /// The player walked into a dialogue trigger.
    EnterTrigger {
        /// Trigger id.
        id: String,
    },
    /// Something outside the core granted or took the keycard.
    SetCard {
        /// New card state.
        has_card: bool,
    },
}

/// An input and the simulated second it happens at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// Seconds since the session began.
    pub at: f32,
    /// What happens.
    pub input: Input,
}

/// A parsed script, ordered by time. Entries sharing a time keep file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    entries: Vec<ScriptEntry>,
}

impl Script {
    /// Parses and orders script YAML.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Script` for malformed YAML and
    /// `AppError::InvalidContent` for a negative or non-finite time.
    pub fn from_yaml(text: &str) -> Result<Self, AppError> {
        let entries: Vec<ScriptEntry> = serde_yaml::from_str(text).map_err(AppError::Script)?;
        Self::from_entries(entries)
    }

    /// Orders `entries` by time.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidContent` for a negative or non-finite time.
    pub fn from_entries(mut entries: Vec<ScriptEntry>) -> Result<Self, AppError> {
        if let Some((index, entry)) = entries
            .iter()
            .enumerate()
            .find(|(_, e)| !e.at.is_finite() || e.at < 0.0)
        {
            return Err(DomainError::Validation(format!(
                "script entry {index} has invalid time {}",
                entry.at
            ))
            .into());
        }
        entries.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(Self { entries })
    }

    /// The embedded demo playthrough.
    ///
    /// # Errors
    ///
    /// Fails only if the embedded YAML is broken.
    pub fn demo() -> Result<Self, AppError> {
        Self::from_yaml(DEMO_SCRIPT)
    }

    /// Loads a script from `path`, or the demo when `None`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be read, otherwise as
    /// [`Script::from_yaml`].
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => {
                info!(path = %path.display(), "loading script");
                Self::from_yaml(&std::fs::read_to_string(path)?)
            }
            None => Self::demo(),
        }
    }

    /// Entries in playback order.
    #[must_use]
    pub fn entries(&self) -> &[ScriptEntry] {
        &self.entries
    }

    /// Time of the last entry, or 0 for an empty script.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.entries.last().map_or(0.0, |e| e.at)
    }

    /// A playback cursor at the start of the script.
    #[must_use]
    pub fn cursor(&self) -> ScriptCursor {
        ScriptCursor {
            pending: self.entries.iter().cloned().collect(),
        }
    }
}

/// Hands out script inputs as simulated time passes.
#[derive(Debug, Clone, Default)]
pub struct ScriptCursor {
    pending: VecDeque<ScriptEntry>,
}

impl ScriptCursor {
    /// Removes and returns every input due at or before `now`.
    pub fn due(&mut self, now: f32) -> Vec<Input> {
        let mut due = Vec::new();
        while self.pending.front().is_some_and(|e| e.at <= now) {
            if let Some(entry) = self.pending.pop_front() {
                due.push(entry.input);
            }
        }
        due
    }

    /// Whether every input has been handed out.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }

    /// Inputs still to come.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}
