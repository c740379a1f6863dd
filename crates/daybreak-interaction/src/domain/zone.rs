//! Interaction zones and their tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What an interaction zone offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneTag {
    /// A water source.
    Water,
    /// A food source.
    Food,
    /// The bed.
    Bed,
    /// A keycard pickup.
    Card,
    /// The generator switch.
    Generator,
}

impl ZoneTag {
    /// Prompt shown when no zone-specific text is configured.
    #[must_use]
    pub const fn default_prompt(self) -> &'static str {
        match self {
            Self::Water => "Press E to drink water",
            Self::Food => "Press E to eat food",
            Self::Bed => "Press E to sleep",
            Self::Card => "Press E to get the card",
            Self::Generator => "Press E to turn on the generator",
        }
    }
}

impl fmt::Display for ZoneTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Water => "water",
            Self::Food => "food",
            Self::Bed => "bed",
            Self::Card => "card",
            Self::Generator => "generator",
        };
        f.write_str(name)
    }
}

/// A trigger volume the player is standing in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionZone {
    /// What the zone offers.
    pub tag: ZoneTag,
    /// Prompt text shown while inside.
    pub prompt: String,
}

impl InteractionZone {
    /// A zone with its tag's default prompt.
    #[must_use]
    pub fn new(tag: ZoneTag) -> Self {
        Self {
            tag,
            prompt: tag.default_prompt().to_owned(),
        }
    }

    /// A zone with custom prompt text.
    #[must_use]
    pub fn with_prompt(tag: ZoneTag, prompt: impl Into<String>) -> Self {
        Self {
            tag,
            prompt: prompt.into(),
        }
    }
}
