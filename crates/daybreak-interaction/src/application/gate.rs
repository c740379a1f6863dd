//! The interaction gate.
//!
//! Holds at most one current zone (last entered wins) and a single busy
//! flag. A key press while busy is dropped, not queued.

use daybreak_core::error::DomainError;
use daybreak_core::ports::PromptDisplay;
use tracing::debug;

use crate::domain::commands::RequestGatedAction;
use crate::domain::zone::{InteractionZone, ZoneTag};

/// Proximity plus key-press arbiter.
#[derive(Debug, Default)]
pub struct InteractionGate {
    current: Option<InteractionZone>,
    busy: bool,
}

impl InteractionGate {
    /// A gate with no zone and nothing in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The player entered `zone`. It becomes current and its prompt is shown.
    pub fn on_zone_enter(&mut self, zone: InteractionZone, prompt: &mut dyn PromptDisplay) {
        debug!(tag = %zone.tag, "zone entered");
        prompt.show_prompt(&zone.prompt);
        self.current = Some(zone);
    }

    /// The player left a zone tagged `tag`.
    ///
    /// Only clears state when `tag` matches the current zone, so a late exit
    /// from an overlapping volume cannot hide an unrelated prompt.
    pub fn on_zone_exit(&mut self, tag: ZoneTag, prompt: &mut dyn PromptDisplay) {
        match &self.current {
            Some(current) if current.tag == tag => {
                debug!(%tag, "zone exited");
                prompt.hide_prompt();
                self.current = None;
            }
            _ => debug!(%tag, "stale zone exit ignored"),
        }
    }

    /// The action key was pressed.
    ///
    /// Returns the request to dispatch, or `None` when there is no current
    /// zone or another action is still in flight.
    pub fn on_action_key(&mut self, prompt: &mut dyn PromptDisplay) -> Option<RequestGatedAction> {
        let tag = self.current.as_ref()?.tag;
        if self.busy {
            let dropped = DomainError::ReentrantAction(tag.to_string());
            debug!(error = %dropped, "action key ignored");
            return None;
        }
        self.busy = true;
        prompt.hide_prompt();
        let request = RequestGatedAction::new(tag);
        debug!(%tag, correlation_id = %request.correlation_id, "gated action dispatched");
        Some(request)
    }

    /// The in-flight action finished. Further presses are accepted again.
    pub fn complete_action(&mut self) {
        self.busy = false;
    }

    /// Whether an action is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// The zone the player is standing in, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&InteractionZone> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use daybreak_test_support::{RecordingStage, StageCall};

    use super::*;

    #[test]
    fn test_enter_shows_prompt_and_sets_current() {
        // Arrange
        let (mut stage, log) = RecordingStage::new().build();
        let mut gate = InteractionGate::new();

        // Act
        gate.on_zone_enter(InteractionZone::new(ZoneTag::Water), stage.prompt.as_mut());

        // Assert
        assert_eq!(gate.current().map(|z| z.tag), Some(ZoneTag::Water));
        assert_eq!(
            log.calls(),
            vec![StageCall::ShowPrompt("Press E to drink water".into())]
        );
    }

    #[test]
    fn test_last_entered_zone_wins() {
        let (mut stage, _log) = RecordingStage::new().build();
        let mut gate = InteractionGate::new();

        gate.on_zone_enter(InteractionZone::new(ZoneTag::Water), stage.prompt.as_mut());
        gate.on_zone_enter(InteractionZone::new(ZoneTag::Food), stage.prompt.as_mut());

        assert_eq!(gate.current().map(|z| z.tag), Some(ZoneTag::Food));
    }

    #[test]
    fn test_stale_exit_does_not_clear_current_zone() {
        // Arrange
        let (mut stage, log) = RecordingStage::new().build();
        let mut gate = InteractionGate::new();
        gate.on_zone_enter(InteractionZone::new(ZoneTag::Water), stage.prompt.as_mut());
        gate.on_zone_enter(InteractionZone::new(ZoneTag::Bed), stage.prompt.as_mut());

        // Act
        gate.on_zone_exit(ZoneTag::Water, stage.prompt.as_mut());

        // Assert
        assert_eq!(gate.current().map(|z| z.tag), Some(ZoneTag::Bed));
        assert!(!log.contains(&StageCall::HidePrompt));
    }

    #[test]
    fn test_matching_exit_clears_and_hides_prompt() {
        let (mut stage, log) = RecordingStage::new().build();
        let mut gate = InteractionGate::new();
        gate.on_zone_enter(InteractionZone::new(ZoneTag::Bed), stage.prompt.as_mut());

        gate.on_zone_exit(ZoneTag::Bed, stage.prompt.as_mut());

        assert!(gate.current().is_none());
        assert!(log.contains(&StageCall::HidePrompt));
    }

    #[test]
    fn test_action_key_without_zone_does_nothing() {
        let (mut stage, log) = RecordingStage::new().build();
        let mut gate = InteractionGate::new();

        let request = gate.on_action_key(stage.prompt.as_mut());

        assert!(request.is_none());
        assert!(!gate.is_busy());
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_second_press_while_busy_is_dropped() {
        // Arrange
        let (mut stage, _log) = RecordingStage::new().build();
        let mut gate = InteractionGate::new();
        gate.on_zone_enter(InteractionZone::new(ZoneTag::Food), stage.prompt.as_mut());

        // Act
        let first = gate.on_action_key(stage.prompt.as_mut());
        let second = gate.on_action_key(stage.prompt.as_mut());

        // Assert
        assert_eq!(first.map(|r| r.tag), Some(ZoneTag::Food));
        assert!(second.is_none());
        assert!(gate.is_busy());
    }

    #[test]
    fn test_complete_action_accepts_presses_again() {
        let (mut stage, _log) = RecordingStage::new().build();
        let mut gate = InteractionGate::new();
        gate.on_zone_enter(InteractionZone::new(ZoneTag::Card), stage.prompt.as_mut());
        let _ = gate.on_action_key(stage.prompt.as_mut());

        gate.complete_action();
        let again = gate.on_action_key(stage.prompt.as_mut());

        assert_eq!(again.map(|r| r.tag), Some(ZoneTag::Card));
    }

    #[test]
    fn test_busy_survives_leaving_the_zone() {
        let (mut stage, _log) = RecordingStage::new().build();
        let mut gate = InteractionGate::new();
        gate.on_zone_enter(InteractionZone::new(ZoneTag::Water), stage.prompt.as_mut());
        let _ = gate.on_action_key(stage.prompt.as_mut());

        gate.on_zone_exit(ZoneTag::Water, stage.prompt.as_mut());
        gate.on_zone_enter(InteractionZone::new(ZoneTag::Food), stage.prompt.as_mut());

        assert!(gate.on_action_key(stage.prompt.as_mut()).is_none());
    }
}
