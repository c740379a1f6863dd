//! Linear opacity ramps and the current opacity of each overlay.

use std::collections::BTreeMap;

use daybreak_core::assets::Overlay;

/// A linear opacity ramp from `from` to `to` over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeRamp {
    /// Overlay being driven.
    pub overlay: Overlay,
    /// Opacity when the ramp started.
    pub from: f32,
    /// Opacity the ramp ends on.
    pub to: f32,
    /// Ramp length in seconds.
    pub duration: f32,
}

impl FadeRamp {
    /// Creates a ramp; both endpoints are clamped to `[0, 1]`.
    #[must_use]
    pub fn new(overlay: Overlay, from: f32, to: f32, duration: f32) -> Self {
        Self {
            overlay,
            from: clamp_alpha(from),
            to: clamp_alpha(to),
            duration: duration.max(0.0),
        }
    }

    /// Opacity after `elapsed` seconds. Returns `to` exactly once the ramp is over.
    #[must_use]
    pub fn sample(&self, elapsed: f32) -> f32 {
        if self.duration <= 0.0 || elapsed >= self.duration {
            return self.to;
        }
        let t = (elapsed / self.duration).clamp(0.0, 1.0);
        clamp_alpha((self.to - self.from).mul_add(t, self.from))
    }
}

fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        return 0.0;
    }
    alpha.clamp(0.0, 1.0)
}

/// Last opacity written to each overlay. Overlays start transparent.
#[derive(Debug, Clone, Default)]
pub struct OverlayLevels {
    levels: BTreeMap<Overlay, f32>,
}

impl OverlayLevels {
    /// Current opacity of `overlay`.
    #[must_use]
    pub fn get(&self, overlay: Overlay) -> f32 {
        self.levels.get(&overlay).copied().unwrap_or(0.0)
    }

    /// Records a new opacity for `overlay`, clamped, and returns it.
    pub fn set(&mut self, overlay: Overlay, alpha: f32) -> f32 {
        let alpha = clamp_alpha(alpha);
        self.levels.insert(overlay, alpha);
        alpha
    }
}
