use serde::{Deserialize, Serialize};

/// Tuning for the adjacency carousel. Deserializable so the page can pass
/// overrides as JSON; missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselConfig {
    /// Fallback for an animation that never reports completion.
    pub settle_timeout_ms: u64,
    /// Drum rotation per pixel of vertical drag.
    pub drag_deg_per_px: f64,
    /// Upper bound on steps a single drag release may apply.
    pub max_steps_per_gesture: u32,
    /// Drum radius handed to the view layer.
    pub radius_px: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            settle_timeout_ms: 450,
            drag_deg_per_px: 0.5,
            max_steps_per_gesture: 3,
            radius_px: 160.0,
        }
    }
}

impl CarouselConfig {
    pub const MIN_SETTLE_TIMEOUT_MS: u64 = 100;
    pub const MAX_SETTLE_TIMEOUT_MS: u64 = 2_000;

    /// Clamps values into the ranges the state machine relies on: a bounded
    /// timeout, and at most half a drum turn per gesture so every slot shown
    /// during the turn has been assigned.
    pub fn sanitized(mut self) -> Self {
        self.settle_timeout_ms = self
            .settle_timeout_ms
            .clamp(Self::MIN_SETTLE_TIMEOUT_MS, Self::MAX_SETTLE_TIMEOUT_MS);
        self.max_steps_per_gesture = self.max_steps_per_gesture.clamp(1, 3);
        if !self.drag_deg_per_px.is_finite() || self.drag_deg_per_px <= 0.0 {
            self.drag_deg_per_px = Self::default().drag_deg_per_px;
        }
        if !self.radius_px.is_finite() || self.radius_px <= 0.0 {
            self.radius_px = Self::default().radius_px;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::CarouselConfig;

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: CarouselConfig = serde_json::from_str(r#"{"settleTimeoutMs": 500}"#).unwrap();
        assert_eq!(cfg.settle_timeout_ms, 500);
        assert_eq!(cfg.max_steps_per_gesture, 3);
    }

    #[test]
    fn sanitized_clamps_out_of_range_values() {
        let cfg = CarouselConfig {
            settle_timeout_ms: 60_000,
            drag_deg_per_px: f64::NAN,
            max_steps_per_gesture: 0,
            radius_px: -1.0,
        }
        .sanitized();
        assert_eq!(cfg.settle_timeout_ms, CarouselConfig::MAX_SETTLE_TIMEOUT_MS);
        assert_eq!(cfg.drag_deg_per_px, 0.5);
        assert_eq!(cfg.max_steps_per_gesture, 1);
        assert_eq!(cfg.radius_px, 160.0);
    }
}
