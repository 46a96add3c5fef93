//! Viewer configuration.
//!
//! Every tunable of the interaction and animation machinery lives here as a
//! plain-data struct so that sessions can be constructed with custom rates
//! and bounds (tests rely on this) while the demo just uses [`Default`].

use serde::{Deserialize, Serialize};

/// Tunables for card geometry, camera limits and animation rates.
///
/// Animation rates are normalized to a 60-updates-per-second reference: an
/// advancing task applies `rate * dt * 60.0` so the observed speed is
/// independent of the actual frame rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Card width in world units.
    pub card_width: f32,
    /// Card height in world units.
    pub card_height: f32,
    /// Card thickness in world units.
    pub card_thickness: f32,

    /// Closest allowed camera distance.
    pub min_zoom: f32,
    /// Farthest allowed camera distance.
    pub max_zoom: f32,
    /// Camera distance at startup.
    pub initial_distance: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,

    /// Number of cards produced by a pack rip.
    pub pack_size: usize,

    /// Opacity change per reference tick for fade-in/fade-out.
    pub fade_rate: f32,
    /// Ease-out factor applied to the remaining flip angle per reference tick.
    pub flip_easing: f32,
    /// Remaining-angle threshold below which a flip snaps to its target.
    pub flip_epsilon: f32,
    /// Yaw added per reference tick while auto-rotate is engaged.
    pub auto_rotate_rate: f32,

    /// Radians of rotation per pixel of pointer drag.
    pub drag_sensitivity: f32,
    /// Camera distance change per unit of wheel delta.
    pub wheel_zoom_sensitivity: f32,
    /// Camera distance change per zoom button press.
    pub zoom_step: f32,

    /// Upper bound on the per-tick delta time, in seconds. Guards against
    /// large jumps after the host stalls the tick source.
    pub max_frame_delta: f32,

    /// Seconds a banner message stays visible before it is pruned.
    pub banner_lifetime_secs: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            card_width: 2.5,
            card_height: 3.5,
            card_thickness: 0.01,

            min_zoom: 2.0,
            max_zoom: 10.0,
            initial_distance: 5.0,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,

            pack_size: 10,

            fade_rate: 0.05,
            flip_easing: 0.1,
            flip_epsilon: 0.01,
            auto_rotate_rate: 0.02,

            drag_sensitivity: 0.005,
            wheel_zoom_sensitivity: 0.01,
            zoom_step: 0.5,

            max_frame_delta: 0.1,

            banner_lifetime_secs: 3.0,
        }
    }
}

impl ViewerConfig {
    /// Clamps a raw frame delta to the configured maximum step.
    #[must_use]
    pub fn clamp_delta(&self, dt: f32) -> f32 {
        dt.clamp(0.0, self.max_frame_delta)
    }
}
