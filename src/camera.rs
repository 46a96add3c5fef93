use glam::{Mat4, Vec3};

use crate::config::ViewerConfig;

/// Perspective camera looking at the origin from `+Z`.
///
/// Distance is the only animated degree of freedom and is always clamped to
/// the configured zoom bounds; aspect follows the host viewport.
#[derive(Debug, Clone)]
pub struct ViewCamera {
    pub distance: f32,
    pub aspect: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,

    min_zoom: f32,
    max_zoom: f32,
}

impl ViewCamera {
    #[must_use]
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            distance: config
                .initial_distance
                .clamp(config.min_zoom, config.max_zoom),
            aspect: 1.0,
            fov_degrees: config.fov_degrees,
            near: config.near,
            far: config.far,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    /// Moves the camera along its axis, clamped to the zoom bounds.
    pub fn zoom_by(&mut self, delta: f32) {
        self.distance = (self.distance + delta).clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// View matrix: inverse of the camera's world transform.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, self.distance)).inverse()
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
