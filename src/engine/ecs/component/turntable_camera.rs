use std::f32::consts::PI;

use glam::{Mat4, Vec3};

/// Polar angle limit; stops short of the poles so the view never flips.
pub const POLAR_LIMIT: f32 = 0.49 * PI;

pub const UP_AXIS: Vec3 = Vec3::Y;
pub const RIGHT_AXIS: Vec3 = Vec3::X;
pub const FORWARD_AXIS: Vec3 = Vec3::Z;

/// Construction-time camera settings. Angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurntableParams {
    pub default_radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub default_azimuth: f32,
    pub default_polar: f32,
}

impl Default for TurntableParams {
    fn default() -> Self {
        Self {
            default_radius: 5.0,
            min_radius: 1.0,
            max_radius: 20.0,
            default_azimuth: 0.0,
            default_polar: 0.0,
        }
    }
}

/// Orbit-style camera that always looks at the world origin.
///
/// Contract:
/// - `change_*` only store the new spherical coordinates and mark the camera dirty
///   when a value actually moved.
/// - `view_matrix()` / `eye_position()` rebuild the cached matrices on first read
///   after a change; later reads return the cache untouched.
#[derive(Debug, Clone)]
pub struct TurntableCamera {
    azimuth: f32,
    polar: f32,
    radius: f32,
    min_radius: f32,
    max_radius: f32,

    dirty: bool,
    eye_position: Vec3,
    view_matrix: Mat4,
}

impl Default for TurntableCamera {
    fn default() -> Self {
        Self::new(TurntableParams::default())
    }
}

impl TurntableCamera {
    pub fn new(params: TurntableParams) -> Self {
        let min_radius = params.min_radius.min(params.max_radius);
        let max_radius = params.max_radius.max(params.min_radius);
        Self {
            azimuth: params.default_azimuth,
            polar: params.default_polar.clamp(-POLAR_LIMIT, POLAR_LIMIT),
            radius: params.default_radius.clamp(min_radius, max_radius),
            min_radius,
            max_radius,
            dirty: true,
            eye_position: Vec3::ZERO,
            view_matrix: Mat4::IDENTITY,
        }
    }

    /// Horizontal orbit. Unbounded; the trig is periodic anyway.
    pub fn change_azimuth(&mut self, delta: f32) {
        let azimuth = self.azimuth + delta;
        if azimuth != self.azimuth {
            self.azimuth = azimuth;
            self.dirty = true;
        }
    }

    /// Vertical orbit, clamped to `±POLAR_LIMIT`.
    pub fn change_polar(&mut self, delta: f32) {
        let polar = (self.polar + delta).clamp(-POLAR_LIMIT, POLAR_LIMIT);
        if polar != self.polar {
            self.polar = polar;
            self.dirty = true;
        }
    }

    /// Zoom, clamped to `[min_radius, max_radius]`.
    pub fn change_radius(&mut self, delta: f32) {
        let radius = (self.radius + delta).clamp(self.min_radius, self.max_radius);
        if radius != self.radius {
            self.radius = radius;
            self.dirty = true;
        }
    }

    pub fn view_matrix(&mut self) -> Mat4 {
        self.update_view_matrix();
        self.view_matrix
    }

    pub fn eye_position(&mut self) -> Vec3 {
        self.update_view_matrix();
        self.eye_position
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn min_radius(&self) -> f32 {
        self.min_radius
    }

    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn update_view_matrix(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let horizontal = Mat4::from_axis_angle(UP_AXIS, self.azimuth);
        let vertical = Mat4::from_axis_angle(RIGHT_AXIS, self.polar);

        self.eye_position = (horizontal * vertical).transform_vector3(FORWARD_AXIS) * self.radius;
        self.view_matrix = Mat4::look_at_rh(self.eye_position, Vec3::ZERO, UP_AXIS);
    }
}
