use std::f32::consts::TAU;

use glam::{Mat4, Vec3};

/// Axis every body spins and orbits around (its local "north").
pub const NORMAL_AXIS: Vec3 = Vec3::Y;

/// Axis orbit and spin tilts are applied around.
pub const RIGHT_AXIS: Vec3 = Vec3::X;

/// Direction of the orbital offset before the orbit angle is applied.
pub const ORBIT_REFERENCE_AXIS: Vec3 = Vec3::X;

/// What a child needs from its parent to place itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentPose {
    pub world_matrix: Mat4,
    pub axis_angle: f32,
}

/// A body that spins about its own axis and orbits its parent.
///
/// Motion is parametric: the world matrix is a pure function of the static
/// parameters, the two current angles and the parent's pose, so nothing but
/// the angles accumulates from frame to frame.
///
/// Composition (applied to column vectors, outermost first):
/// 1. parent world matrix (identity for roots)
/// 2. undo the parent's spin, so children orbit in the parent's rest frame
/// 3. orbit tilt about [`RIGHT_AXIS`]
/// 4. translation to the point on the orbit circle
/// 5. axis tilt about [`RIGHT_AXIS`]
/// 6. spin about [`NORMAL_AXIS`]
/// 7. uniform scale
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitingBody {
    pub scale: f32,
    /// Radians.
    pub axis_tilt: f32,
    /// Radians.
    pub orbit_tilt: f32,
    pub orbit_radius: f32,
    /// Radians per second.
    pub axis_spin_rate: f32,
    /// Radians per second.
    pub orbit_spin_rate: f32,

    axis_angle: f32,
    orbit_angle: f32,
    world_matrix: Mat4,
}

impl Default for OrbitingBody {
    fn default() -> Self {
        Self {
            scale: 1.0,
            axis_tilt: 0.0,
            orbit_tilt: 0.0,
            orbit_radius: 0.0,
            axis_spin_rate: 1.0,
            orbit_spin_rate: 1.0,
            axis_angle: 0.0,
            orbit_angle: 0.0,
            world_matrix: Mat4::IDENTITY,
        }
    }
}

impl OrbitingBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_axis_tilt(mut self, radians: f32) -> Self {
        self.axis_tilt = radians;
        self
    }

    pub fn with_orbit_tilt(mut self, radians: f32) -> Self {
        self.orbit_tilt = radians;
        self
    }

    pub fn with_orbit_radius(mut self, radius: f32) -> Self {
        self.orbit_radius = radius;
        self
    }

    pub fn with_axis_spin_rate(mut self, radians_per_sec: f32) -> Self {
        self.axis_spin_rate = radians_per_sec;
        self
    }

    pub fn with_orbit_spin_rate(mut self, radians_per_sec: f32) -> Self {
        self.orbit_spin_rate = radians_per_sec;
        self
    }

    /// Advance both angles by `dt_sec` and recompute the world matrix.
    ///
    /// Negative `dt_sec` runs the motion backwards; angles still wrap into `[0, 2π)`.
    pub fn advance(&mut self, dt_sec: f32, parent: Option<&ParentPose>) {
        self.axis_angle = wrap_angle(self.axis_angle + self.axis_spin_rate * dt_sec);
        self.orbit_angle = wrap_angle(self.orbit_angle + self.orbit_spin_rate * dt_sec);
        self.refresh(parent);
    }

    /// Back to the initial pose. Static parameters are untouched.
    pub fn reset_rotation(&mut self, parent: Option<&ParentPose>) {
        self.axis_angle = 0.0;
        self.orbit_angle = 0.0;
        self.refresh(parent);
    }

    /// Recompute the cached world matrix from the current angles.
    pub fn refresh(&mut self, parent: Option<&ParentPose>) {
        self.world_matrix = self.compute_world_matrix(parent);
    }

    pub fn compute_world_matrix(&self, parent: Option<&ParentPose>) -> Mat4 {
        let (parent_matrix, parent_axis_angle) = match parent {
            Some(p) => (p.world_matrix, p.axis_angle),
            None => (Mat4::IDENTITY, 0.0),
        };

        let orbit_position = Mat4::from_axis_angle(NORMAL_AXIS, self.orbit_angle)
            .transform_point3(ORBIT_REFERENCE_AXIS * self.orbit_radius);

        parent_matrix
            * Mat4::from_axis_angle(NORMAL_AXIS, -parent_axis_angle)
            * Mat4::from_axis_angle(RIGHT_AXIS, self.orbit_tilt)
            * Mat4::from_translation(orbit_position)
            * Mat4::from_axis_angle(RIGHT_AXIS, self.axis_tilt)
            * Mat4::from_axis_angle(NORMAL_AXIS, self.axis_angle)
            * Mat4::from_scale(Vec3::splat(self.scale))
    }

    /// Cached world matrix from the last advance/reset/refresh.
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    pub fn axis_angle(&self) -> f32 {
        self.axis_angle
    }

    pub fn orbit_angle(&self) -> f32 {
        self.orbit_angle
    }

    /// World-space centre of the body.
    pub fn world_position(&self) -> Vec3 {
        self.world_matrix.w_axis.truncate()
    }

    /// The pose this body hands to its children.
    pub fn pose(&self) -> ParentPose {
        ParentPose {
            world_matrix: self.world_matrix,
            axis_angle: self.axis_angle,
        }
    }
}

/// Map any finite angle into `[0, 2π)`.
pub fn wrap_angle(radians: f32) -> f32 {
    let wrapped = radians.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn angles_stay_wrapped() {
        let mut body = OrbitingBody::new()
            .with_axis_spin_rate(7.3)
            .with_orbit_spin_rate(-3.1);

        for i in 0..500 {
            let dt = if i % 7 == 0 { -0.37 } else { 0.113 };
            body.advance(dt, None);
            assert!((0.0..TAU).contains(&body.axis_angle()), "axis {}", body.axis_angle());
            assert!((0.0..TAU).contains(&body.orbit_angle()), "orbit {}", body.orbit_angle());
        }
    }

    #[test]
    fn wrap_angle_handles_tiny_negatives() {
        assert_eq!(wrap_angle(-1e-9), 0.0);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < EPS);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < EPS);
    }

    #[test]
    fn reset_matches_fresh_pose() {
        let make = || {
            OrbitingBody::new()
                .with_scale(0.4)
                .with_axis_tilt(0.3)
                .with_orbit_tilt(0.1)
                .with_orbit_radius(3.0)
                .with_axis_spin_rate(2.0)
                .with_orbit_spin_rate(0.7)
        };

        let mut fresh = make();
        fresh.refresh(None);

        let mut used = make();
        for _ in 0..37 {
            used.advance(0.21, None);
        }
        used.reset_rotation(None);

        assert_eq!(used.axis_angle(), 0.0);
        assert_eq!(used.orbit_angle(), 0.0);
        assert!(used.world_matrix().abs_diff_eq(*fresh.world_matrix(), EPS));
    }

    #[test]
    fn parentless_centered_body_is_pure_scale() {
        let mut body = OrbitingBody::new().with_scale(2.5);
        body.refresh(None);
        assert!(
            body.world_matrix()
                .abs_diff_eq(Mat4::from_scale(Vec3::splat(2.5)), EPS)
        );
    }

    #[test]
    fn orbit_position_follows_orbit_angle() {
        let mut body = OrbitingBody::new()
            .with_orbit_radius(4.0)
            .with_orbit_spin_rate(std::f32::consts::FRAC_PI_2)
            .with_axis_spin_rate(0.0);
        body.advance(1.0, None);

        // A quarter turn about +Y carries +X onto -Z.
        assert!(body.world_position().abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), EPS));
    }

    #[test]
    fn child_orbit_ignores_parent_spin() {
        let mut parent = OrbitingBody::new()
            .with_scale(1.5)
            .with_axis_tilt(0.4)
            .with_axis_spin_rate(3.0)
            .with_orbit_spin_rate(0.0);
        parent.refresh(None);

        let mut child = OrbitingBody::new()
            .with_orbit_radius(2.0)
            .with_orbit_spin_rate(0.0)
            .with_axis_spin_rate(0.0);
        child.refresh(Some(&parent.pose()));
        let before = *child.world_matrix();

        for _ in 0..10 {
            parent.advance(0.37, None);
            child.advance(0.37, Some(&parent.pose()));
        }
        assert!(parent.axis_angle() > 0.0);

        // Built the other way round: the parent's frame without its spin.
        let spinless_parent = Mat4::from_axis_angle(RIGHT_AXIS, 0.4)
            * Mat4::from_scale(Vec3::splat(1.5));
        let expected = spinless_parent * Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0));

        assert!(child.world_matrix().abs_diff_eq(expected, EPS));
        assert!(child.world_matrix().abs_diff_eq(before, EPS));
    }

    #[test]
    fn compute_is_pure() {
        let mut body = OrbitingBody::new().with_orbit_radius(1.0);
        body.advance(0.5, None);
        let a = body.compute_world_matrix(None);
        let b = body.compute_world_matrix(None);
        assert_eq!(a, b);
        assert_eq!(&a, body.world_matrix());
    }
}
