use winit::event::MouseButton;
use winit::keyboard::NamedKey;

use crate::engine::animation_loop::AnimationControls;
use crate::engine::ecs::component::TurntableCamera;
use crate::engine::user_input::InputState;

/// Button that has to be held for mouse-drag orbiting.
pub const ORBIT_BUTTON: MouseButton = MouseButton::Right;

/// Input-to-camera gains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraInputSettings {
    /// Radians per pixel of mouse drag.
    pub rotate_speed: f32,
    /// Radius units per wheel line.
    pub zoom_speed: f32,
    /// Radians per second while an arrow key is held.
    pub keyboard_orbit_speed: f32,
}

impl Default for CameraInputSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            zoom_speed: 0.5,
            keyboard_orbit_speed: 1.0,
        }
    }
}

/// Maps the frame's input snapshot onto the camera and the animation controls.
///
/// Bindings:
/// - right drag: azimuth from dx, polar from dy
/// - wheel: zoom
/// - arrow keys: keyboard orbit
/// - Space pause, R reset, +/= and - speed, 0 speed 1
#[derive(Debug, Default)]
pub struct InputSystem {
    pub settings: CameraInputSettings,
}

impl InputSystem {
    pub fn new(settings: CameraInputSettings) -> Self {
        Self { settings }
    }

    /// Apply one frame of input. `dt_sec` is wall time; pausing the animation
    /// never freezes the camera.
    pub fn process_input(
        &mut self,
        input: &InputState,
        dt_sec: f32,
        controls: &mut AnimationControls,
        camera: &mut TurntableCamera,
    ) {
        self.drive_camera(input, dt_sec, camera);
        self.drive_controls(input, controls);
    }

    fn drive_camera(&self, input: &InputState, dt_sec: f32, camera: &mut TurntableCamera) {
        let s = &self.settings;

        if input.mouse_held(ORBIT_BUTTON) {
            let (dx, dy) = input.mouse_movement();
            camera.change_azimuth(-dx * s.rotate_speed);
            camera.change_polar(dy * s.rotate_speed);
        }

        let (_, wheel_y) = input.wheel_delta;
        if wheel_y != 0.0 {
            camera.change_radius(-wheel_y * s.zoom_speed);
        }

        let step = s.keyboard_orbit_speed * dt_sec;
        let axis = |neg: NamedKey, pos: NamedKey| {
            (input.named_down(pos) as i32 - input.named_down(neg) as i32) as f32
        };
        let horizontal = axis(NamedKey::ArrowLeft, NamedKey::ArrowRight);
        // Positive polar lowers the eye, so Up subtracts.
        let vertical = axis(NamedKey::ArrowUp, NamedKey::ArrowDown);
        if horizontal != 0.0 {
            camera.change_azimuth(horizontal * step);
        }
        if vertical != 0.0 {
            camera.change_polar(vertical * step);
        }
    }

    fn drive_controls(&self, input: &InputState, controls: &mut AnimationControls) {
        if input.named_pressed(NamedKey::Space) {
            controls.toggle_pause();
            log::info!(
                "[InputSystem] animation {}",
                if controls.paused { "paused" } else { "resumed" }
            );
        }

        if input.char_pressed("r") {
            controls.request_reset();
        }

        let before = controls.speed();
        if input.char_pressed("+") || input.char_pressed("=") {
            controls.speed_up();
        }
        if input.char_pressed("-") {
            controls.slow_down();
        }
        if input.char_pressed("0") {
            controls.set_speed(1.0);
        }
        if controls.speed() != before {
            log::info!("[InputSystem] animation speed {:.3}x", controls.speed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::user_input::UserInput;
    use winit::event::ElementState;
    use winit::keyboard::{Key, KeyCode, PhysicalKey};

    struct Rig {
        system: InputSystem,
        controls: AnimationControls,
        camera: TurntableCamera,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                system: InputSystem::default(),
                controls: AnimationControls::default(),
                camera: TurntableCamera::default(),
            }
        }

        fn run(&mut self, input: &mut UserInput, dt: f32) {
            input.latch_frame();
            self.system
                .process_input(input.state(), dt, &mut self.controls, &mut self.camera);
            input.end_frame();
        }
    }

    #[test]
    fn right_drag_orbits_the_camera() {
        let mut rig = Rig::new();
        let mut input = UserInput::new();
        input.move_cursor(100.0, 100.0);
        rig.run(&mut input, 0.016);

        input.handle_mouse_button(MouseButton::Right, ElementState::Pressed);
        input.move_cursor(120.0, 90.0);
        rig.run(&mut input, 0.016);

        let s = rig.system.settings;
        assert!((rig.camera.azimuth() + 20.0 * s.rotate_speed).abs() < 1e-6);
        assert!((rig.camera.polar() + 10.0 * s.rotate_speed).abs() < 1e-6);
    }

    #[test]
    fn moving_without_the_button_does_nothing() {
        let mut rig = Rig::new();
        let mut input = UserInput::new();
        input.move_cursor(0.0, 0.0);
        rig.run(&mut input, 0.016);
        input.move_cursor(50.0, 50.0);
        rig.run(&mut input, 0.016);

        assert_eq!(rig.camera.azimuth(), 0.0);
        assert_eq!(rig.camera.polar(), 0.0);
    }

    #[test]
    fn wheel_up_zooms_in() {
        let mut rig = Rig::new();
        let mut input = UserInput::new();
        let before = rig.camera.radius();

        input.add_wheel(0.0, 2.0);
        rig.run(&mut input, 0.016);
        assert!((rig.camera.radius() - (before - 2.0 * rig.system.settings.zoom_speed)).abs() < 1e-6);
    }

    #[test]
    fn space_toggles_pause_once_per_press() {
        let mut rig = Rig::new();
        let mut input = UserInput::new();

        input.handle_key(PhysicalKey::Code(KeyCode::Space), Key::Named(NamedKey::Space), ElementState::Pressed);
        rig.run(&mut input, 0.016);
        assert!(rig.controls.paused);

        // Still held: no second toggle.
        rig.run(&mut input, 0.016);
        assert!(rig.controls.paused);
    }

    #[test]
    fn keys_drive_reset_and_speed() {
        let mut rig = Rig::new();
        let mut input = UserInput::new();

        input.handle_key(PhysicalKey::Code(KeyCode::KeyR), Key::Character("r".into()), ElementState::Pressed);
        input.handle_key(PhysicalKey::Code(KeyCode::Equal), Key::Character("=".into()), ElementState::Pressed);
        rig.run(&mut input, 0.016);
        assert!(rig.controls.reset_requested());
        assert!((rig.controls.speed() - 1.25).abs() < 1e-6);

        input.handle_key(PhysicalKey::Code(KeyCode::Digit0), Key::Character("0".into()), ElementState::Pressed);
        rig.run(&mut input, 0.016);
        assert_eq!(rig.controls.speed(), 1.0);
    }

    #[test]
    fn arrow_keys_orbit_with_wall_time() {
        let mut rig = Rig::new();
        rig.controls.paused = true;
        let mut input = UserInput::new();

        input.handle_key(PhysicalKey::Code(KeyCode::ArrowRight), Key::Named(NamedKey::ArrowRight), ElementState::Pressed);
        input.handle_key(PhysicalKey::Code(KeyCode::ArrowUp), Key::Named(NamedKey::ArrowUp), ElementState::Pressed);
        rig.run(&mut input, 0.5);

        let k = rig.system.settings.keyboard_orbit_speed;
        assert!((rig.camera.azimuth() - 0.5 * k).abs() < 1e-6);
        assert!((rig.camera.polar() + 0.5 * k).abs() < 1e-6);
    }
}
