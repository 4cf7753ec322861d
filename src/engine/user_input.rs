//! Input handling (winit -> engine state).
//!
//! `Windowing` only forwards events; `UserInput` folds them into an `InputState`
//! snapshot that the input system reads once per frame.

use std::collections::{HashMap, HashSet};

use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, NamedKey, PhysicalKey};

/// Pixel-delta scroll events are divided by this to get "lines".
const PIXELS_PER_SCROLL_LINE: f32 = 40.0;

/// Snapshot of user input for one frame.
///
/// - current key/button state (`down`)
/// - transitions since the last frame (`pressed`/`released`)
/// - cursor position, cursor delta and wheel delta
#[derive(Default, Debug, Clone)]
pub struct InputState {
    /// Held keys by physical key, with the logical key seen at press time.
    pub keys_down: HashMap<PhysicalKey, Key>,
    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,

    pub mouse_down: HashSet<MouseButton>,
    pub mouse_pressed: HashSet<MouseButton>,
    pub mouse_released: HashSet<MouseButton>,

    /// Cursor position in physical pixels (as reported by winit).
    pub cursor_pos: Option<(f32, f32)>,

    /// Cursor position at the previous latch.
    prev_cursor_pos: Option<(f32, f32)>,

    /// Cursor movement between the last two latches.
    mouse_movement: (f32, f32),

    /// Wheel delta accumulated since the last `end_frame`, in lines.
    pub wheel_delta: (f32, f32),
}

impl InputState {
    /// Compute this frame's cursor delta. Call once before the state is read.
    pub fn latch_frame(&mut self) {
        self.mouse_movement = match (self.cursor_pos, self.prev_cursor_pos) {
            (Some((cx, cy)), Some((px, py))) => (cx - px, cy - py),
            _ => (0.0, 0.0),
        };
        self.prev_cursor_pos = self.cursor_pos;
    }

    /// Clear per-frame transitions once the frame has consumed them.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
        self.wheel_delta = (0.0, 0.0);
    }

    #[inline]
    pub fn named_down(&self, key: NamedKey) -> bool {
        self.keys_down.values().any(|k| *k == Key::Named(key))
    }

    #[inline]
    pub fn named_pressed(&self, key: NamedKey) -> bool {
        self.keys_pressed.contains(&Key::Named(key))
    }

    /// Case-insensitive check for a character key pressed this frame.
    pub fn char_pressed(&self, c: &str) -> bool {
        self.keys_pressed.iter().any(|k| match k {
            Key::Character(s) => s.eq_ignore_ascii_case(c),
            _ => false,
        })
    }

    #[inline]
    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_down.contains(&button)
    }

    /// Returns the mouse movement delta (dx, dy) since the last frame.
    /// Returns (0, 0) if cursor position is not available.
    #[inline]
    pub fn mouse_movement(&self) -> (f32, f32) {
        self.mouse_movement
    }
}

/// Stateful input event processor.
#[derive(Default, Debug, Clone)]
pub struct UserInput {
    state: InputState,
}

impl UserInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn latch_frame(&mut self) {
        self.state.latch_frame();
    }

    pub fn end_frame(&mut self) {
        self.state.end_frame();
    }

    /// Feed a winit event into this input handler.
    ///
    /// Returns `true` if the event was recognized/consumed as input.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(event.physical_key, event.logical_key.clone(), event.state);
                true
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(*button, *state);
                true
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor_pos = Some((position.x as f32, position.y as f32));
                true
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                    MouseScrollDelta::PixelDelta(pos) => (
                        pos.x as f32 / PIXELS_PER_SCROLL_LINE,
                        pos.y as f32 / PIXELS_PER_SCROLL_LINE,
                    ),
                };
                self.add_wheel(dx, dy);
                true
            }

            WindowEvent::Focused(false) => {
                // Releases are lost while unfocused; drop held state instead of sticking.
                self.state.keys_down.clear();
                self.state.mouse_down.clear();
                true
            }

            _ => false,
        }
    }

    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.state.mouse_down.insert(button) {
                    self.state.mouse_pressed.insert(button);
                }
            }
            ElementState::Released => {
                self.state.mouse_down.remove(&button);
                self.state.mouse_released.insert(button);
            }
        }
    }

    /// Held state follows the physical key: the logical key can change with
    /// modifiers between press and release (Shift+R pressed, "r" released).
    pub fn handle_key(&mut self, physical: PhysicalKey, key: Key, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // Key repeat arrives as extra presses; only the first counts.
                if !self.state.keys_down.contains_key(&physical) {
                    self.state.keys_down.insert(physical, key.clone());
                    self.state.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                let pressed_as = self.state.keys_down.remove(&physical).unwrap_or(key);
                self.state.keys_released.insert(pressed_as);
            }
        }
    }

    pub fn move_cursor(&mut self, x: f32, y: f32) {
        self.state.cursor_pos = Some((x, y));
    }

    pub fn add_wheel(&mut self, dx: f32, dy: f32) {
        self.state.wheel_delta.0 += dx;
        self.state.wheel_delta.1 += dy;
    }
}
