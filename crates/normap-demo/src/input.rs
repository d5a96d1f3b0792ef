//! Keyboard and mouse state feeding the camera.

use winit::event::MouseScrollDelta;
use winit::keyboard::KeyCode;

use crate::camera::{Camera, Movement};

// Pixels of touchpad scroll per line of wheel scroll.
const PIXELS_PER_LINE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    None,
    Exit,
}

/// Movement keys currently held down.
#[derive(Debug, Default, Clone)]
pub struct Controls {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
}

impl Controls {
    pub fn handle_key(&mut self, code: KeyCode, pressed: bool) -> ControlAction {
        match code {
            KeyCode::Escape if pressed => return ControlAction::Exit,
            KeyCode::KeyW => self.forward = pressed,
            KeyCode::KeyS => self.backward = pressed,
            KeyCode::KeyA => self.left = pressed,
            KeyCode::KeyD => self.right = pressed,
            _ => {}
        }
        ControlAction::None
    }

    /// Move the camera for every held key over `delta_time` seconds.
    pub fn apply(&self, camera: &mut Camera, delta_time: f32) {
        let held = [
            (self.forward, Movement::Forward),
            (self.backward, Movement::Backward),
            (self.left, Movement::Left),
            (self.right, Movement::Right),
        ];
        for (_, movement) in held.into_iter().filter(|(down, _)| *down) {
            camera.process_keyboard(movement, delta_time);
        }
    }

    /// Raw mouse motion. Screen Y grows downwards, so it is reversed.
    pub fn mouse_motion(&self, camera: &mut Camera, dx: f64, dy: f64) {
        camera.process_mouse_movement(dx as f32, -dy as f32, true);
    }

    pub fn scroll(&self, camera: &mut Camera, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y as f64,
            MouseScrollDelta::PixelDelta(position) => position.y / PIXELS_PER_LINE,
        };
        camera.process_mouse_scroll(lines as f32);
    }
}
