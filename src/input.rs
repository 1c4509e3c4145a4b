//! Keyboard polling and the close flag.
//!
//! `Input` turns raw window events into "held" and "pressed this frame" sets.
//! `CloseFlag` watches those sets for the exit key and holds the run state of
//! the render loop.

use std::collections::HashSet;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard state tracking.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key was pressed this frame (just went down).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key is currently held down.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn press(&mut self, key: KeyCode) {
        // OS key repeat must not fire a second press
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    /// Called after each frame to clear per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if let PhysicalKey::Code(code) = event.physical_key {
                match event.state {
                    ElementState::Pressed => self.press(code),
                    ElementState::Released => self.release(code),
                }
            }
        }
    }
}

/// The only two states the render loop has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Closed,
}

/// Close flag checked at the top of every frame.
#[derive(Debug, Clone)]
pub struct CloseFlag {
    state: RunState,
    exit_key: Option<KeyCode>,
}

impl CloseFlag {
    pub fn new(exit_key: Option<KeyCode>) -> Self {
        Self {
            state: RunState::Running,
            exit_key,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn should_close(&self) -> bool {
        self.state == RunState::Closed
    }

    /// Window close button, or any other external request.
    pub fn request_close(&mut self) {
        self.state = RunState::Closed;
    }

    /// Consume this poll cycle's input. Returns true if the flag is now set.
    pub fn poll(&mut self, input: &Input) -> bool {
        if let Some(key) = self.exit_key {
            if input.key_pressed(key) {
                self.state = RunState::Closed;
            }
        }
        self.should_close()
    }
}
