//! Platform-neutral input state
//!
//! Pointer and keyboard both steer the same target. A pointer move takes
//! priority for a short window, after which the keyboard axis drives the
//! target again. Pause, restart and fullscreen are latched on key press and
//! consumed once.

use glam::Vec2;

use crate::game::FrameInput;
use crate::tuning::Tuning;

/// Seconds a pointer move keeps priority over the keyboard
pub const POINTER_PRIORITY: f32 = 1.2;
/// Keyboard steering speed (units/s)
pub const KEYBOARD_SPEED: f32 = 900.0;

/// Logical keys, already mapped from physical ones by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Pause,
    Restart,
    Fullscreen,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HeldKeys {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    fire: bool,
}

impl HeldKeys {
    fn axis(&self) -> Vec2 {
        let x = self.right as i32 - self.left as i32;
        let y = self.down as i32 - self.up as i32;
        Vec2::new(x as f32, y as f32)
    }
}

#[derive(Debug, Clone)]
pub struct InputTracker {
    width: f32,
    height: f32,
    pointer: Vec2,
    pointer_down: bool,
    pointer_priority: f32,
    target: Vec2,
    held: HeldKeys,
    pause_pressed: bool,
    restart_pressed: bool,
    fullscreen_pressed: bool,
}

impl InputTracker {
    /// Starts with the target on the player's spawn point
    pub fn new(tuning: &Tuning) -> Self {
        let start = Vec2::new(tuning.center_x(), tuning.arena_height * 0.75);
        Self {
            width: tuning.arena_width,
            height: tuning.arena_height,
            pointer: start,
            pointer_down: false,
            pointer_priority: 0.0,
            target: start,
            held: HeldKeys::default(),
            pause_pressed: false,
            restart_pressed: false,
            fullscreen_pressed: false,
        }
    }

    fn clamp_to_arena(&self, pos: Vec2) -> Vec2 {
        pos.clamp(Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    /// Pointer moved, in world coordinates
    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.pointer = self.clamp_to_arena(pos);
        self.pointer_priority = POINTER_PRIORITY;
    }

    /// Primary button pressed at `pos`
    pub fn pointer_pressed(&mut self, pos: Vec2) {
        self.pointer_down = true;
        self.pointer_moved(pos);
    }

    pub fn pointer_released(&mut self) {
        self.pointer_down = false;
    }

    /// Key went down. Auto-repeats are ignored for the latched keys.
    pub fn key_pressed(&mut self, key: Key, repeat: bool) {
        match key {
            Key::Up => self.held.up = true,
            Key::Down => self.held.down = true,
            Key::Left => self.held.left = true,
            Key::Right => self.held.right = true,
            Key::Fire => self.held.fire = true,
            Key::Pause if !repeat => self.pause_pressed = true,
            Key::Restart if !repeat => self.restart_pressed = true,
            Key::Fullscreen if !repeat => self.fullscreen_pressed = true,
            _ => {}
        }
    }

    pub fn key_released(&mut self, key: Key) {
        match key {
            Key::Up => self.held.up = false,
            Key::Down => self.held.down = false,
            Key::Left => self.held.left = false,
            Key::Right => self.held.right = false,
            Key::Fire => self.held.fire = false,
            Key::Pause | Key::Restart | Key::Fullscreen => {}
        }
    }

    /// Window lost focus: nothing stays held
    pub fn focus_lost(&mut self) {
        self.held = HeldKeys::default();
        self.pointer_down = false;
    }

    /// Advance timers and the keyboard-driven target
    pub fn update(&mut self, dt: f32) {
        self.pointer_priority = (self.pointer_priority - dt).max(0.0);

        if self.pointer_priority > 0.0 {
            self.target = self.pointer;
            return;
        }
        let axis = self.held.axis();
        if axis != Vec2::ZERO {
            self.target = self.clamp_to_arena(self.target + axis * KEYBOARD_SPEED * dt);
        }
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn is_firing(&self) -> bool {
        self.pointer_down || self.held.fire
    }

    pub fn consume_pause(&mut self) -> bool {
        std::mem::take(&mut self.pause_pressed)
    }

    pub fn consume_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart_pressed)
    }

    pub fn consume_fullscreen(&mut self) -> bool {
        std::mem::take(&mut self.fullscreen_pressed)
    }

    /// Update, then package this frame's input for the session
    pub fn sample(&mut self, dt: f32) -> FrameInput {
        self.update(dt);
        FrameInput {
            target: self.target,
            firing: self.is_firing(),
            pause: self.consume_pause(),
            restart: self.consume_restart(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_pointer_is_clamped() {
        let mut input = InputTracker::new(&Tuning::default());
        input.pointer_moved(Vec2::new(-50.0, 5000.0));
        input.update(DT);
        assert_eq!(input.target(), Vec2::new(0.0, 1080.0));
    }

    #[test]
    fn test_keyboard_takes_over_after_pointer_window() {
        let mut input = InputTracker::new(&Tuning::default());
        input.pointer_moved(Vec2::new(500.0, 500.0));
        input.key_pressed(Key::Right, false);

        // Pointer still has priority
        input.update(0.5);
        assert_eq!(input.target(), Vec2::new(500.0, 500.0));

        input.update(0.8);
        // Window ran out on this frame: keyboard moved the target
        assert!(input.target().x > 500.0);
        let x = input.target().x;
        input.update(0.1);
        assert!((input.target().x - (x + 90.0)).abs() < 1e-3);
    }

    #[test]
    fn test_latches_consumed_once() {
        let mut input = InputTracker::new(&Tuning::default());
        input.key_pressed(Key::Pause, false);
        input.key_pressed(Key::Fullscreen, false);
        input.key_pressed(Key::Restart, true);

        let frame = input.sample(DT);
        assert!(frame.pause);
        assert!(!frame.restart);
        assert!(!input.sample(DT).pause);
        assert!(input.consume_fullscreen());
        assert!(!input.consume_fullscreen());
    }

    #[test]
    fn test_focus_loss_releases_fire() {
        let mut input = InputTracker::new(&Tuning::default());
        input.key_pressed(Key::Fire, false);
        input.pointer_pressed(Vec2::new(10.0, 10.0));
        assert!(input.is_firing());
        input.focus_lost();
        assert!(!input.is_firing());
    }
}
