use serde::{Deserialize, Serialize};

/// Raw player input for one tick, as polled from the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    /// Analog horizontal axis in [-1, 1].
    pub axis_x: f32,
    /// Digital left/right buttons.
    pub left: bool,
    pub right: bool,
    /// Jump button held this tick.
    pub jump_held: bool,
}

/// What the player wants this tick, after deadzone and edge detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveIntent {
    /// -1, 0 or +1.
    pub horizontal: f32,
    /// True only on the tick the jump button went down.
    pub jump_pressed: bool,
}

/// Snap an analog axis to -1, 0 or +1. Values must exceed `deadzone` in
/// magnitude to register.
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value > deadzone {
        1.0
    } else if value < -deadzone {
        -1.0
    } else {
        0.0
    }
}

/// Edge detector for the jump button.
#[derive(Debug, Clone, Copy, Default)]
pub struct JumpButton {
    was_down: bool,
}

impl JumpButton {
    /// Feed the current held state; returns true on the press edge only.
    pub fn update(&mut self, down: bool) -> bool {
        let pressed = down && !self.was_down;
        self.was_down = down;
        pressed
    }
}

/// Turns raw per-tick input into a `MoveIntent`.
#[derive(Debug, Clone, Copy)]
pub struct PlayerInput {
    deadzone: f32,
    jump: JumpButton,
}

impl PlayerInput {
    pub fn new(deadzone: f32) -> Self {
        Self {
            deadzone,
            jump: JumpButton::default(),
        }
    }

    pub fn sample(&mut self, raw: RawInput) -> MoveIntent {
        let digital = (raw.right as i32 - raw.left as i32) as f32;
        let horizontal = if digital != 0.0 {
            digital
        } else {
            apply_deadzone(raw.axis_x, self.deadzone)
        };
        MoveIntent {
            horizontal,
            jump_pressed: self.jump.update(raw.jump_held),
        }
    }
}

impl Default for PlayerInput {
    fn default() -> Self {
        Self::new(0.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadzone_filters_drift() {
        assert_eq!(apply_deadzone(0.1, 0.3), 0.0);
        assert_eq!(apply_deadzone(-0.3, 0.3), 0.0);
        assert_eq!(apply_deadzone(0.31, 0.3), 1.0);
        assert_eq!(apply_deadzone(-0.9, 0.3), -1.0);
    }

    #[test]
    fn jump_fires_once_per_press() {
        let mut button = JumpButton::default();
        assert!(button.update(true));
        assert!(!button.update(true));
        assert!(!button.update(true));
        assert!(!button.update(false));
        assert!(button.update(true));
    }

    #[test]
    fn digital_buttons_override_axis() {
        let mut input = PlayerInput::new(0.3);
        let intent = input.sample(RawInput {
            axis_x: 0.8,
            left: true,
            ..RawInput::default()
        });
        assert_eq!(intent.horizontal, -1.0);
    }

    #[test]
    fn opposing_buttons_fall_back_to_axis() {
        let mut input = PlayerInput::new(0.3);
        let intent = input.sample(RawInput {
            axis_x: 0.2,
            left: true,
            right: true,
            ..RawInput::default()
        });
        assert_eq!(intent.horizontal, 0.0);
    }

    #[test]
    fn held_jump_is_one_intent() {
        let mut input = PlayerInput::default();
        let held = RawInput {
            jump_held: true,
            ..RawInput::default()
        };
        assert!(input.sample(held).jump_pressed);
        assert!(!input.sample(held).jump_pressed);
    }
}
