use std::collections::HashSet;

use glam::DVec2;

use super::types::{InputEvent, Modifiers, MouseButton, MouseButtonState};

/// Current input state for a single window.
///
/// Holds "is down" information and the pointer position.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Last known pointer position in logical pixels. Kept when the pointer
    /// leaves the window.
    pub pointer_pos: DVec2,

    /// Whether the pointer is over the window.
    pub hovered: bool,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match *ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = m;
            }

            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // On focus loss the release events go elsewhere; forget held
                    // buttons so a drag does not stay stuck.
                    self.buttons_down.clear();
                    self.modifiers = Modifiers::NONE;
                }
            }

            InputEvent::PointerMoved(pos) => {
                self.pointer_pos = pos;
                self.hovered = true;
            }

            InputEvent::PointerLeft => {
                self.hovered = false;
            }

            InputEvent::PointerButton { button, state } => match state {
                MouseButtonState::Pressed => {
                    self.buttons_down.insert(button);
                }
                MouseButtonState::Released => {
                    self.buttons_down.remove(&button);
                }
            },
        }
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: MouseButton) -> InputEvent {
        InputEvent::PointerButton {
            button,
            state: MouseButtonState::Pressed,
        }
    }

    fn release(button: MouseButton) -> InputEvent {
        InputEvent::PointerButton {
            button,
            state: MouseButtonState::Released,
        }
    }

    #[test]
    fn tracks_held_buttons() {
        let mut state = InputState::default();
        state.apply_event(&press(MouseButton::Left));
        state.apply_event(&press(MouseButton::Middle));
        state.apply_event(&release(MouseButton::Left));

        assert!(!state.button_down(MouseButton::Left));
        assert!(state.button_down(MouseButton::Middle));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        state.apply_event(&InputEvent::ModifiersChanged(Modifiers::SHIFT));
        state.apply_event(&press(MouseButton::Left));
        state.apply_event(&InputEvent::Focused(false));

        assert!(state.buttons_down.is_empty());
        assert!(!state.modifiers.any());
    }

    #[test]
    fn pointer_position_outlives_leaving() {
        let mut state = InputState::default();
        state.apply_event(&InputEvent::PointerMoved(DVec2::new(10.0, 20.0)));
        state.apply_event(&InputEvent::PointerLeft);

        assert!(!state.hovered);
        assert_eq!(state.pointer_pos, DVec2::new(10.0, 20.0));
    }
}
