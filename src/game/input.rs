//! Input events and their translation
//!
//! Front ends push raw [`InputEvent`]s. Once per frame the game turns
//! them into held movement flags plus a list of one-shot [`Action`]s.

use crate::entities::MovementIntent;

/// Analog values smaller than this count as centered
const STICK_DEADZONE: f32 = 0.2;

/// Logical keys; front ends map physical keys onto these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    Attack,
    Special,
    /// Use a portal, confirm a menu entry
    Confirm,
    Menu,
    SkillTree,
    Map,
    CursorUp,
    CursorDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamepadButton {
    South,
    East,
    West,
    North,
    Start,
    Select,
    DPadUp,
    DPadDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamepadAxis {
    LeftStickX,
    LeftStickY,
}

/// A raw event from the window or terminal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    MouseClick(MouseButton),
    /// Pointer position in front-end coordinates
    MouseMove { x: f32, y: f32 },
    GamepadButton { button: GamepadButton, pressed: bool },
    GamepadAxis { axis: GamepadAxis, value: f32 },
}

/// A discrete request, consumed on the frame it arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Attack,
    Special,
    Confirm,
    ToggleMenu,
    ToggleSkillTree,
    ToggleMap,
    CursorUp,
    CursorDown,
}

fn key_action(key: Key) -> Option<Action> {
    match key {
        Key::Attack => Some(Action::Attack),
        Key::Special => Some(Action::Special),
        Key::Confirm => Some(Action::Confirm),
        Key::Menu => Some(Action::ToggleMenu),
        Key::SkillTree => Some(Action::ToggleSkillTree),
        Key::Map => Some(Action::ToggleMap),
        Key::CursorUp => Some(Action::CursorUp),
        Key::CursorDown => Some(Action::CursorDown),
        Key::Forward | Key::Back | Key::Left | Key::Right => None,
    }
}

fn set_held(intent: &mut MovementIntent, key: Key, held: bool) {
    match key {
        Key::Forward => intent.forward = held,
        Key::Back => intent.back = held,
        Key::Left => intent.left = held,
        Key::Right => intent.right = held,
        _ => {}
    }
}

fn button_action(button: GamepadButton) -> Action {
    match button {
        GamepadButton::South => Action::Attack,
        GamepadButton::West => Action::Special,
        GamepadButton::North | GamepadButton::East => Action::Confirm,
        GamepadButton::Start => Action::ToggleMenu,
        GamepadButton::Select => Action::ToggleSkillTree,
        GamepadButton::DPadUp => Action::CursorUp,
        GamepadButton::DPadDown => Action::CursorDown,
    }
}

fn deadzone(value: f32) -> f32 {
    if value.abs() < STICK_DEADZONE {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Apply one event to the held movement state, returning the action it
/// triggers, if any. Only press edges trigger actions.
pub fn translate(event: InputEvent, intent: &mut MovementIntent) -> Option<Action> {
    match event {
        InputEvent::KeyDown(key) => {
            set_held(intent, key, true);
            key_action(key)
        }
        InputEvent::KeyUp(key) => {
            set_held(intent, key, false);
            None
        }
        InputEvent::MouseClick(MouseButton::Left) => Some(Action::Attack),
        InputEvent::MouseClick(MouseButton::Right) => Some(Action::Special),
        InputEvent::MouseMove { .. } => None,
        InputEvent::GamepadButton { button, pressed } => pressed.then(|| button_action(button)),
        InputEvent::GamepadAxis { axis, value } => {
            match axis {
                GamepadAxis::LeftStickX => intent.axis_x = deadzone(value),
                GamepadAxis::LeftStickY => intent.axis_z = deadzone(value),
            }
            None
        }
    }
}
