//! Game module - Core game logic and state management

mod collision;
mod input;
mod state;
mod time;

pub use collision::resolve_collisions;
pub use input::{translate, Action, GamepadAxis, GamepadButton, InputEvent, Key, MouseButton};
pub use state::{Game, GameMode, GAME_OVER_BUTTONS, MENU_BUTTONS};
pub use time::FixedStep;
