//! User Interface module
//!
//! Terminal front end using ratatui.

pub mod app;

pub use app::App;
