//! UI rendering and the terminal event loop.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod theme;
pub mod utils;
