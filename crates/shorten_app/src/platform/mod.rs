//! Terminal platform layer: configuration, the event loop, effect execution
//! and text rendering around the pure `shorten_core` state machine.
mod app;
mod clipboard;
mod config;
mod effects;
mod ui;

pub use app::run_app;
