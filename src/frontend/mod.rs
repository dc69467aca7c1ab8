//! Terminal frontend: event conversion and ratatui rendering.

pub mod events;
pub mod tui;

pub use events::FrontendEvent;
pub use tui::TuiFrontend;
