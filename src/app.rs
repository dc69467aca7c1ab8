//! Application state and event routing.
//!
//! `App` owns the config and the face widget and turns frontend events into
//! widget updates. State mutations only mark the widget dirty; the main loop
//! repaints at most once per cycle, so a burst of events coalesces into a
//! single frame.

use crate::config::Config;
use crate::frontend::FrontendEvent;
use crate::ui::{FaceWidget, DEFAULT_HAPPINESS};
use crossterm::event::KeyCode;

/// Happiness step applied by the arrow keys.
const KEY_NUDGE: f32 = 5.0;

pub struct App {
    pub config: Config,
    pub face: FaceWidget,
    pub running: bool,
    pub needs_render: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let face = FaceWidget::new(config.face_color(), config.marker());
        Self {
            config,
            face,
            running: true,
            needs_render: true,
        }
    }

    pub fn handle_event(&mut self, event: FrontendEvent) {
        match event {
            FrontendEvent::Key { code, .. } => self.handle_key(code),
            FrontendEvent::Mouse { kind, row, .. } => {
                // The face is the only mouse consumer; unhandled kinds fall
                // through to nothing.
                self.face.handle_mouse(kind, row);
            }
            FrontendEvent::Resize { width, height } => {
                self.face.on_resize(width, height);
            }
            FrontendEvent::Quit => {
                self.running = false;
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Up => self.face.nudge(KEY_NUDGE),
            KeyCode::Down => self.face.nudge(-KEY_NUDGE),
            KeyCode::Char('r') => self.face.set_happiness(DEFAULT_HAPPINESS),
            _ => {}
        }
    }
}
