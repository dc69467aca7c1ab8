//! Frontend-agnostic input events.
//!
//! The terminal frontend translates its native event stream (crossterm) into
//! this enum so the application logic only handles one event shape.

use crossterm::event::{KeyCode, KeyModifiers, MouseEventKind};

#[derive(Debug, Clone, PartialEq)]
pub enum FrontendEvent {
    /// Keyboard input
    Key {
        code: KeyCode,
        modifiers: KeyModifiers,
    },
    /// Mouse input
    Mouse {
        kind: MouseEventKind,
        column: u16,
        row: u16,
    },
    /// Terminal resize
    Resize { width: u16, height: u16 },
    /// Application quit signal
    Quit,
}

impl FrontendEvent {
    /// Create a key event
    pub fn key(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::Key { code, modifiers }
    }

    /// Create a mouse event
    pub fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Self {
        Self::Mouse { kind, column, row }
    }

    /// Create a resize event
    pub fn resize(width: u16, height: u16) -> Self {
        Self::Resize { width, height }
    }

    /// Create a quit event
    pub fn quit() -> Self {
        Self::Quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let key_event = FrontendEvent::key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(matches!(key_event, FrontendEvent::Key { .. }));

        let mouse_event = FrontendEvent::mouse(MouseEventKind::Moved, 3, 7);
        assert!(matches!(
            mouse_event,
            FrontendEvent::Mouse { column: 3, row: 7, .. }
        ));

        let resize_event = FrontendEvent::resize(120, 40);
        assert!(matches!(
            resize_event,
            FrontendEvent::Resize {
                width: 120,
                height: 40
            }
        ));

        assert!(matches!(FrontendEvent::quit(), FrontendEvent::Quit));
    }
}
