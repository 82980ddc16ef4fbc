//! Editor session — the aggregate root.
//!
//! One session exists for the lifetime of the process. It owns the
//! viewport (extent and cursor), the line buffer, and the options, and is
//! passed explicitly to whatever needs it. There is no global editor state.

use crate::buffer::LineBuffer;
use crate::cursor::{Extent, Viewport};
use crate::key::LogicalKey;
use crate::options::EditorOptions;

/// Everything the editor knows, in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSession {
    viewport: Viewport,
    lines: LineBuffer,
    options: EditorOptions,
}

impl EditorSession {
    /// Start a session with the cursor at the origin.
    #[must_use]
    pub const fn new(extent: Extent, lines: LineBuffer, options: EditorOptions) -> Self {
        Self {
            viewport: Viewport::new(extent),
            lines,
            options,
        }
    }

    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    #[must_use]
    pub const fn lines(&self) -> &LineBuffer {
        &self.lines
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Move the cursor. See [`Viewport::apply_movement`].
    pub fn apply_movement(&mut self, key: &LogicalKey) {
        self.viewport.apply_movement(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CursorPosition;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_session_starts_at_origin() {
        let s = EditorSession::new(Extent::new(80, 24), LineBuffer::new(), EditorOptions::default());
        assert_eq!(s.viewport().cursor(), CursorPosition::ORIGIN);
        assert_eq!(s.viewport().extent(), Extent::new(80, 24));
        assert!(s.lines().is_empty());
    }

    #[test]
    fn movement_goes_through_viewport() {
        let mut s = EditorSession::new(Extent::new(10, 5), LineBuffer::new(), EditorOptions::default());
        s.apply_movement(&LogicalKey::MoveRight);
        s.apply_movement(&LogicalKey::MoveDown);
        assert_eq!(s.viewport().cursor(), CursorPosition { x: 1, y: 1 });
    }

    #[test]
    fn movement_leaves_lines_untouched() {
        let lines: LineBuffer = ["hello"].into_iter().collect();
        let mut s = EditorSession::new(Extent::new(10, 5), lines.clone(), EditorOptions::default());
        s.apply_movement(&LogicalKey::End);
        s.apply_movement(&LogicalKey::Delete);
        assert_eq!(s.lines(), &lines);
    }
}
