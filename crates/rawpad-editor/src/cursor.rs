//! Cursor & viewport state — where the cursor is and how far it may go.
//!
//! The cursor lives in screen space: `(x, y)` are a column and a row of the
//! viewport, not a position in the text. Every movement clamps silently;
//! nothing here can fail.
//!
//! # PageDown
//!
//! PageDown sets `y = rows`, one row past the last visible one. This is
//! deliberate and kept as-is: a rendered cursor then sits just below the
//! viewport, and the next MoveUp or MoveDown pulls it back to `rows - 1`.
//! Every other movement keeps `y < max(rows, 1)`.

use rawpad_term::terminal::Size;

use crate::key::LogicalKey;

/// Viewport dimensions in cells. Zero means "not yet measured".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Extent {
    pub columns: u16,
    pub rows: u16,
}

impl Extent {
    #[must_use]
    pub const fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }

    /// Last addressable column (0 for an unmeasured viewport).
    #[inline]
    #[must_use]
    pub const fn last_column(self) -> u16 {
        self.columns.saturating_sub(1)
    }

    /// Last addressable row (0 for an unmeasured viewport).
    #[inline]
    #[must_use]
    pub const fn last_row(self) -> u16 {
        self.rows.saturating_sub(1)
    }
}

impl From<Size> for Extent {
    fn from(size: Size) -> Self {
        Self::new(size.cols, size.rows)
    }
}

/// Cursor position in viewport cells, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CursorPosition {
    pub x: u16,
    pub y: u16,
}

impl CursorPosition {
    /// The top-left cell.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };
}

/// Viewport extent plus the cursor inside it.
///
/// The only place the cursor is ever mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Viewport {
    extent: Extent,
    cursor: CursorPosition,
}

impl Viewport {
    /// A viewport of the given extent with the cursor at the origin.
    #[must_use]
    pub const fn new(extent: Extent) -> Self {
        Self {
            extent,
            cursor: CursorPosition::ORIGIN,
        }
    }

    #[inline]
    #[must_use]
    pub const fn extent(&self) -> Extent {
        self.extent
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    /// Apply one key to the cursor.
    ///
    /// Non-movement keys (`Delete`, `Quit`, `Other`) have no effect.
    pub fn apply_movement(&mut self, key: &LogicalKey) {
        let extent = self.extent;
        let c = &mut self.cursor;

        match key {
            LogicalKey::MoveLeft => c.x = c.x.saturating_sub(1),
            LogicalKey::MoveRight => c.x = c.x.saturating_add(1).min(extent.last_column()),
            LogicalKey::MoveUp => c.y = c.y.saturating_sub(1),
            LogicalKey::MoveDown => c.y = c.y.saturating_add(1).min(extent.last_row()),
            LogicalKey::PageUp => c.y = 0,
            LogicalKey::PageDown => c.y = extent.rows,
            LogicalKey::Home => c.x = 0,
            LogicalKey::End => c.x = extent.last_column(),
            LogicalKey::Delete | LogicalKey::Quit | LogicalKey::Other(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn viewport(columns: u16, rows: u16) -> Viewport {
        Viewport::new(Extent::new(columns, rows))
    }

    fn apply_n(vp: &mut Viewport, key: &LogicalKey, n: usize) {
        for _ in 0..n {
            vp.apply_movement(key);
        }
    }

    fn at(x: u16, y: u16) -> CursorPosition {
        CursorPosition { x, y }
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn starts_at_origin() {
        assert_eq!(viewport(80, 24).cursor(), CursorPosition::ORIGIN);
    }

    #[test]
    fn extent_from_size() {
        let e = Extent::from(Size { cols: 80, rows: 24 });
        assert_eq!(e, Extent::new(80, 24));
    }

    #[test]
    fn unmeasured_extent_bounds() {
        let e = Extent::default();
        assert_eq!(e.last_column(), 0);
        assert_eq!(e.last_row(), 0);
    }

    // -- Horizontal ---------------------------------------------------------

    #[test]
    fn move_right_five_times() {
        let mut vp = viewport(10, 5);
        apply_n(&mut vp, &LogicalKey::MoveRight, 5);
        assert_eq!(vp.cursor().x, 5);
    }

    #[test]
    fn move_right_clamps_at_last_column() {
        let mut vp = viewport(10, 5);
        apply_n(&mut vp, &LogicalKey::MoveRight, 20);
        assert_eq!(vp.cursor().x, 9);
    }

    #[test]
    fn move_left_clamps_at_zero() {
        let mut vp = viewport(10, 5);
        vp.apply_movement(&LogicalKey::MoveLeft);
        assert_eq!(vp.cursor(), CursorPosition::ORIGIN);
    }

    #[test]
    fn home_and_end() {
        let mut vp = viewport(10, 5);
        vp.apply_movement(&LogicalKey::End);
        assert_eq!(vp.cursor(), at(9, 0));
        vp.apply_movement(&LogicalKey::Home);
        assert_eq!(vp.cursor(), at(0, 0));
    }

    #[test]
    fn zero_columns_keeps_x_at_zero() {
        let mut vp = viewport(0, 0);
        vp.apply_movement(&LogicalKey::MoveRight);
        vp.apply_movement(&LogicalKey::End);
        assert_eq!(vp.cursor().x, 0);
    }

    // -- Vertical -----------------------------------------------------------

    #[test]
    fn move_down_clamps_at_last_row() {
        let mut vp = viewport(10, 5);
        apply_n(&mut vp, &LogicalKey::MoveDown, 9);
        assert_eq!(vp.cursor().y, 4);
    }

    #[test]
    fn move_up_clamps_at_zero() {
        let mut vp = viewport(10, 5);
        apply_n(&mut vp, &LogicalKey::MoveUp, 3);
        assert_eq!(vp.cursor().y, 0);
    }

    #[test]
    fn page_down_lands_one_past_last_row() {
        let mut vp = viewport(10, 5);
        vp.apply_movement(&LogicalKey::PageDown);
        assert_eq!(vp.cursor().y, 5);
    }

    #[test]
    fn moves_after_page_down_return_inside() {
        let mut vp = viewport(10, 5);
        vp.apply_movement(&LogicalKey::PageDown);
        vp.apply_movement(&LogicalKey::MoveDown);
        assert_eq!(vp.cursor().y, 4);

        vp.apply_movement(&LogicalKey::PageDown);
        vp.apply_movement(&LogicalKey::MoveUp);
        assert_eq!(vp.cursor().y, 4);
    }

    #[test]
    fn page_up_returns_to_top() {
        let mut vp = viewport(10, 5);
        apply_n(&mut vp, &LogicalKey::MoveDown, 3);
        vp.apply_movement(&LogicalKey::PageUp);
        assert_eq!(vp.cursor().y, 0);
    }

    // -- Idempotence --------------------------------------------------------

    #[test]
    fn jump_keys_are_idempotent() {
        for key in [LogicalKey::Home, LogicalKey::End, LogicalKey::PageUp, LogicalKey::PageDown] {
            let mut once = viewport(10, 5);
            apply_n(&mut once, &LogicalKey::MoveRight, 3);
            apply_n(&mut once, &LogicalKey::MoveDown, 2);
            let mut twice = once.clone();

            once.apply_movement(&key);
            apply_n(&mut twice, &key, 2);
            assert_eq!(once, twice, "{key:?}");
        }
    }

    // -- No-ops -------------------------------------------------------------

    #[test]
    fn non_movement_keys_do_nothing() {
        let mut vp = viewport(10, 5);
        apply_n(&mut vp, &LogicalKey::MoveRight, 2);
        let before = vp.cursor();
        vp.apply_movement(&LogicalKey::Delete);
        vp.apply_movement(&LogicalKey::Quit);
        vp.apply_movement(&LogicalKey::Other(b"x".to_vec()));
        assert_eq!(vp.cursor(), before);
    }

    // -- Properties ---------------------------------------------------------

    fn any_key() -> impl Strategy<Value = LogicalKey> {
        prop_oneof![
            Just(LogicalKey::MoveUp),
            Just(LogicalKey::MoveDown),
            Just(LogicalKey::MoveLeft),
            Just(LogicalKey::MoveRight),
            Just(LogicalKey::PageUp),
            Just(LogicalKey::PageDown),
            Just(LogicalKey::Home),
            Just(LogicalKey::End),
            Just(LogicalKey::Delete),
            Just(LogicalKey::Quit),
        ]
    }

    proptest! {
        #[test]
        fn cursor_stays_in_bounds(
            columns in 1u16..300,
            rows in 1u16..200,
            keys in proptest::collection::vec(any_key(), 0..64),
        ) {
            let mut vp = viewport(columns, rows);
            // Only PageDown leaves the cursor below the last row, and only
            // until the next vertical move.
            let mut paged = false;
            for key in &keys {
                vp.apply_movement(key);
                match key {
                    LogicalKey::PageDown => paged = true,
                    LogicalKey::MoveUp | LogicalKey::MoveDown | LogicalKey::PageUp => paged = false,
                    _ => {}
                }
                let c = vp.cursor();
                prop_assert!(c.x < columns);
                if paged {
                    prop_assert_eq!(c.y, rows);
                } else {
                    prop_assert!(c.y < rows);
                }
            }
        }
    }
}
