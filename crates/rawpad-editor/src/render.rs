//! Renderer — one complete frame from a session.
//!
//! [`render_frame`] is a pure function of the session: same state, same
//! bytes. It writes the whole frame into the caller's buffer, and the
//! caller sends that buffer to the terminal in a single write.
//!
//! Frame layout:
//!
//! ```text
//! ESC[?25l ESC[H                     hide cursor, go home
//! <row 0> ESC[K \r\n                 content line, banner, or filler
//! ...
//! <row rows-1> ESC[K                 no line break after the last row
//! ESC[<y+1>;<x+1>H ESC[?25h          place and show the cursor
//! ```
//!
//! Rows are drawn from the top of the buffer; there is no scrolling.
//! Text wider than the viewport is cut at the last whole grapheme that
//! fits, measured in display cells.

use std::io::{self, Write};

use rawpad_term::ansi;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::session::EditorSession;

/// Compose the frame for `session` into `w`.
///
/// # Errors
///
/// Propagates write failures from `w`.
pub fn render_frame(session: &EditorSession, w: &mut impl Write) -> io::Result<()> {
    let extent = session.viewport().extent();
    let cursor = session.viewport().cursor();
    let lines = session.lines();
    let options = session.options();
    let columns = usize::from(extent.columns);
    let banner_row = extent.rows / 3;

    ansi::cursor_hide(w)?;
    ansi::cursor_home(w)?;

    for y in 0..extent.rows {
        if let Some(line) = lines.line(usize::from(y)) {
            w.write_all(fit(line, columns).as_bytes())?;
        } else if lines.is_empty() && y == banner_row {
            draw_banner(w, &options.banner, options.filler, columns)?;
        } else {
            write!(w, "{}", options.filler)?;
        }

        ansi::clear_line(w)?;
        if y + 1 < extent.rows {
            ansi::newline(w)?;
        }
    }

    ansi::cursor_to(w, cursor.x, cursor.y)?;
    ansi::cursor_show(w)
}

/// Centered banner: filler glyph, padding spaces, then the text.
fn draw_banner(w: &mut impl Write, banner: &str, filler: char, columns: usize) -> io::Result<()> {
    let padding = columns.saturating_sub(banner.width()) / 2;
    if padding > 0 {
        write!(w, "{filler}{}", " ".repeat(padding - 1))?;
    }
    w.write_all(fit(banner, columns).as_bytes())
}

/// The longest prefix of `text` that fits in `width` display cells.
fn fit(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut end = 0;

    for (idx, grapheme) in text.grapheme_indices(true) {
        used += grapheme.width();
        if used > width {
            break;
        }
        end = idx + grapheme.len();
    }

    &text[..end]
}
