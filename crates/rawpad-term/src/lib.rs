// SPDX-License-Identifier: MIT
//
// rawpad-term — Terminal layer for rawpad.
//
// Everything that touches the real terminal lives here: raw mode via
// termios, viewport measurement, the background stdin reader, framing of
// raw input chunks into per-key events, ANSI encoding, and the blocking
// event loop that paints one frame per processed event.
//
// Frames are composed in memory and written with a single write() so
// the user never sees a half-drawn screen.

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::{Result, TermError};
