// SPDX-License-Identifier: MIT
//
// Event loop — the heartbeat of the terminal application.
//
// stdin chunks arrive from the background reader, get framed into per-key
// events, the application handles each one, and a fresh frame is painted
// and written with a single write. One event is fully processed (handle,
// paint, write) before the next is looked at.
//
// # Blocking model
//
// The loop blocks on the reader channel with no timeout. Nothing happens
// between keystrokes: no ticks, no idle redraws, no resize polling. The
// only ways out are the application returning `Action::Quit`, stdin
// closing, or an I/O failure.
//
// # States
//
//   Running ──Quit──▶ Terminating (final frame, then teardown)
//
// Terminating is absorbing: `run` always restores the terminal before
// returning, whatever the outcome of the loop.

use std::io::{self, Write};
use std::sync::mpsc::Receiver;

use tracing::{debug, trace};

use crate::error::Result;
use crate::input::{InputEvent, split_events};
use crate::output::FrameBuffer;
use crate::reader::{Chunk, StdinReader};
use crate::terminal::{Size, Terminal};

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Paint one final frame and leave the loop.
    Quit,
}

/// Why the event loop ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The application returned [`Action::Quit`].
    Quit,
    /// stdin was closed.
    InputClosed,
}

/// Application interface for the event loop.
pub trait App {
    /// Handle one input event.
    ///
    /// Return [`Action::Quit`] to end the loop after the next paint.
    fn on_event(&mut self, event: &InputEvent) -> Action;

    /// Compose the current state into `frame`.
    ///
    /// The buffer is fresh and empty on every call; everything written
    /// here reaches the terminal in one write.
    ///
    /// # Errors
    ///
    /// Propagates failures from writing into `frame`.
    fn paint(&mut self, frame: &mut FrameBuffer) -> io::Result<()>;
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// Owns the terminal. Call [`run`](Self::run) to enter raw mode and
/// process input until the application quits.
///
/// # Example
///
/// ```no_run
/// use std::io::{self, Write};
///
/// use rawpad_term::event_loop::{Action, App, EventLoop};
/// use rawpad_term::input::InputEvent;
/// use rawpad_term::output::FrameBuffer;
///
/// struct Echo;
///
/// impl App for Echo {
///     fn on_event(&mut self, event: &InputEvent) -> Action {
///         if event.bytes() == b"\x11" {
///             return Action::Quit;
///         }
///         Action::Continue
///     }
///
///     fn paint(&mut self, frame: &mut FrameBuffer) -> io::Result<()> {
///         frame.write_all(b"\x1b[Hhello")
///     }
/// }
///
/// let mut event_loop = EventLoop::new()?;
/// event_loop.run(&mut Echo)?;
/// # Ok::<(), rawpad_term::TermError>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
}

impl EventLoop {
    /// Create an event loop and measure the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal size cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
        })
    }

    /// The measured terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until the application quits or stdin closes.
    ///
    /// Enters raw mode, spawns the stdin reader, drives the loop against
    /// stdout, then stops the reader and restores the terminal (even if
    /// the loop failed).
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be entered, reading stdin fails,
    /// or writing a frame fails.
    pub fn run(&mut self, app: &mut impl App) -> Result<Exit> {
        self.terminal.enter()?;

        let (mut reader, rx) = StdinReader::spawn();

        let result = {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            drive(app, &rx, &mut out)
        };

        reader.stop();
        self.terminal.leave()?;

        if let Ok(exit) = result {
            debug!(?exit, "event loop finished");
        }
        result
    }
}

/// The loop itself, independent of the real terminal.
///
/// Paints the first frame, then for every event received on `rx`:
/// `on_event`, paint, one write to `out`. Returns after the frame that
/// follows [`Action::Quit`], or when the channel closes.
///
/// # Errors
///
/// Returns the first read error received on `rx`, or any failure to
/// paint or write a frame.
pub fn drive(app: &mut impl App, rx: &Receiver<Chunk>, out: &mut impl Write) -> Result<Exit> {
    present(app, out)?;

    loop {
        let Ok(chunk) = rx.recv() else {
            return Ok(Exit::InputClosed);
        };

        for event in split_events(&chunk?) {
            trace!(raw = ?event.raw, modifiers = ?event.modifiers, "input event");
            let action = app.on_event(&event);
            present(app, out)?;
            if action == Action::Quit {
                return Ok(Exit::Quit);
            }
        }
    }
}

/// Paint a fresh frame and write it in one call.
fn present(app: &mut impl App, out: &mut impl Write) -> io::Result<()> {
    let mut frame = FrameBuffer::new();
    app.paint(&mut frame)?;
    frame.flush_to(out)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
