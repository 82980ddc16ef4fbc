// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, viewport size, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are
// the standard POSIX interfaces for terminal control and have no safe
// alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// This module owns the terminal's raw state. It enters raw mode via termios
// and guarantees restoration on every exit path: explicit `leave()`, drop,
// and panic. The panic hook bypasses Rust's stdout lock and writes a
// pre-built restore sequence straight to fd 1, then restores termios from
// a global backup before the original hook prints its message.
//
// Unlike a full-screen TUI we stay on the main screen: raw mode is the
// only mode switch. Leaving clears the screen so no stale frame remains
// under the shell prompt.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use tracing::debug;

use crate::ansi;
use crate::error::{Result, TermError};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`Terminal`] struct owns its own copy, but the panic hook can't
/// access it. This global backup lets the hook restore cooked mode
/// without the struct.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Restore sequence for emergency use: show cursor, clear, home.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[?25h\x1b[2J\x1b[H";

/// Ensures the panic hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal with no
/// echo and no line editing, and the panic message lands on a screen
/// that does not translate newlines.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor.
///
/// Bypasses `io::stdout()` so a panic raised while the lock is held
/// (mid-frame write) cannot deadlock.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle with RAII cleanup.
///
/// Call [`enter`](Self::enter) to switch to raw mode. The terminal is
/// restored when the handle is dropped, even on panic.
///
/// # Example
///
/// ```no_run
/// use rawpad_term::terminal::Terminal;
///
/// let mut term = Terminal::new()?;
/// term.enter()?;
/// // ... render frames, handle input ...
/// // Terminal is restored automatically on drop.
/// # Ok::<(), rawpad_term::TermError>(())
/// ```
pub struct Terminal {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Viewport size measured at construction.
    size: Size,

    /// Whether raw mode is active.
    active: bool,
}

impl Terminal {
    /// Create a terminal handle and measure the viewport.
    ///
    /// Does **not** enter raw mode; call [`enter`](Self::enter) for that.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::SizeUnavailable`] if the dimensions cannot be
    /// read (stdout is not a terminal, or the ioctl fails).
    pub fn new() -> Result<Self> {
        let size = get_size().ok_or(TermError::SizeUnavailable)?;
        Ok(Self::with_size(size))
    }

    /// Create a handle with a known size, skipping the OS query.
    #[must_use]
    pub const fn with_size(size: Size) -> Self {
        Self {
            #[cfg(unix)]
            original_termios: None,
            size,
            active: false,
        }
    }

    /// Viewport size (columns, rows).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the terminal size from the OS.
    ///
    /// Keeps the cached size if the query fails.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(s) = get_size() {
            self.size = s;
        }
        self.size
    }

    /// Whether raw mode is currently active.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter raw mode.
    ///
    /// Idempotent: calling `enter()` while already active is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::NotATty`] if stdin is not a terminal, or an I/O
    /// error if termios cannot be read or applied.
    pub fn enter(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }
        if !is_tty() {
            return Err(TermError::NotATty);
        }

        install_panic_hook();
        self.enable_raw_mode()?;

        self.active = true;
        debug!(cols = self.size.cols, rows = self.size.rows, "entered raw mode");
        Ok(())
    }

    /// Leave raw mode and restore the terminal.
    ///
    /// Clears the screen, homes and shows the cursor, then restores the
    /// saved termios. During a panic only the cursor is shown, so the
    /// message the panic hook printed stays on screen. Idempotent: calling
    /// `leave()` while inactive is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or termios restore fails.
    pub fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        write_restore(&mut lock, std::thread::panicking())?;
        lock.flush()?;
        drop(lock);

        self.disable_raw_mode()?;
        self.active = false;
        debug!("restored terminal mode");
        Ok(())
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original_termios = Some(termios);

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            // cfmakeraw equivalent. IXON off frees Ctrl-Q; ISIG off turns
            // Ctrl-C/Ctrl-Z into plain bytes.
            termios.c_iflag &= !(libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &=
                !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
            termios.c_cflag |= libc::CS8;

            // VMIN=1, VTIME=0: read() blocks until at least 1 byte available.
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            use std::os::unix::io::AsRawFd;
            let fd = io::stdin().as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Screen cleanup written on leave.
///
/// A panicking thread has already printed its message below the emergency
/// restore, so it gets the cursor back and nothing else.
fn write_restore(w: &mut impl Write, panicking: bool) -> io::Result<()> {
    if !panicking {
        ansi::clear_screen(w)?;
        ansi::cursor_home(w)?;
    }
    ansi::cursor_show(w)
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // ── Size ──────────────────────────────────────────────────────────

    #[test]
    fn size_default_is_unmeasured() {
        assert_eq!(Size::default(), Size { cols: 0, rows: 0 });
    }

    #[test]
    fn size_equality() {
        assert_eq!(Size { cols: 80, rows: 24 }, Size { cols: 80, rows: 24 });
        assert_ne!(Size { cols: 80, rows: 24 }, Size { cols: 120, rows: 40 });
    }

    // ── Terminal queries ─────────────────────────────────────────────

    #[test]
    fn get_size_never_reports_zero() {
        if let Some(s) = get_size() {
            assert!(s.cols > 0);
            assert!(s.rows > 0);
        }
    }

    #[test]
    fn is_tty_does_not_panic() {
        let _ = is_tty();
    }

    // ── Emergency restore sequence ──────────────────────────────────

    #[test]
    fn emergency_restore_shows_cursor() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.starts_with("\x1b[?25h"));
        assert!(s.contains("\x1b[2J"));
    }

    // ── Restore on leave ────────────────────────────────────────────

    fn restore_bytes(panicking: bool) -> Vec<u8> {
        let mut out = Vec::new();
        write_restore(&mut out, panicking).unwrap();
        out
    }

    #[test]
    fn restore_clears_screen_on_normal_exit() {
        assert_eq!(restore_bytes(false), b"\x1b[2J\x1b[H\x1b[?25h");
    }

    #[test]
    fn restore_keeps_panic_message_visible() {
        let out = restore_bytes(true);
        assert_eq!(out, b"\x1b[?25h");
        assert!(!out.windows(4).any(|w| w == b"\x1b[2J"));
    }

    #[test]
    fn restore_during_unwind_skips_clear() {
        /// Writes the leave sequence when dropped, like `Terminal` does.
        struct Guard(Arc<Mutex<Vec<u8>>>);
        impl Drop for Guard {
            fn drop(&mut self) {
                if let Ok(mut out) = self.0.lock() {
                    let _ = write_restore(&mut *out, std::thread::panicking());
                }
            }
        }

        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&written);
        let result = std::panic::catch_unwind(move || {
            let _guard = Guard(sink);
            std::panic::panic_any("raw mode panic");
        });

        assert!(result.is_err());
        assert_eq!(*written.lock().unwrap(), b"\x1b[?25h");
    }

    // ── Terminal struct ─────────────────────────────────────────────

    #[test]
    fn terminal_new_matches_os_query() {
        match Terminal::new() {
            Ok(term) => {
                assert!(!term.is_active());
                assert!(term.size().cols > 0);
            }
            Err(e) => assert!(matches!(e, TermError::SizeUnavailable)),
        }
    }

    #[test]
    fn with_size_is_inactive() {
        let term = Terminal::with_size(Size { cols: 80, rows: 24 });
        assert!(!term.is_active());
        assert_eq!(term.size(), Size { cols: 80, rows: 24 });
    }

    #[test]
    fn enter_without_tty_fails() {
        if is_tty() {
            return;
        }
        let mut term = Terminal::with_size(Size { cols: 80, rows: 24 });
        assert!(matches!(term.enter(), Err(TermError::NotATty)));
        assert!(!term.is_active());
    }

    #[test]
    fn leave_without_enter_is_noop() {
        let mut term = Terminal::with_size(Size { cols: 80, rows: 24 });
        term.leave().unwrap();
        term.leave().unwrap();
        assert!(!term.is_active());
    }

    #[test]
    fn refresh_size_keeps_cache_on_failure() {
        let mut term = Terminal::with_size(Size { cols: 10, rows: 5 });
        let s = term.refresh_size();
        assert_eq!(s, term.size());
        if get_size().is_none() {
            assert_eq!(s, Size { cols: 10, rows: 5 });
        }
    }

    #[test]
    fn drop_without_enter() {
        let term = Terminal::with_size(Size { cols: 80, rows: 24 });
        drop(term);
    }
}
