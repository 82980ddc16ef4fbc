// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background stdin reader — collects raw bytes from the terminal.
//
// A dedicated thread reads stdin and sends each chunk through a channel.
// The event loop blocks on `recv()` with no timeout, so a chunk arriving
// is the only thing that wakes it: no idle redraw, no tick.
//
// Read failures travel down the same channel as data so the loop can
// surface them as fatal errors instead of silently stopping. EOF simply
// closes the channel.
//
// Shutdown: the thread waits on `poll()` with a short timeout and checks
// an `AtomicBool` stop flag between waits, so `stop()` never leaves it
// stuck inside a blocking `read()`.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

/// One message from the reader: a non-empty chunk or a read failure.
pub type Chunk = io::Result<Vec<u8>>;

/// Read buffer size. A keypress is 1-6 bytes; a paste can be kilobytes.
const READ_BUF_SIZE: usize = 4096;

/// How often the reader thread checks the stop flag (milliseconds).
const POLL_TIMEOUT_MS: i32 = 50;

/// Why the reader thread exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderExit {
    /// `stop()` was called.
    Stopped,
    /// stdin reached end of file.
    Eof,
    /// The receiving side was dropped.
    Disconnected,
    /// A read error was forwarded to the receiver.
    Failed,
}

/// Outcome of one wait-and-read step.
enum Step {
    /// Nothing to read yet.
    Idle,
    /// Bytes arrived.
    Data(Vec<u8>),
    /// End of file.
    Eof,
}

/// Background stdin reader thread.
///
/// Runs until [`stop`](Self::stop) is called, the `StdinReader` is
/// dropped, or stdin hits EOF.
///
/// # Example
///
/// ```no_run
/// use rawpad_term::reader::StdinReader;
///
/// let (reader, rx) = StdinReader::spawn();
///
/// while let Ok(Ok(bytes)) = rx.recv() {
///     println!("got {} bytes", bytes.len());
/// }
/// drop(reader);
/// ```
pub struct StdinReader {
    /// The reader thread handle. `None` after `stop()` joins it.
    handle: Option<JoinHandle<()>>,
    /// Shared flag to signal the thread to exit.
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Spawn the background reader thread.
    ///
    /// Returns the reader handle and the receiving end of the chunk
    /// channel. The channel closes when the thread exits.
    ///
    /// # Panics
    ///
    /// Panics if the OS cannot spawn a new thread.
    #[must_use]
    pub fn spawn() -> (Self, Receiver<Chunk>) {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                let exit = Self::run(&tx, &stop_flag);
                debug!(?exit, "stdin reader exited");
            })
            .expect("failed to spawn stdin reader thread");

        (
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        )
    }

    /// Signal the reader thread to stop and wait for it to exit.
    ///
    /// Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run(tx: &Sender<Chunk>, stop: &AtomicBool) -> ReaderExit {
        let mut buf = [0u8; READ_BUF_SIZE];

        loop {
            if stop.load(Ordering::Relaxed) {
                return ReaderExit::Stopped;
            }

            let msg = match read_step(&mut buf) {
                Ok(Step::Idle) => continue,
                Ok(Step::Eof) => return ReaderExit::Eof,
                Ok(Step::Data(bytes)) => Ok(bytes),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => Err(e),
            };

            let failed = msg.is_err();
            if tx.send(msg).is_err() {
                return ReaderExit::Disconnected;
            }
            if failed {
                return ReaderExit::Failed;
            }
        }
    }
}

/// Wait briefly for stdin to become readable, then read what is there.
#[cfg(unix)]
fn read_step(buf: &mut [u8]) -> io::Result<Step> {
    let fd = libc::STDIN_FILENO;

    let ready = unsafe {
        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
    };
    match ready {
        0 => return Ok(Step::Idle),
        r if r < 0 => return Err(io::Error::last_os_error()),
        _ => {}
    }

    let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
    match n {
        0 => Ok(Step::Eof),
        n if n < 0 => Err(io::Error::last_os_error()),
        #[allow(clippy::cast_sign_loss)] // n > 0 here.
        n => Ok(Step::Data(buf[..n as usize].to_vec())),
    }
}

/// Non-unix fallback: a plain blocking read. Shutdown waits for the next
/// keypress.
#[cfg(not(unix))]
fn read_step(buf: &mut [u8]) -> io::Result<Step> {
    use std::io::Read;

    match io::stdin().lock().read(buf)? {
        0 => Ok(Step::Eof),
        n => Ok(Step::Data(buf[..n].to_vec())),
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
