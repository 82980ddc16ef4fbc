// SPDX-License-Identifier: MIT
//
// rawpad — a raw-mode terminal text viewer.
//
// This is the main binary that wires the crates together:
//
//   rawpad-term   → raw mode, stdin reader, input framing, event loop
//   rawpad-editor → key decoding, cursor state, frame rendering
//
// The Editor struct implements rawpad-term's App trait. Each keypress flows
// through:
//
//   stdin → split_events → on_event → decode → cursor movement | quit
//   paint → render_frame → FrameBuffer → one write → terminal
//
// Startup order: measure the terminal, load the file, build the session,
// enter raw mode, draw the first frame. Any terminal failure is fatal and
// exits with status 1; quitting with Ctrl-Q (or closing stdin) exits 0.

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use rawpad_editor::render::render_frame;
use rawpad_editor::{
    EditorOptions, EditorSession, Extent, LineBuffer, LoadMode, LogicalKey, decode,
};
use rawpad_term::event_loop::{Action, App, EventLoop, Exit};
use rawpad_term::input::InputEvent;
use rawpad_term::output::FrameBuffer;
use rawpad_term::TermError;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "RAWPAD_LOG";

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rawpad", version, about = "A raw-mode terminal text viewer")]
struct Args {
    /// File to open. Only its first line is shown unless --all-lines is set.
    file: Option<PathBuf>,

    /// Load every line of FILE instead of only the first.
    #[arg(long)]
    all_lines: bool,

    /// Write diagnostics to this file (filter with RAWPAD_LOG, default "info").
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> EditorOptions {
        EditorOptions {
            load_mode: if self.all_lines {
                LoadMode::AllLines
            } else {
                LoadMode::FirstLine
            },
            ..EditorOptions::default()
        }
    }
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The application: one session, driven by decoded keys.
struct Editor {
    session: EditorSession,
}

impl Editor {
    const fn new(session: EditorSession) -> Self {
        Self { session }
    }

    /// Build the session from the command line.
    ///
    /// A file that cannot be read is logged and replaced by an empty buffer.
    fn open(args: &Args, extent: Extent) -> Self {
        let options = args.options();
        let lines = match args.file.as_deref() {
            Some(path) => LineBuffer::load(path, options.load_mode).unwrap_or_else(|e| {
                warn!(error = %e, "starting with an empty buffer");
                LineBuffer::new()
            }),
            None => LineBuffer::new(),
        };
        Self::new(EditorSession::new(extent, lines, options))
    }
}

impl App for Editor {
    fn on_event(&mut self, event: &InputEvent) -> Action {
        let key = decode(event);
        trace!(?key, "decoded key");

        match key {
            LogicalKey::Quit => Action::Quit,
            key if key.is_movement() => {
                self.session.apply_movement(&key);
                Action::Continue
            }
            // Delete and unrecognized input are ignored.
            _ => Action::Continue,
        }
    }

    fn paint(&mut self, frame: &mut FrameBuffer) -> io::Result<()> {
        render_frame(&self.session, frame)
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Route tracing output to `path`.
///
/// stdout and stderr belong to the raw-mode screen, so logs only go to a
/// file. The returned guard flushes the background writer when dropped.
fn init_logging(path: &Path) -> io::Result<WorkerGuard> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .map_err(io::Error::other)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(guard)
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run(args: &Args) -> Result<Exit, TermError> {
    let mut event_loop = EventLoop::new()?;
    let mut editor = Editor::open(args, Extent::from(event_loop.size()));
    event_loop.run(&mut editor)
}

/// Process exit status for a finished run.
///
/// Quitting and closing stdin are both normal exits; any terminal failure
/// is reported on stderr by the caller and exits 1.
const fn exit_code(result: &Result<Exit, TermError>) -> i32 {
    match result {
        Ok(Exit::Quit | Exit::InputClosed) => 0,
        Err(_) => 1,
    }
}

fn main() {
    let args = Args::parse();

    let log_guard = args.log_file.as_deref().and_then(|path| {
        init_logging(path)
            .inspect_err(|e| eprintln!("rawpad: logging disabled: {e}"))
            .ok()
    });

    info!(file = ?args.file, all_lines = args.all_lines, "starting");
    let result = run(&args);
    match &result {
        Ok(exit) => info!(?exit, "exiting"),
        Err(e) => error!(error = %e, "fatal"),
    }
    drop(log_guard);

    if let Err(e) = &result {
        eprintln!("rawpad: {e}");
    }
    process::exit(exit_code(&result));
}

// ─── Tests ──────────────────────────────────────────────────────────────────
