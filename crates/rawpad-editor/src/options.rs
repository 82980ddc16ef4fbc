//! Editor options.
//!
//! There is no config file: options are built from [`Default`] and then
//! overridden by command-line flags in the binary. The session carries
//! them so the renderer and loader never reach for globals.

use crate::buffer::LoadMode;

/// Text shown centered on an empty buffer.
pub const DEFAULT_BANNER: &str = concat!("rawpad editor -- version ", env!("CARGO_PKG_VERSION"));

/// Row marker for rows past the end of the buffer.
pub const DEFAULT_FILLER: char = '~';

/// Options that shape loading and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    /// Welcome banner shown when the buffer is empty.
    pub banner: String,
    /// Glyph drawn at the start of rows with no content.
    pub filler: char,
    /// How much of a file to load.
    pub load_mode: LoadMode,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            banner: DEFAULT_BANNER.to_owned(),
            filler: DEFAULT_FILLER,
            load_mode: LoadMode::FirstLine,
        }
    }
}
