//! # rawpad-editor — Editor core for rawpad
//!
//! The state and logic between raw terminal input and a composed frame:
//!
//! - **[`key`]** — decodes raw input events into a closed set of [`LogicalKey`]s
//! - **[`cursor`]** — viewport extent, cursor position, clamped movement
//! - **[`buffer`]** — the read-only [`LineBuffer`] and its file loader
//! - **[`session`]** — [`EditorSession`], the aggregate that owns all of the above
//! - **[`render`]** — builds one complete frame from a session
//! - **[`options`]** — banner text, filler glyph, load mode
//!
//! Nothing in here touches the terminal directly; `rawpad-term` owns that.

pub mod buffer;
pub mod cursor;
pub mod key;
pub mod options;
pub mod render;
pub mod session;

pub use buffer::{LineBuffer, LoadError, LoadMode};
pub use cursor::{CursorPosition, Extent, Viewport};
pub use key::{LogicalKey, decode};
pub use options::EditorOptions;
pub use session::EditorSession;
