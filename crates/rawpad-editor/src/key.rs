//! Key decoding — raw terminal sequences to logical keys.
//!
//! Terminal emulators disagree on what Home and End send, so several raw
//! sequences alias to the same key. Decoding walks [`SEQUENCES`] in order
//! (first match wins), then the single-byte fallbacks. Anything left over
//! becomes [`LogicalKey::Other`] carrying the raw bytes untouched.
//!
//! Decoding is pure and total: every event maps to exactly one key.
//! Modifier flags are part of the event but do not affect the result.

use rawpad_term::input::InputEvent;

/// The decoder's closed output vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    Quit,
    /// Anything unrecognized, with the raw sequence as received.
    Other(Vec<u8>),
}

impl LogicalKey {
    /// Whether this key moves the cursor.
    #[must_use]
    pub const fn is_movement(&self) -> bool {
        matches!(
            self,
            Self::MoveUp
                | Self::MoveDown
                | Self::MoveLeft
                | Self::MoveRight
                | Self::PageUp
                | Self::PageDown
                | Self::Home
                | Self::End
        )
    }
}

/// `Ctrl-Q` (DC1).
pub const QUIT_BYTE: u8 = 0x11;

/// Escape sequences in precedence order.
pub const SEQUENCES: &[(&[u8], LogicalKey)] = &[
    (b"\x1b[A", LogicalKey::MoveUp),
    (b"\x1b[B", LogicalKey::MoveDown),
    (b"\x1b[C", LogicalKey::MoveRight),
    (b"\x1b[D", LogicalKey::MoveLeft),
    (b"\x1b[5~", LogicalKey::PageUp),
    (b"\x1b[6~", LogicalKey::PageDown),
    (b"\x1b[H", LogicalKey::Home),
    (b"\x1b[1~", LogicalKey::Home),
    (b"\x1b[7~", LogicalKey::Home),
    (b"\x1bOH", LogicalKey::Home),
    (b"\x1b[4~", LogicalKey::End),
    (b"\x1b[8~", LogicalKey::End),
    (b"\x1b[F", LogicalKey::End),
    (b"\x1bOF", LogicalKey::End),
    (b"\x1b[3~", LogicalKey::Delete),
];

/// Decode one input event.
#[must_use]
pub fn decode(event: &InputEvent) -> LogicalKey {
    decode_bytes(event.bytes())
}

/// Decode a raw sequence (see [`decode`]).
#[must_use]
pub fn decode_bytes(raw: &[u8]) -> LogicalKey {
    if let Some((_, key)) = SEQUENCES.iter().find(|(seq, _)| *seq == raw) {
        return key.clone();
    }

    match raw {
        b"w" => LogicalKey::MoveUp,
        b"s" => LogicalKey::MoveDown,
        b"a" => LogicalKey::MoveLeft,
        b"d" => LogicalKey::MoveRight,
        [QUIT_BYTE] => LogicalKey::Quit,
        _ => LogicalKey::Other(raw.to_vec()),
    }
}
