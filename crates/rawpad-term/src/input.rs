// SPDX-License-Identifier: MIT
//
// Input event framing.
//
// A single `read()` from a raw-mode terminal can carry several keystrokes
// (fast typing, key repeat, paste). `split_events` cuts one chunk into
// per-key events, each holding the complete raw sequence for that key:
//
// - CSI:  ESC [ <params 0x30-0x3F> <intermediates 0x20-0x2F> <final 0x40-0x7E>
// - SS3:  ESC O <byte>
// - Meta: ESC <byte>, where <byte> is not a control code
// - one UTF-8 encoded scalar
// - one lone byte (control codes, invalid UTF-8)
//
// No state is kept between chunks. A sequence cut short by the end of a
// chunk is delivered as-is; the decoder maps anything it does not know
// to an "other" key, so nothing is ever lost or rejected here.

use bitflags::bitflags;

const ESC: u8 = 0x1b;

bitflags! {
    /// Modifier flags carried by an input event.
    ///
    /// Derived from the raw bytes; legacy terminals give no reliable way to
    /// report more than this.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const META  = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

/// One terminal input event: the raw bytes of a single key plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputEvent {
    /// The complete raw sequence, exactly as read.
    pub raw: Vec<u8>,
    /// Modifier flags derived from `raw`.
    pub modifiers: Modifiers,
}

impl InputEvent {
    /// Build an event from raw bytes, deriving its modifier flags.
    #[must_use]
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        let raw = raw.into();
        let modifiers = modifiers_for(&raw);
        Self { raw, modifiers }
    }

    /// The raw sequence.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.raw
    }
}

/// Split one stdin chunk into per-key events, in order.
#[must_use]
pub fn split_events(chunk: &[u8]) -> Vec<InputEvent> {
    let mut events = Vec::new();
    let mut rest = chunk;

    while !rest.is_empty() {
        let len = sequence_len(rest);
        let (head, tail) = rest.split_at(len);
        events.push(InputEvent::new(head));
        rest = tail;
    }

    events
}

/// Length of the sequence at the start of `buf` (always ≥ 1 for non-empty input).
fn sequence_len(buf: &[u8]) -> usize {
    match buf {
        [ESC, b'[', params @ ..] => {
            // Parameters and intermediates, then one final byte.
            let body = params
                .iter()
                .take_while(|&&b| (0x20..=0x3f).contains(&b))
                .count();
            match params.get(body) {
                Some(b) if (0x40..=0x7e).contains(b) => 2 + body + 1,
                _ => 2 + body,
            }
        }
        [ESC, b'O', _, ..] => 3,
        // ESC before a control byte (another ESC, Ctrl-Q) is its own key.
        [ESC, next, ..] if !next.is_ascii_control() => 1 + utf8_len(&buf[1..]),
        [lead, ..] if lead.is_ascii() => 1,
        _ => utf8_len(buf),
    }
}

/// Byte length of the UTF-8 scalar at the start of `buf`, or 1 if invalid.
fn utf8_len(buf: &[u8]) -> usize {
    let want = match buf[0] {
        0x00..=0x7f => return 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return 1,
    };
    match buf.get(..want) {
        Some(bytes) if std::str::from_utf8(bytes).is_ok() => want,
        _ => 1,
    }
}

fn modifiers_for(raw: &[u8]) -> Modifiers {
    match raw {
        [b] if b.is_ascii_control() => Modifiers::CTRL,
        [b] if b.is_ascii_uppercase() => Modifiers::SHIFT,
        [ESC, b] if b.is_ascii_graphic() && *b != b'[' && *b != b'O' => Modifiers::META,
        _ => Modifiers::empty(),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
