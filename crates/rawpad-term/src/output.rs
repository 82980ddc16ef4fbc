// SPDX-License-Identifier: MIT
//
// Frame output buffering.
//
// A frame is dozens of small pieces: cursor hide, home, one chunk of text
// and an erase per row, the final cursor position. Written piecemeal, the
// terminal would display intermediate states and the screen would flicker.
// `FrameBuffer` collects all of it in memory; `flush_to` hands the whole
// frame to the terminal in one `write_all`.
//
// A fresh buffer is built for every frame. Nothing survives between frames
// and there is no diffing against the previous one.

use std::io::{self, Write};

/// Initial capacity. An 80×24 screen of text plus escapes fits comfortably.
const DEFAULT_CAPACITY: usize = 4096;

/// A byte accumulator for exactly one frame.
#[derive(Debug)]
pub struct FrameBuffer {
    buf: Vec<u8>,
}

impl FrameBuffer {
    /// Create an empty frame buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Whether nothing has been written yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write the whole frame to `w` in one call and empty the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to or flushing `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for FrameBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // No-op: the frame only leaves through flush_to().
        Ok(())
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Writer that counts how many times it was handed data.
    #[derive(Default)]
    struct CountingWriter {
        writes: usize,
        data: Vec<u8>,
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn new_is_empty() {
        let fb = FrameBuffer::new();
        assert!(fb.is_empty());
        assert!(FrameBuffer::default().is_empty());
    }

    #[test]
    fn write_trait_accumulates() {
        let mut fb = FrameBuffer::new();
        write!(fb, "\x1b[?25l").unwrap();
        fb.write_all(b"~\r\n").unwrap();
        let mut out = Vec::new();
        fb.flush_to(&mut out).unwrap();
        assert_eq!(out, b"\x1b[?25l~\r\n");
    }

    #[test]
    fn flush_trait_keeps_contents() {
        let mut fb = FrameBuffer::new();
        fb.write_all(b"abc").unwrap();
        fb.flush().unwrap();
        assert!(!fb.is_empty());
        let mut out = Vec::new();
        fb.flush_to(&mut out).unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn flush_to_is_a_single_write() {
        let mut fb = FrameBuffer::new();
        for row in 0..24 {
            write!(fb, "row {row}\x1b[K\r\n").unwrap();
        }
        let mut out = CountingWriter::default();
        fb.flush_to(&mut out).unwrap();
        assert_eq!(out.writes, 1);
        assert!(fb.is_empty());
        assert!(out.data.starts_with(b"row 0"));
    }

    #[test]
    fn flush_to_empty_is_noop() {
        let mut fb = FrameBuffer::new();
        let mut out = CountingWriter::default();
        fb.flush_to(&mut out).unwrap();
        assert_eq!(out.writes, 0);
    }
}
