// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Support for debug output from chip crates.
//!
//! Chip crates have no console of their own. A board installs a writer once,
//! early during initialization:
//!
//! ```rust,ignore
//! chip_common::debug::set_debug_writer(&UART_WRITER);
//! ```
//!
//! after which every `debug!` invocation is formatted and forwarded to that
//! writer, terminated with `\r\n`. Messages emitted before a writer is
//! installed are discarded.
//!
//! Example
//! -------
//!
//! ```rust,ignore
//! debug!("PLL input {} Hz out of range", input_hz);
//! ```

use core::cell::Cell;
use core::fmt::{self, Write};

/// Byte sink a board provides for debug output.
pub trait IoWrite {
    /// Write as much of `buf` as possible, returning the number of bytes
    /// consumed. Returning 0 aborts the current message.
    fn write(&self, buf: &[u8]) -> usize;
}

struct DebugWriterSlot(Cell<Option<&'static dyn IoWrite>>);

// Chips supported here are single core and the slot is only written during
// board initialization, before interrupts are enabled.
unsafe impl Sync for DebugWriterSlot {}

static DEBUG_WRITER: DebugWriterSlot = DebugWriterSlot(Cell::new(None));

/// Install the writer used by `debug!`.
pub fn set_debug_writer(writer: &'static dyn IoWrite) {
    DEBUG_WRITER.0.set(Some(writer));
}

/// Remove the installed writer, if any.
pub fn clear_debug_writer() {
    DEBUG_WRITER.0.set(None);
}

pub fn has_debug_writer() -> bool {
    DEBUG_WRITER.0.get().is_some()
}

struct Forward(&'static dyn IoWrite);

impl Write for Forward {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut bytes = s.as_bytes();
        while !bytes.is_empty() {
            let written = self.0.write(bytes);
            if written == 0 {
                return Err(fmt::Error);
            }
            bytes = &bytes[written.min(bytes.len())..];
        }
        Ok(())
    }
}

/// Write a formatted message followed by `\r\n` to the installed writer.
pub fn begin_debug_fmt(args: fmt::Arguments) {
    if let Some(writer) = DEBUG_WRITER.0.get() {
        let mut forward = Forward(writer);
        let _ = forward.write_fmt(args);
        let _ = forward.write_str("\r\n");
    }
}

/// In-kernel `println()` debugging.
#[macro_export]
macro_rules! debug {
    () => ({
        $crate::debug::begin_debug_fmt(format_args!(""))
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::begin_debug_fmt(format_args!($msg))
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::begin_debug_fmt(format_args!($fmt, $($arg)+))
    });
}

#[cfg(test)]
mod tests {
    use super::{clear_debug_writer, has_debug_writer, set_debug_writer, IoWrite};
    use core::cell::Cell;

    struct Capture {
        buf: [Cell<u8>; 64],
        len: Cell<usize>,
    }

    unsafe impl Sync for Capture {}

    impl Capture {
        fn contents(&self) -> ([u8; 64], usize) {
            let mut out = [0; 64];
            for (dst, src) in out.iter_mut().zip(self.buf.iter()) {
                *dst = src.get();
            }
            (out, self.len.get())
        }
    }

    impl IoWrite for Capture {
        fn write(&self, buf: &[u8]) -> usize {
            let start = self.len.get();
            let room = self.buf.len() - start;
            let count = room.min(buf.len());
            for i in 0..count {
                self.buf[start + i].set(buf[i]);
            }
            self.len.set(start + count);
            count
        }
    }

    static CAPTURE: Capture = Capture {
        buf: [const { Cell::new(0) }; 64],
        len: Cell::new(0),
    };

    #[test]
    fn messages_reach_installed_writer() {
        crate::debug!("dropped before install");
        assert!(!has_debug_writer());

        set_debug_writer(&CAPTURE);
        crate::debug!("HSE {} Hz", 8_000_000);
        clear_debug_writer();
        crate::debug!("dropped after clear");

        let (buf, len) = CAPTURE.contents();
        assert_eq!(&buf[..len], b"HSE 8000000 Hz\r\n");
    }
}
