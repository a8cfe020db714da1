//! Tracing output routed to the browser console.

use std::{
    io::{self, Write},
    str::FromStr,
    sync::Once,
};

use tracing::{Level, Metadata, level_filters::LevelFilter};
use tracing_subscriber::{fmt::writer::MakeWriter, prelude::*};
use wasm_bindgen::JsValue;

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::INFO;

static TRACING_INSTALLED: Once = Once::new();

/// Installs console logging at `info` (idempotent).
pub fn init() {
    init_with_level(DEFAULT_LOG_LEVEL);
}

/// Installs console logging with a level such as `"debug"` (idempotent).
///
/// Unknown levels fall back to `info`.
pub fn init_with(level: &str) {
    init_with_level(LevelFilter::from_str(level).unwrap_or(DEFAULT_LOG_LEVEL));
}

fn init_with_level(level: LevelFilter) {
    TRACING_INSTALLED.call_once(|| {
        let console = tracing_subscriber::fmt::layer()
            .with_writer(ConsoleMakeWriter)
            .with_ansi(false)
            .without_time()
            .with_filter(level);
        if tracing_subscriber::registry()
            .with(console)
            .try_init()
            .is_err()
        {
            web_sys::console::warn_1(&JsValue::from_str(
                "MiniFrame console logging failed to initialize",
            ));
        }
    });
}

#[derive(Clone, Copy, Default)]
struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and hands it to the console call matching its
/// level when dropped.
struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    const fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buffer);
        let line = text.trim_end();
        if line.is_empty() {
            return;
        }
        let message = JsValue::from_str(line);
        match self.level {
            Level::ERROR => web_sys::console::error_1(&message),
            Level::WARN => web_sys::console::warn_1(&message),
            Level::INFO => web_sys::console::info_1(&message),
            _ => web_sys::console::debug_1(&message),
        }
    }
}
