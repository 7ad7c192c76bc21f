#![forbid(unsafe_code)]

//! `tracing` output routed to the JS console.
//!
//! A fmt subscriber formats each event into one line and hands it to a
//! [`ConsoleSink`] together with the console method matching the event level.
//! The browser sink lives in the wasm-only module; tests plug in their own.

use std::io::{self, Write};
use std::sync::Once;

use tracing::level_filters::LevelFilter;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// `console.*` method an event is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Log,
    Debug,
}

impl ConsoleMethod {
    #[must_use]
    pub fn for_level(level: &Level) -> Self {
        match *level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Info,
            Level::DEBUG => Self::Log,
            Level::TRACE => Self::Debug,
        }
    }
}

/// Receives one formatted line per event.
pub type ConsoleSink = fn(ConsoleMethod, &str);

#[derive(Debug, Clone, Copy)]
pub struct ConsoleMakeWriter {
    sink: ConsoleSink,
}

impl ConsoleMakeWriter {
    #[must_use]
    pub const fn new(sink: ConsoleSink) -> Self {
        Self { sink }
    }
}

/// Buffers one event and emits it on drop.
pub struct ConsoleWriter {
    sink: ConsoleSink,
    method: ConsoleMethod,
    buf: Vec<u8>,
}

impl Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buf);
        (self.sink)(self.method, text.trim_end_matches('\n'));
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            sink: self.sink,
            method: ConsoleMethod::Log,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            sink: self.sink,
            method: ConsoleMethod::for_level(meta.level()),
            buf: Vec::new(),
        }
    }
}

/// Install the console subscriber as the global default. Only the first
/// call has an effect; returns whether this call installed it.
pub fn install(max_level: LevelFilter, sink: ConsoleSink) -> bool {
    static ONCE: Once = Once::new();
    let mut installed = false;
    ONCE.call_once(|| {
        installed = tracing_subscriber::fmt()
            .with_writer(ConsoleMakeWriter::new(sink))
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_max_level(max_level)
            .try_init()
            .is_ok();
    });
    installed
}
