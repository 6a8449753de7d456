use anyhow::{Context, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufWriter, Result as IoResult, Write};
use std::path::Path;
use std::rc::Rc;

/// Destination for everything a session prints.
///
/// Chosen once at startup and handed to the session; nothing swaps the process's
/// standard output.
pub enum Sink {
    /// Interactive mode output.
    Console(io::Stdout),
    /// Batch mode output file.
    File(BufWriter<File>),
    /// In-process capture for embedders that want the session's output as bytes
    /// (see [`MemWriter::with_handle`]).
    Memory(MemWriter),
}

impl Sink {
    pub fn console() -> Self {
        Sink::Console(io::stdout())
    }

    /// Create (or truncate) `path` and write into it.
    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("cannot open output file {}", path.display()))?;
        Ok(Sink::File(BufWriter::new(file)))
    }

    pub fn memory(writer: MemWriter) -> Self {
        Sink::Memory(writer)
    }
}

impl Write for Sink {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        match self {
            Sink::Console(out) => out.write(data),
            Sink::File(out) => out.write(data),
            Sink::Memory(out) => out.write(data),
        }
    }

    fn flush(&mut self) -> IoResult<()> {
        match self {
            Sink::Console(out) => out.flush(),
            Sink::File(out) => out.flush(),
            Sink::Memory(out) => out.flush(),
        }
    }
}

/// Memory-backed writer for capturing session output.
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    /// Public constructor.
    pub fn new() -> Self {
        Self {
            buf: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Convenience: create writer and return (writer, rc_handle).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let mw = MemWriter::new();
        let rc = mw.buf.clone();
        (mw, rc)
    }
}

impl Default for MemWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
