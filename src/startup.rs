use crate::interpreter::{EditorSource, LineSource, ReaderSource};
use crate::io_adapters::Sink;
use crate::opts::{Mode, Opts};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// Process exit status for every startup failure.
pub const STARTUP_FAILURE_STATUS: u8 = 1;

/// Failures that stop the process before any input is processed.
#[derive(Debug)]
pub enum StartupError {
    /// The batch output file could not be created.
    OutputFile(anyhow::Error),
    /// The batch script could not be opened.
    InputMissing { path: PathBuf, source: io::Error },
    /// The console line editor could not be initialized.
    Console(rustyline::error::ReadlineError),
}

impl StartupError {
    pub fn status(&self) -> u8 {
        STARTUP_FAILURE_STATUS
    }
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::OutputFile(_) => f.write_str("ERROR: Failed to open output file"),
            StartupError::InputMissing { .. } => f.write_str("ERROR: Input file missing"),
            StartupError::Console(_) => {
                f.write_str("ERROR: Issue with reading input from console.")
            }
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::OutputFile(e) => Some(&**e),
            StartupError::InputMissing { source, .. } => Some(source),
            StartupError::Console(e) => Some(e),
        }
    }
}

/// Open the batch output file, then the script.
///
/// The output file is created (and truncated) before the script is looked at, so a
/// missing script still leaves an empty output file behind.
pub fn open_batch(
    input: &Path,
    output: &Path,
) -> Result<(Sink, ReaderSource<BufReader<File>>), StartupError> {
    let sink = Sink::file(output).map_err(StartupError::OutputFile)?;
    let script = File::open(input).map_err(|source| StartupError::InputMissing {
        path: input.to_path_buf(),
        source,
    })?;
    Ok((sink, ReaderSource::file(BufReader::new(script))))
}

/// Choose the sink and line source for the mode `opts` selects.
pub fn start(opts: &Opts) -> Result<(Sink, Box<dyn LineSource>), StartupError> {
    match opts.mode() {
        Mode::Interactive => {
            let editor = EditorSource::new().map_err(StartupError::Console)?;
            Ok((Sink::console(), Box::new(editor) as Box<dyn LineSource>))
        }
        Mode::Batch { input, output } => {
            let (sink, source) = open_batch(&input, &output)?;
            Ok((sink, Box::new(source) as Box<dyn LineSource>))
        }
    }
}
