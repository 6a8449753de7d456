use crate::command::{Filesystem, Outcome};
use crate::dispatcher::Dispatcher;
use crate::env::Environment;
use crate::statement::StatementBuilder;
use anyhow::Result;
use log::{debug, info};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};

/// Prompt shown before every interactive read.
pub const PROMPT: &str = ">>> ";

/// Where input lines come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    Interactive,
    File,
}

/// Result of asking a [`LineSource`] for the next line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    Line(String),
    Eof,
    Failed(String),
}

/// A blocking supplier of input lines.
pub trait LineSource {
    fn mode(&self) -> SourceMode;

    /// Block until the next line is available.
    fn read_line(&mut self) -> ReadResult;
}

/// Console input through a line editor.
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorSource {
    fn mode(&self) -> SourceMode {
        SourceMode::Interactive
    }

    fn read_line(&mut self) -> ReadResult {
        match self.editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    // history is a convenience; failing to record it is not a read error
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                ReadResult::Line(line)
            }
            Err(ReadlineError::Eof) => ReadResult::Eof,
            Err(ReadlineError::Interrupted) => ReadResult::Failed("interrupted".to_string()),
            Err(err) => ReadResult::Failed(err.to_string()),
        }
    }
}

/// Line-by-line input from any buffered reader, typically a script file.
pub struct ReaderSource<R> {
    reader: R,
    mode: SourceMode,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R, mode: SourceMode) -> Self {
        Self { reader, mode }
    }

    pub fn file(reader: R) -> Self {
        Self::new(reader, SourceMode::File)
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn mode(&self) -> SourceMode {
        self.mode
    }

    /// Bytes that are not valid UTF-8 are replaced rather than failing the read.
    fn read_line(&mut self) -> ReadResult {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => ReadResult::Eof,
            Ok(_) => ReadResult::Line(String::from_utf8_lossy(&buf).into_owned()),
            Err(e) => ReadResult::Failed(e.to_string()),
        }
    }
}

/// States of the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    ReadingInteractive,
    ReadingFile,
    Terminated(Termination),
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// `exit` was dispatched.
    Exit,
    /// The script file ran out.
    EndOfInput,
    /// The console could not be read, including end-of-input on the console.
    ReadError,
}

/// Drives reading, statement building and dispatch until termination.
pub struct Session<F, W> {
    env: Environment,
    builder: StatementBuilder,
    dispatcher: Dispatcher<F>,
    stdout: W,
}

impl<F: Filesystem, W: Write> Session<F, W> {
    pub fn new(env: Environment, builder: StatementBuilder, fs: F, stdout: W) -> Self {
        let dispatcher = Dispatcher::new(fs, builder.policy());
        Self {
            env,
            builder,
            dispatcher,
            stdout,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn into_output(self) -> W {
        self.stdout
    }

    /// Run until `source` is exhausted, unreadable, or `exit` is dispatched.
    ///
    /// Errors are returned only when the output sink itself fails.
    pub fn run(&mut self, source: &mut dyn LineSource) -> Result<Termination> {
        let mut state = match source.mode() {
            SourceMode::Interactive => SessionState::ReadingInteractive,
            SourceMode::File => SessionState::ReadingFile,
        };
        info!("session started in {:?}", state);

        loop {
            state = match state {
                SessionState::Terminated(why) => {
                    info!("session terminated: {:?}", why);
                    self.stdout.flush()?;
                    return Ok(why);
                }
                reading => self.step(reading, source)?,
            };
        }
    }

    fn step(&mut self, state: SessionState, source: &mut dyn LineSource) -> Result<SessionState> {
        let line = match source.read_line() {
            ReadResult::Line(line) => line,
            ReadResult::Eof if state == SessionState::ReadingFile => {
                writeln!(self.stdout, "End of file")?;
                writeln!(self.stdout, "Bye Bye!")?;
                return Ok(SessionState::Terminated(Termination::EndOfInput));
            }
            ReadResult::Eof => {
                writeln!(self.stdout, "ERROR: Issue with reading input from console.")?;
                return Ok(SessionState::Terminated(Termination::ReadError));
            }
            ReadResult::Failed(reason) => {
                debug!("read failed: {reason}");
                match state {
                    SessionState::ReadingFile => {
                        writeln!(self.stdout, "ERROR: Issue with reading the input file.")?
                    }
                    _ => writeln!(self.stdout, "ERROR: Issue with reading input from console.")?,
                }
                return Ok(SessionState::Terminated(Termination::ReadError));
            }
        };

        if self.execute_line(&line)? {
            return Ok(SessionState::Terminated(Termination::Exit));
        }
        Ok(state)
    }

    /// Dispatch every statement on `line` in order. Returns `true` once `exit` ran.
    pub fn execute_line(&mut self, line: &str) -> Result<bool> {
        for stmt in self.builder.build(line) {
            let outcome = self
                .dispatcher
                .dispatch(&stmt, &mut self.env, &mut self.stdout)?;
            if outcome == Outcome::Exit || self.env.should_exit {
                self.stdout.flush()?;
                return Ok(true);
            }
        }
        self.stdout.flush()?;
        Ok(false)
    }
}
