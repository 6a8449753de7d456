//! A minimal file shell.
//!
//! Input lines are split on `;` into statements and on spaces into a command name and
//! its arguments. Each statement is checked against a fixed command table and handed
//! to a [`command::Filesystem`] implementation. The [`Session`] drives this from the
//! console or from a script file and writes everything to a configurable sink.
//!
//! The working directory is session state ([`env::Environment`]), so several sessions
//! can coexist in one process and tests never depend on the process's own directory.

pub mod builtin;
pub mod command;
pub mod dispatcher;
pub mod env;
pub mod interpreter;
pub mod io_adapters;
pub mod opts;
pub mod startup;
pub mod statement;
pub mod tokenizer;

/// Just a convenient re-export of the session driver.
///
/// See [`Session`] for the high-level API.
pub use interpreter::Session;
