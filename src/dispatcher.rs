use crate::command::{Command, Filesystem, Outcome};
use crate::env::Environment;
use crate::statement::Statement;
use crate::tokenizer::CountPolicy;
use anyhow::Result;
use log::{debug, warn};
use std::io::Write;

/// Maps statements onto filesystem operations.
pub struct Dispatcher<F> {
    fs: F,
    policy: CountPolicy,
}

impl<F: Filesystem> Dispatcher<F> {
    /// `policy` must match the one the statements were built with.
    pub fn new(fs: F, policy: CountPolicy) -> Self {
        Self { fs, policy }
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Run one statement, writing any messages to `stdout`.
    ///
    /// Only failures to write to `stdout` are returned as errors; everything else is
    /// reported to the user and summarized in the [`Outcome`].
    pub fn dispatch(
        &mut self,
        stmt: &Statement,
        env: &mut Environment,
        stdout: &mut dyn Write,
    ) -> Result<Outcome> {
        debug!("dispatch {:?} (count {})", stmt.tokens(), stmt.count());

        let Some(command) = Command::lookup(stmt.name()) else {
            writeln!(stdout, "ERROR: Unrecognized command: {}", stmt.name())?;
            return Ok(Outcome::Unrecognized);
        };

        let needed = 1 + command.arity();
        if stmt.count() != needed + self.policy.slack() || stmt.tokens().len() != needed {
            writeln!(
                stdout,
                "ERROR: Wrong number of arguments for command, please ensure proper formatting"
            )?;
            return Ok(Outcome::WrongArity);
        }

        let args = stmt.args();
        let result = match command {
            Command::Exit => {
                writeln!(stdout, "Bye Bye!")?;
                env.should_exit = true;
                return Ok(Outcome::Exit);
            }
            Command::Ls => self.fs.list(env, stdout),
            Command::Pwd => self.fs.print_working_dir(env, stdout),
            Command::Mkdir => self.fs.make_dir(env, &args[0]),
            Command::Cd => self.fs.change_dir(env, &args[0]),
            Command::Cp => self.fs.copy_file(env, &args[0], &args[1]),
            Command::Mv => self.fs.move_file(env, &args[0], &args[1]),
            Command::Rm => self.fs.delete_file(env, &args[0]),
            Command::Cat => self.fs.display_file(env, &args[0], stdout),
        };

        match result {
            Ok(()) => Ok(Outcome::Completed),
            Err(e) => {
                warn!("{command} failed: {e:#}");
                writeln!(stdout, "Error! {e}")?;
                Ok(Outcome::Failed)
            }
        }
    }
}
