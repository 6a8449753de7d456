use crate::env::Environment;
use anyhow::Result;
use std::fmt;
use std::io::Write;

/// The closed set of commands the shell understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Ls,
    Pwd,
    Mkdir,
    Cd,
    Cp,
    Mv,
    Rm,
    Cat,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Command::Exit,
        Command::Ls,
        Command::Pwd,
        Command::Mkdir,
        Command::Cd,
        Command::Cp,
        Command::Mv,
        Command::Rm,
        Command::Cat,
    ];

    /// Case-sensitive lookup of a command name.
    pub fn lookup(name: &str) -> Option<Command> {
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Exit => "exit",
            Command::Ls => "ls",
            Command::Pwd => "pwd",
            Command::Mkdir => "mkdir",
            Command::Cd => "cd",
            Command::Cp => "cp",
            Command::Mv => "mv",
            Command::Rm => "rm",
            Command::Cat => "cat",
        }
    }

    /// Required number of arguments, not counting the command name.
    pub fn arity(self) -> usize {
        match self {
            Command::Exit | Command::Ls | Command::Pwd => 0,
            Command::Mkdir | Command::Cd | Command::Rm | Command::Cat => 1,
            Command::Cp | Command::Mv => 2,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened to a dispatched statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran and succeeded.
    Completed,
    /// The operation ran and reported its own failure.
    Failed,
    /// Known command, wrong token count; nothing was invoked.
    WrongArity,
    /// Unknown command name; nothing was invoked.
    Unrecognized,
    /// `exit` was accepted; the session must stop.
    Exit,
}

/// The filesystem operations a statement can reach.
///
/// Every path argument is interpreted relative to [`Environment::current_dir`]. An `Err`
/// carries the user-facing failure message as its outermost context.
pub trait Filesystem {
    /// Write the entries of the current directory.
    fn list(&mut self, env: &Environment, stdout: &mut dyn Write) -> Result<()>;

    /// Write the current directory.
    fn print_working_dir(&mut self, env: &Environment, stdout: &mut dyn Write) -> Result<()>;

    fn make_dir(&mut self, env: &Environment, name: &str) -> Result<()>;

    /// Change `env.current_dir`.
    fn change_dir(&mut self, env: &mut Environment, target: &str) -> Result<()>;

    /// Copy `source` into the directory `dest_dir`, keeping its file name.
    fn copy_file(&mut self, env: &Environment, source: &str, dest_dir: &str) -> Result<()>;

    fn move_file(&mut self, env: &Environment, source: &str, dest: &str) -> Result<()>;

    fn delete_file(&mut self, env: &Environment, name: &str) -> Result<()>;

    /// Write the contents of `name` followed by a newline.
    fn display_file(&mut self, env: &Environment, name: &str, stdout: &mut dyn Write)
    -> Result<()>;
}
