use crate::tokenizer::CountPolicy;
use argh::{EarlyExit, FromArgs};
use std::path::PathBuf;

/// Output file written in batch mode unless `--output` says otherwise.
pub const DEFAULT_OUTPUT: &str = "output.txt";

#[derive(FromArgs, Debug, PartialEq)]
/// A minimal file shell. Without arguments it reads statements from the console;
/// with a script file it runs the file and writes all output to a file.
pub struct Opts {
    #[argh(option, short = 'f')]
    /// script file to run in batch mode
    pub file: Option<PathBuf>,

    #[argh(option, short = 'o', default = "PathBuf::from(DEFAULT_OUTPUT)")]
    /// where batch mode writes its output (default: output.txt)
    pub output: PathBuf,

    #[argh(switch)]
    /// count statement tokens the historical way (one extra slot per statement)
    pub compat_count: bool,
}

/// How the binary should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Batch { input: PathBuf, output: PathBuf },
}

impl Opts {
    /// Parse arguments that follow the program name.
    ///
    /// The single-dash `-file` spelling is accepted as an alias of `--file`.
    pub fn parse_from(program: &str, args: &[String]) -> Result<Self, EarlyExit> {
        let args: Vec<&str> = args
            .iter()
            .map(|arg| if arg == "-file" { "--file" } else { arg.as_str() })
            .collect();
        Opts::from_args(&[program], &args)
    }

    pub fn mode(&self) -> Mode {
        match &self.file {
            Some(input) => Mode::Batch {
                input: input.clone(),
                output: self.output.clone(),
            },
            None => Mode::Interactive,
        }
    }

    pub fn count_policy(&self) -> CountPolicy {
        if self.compat_count {
            CountPolicy::Compat
        } else {
            CountPolicy::Accurate
        }
    }
}
