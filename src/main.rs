use log::{error, info};
use pseudo_shell::Session;
use pseudo_shell::builtin::HostFilesystem;
use pseudo_shell::env::Environment;
use pseudo_shell::opts::Opts;
use pseudo_shell::startup;
use pseudo_shell::statement::StatementBuilder;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("pseudo_shell");
    let opts = match Opts::parse_from(program, args.get(1..).unwrap_or_default()) {
        Ok(opts) => opts,
        Err(exit) => {
            return if exit.status.is_ok() {
                println!("{}", exit.output);
                ExitCode::SUCCESS
            } else {
                eprintln!("{}", exit.output);
                ExitCode::FAILURE
            };
        }
    };

    let env = match Environment::new() {
        Ok(env) => env,
        Err(e) => {
            error!("{e:#}");
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (sink, mut source) = match startup::start(&opts) {
        Ok(started) => started,
        Err(e) => {
            error!("{e}: {:?}", std::error::Error::source(&e));
            eprintln!("{e}");
            return ExitCode::from(e.status());
        }
    };
    info!("starting in {:?}", opts.mode());

    let builder = StatementBuilder::new(opts.count_policy());
    let mut session = Session::new(env, builder, HostFilesystem, sink);
    match session.run(source.as_mut()) {
        Ok(why) => {
            info!("finished: {why:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("output failed: {e:#}");
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}
