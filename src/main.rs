use clap::Parser;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use testexec::{Executable, ExecutorConfig, ExecutorError, Options, Output, Profile, parse_env_entry};
use tracing::{debug, error};
use tracing_subscriber::fmt;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "testexec")]
#[command(about = "Run an executable and report its captured output")]
struct Args {
    /// Working directory for the program
    #[arg(short = 'C', long)]
    dir: Option<PathBuf>,

    /// Environment entry; when any are given the inherited environment is dropped
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env_entry)]
    env: Vec<(String, String)>,

    /// TOML profile with default dir and environment
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Print the result as JSON instead of forwarding output
    #[arg(long)]
    json: bool,

    /// Do not print the program's output
    #[arg(short, long)]
    quiet: bool,

    /// Program to run followed by its arguments; everything after the
    /// program is passed through untouched
    #[arg(
        value_name = "PROGRAM",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

/// JSON report for --json
#[derive(Debug, Serialize)]
struct Report<'a> {
    program: &'a str,
    args: &'a [String],
    #[serde(flatten)]
    output: Output,
    exit_code: i32,
    error: Option<String>,
}

/// Map an invocation outcome to this process's exit code
fn exit_code(result: &Result<Output, ExecutorError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(ExecutorError::ExitStatus { code, .. }) => *code,
        Err(ExecutorError::Signal { signal, .. }) => 128 + signal,
        Err(ExecutorError::Spawn { source, .. }) if source.kind() == io::ErrorKind::NotFound => 127,
        Err(ExecutorError::Spawn { .. }) => 126,
        Err(_) => 1,
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();
    let (program, program_args) = args
        .command
        .split_first()
        .ok_or("missing program to run")?;
    let config = ExecutorConfig::from_env();

    fmt()
        .with_max_level(config.log_level)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let profile = match args.profile.as_ref().or(config.profile_path.as_ref()) {
        Some(path) => Profile::load(path)?,
        None => Profile::default(),
    };

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let mut options: Options<'_> = profile.options();
    if let Some(dir) = args.dir.clone() {
        options = options.dir(dir);
    }
    options = options.envs(args.env.iter().cloned());

    let forward = config.echo && !args.quiet && !args.json;
    if forward {
        options = options.stdout(&mut stdout).stderr(&mut stderr);
    }

    debug!(program = %program, forward, "running program");

    let executable = Executable::new(program.clone());
    let result = executable.execute(options, program_args);
    let code = exit_code(&result);

    if args.json {
        let (output, error) = match &result {
            Ok(output) => (output.clone(), None),
            Err(e) => (e.output().cloned().unwrap_or_default(), Some(e.to_string())),
        };
        let report = Report {
            program,
            args: program_args,
            output,
            exit_code: code,
            error,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let captured = match &result {
            Ok(output) => Some(output),
            Err(e) => {
                error!(program = %program, error = %e, "program failed");
                e.output()
            }
        };
        if let Some(output) = captured.filter(|_| !forward && !args.quiet) {
            io::stdout().write_all(&output.stdout_bytes)?;
            io::stderr().write_all(&output.stderr_bytes)?;
        }
    }

    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
