//! Fixture executable for the executor integration tests
//!
//! Reports what it observes about its own invocation: arguments, working
//! directory and environment. Set `EXEC_FIXTURE_FAIL` to make it exit 1.
//! Pass `bulk <KiB>` to flood both output streams, `binary` to write bytes
//! that are not valid UTF-8, or `abort` to die by signal.

use std::io::{self, Write};
use std::process::ExitCode;

const FAIL_VAR: &str = "EXEC_FIXTURE_FAIL";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if std::env::var_os(FAIL_VAR).is_some() {
        println!("Error on stdout");
        eprintln!("Error on stderr");
        return ExitCode::from(1);
    }

    match args.get(1).map(String::as_str) {
        Some("abort") => std::process::abort(),
        Some("binary") => {
            let written = io::stdout()
                .write_all(b"a\xffb\n")
                .and_then(|_| io::stderr().write_all(b"\xfe\xfd"));
            return match written {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::from(2),
            };
        }
        Some("bulk") => {
            let kib = args.get(2).and_then(|v| v.parse().ok()).unwrap_or(256);
            return match bulk(kib) {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::from(2),
            };
        }
        _ => {}
    }

    println!("Output on stdout");
    eprintln!("Output on stderr");
    println!("Arguments: [{}]", args.join(" "));

    match std::env::current_dir() {
        Ok(dir) => println!("PWD={}", dir.display()),
        Err(e) => eprintln!("current dir unavailable: {e}"),
    }

    let mut vars: Vec<(String, String)> = std::env::vars_os()
        .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
        .collect();
    vars.sort();
    for (key, value) in vars {
        println!("env: {key}={value}");
    }

    ExitCode::SUCCESS
}

/// Alternate 1 KiB lines between stdout and stderr
fn bulk(kib: usize) -> io::Result<()> {
    let line = format!("{}\n", "x".repeat(1023));
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    for _ in 0..kib {
        stdout.write_all(line.as_bytes())?;
        stderr.write_all(line.as_bytes())?;
    }
    stdout.flush()?;
    stderr.flush()
}
