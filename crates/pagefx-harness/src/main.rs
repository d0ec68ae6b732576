#![forbid(unsafe_code)]

//! PageFX replay harness binary.
//!
//! Replays a page fixture against the in-memory DOM and prints a JSONL
//! report on stdout.

use std::io::Write;
use std::process::ExitCode;

use pagefx_harness::cli::{Command, HELP_TEXT, Opts, VERSION};
use pagefx_harness::{Fixture, HarnessError, logging, replay};

fn main() -> ExitCode {
    let command = match Opts::parse_from(std::env::args().skip(1), |key| std::env::var(key).ok()) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let opts = match command {
        Command::Help => {
            println!("{HELP_TEXT}");
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("pagefx-harness {VERSION}");
            return ExitCode::SUCCESS;
        }
        Command::Run(opts) => opts,
    };

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "replay failed");
            eprintln!("pagefx-harness: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &Opts) -> Result<(), HarnessError> {
    logging::init(opts.log_json)?;

    let fixture = match &opts.fixture {
        Some(path) => Fixture::load(path)?,
        None => Fixture::demo()?,
    }
    .with_env_overrides(|key| std::env::var(key).ok());
    let report = replay(&fixture, opts.seed)?;
    let jsonl = report.to_jsonl()?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(jsonl.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|source| HarnessError::Io {
            path: "<stdout>".into(),
            source,
        })
}
