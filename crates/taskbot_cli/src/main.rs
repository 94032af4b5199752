//! Interactive command-line front-end.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the task file session.
//! - Read one command per stdin line and print exactly one reply per command.
//!
//! # Invariants
//! - Input errors and save failures are printed, never fatal.

use log::info;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use taskbot_core::{core_version, init_logging, AppConfig, Session, SystemClock, TaskStore};

const DIVIDER: &str = "____________________________________________________________";

fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("taskbot: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("taskbot: logging disabled: {err}");
        }
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    let mut session = Session::open(TaskStore::new(&config.data_path), SystemClock);
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&mut session, stdin.lock(), &mut stdout.lock());
    ExitCode::SUCCESS
}

/// Drives the read-dispatch-print loop until `bye` or end of input.
fn run(session: &mut Session, input: impl BufRead, out: &mut impl Write) {
    let mut greeting = "Hello! I'm taskbot.\nWhat can I do for you?".to_string();
    if let Some(notice) = session.startup_notice() {
        greeting.push('\n');
        greeting.push_str(&notice);
    }
    print_block(out, &greeting);

    for line in input.lines() {
        let Ok(line) = line else { break };
        let reply = session.handle(&line);
        print_block(out, &reply.message);
        if reply.exit {
            return;
        }
    }

    // End of input without `bye`.
    if let Err(err) = session.save() {
        print_block(out, &err);
    }
}

fn print_block(out: &mut impl Write, message: &str) {
    let _ = writeln!(out, "{DIVIDER}\n{message}\n{DIVIDER}");
    let _ = out.flush();
}
