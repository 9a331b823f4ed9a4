//! # check_cisco_ucs
//!
//! Nagios plugin entry point. Prints one status line (plus element lines)
//! on stdout and exits 0 (OK), 2 (CRIT) or 3 (UNKNOWN).

mod cli;

use clap::Parser;
use cli::Cli;
use log::LevelFilter;
use std::io::Write;
use std::process::ExitCode;
use ucs_check_base::logging::{self, codes, LogLevel};
use ucs_check_base::{log_error, log_info};

const UNKNOWN_EXIT: u8 = 3;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let (code, text) = cli::parse_failure(&e);
            print!("{}", text);
            return ExitCode::from(code);
        }
    };

    init_logger(cli.debug);
    if let Err(e) = logging::init_global_logging(cli.debug) {
        log_error!(codes::system::INITIALIZATION_FAILURE, &e);
    }

    if cli.dump_environment {
        dump_environment();
    }

    log_info!("Check starting",
        "host" => &cli.host,
        "version" => ucs_check_base::config::build_info::version_line()
    );

    let config = cli.into_config();
    let report = ucs_check_base::run(&config);

    println!("{}", report.summary);
    ExitCode::from(u8::try_from(report.exit_code).unwrap_or(UNKNOWN_EXIT))
}

/// Route the `log` facade to stdout, filtered by the `-d` level
fn init_logger(verbosity: u8) {
    let level = LogLevel::from_verbosity(verbosity)
        .map(|level| level.to_log_level().to_level_filter())
        .unwrap_or(LevelFilter::Off);

    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stdout)
        .format(|buf, record| writeln!(buf, "{} {}", buf.timestamp(), record.args()))
        .init();
}

fn dump_environment() {
    eprintln!("** environment variables start **");
    for (key, value) in std::env::vars() {
        eprintln!("{}={}", key, value);
    }
    eprintln!("** environment variables end **");
}
