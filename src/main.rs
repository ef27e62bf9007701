use std::{env, process};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use koi::cli::{execute_command, log_level_for, output, CliError};
use koi::config::Settings;
use koi::exitcode;
use koi::infrastructure::di::ServiceContainer;

fn main() {
    let args: Vec<String> = env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            output::error(&e);
            process::exit(exitcode::FAILURE);
        }
    };

    let level = log_level_for(&settings, &args);
    setup_logging(level);
    if level.is_none() {
        tracing::warn!(
            "unknown log level {:?}, using {}",
            settings.log_level,
            LevelFilter::INFO
        );
    }

    let container = ServiceContainer::new(settings);
    let code = match execute_command(&container, args) {
        Ok(code) => code,
        Err(CliError::Usage(e)) => {
            // clap renders its own usage and help text
            if let Err(print_err) = e.print() {
                tracing::debug!("cannot print usage: {}", print_err);
            }
            CliError::Usage(e).exit_code()
        }
        Err(e) => {
            tracing::error!("{}", e);
            output::error(&e);
            e.exit_code()
        }
    };
    process::exit(code);
}

fn setup_logging(level: Option<LevelFilter>) {
    let filter = level.unwrap_or(LevelFilter::INFO);

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    match filter {
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
