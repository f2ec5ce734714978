use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Args, OutputFormat};
use rusty_quality::report::guidelines::GUIDELINES;
use rusty_quality::report::{render_text, Session};

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays a clean report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    if args.guidelines {
        print!("{GUIDELINES}");
    }
    let Some(file) = &args.file else {
        return Ok(ExitCode::SUCCESS);
    };

    let mut session =
        Session::new(args.load_options()).with_formats(args.date_format(), args.time_format());
    if let Err(error) = session.load(file) {
        eprintln!("{error}");
        return Ok(ExitCode::FAILURE);
    }
    let report = session
        .report()
        .context("No table available after loading")?;

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }

    if let Some(path) = &args.map {
        if report.write_map(path)? {
            eprintln!("Map written to {}", path.display());
        } else {
            eprintln!("No map written: latitude/longitude columns were not detected or could not be plotted");
        }
    }
    Ok(ExitCode::SUCCESS)
}
