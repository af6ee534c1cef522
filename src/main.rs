use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use quad_rectify::cli::usage_error;
use quad_rectify::{load_corners, rectify, Cli, RectifyError, Report};

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: &Cli) -> Result<PathBuf, RectifyError> {
    let corners = load_corners(&cli.corners)?;
    rectify(&cli.image, &corners, &cli.output, &cli.options())
}

/// Print the result line; stdout carries nothing else
fn emit(report: &Report) -> Result<()> {
    let line = report
        .to_json_line()
        .context("Failed to serialize result")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", line).context("Failed to write result to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn finish(result: Result<PathBuf, RectifyError>) -> ExitCode {
    let (report, code) = match &result {
        Ok(output) => (Report::success(output), ExitCode::SUCCESS),
        Err(err) => {
            log::error!("{}: {}", err.kind(), err);
            (Report::failure(err), ExitCode::FAILURE)
        }
    };

    if let Err(err) = emit(&report) {
        log::error!("{:#}", err);
        return ExitCode::FAILURE;
    }

    code
}

fn main() -> ExitCode {
    let args: Vec<_> = std::env::args_os().collect();

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => {
            init_logging(false);
            log::error!("Argument count = {}", args.len());
            log::error!("{}", err.render().to_string().trim_end());
            return finish(Err(usage_error(&err)));
        }
    };

    init_logging(cli.verbose);
    log::debug!("Argument count = {}", args.len());
    log::debug!("Arguments = {:?}", args);
    log::debug!("Interpolation: {:?}", cli.interpolation);

    finish(run(&cli))
}
