use clap::Parser;
use img_shrink::cli::Args;
use img_shrink::{error, logger, run, ProcessingOptions, Result, RunSummary};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.verbose, args.quiet);

    match execute(&args) {
        Ok(summary) => {
            summary.print();
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> Result<RunSummary> {
    let options = ProcessingOptions::new(args.format, args.width, args.height, args.verbose)?;
    run(&args.directory, &options)
}
