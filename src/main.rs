// Entry point: runs the batch analysis over all discovered participants.
use std::error::Error;
use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scanpath::cli::Args;
use scanpath::config::AppConfig;
use scanpath::core::transitions::CategoryFilter;
use scanpath::pipeline;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let cfg = AppConfig::load_or_default(&args.config);
    let filter = if args.with_five {
        CategoryFilter::All
    } else {
        CategoryFilter::ExcludeOffTask
    };

    let summary = pipeline::run_batch(
        Path::new(&args.gaze_dir),
        Path::new(&args.question_dir),
        Path::new(&args.out_dir),
        &cfg,
        filter,
    )?;

    println!(
        "Analyzed {} participants ({} skipped), results in {}",
        summary.analyzed, summary.skipped, args.out_dir
    );
    Ok(())
}
