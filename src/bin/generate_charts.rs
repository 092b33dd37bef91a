//! Renders the manuscript figures from the labelled dataset and the exported
//! classifier artifacts.

use clap::Parser;
use fraudlens_lib::charts::{self, ChartFormat, ChartJob};
use fraudlens_lib::classifier::{DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE};
use fraudlens_lib::evaluation::dataset::DEFAULT_DATASET_FILE;
use fraudlens_lib::evaluation::{SPLIT_SEED, TEST_FRACTION};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "generate-charts", version, about)]
struct Cli {
    /// Labelled dataset CSV.
    #[arg(long, default_value = DEFAULT_DATASET_FILE)]
    dataset: PathBuf,
    /// Classifier artifact (JSON).
    #[arg(long, default_value = DEFAULT_MODEL_FILE)]
    model: PathBuf,
    /// Scaler artifact (JSON).
    #[arg(long, default_value = DEFAULT_SCALER_FILE)]
    scaler: PathBuf,
    /// Directory the figures are written to.
    #[arg(long, default_value = "charts")]
    output_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = ChartFormat::Svg)]
    format: ChartFormat,
    /// Share of each class held out for evaluation.
    #[arg(long, default_value_t = TEST_FRACTION)]
    test_size: f64,
    #[arg(long, default_value_t = SPLIT_SEED)]
    seed: u64,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if !(0.0..1.0).contains(&cli.test_size) || cli.test_size == 0.0 {
        eprintln!("--test-size must be between 0 and 1 (exclusive)");
        return ExitCode::FAILURE;
    }

    let job = ChartJob {
        dataset: cli.dataset,
        model: cli.model,
        scaler: cli.scaler,
        output_dir: cli.output_dir,
        format: cli.format,
        test_fraction: cli.test_size,
        seed: cli.seed,
    };

    match charts::generate(&job) {
        Ok(written) => {
            println!(
                "Generated {} charts in {}",
                written.len(),
                job.output_dir.display()
            );
            for path in written {
                println!("  {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("chart generation failed: {e}");
            ExitCode::FAILURE
        }
    }
}
