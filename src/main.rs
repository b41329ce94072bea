mod cli;

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tradega::config::SearchConfig;
use tradega::dataset::{CachedDatasetProvider, CsvDatasetProvider, DatasetProvider};
use tradega::dispatch::local::LocalDispatcher;
use tradega::error::Result;
use tradega::evolution::{DistributedEvaluator, SearchLauncher};
use tradega::logger::FileResultLogger;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "search aborted");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = cli::Args::parse()?;
    let config = SearchConfig::from_file(&args.config)?;
    info!(
        config = %args.config.display(),
        datasets = config.datasets.len(),
        population_size = config.population_size,
        num_generations = config.num_generations,
        "configuration loaded"
    );

    let provider = CsvDatasetProvider::new(&config.data_dir);
    if config.cache_datasets {
        search(CachedDatasetProvider::new(provider), &config)
    } else {
        search(provider, &config)
    }
}

fn search<P: DatasetProvider>(provider: P, config: &SearchConfig) -> Result<()> {
    let logger = FileResultLogger::new(&config.log_file)?;
    let dispatcher = LocalDispatcher::new(config.trainer(), config.worker_threads())?;
    info!(workers = dispatcher.workers(), trainer = %config.trainer.program, "worker pool ready");

    let evaluator = DistributedEvaluator::new(provider, dispatcher)
        .with_window_size(config.window_size)
        .with_batch_timeout(config.batch_timeout())
        .with_trade_floor(config.trade_floor);

    let mut launcher = SearchLauncher::new(evaluator, logger);
    let mut rng = config.rng();
    let outcome = launcher.evolve(
        &config.options(),
        &config.parameter_space,
        &config.datasets,
        &mut rng,
    )?;

    match outcome.best() {
        Some(best) => info!(
            score = best.score,
            individual = %best.individual,
            log_file = %config.log_file.display(),
            "search finished"
        ),
        None => info!(log_file = %config.log_file.display(), "search finished without a scored individual"),
    }

    Ok(())
}
