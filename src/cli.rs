use std::path::PathBuf;

use tradega::error::{Result, SearchError};

/// Command-line arguments of the search binary.
#[derive(Debug)]
pub struct Args {
    pub config: PathBuf,
}

impl Args {
    /// Parses the process arguments with `clap`; exits with usage on `--help`
    /// or a missing `--config`.
    pub fn parse() -> Result<Self> {
        let matches = clap::Command::new("tradega")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Genetic search over trading-strategy hyperparameters")
            .arg(
                clap::Arg::new("config")
                    .short('c')
                    .long("config")
                    .help("Path to the JSON run configuration")
                    .required(true)
                    .num_args(1)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .get_matches();

        let config = matches
            .get_one::<PathBuf>("config")
            .cloned()
            .ok_or_else(|| SearchError::Configuration("--config is required".to_string()))?;

        Ok(Args { config })
    }
}
