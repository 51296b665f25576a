use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use kg_indexer::{init_logging, run_categories, Cli, Dependencies, IndexingError, Settings};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_format, cli.log_file.as_deref()) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Indexing failed");
            eprintln!("Error: {}", e);

            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("  Caused by: {}", err);
                source = err.source();
            }

            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), IndexingError> {
    let settings = Settings::from_cli(cli)?;

    info!(
        index = %settings.indexor.index_name,
        categories = ?settings.categories,
        page_size = settings.indexor.page_size,
        start_offset = settings.indexor.start_offset,
        max_failures = settings.indexor.max_consecutive_failures,
        "Using parameters"
    );

    let deps = Dependencies::new(&settings).await?;

    tokio::select! {
        result = run_categories(&deps.indexor, &settings.categories) => {
            result?;
            info!("All categories indexed");
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Received shutdown signal, stopping");
            Err(IndexingError::Interrupted)
        }
    }
}
