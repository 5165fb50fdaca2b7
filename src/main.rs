use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use pet_dataset_prep::cli::{Cli, Command};
use pet_dataset_prep::config::Settings;
use pet_dataset_prep::core::imaging::{convert_directory, resize_directory};
use pet_dataset_prep::core::split::split_dataset;
use pet_dataset_prep::logging::setup_logging;
use pet_dataset_prep::{PrepError, PrepResult};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.log_dir.as_deref()) {
        eprintln!("Error setting up logging: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting pet-dataset-prep");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> PrepResult<()> {
    let mut settings = Settings::load(cli.config.as_deref());
    cli.apply(&mut settings);

    match &cli.command {
        Command::Split(_) => {
            let stats = split_dataset(&settings.split)?;
            println!(
                "train={} val={} test={} (copied {}, failed {})",
                stats.totals.train,
                stats.totals.val,
                stats.totals.test,
                stats.copied,
                stats.failures.len()
            );
        }
        Command::Convert(_) => {
            let convert = &settings.convert;
            let stats = convert_directory(&convert.input_dir, &convert.output_dir, &convert.options)?;
            println!(
                "Converted images saved to: {} ({} saved, {} errors)",
                convert.output_dir.display(),
                stats.saved(),
                stats.errors.len()
            );
        }
        Command::Resize(_) => {
            let resize = &settings.resize;
            let stats = resize_directory(&resize.input_dir, &resize.output_dir, &resize.options)?;
            println!(
                "Resized {} of {} images ({} errors)",
                stats.resized,
                stats.total,
                stats.errors.len()
            );
        }
        Command::InitConfig => {
            let path = match &cli.config {
                Some(p) => p.clone(),
                None => Settings::get_config_path().ok_or_else(|| {
                    PrepError::Settings("Could not determine config directory".to_string())
                })?,
            };
            settings.save(&path)?;
            println!("Settings written to {}", path.display());
        }
    }

    Ok(())
}
