//! Main application entry point.

use clap::Parser;
use vecsketch_app::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    log::info!("Running {:?}", cli.command);
    match vecsketch_app::run(&cli) {
        Ok(report) => {
            print!("{report}");
            Ok(())
        }
        Err(err) => {
            log::error!("{err}");
            Err(err.into())
        }
    }
}
