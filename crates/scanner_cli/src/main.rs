mod app;
mod prompts;
mod render;

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use scanner_engine::{load_config, CONFIG_FILENAME};
use scanner_logging::{scanner_info, LogDestination};

#[derive(Debug, Parser)]
#[command(name = "scanner", about = "Interactive JustWatch new-titles scanner")]
struct Args {
    /// RON configuration file.
    #[arg(long, default_value = CONFIG_FILENAME)]
    config: PathBuf,

    /// Directory for JSON/CSV exports, overriding the configured one.
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    scanner_logging::initialize(LogDestination::File, LevelFilter::Debug);

    let mut config = load_config(&args.config);
    if let Some(dir) = args.export_dir {
        config.export_dir = dir;
    }
    scanner_info!("Interactive scanner starting (country={})", config.country);

    let app = app::App::new(config)?;
    app.run()
}
