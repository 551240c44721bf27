use clap::Parser;
use color_eyre::Result;
use dayboard::ai::Gateway;
use dayboard::cli::{Cli, Commands};
use dayboard::{Config, Profile, logging};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev selects a separate config and log directory
    let profile = Profile::from_dev_flag(cli.dev);

    let config_path = match cli.config {
        Some(ref path) => path.clone(),
        None => Config::get_config_path(profile)?,
    };
    let (config, source) = Config::load_from_path(&config_path)?;

    let log_path = logging::init(profile, &config.log_level);
    source.report(&config_path);

    let gateway = Gateway::from_settings(&config.ai);

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let mut app = dayboard::tui::App::new(config, config_path, gateway);
            app.log_path = log_path;
            dayboard::tui::run_event_loop(app)?;
        }
        Commands::Briefing => {
            dayboard::cli::handle_briefing(&gateway)?;
        }
        Commands::ScanReceipt { image } => {
            dayboard::cli::handle_scan_receipt(&image, &gateway)?;
        }
    }

    Ok(())
}
