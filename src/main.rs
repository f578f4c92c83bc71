use anyhow::Result;
use clap::Parser;
use redub::app::run_dub_command;
use redub::cli::{Cli, Commands, ConfigAction};
use redub::config::Config;
use redub::diagnostics::check_engines;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path)?.with_env_overrides();

    match cli.command {
        Commands::Dub {
            input,
            output,
            language,
        } => {
            run_dub_command(config, &input, &output, language, cli.quiet).await?;
        }
        Commands::Check => {
            if !check_engines(&config) {
                std::process::exit(1);
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => {
                Config::write_template(&config_path, force)?;
                if !cli.quiet {
                    eprintln!("Wrote {}", config_path.display());
                }
            }
            ConfigAction::Show => {
                show_config(&config, &config_path)?;
            }
        },
    }

    Ok(())
}

/// Map -q/-v flags onto env_logger, letting RUST_LOG take precedence.
fn init_logging(quiet: bool, verbose: u8) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn show_config(config: &Config, path: &Path) -> Result<()> {
    if path.exists() {
        eprintln!("# {}", path.display());
    } else {
        eprintln!("# {} (not found, showing defaults)", path.display());
    }
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
