mod commands;
mod session;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use commands::{BatchArgs, CleanArgs, PreviewArgs, RenameArgs, SuggestArgs};
use imaginex_core::{app_paths, load_config, save_config, AppConfig, RenameEngine};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "imaginex")]
#[command(about = "Rename photo batches, with names suggested from EXIF dates or image content")]
struct Cli {
    /// -v for info, -vv for debug logging. RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the cleaned form of a name.
    Clean(CleanArgs),
    /// Show what a file would be renamed to.
    Preview(PreviewArgs),
    Rename(RenameArgs),
    Batch(BatchArgs),
    Suggest(SuggestArgs),
    /// Interactive session with undo history.
    Session,
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    /// Write the default settings unless a config file already exists.
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config()?;
    let mut engine = RenameEngine::with_capacity(config.history_capacity);

    match cli.command {
        Commands::Clean(args) => {
            commands::cmd_clean(&args);
            Ok(())
        }
        Commands::Preview(args) => commands::cmd_preview(&engine, &config, &args),
        Commands::Rename(args) => commands::cmd_rename(&mut engine, &config, &args),
        Commands::Batch(args) => commands::cmd_batch(&mut engine, &config, &args),
        Commands::Suggest(args) => commands::cmd_suggest(&config, &args),
        Commands::Session => session::run(&mut engine, &config),
        Commands::Config(args) => match args.action {
            ConfigAction::Show => cmd_config_show(&config),
            ConfigAction::Init => cmd_config_init(),
        },
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let paths = app_paths()?;
    println!("config file: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let paths = app_paths()?;
    if paths.config_path.exists() {
        println!("config file already exists: {}", paths.config_path.display());
        return Ok(());
    }
    save_config(&AppConfig::default())?;
    println!("wrote {}", paths.config_path.display());
    Ok(())
}
