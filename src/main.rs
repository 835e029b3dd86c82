mod artwork;
mod config;
mod cover;
mod error;
mod paths;
mod platform;
mod sunshine;
mod util;

use crate::artwork::Materializer;
use crate::config::{load_cover_config, ImportSettings};
use crate::cover::find_cover_url;
use crate::paths::{PATH_HOME, PATH_SUNSHINE};
use crate::sunshine::{run_import, ImportOptions};

use clap::{ArgAction, Args, Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sunshine-manager",
    version,
    about = "Import installed Steam and Heroic games into Sunshine with cover art"
)]
struct Cli {
    /// Debug output (repeat for trace)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover games and merge them into apps.json (default)
    Import(ImportArgs),

    /// Resolve cover art for a single game and print the result
    Cover(CoverArgs),
}

#[derive(Args, Debug, Default)]
struct ImportArgs {
    /// Sunshine config directory (default: detected)
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Cover art directory (default: <config-dir>/images)
    #[arg(long, value_name = "DIR")]
    images_dir: Option<PathBuf>,

    /// Print the resulting apps.json instead of writing it
    #[arg(long)]
    dry_run: bool,

    #[arg(long)]
    no_steam: bool,

    #[arg(long)]
    no_heroic: bool,

    #[arg(long)]
    no_launchers: bool,
}

#[derive(Args, Debug)]
struct CoverArgs {
    /// Directory of launcher JSON metadata to search
    #[arg(long, value_name = "DIR")]
    corpus: Option<PathBuf>,

    /// Store identifier of the game
    #[arg(long)]
    id: String,

    /// Game title, for the remote search fallback
    #[arg(long)]
    name: Option<String>,

    /// Write a canonical cover image here instead of printing the URL
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn import(args: ImportArgs, settings: &ImportSettings) -> Result<(), Box<dyn Error>> {
    let config_dir = args.config_dir.unwrap_or_else(|| PATH_SUNSHINE.clone());
    let images_dir = args.images_dir.unwrap_or_else(|| config_dir.join("images"));
    info!("Sunshine config: {}", config_dir.display());

    let options = ImportOptions {
        config_dir,
        images_dir,
        home: PATH_HOME.clone(),
        dry_run: args.dry_run,
        steam: settings.import_steam && !args.no_steam,
        heroic: settings.import_heroic && !args.no_heroic,
        launchers: settings.import_launchers && !args.no_launchers,
    };

    let (_, printed) = run_import(&options, settings)?;
    if let Some(doc) = printed {
        println!("{}", doc);
    }
    Ok(())
}

fn cover(args: CoverArgs, settings: &ImportSettings) -> Result<(), Box<dyn Error>> {
    let cover_config = load_cover_config(&PATH_SUNSHINE);
    let remote = settings.remote_search(cover_config.search_aliases);

    let url = find_cover_url(
        args.corpus.as_deref(),
        &args.id,
        args.name.as_deref(),
        &cover_config.rules,
        &remote,
    )
    .ok_or_else(|| format!("No cover art found for '{}'", args.id))?;

    match args.out {
        Some(out) => {
            let written = Materializer::new(settings.canonical_spec()).materialize(&url, &out)?;
            println!("{}", written.display());
        }
        None => println!("{}", url),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = ImportSettings::from_env();
    let result = match cli.command {
        Some(Command::Cover(args)) => cover(args, &settings),
        Some(Command::Import(args)) => import(args, &settings),
        None => import(ImportArgs::default(), &settings),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
