//! Full import run: discover games, resolve covers, merge into apps.json

use crate::artwork::Materializer;
use crate::config::{load_cover_config, ImportSettings};
use crate::cover::{resolve_cover, CoverContext};
use crate::platform::{Blacklist, HeroicInstall, Platform, SteamInstall};
use crate::sunshine::operations::{
    backup_or_init, launcher_entries, load_apps, merge_apps, prepare_dirs, save_apps, APPS_FILE,
};
use crate::sunshine::types::{AppEntry, SunshineApp};
use std::error::Error;
use std::path::PathBuf;
use tracing::info;

/// Where to write and which importers to run
#[derive(Clone, Debug)]
pub struct ImportOptions {
    pub config_dir: PathBuf,
    pub images_dir: PathBuf,
    pub home: PathBuf,
    /// Print the merged document instead of writing anything
    pub dry_run: bool,
    pub steam: bool,
    pub heroic: bool,
    pub launchers: bool,
}

#[derive(Debug, Default, PartialEq)]
pub struct ImportSummary {
    pub imported: usize,
    pub appended: usize,
    pub with_cover: usize,
}

/// Sunshine entry for one game; the cover is resolved unless `dry_run`,
/// in which case only an already materialized cover is used
pub fn app_for_game(game: &dyn Platform, ctx: &CoverContext, dry_run: bool) -> SunshineApp {
    let cover = if dry_run {
        ctx.materializer.existing(&ctx.destination(game))
    } else {
        resolve_cover(game, ctx)
    };

    let app = SunshineApp::new(
        game.title(),
        game.launch_command(),
        game.working_dir().display().to_string(),
    );
    info!("Found {} [{}] {}", game.name(), game.app_identifier(), game.title());

    match cover {
        Some(path) => app.with_image(path.display().to_string()),
        None => app,
    }
}

fn import_games(games: &[Box<dyn Platform>], ctx: &CoverContext, dry_run: bool) -> Vec<SunshineApp> {
    games.iter().map(|game| app_for_game(game.as_ref(), ctx, dry_run)).collect()
}

/// Run every enabled importer and merge the result into `apps.json`
///
/// Returns the merged document as pretty JSON when `dry_run` is set.
pub fn run_import(
    options: &ImportOptions,
    settings: &ImportSettings,
) -> Result<(ImportSummary, Option<String>), Box<dyn Error>> {
    let apps_path = options.config_dir.join(APPS_FILE);

    if !options.dry_run {
        prepare_dirs(&options.config_dir, &options.images_dir)?;
        backup_or_init(&apps_path)?;
    }
    let mut doc = load_apps(&apps_path);

    let cover_config = load_cover_config(&options.config_dir);
    let ctx = CoverContext::new(
        cover_config.rules,
        &settings.remote_search(cover_config.search_aliases),
        Materializer::new(settings.canonical_spec()),
        options.images_dir.clone(),
    );

    let steam = SteamInstall::locate();
    let heroic = HeroicInstall::locate();
    let mut imported: Vec<AppEntry> = Vec::new();

    if options.steam {
        match &steam {
            Some(install) => {
                info!("Steam: {} at {}", install.kind, install.root.display());
                let blacklist = Blacklist::from_settings(settings, &options.config_dir);
                let games: Vec<Box<dyn Platform>> = install
                    .games(&blacklist)
                    .into_iter()
                    .map(|g| Box::new(g) as Box<dyn Platform>)
                    .collect();
                info!("Steam installed games: {}", games.len());
                imported.extend(import_games(&games, &ctx, options.dry_run).into_iter().map(AppEntry::from));
            }
            None => info!("Steam not found; skipping Steam import"),
        }
    } else {
        info!("Steam import disabled");
    }

    if options.heroic {
        match &heroic {
            Some(install) => {
                info!("Heroic: {} at {}", install.kind, install.root.display());
                let games: Vec<Box<dyn Platform>> = install
                    .games()
                    .into_iter()
                    .map(|g| Box::new(g) as Box<dyn Platform>)
                    .collect();
                info!("Heroic installed games: {}", games.len());
                imported.extend(import_games(&games, &ctx, options.dry_run).into_iter().map(AppEntry::from));
            }
            None => info!("Heroic not found; skipping Heroic import"),
        }
    } else {
        info!("Heroic import disabled");
    }

    let with_cover = imported
        .iter()
        .filter(|e| matches!(e, AppEntry::App(app) if !app.image_path.is_empty()))
        .count();

    if options.launchers {
        imported.extend(launcher_entries(
            &options.home,
            &options.images_dir,
            steam.as_ref(),
            heroic.as_ref(),
        ));
    } else {
        info!("Launchers importer disabled");
    }

    let summary_imported = imported.len();
    let appended = merge_apps(&mut doc, imported)?;
    let summary = ImportSummary {
        imported: summary_imported,
        appended,
        with_cover,
    };

    if options.dry_run {
        return Ok((summary, Some(serde_json::to_string_pretty(&doc)?)));
    }

    save_apps(&apps_path, &doc)?;
    info!(
        "Wrote {} ({} entries, {} new, {} with covers)",
        apps_path.display(),
        summary.imported,
        summary.appended,
        summary.with_cover
    );
    Ok((summary, None))
}
