//! Platform abstraction - WHERE games come from
//!
//! Platforms represent installed game libraries:
//! - Steam: Valve's client, discovered with steamlocate
//! - Heroic: Epic (legendary), GOG and sideloaded games
//!
//! Each discovered game knows how Sunshine should launch it and where its
//! cover art might be found.

use std::path::PathBuf;

/// A single installed game
pub trait Platform {
    /// Store name for identification ("steam", "heroic")
    fn name(&self) -> &str;

    /// Folder under `images/` that holds this game's cover
    fn image_group(&self) -> &str {
        self.name()
    }

    /// Display title, used as the Sunshine app name
    fn title(&self) -> &str;

    /// Platform-specific identifier (appid, appName, ...)
    fn app_identifier(&self) -> String;

    /// Shell command Sunshine runs to start the game
    fn launch_command(&self) -> String;

    fn working_dir(&self) -> PathBuf;

    /// Box art already present on disk (optional)
    fn box_art_uri(&self) -> Option<String> {
        None
    }

    /// Directory of launcher metadata to search for cover URLs (optional)
    fn cover_corpus(&self) -> Option<PathBuf> {
        None
    }

    /// The store's own portrait cover (optional)
    fn cdn_cover_url(&self) -> Option<String> {
        None
    }

    /// Steam app id, for id-based art lookups
    fn steam_appid(&self) -> Option<u32> {
        None
    }
}

/// How a launcher is installed, which decides how it must be invoked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallKind {
    Native,
    Flatpak,
}

impl InstallKind {
    pub fn of(root: &std::path::Path) -> Self {
        if crate::paths::is_flatpak_path(root) {
            InstallKind::Flatpak
        } else {
            InstallKind::Native
        }
    }
}

impl std::fmt::Display for InstallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallKind::Native => write!(f, "native"),
            InstallKind::Flatpak => write!(f, "flatpak"),
        }
    }
}

mod heroic;
mod steam;

pub use heroic::HeroicInstall;
pub use steam::{Blacklist, SteamInstall};
