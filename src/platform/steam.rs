//! Steam platform implementation
//!
//! Discovers installed apps and resolves launch commands and artwork.

use super::{InstallKind, Platform};
use crate::paths::STEAM_FLATPAK_ID;
use crate::util::have_cmd;
use std::path::PathBuf;

mod blacklist;
mod cache;
mod locate;

pub use blacklist::Blacklist;

const STEAM_CDN: &str = "https://steamcdn-a.akamaihd.net/steam/apps";

/// A located Steam client
#[derive(Clone, Debug, PartialEq)]
pub struct SteamInstall {
    pub root: PathBuf,
    pub kind: InstallKind,
}

impl SteamInstall {
    /// Find the Steam client, or `None` when it is not installed
    pub fn locate() -> Option<Self> {
        locate::find_steam_root().map(|root| SteamInstall {
            kind: InstallKind::of(&root),
            root,
        })
    }

    /// Installed apps that pass the blacklist, sorted by app id
    pub fn games(&self, blacklist: &Blacklist) -> Vec<SteamGame> {
        locate::installed_apps(&self.root)
            .into_iter()
            .filter(|(app_id, name)| {
                let skip = blacklist.is_blacklisted(*app_id, name);
                if skip {
                    tracing::info!("Skipping blacklisted [{}] {}", app_id, name);
                }
                !skip
            })
            .map(|(app_id, name)| SteamGame::new(app_id, name, self.clone()))
            .collect()
    }

    /// Command that opens the Steam client itself, if it can be started
    pub fn client_command(&self) -> Option<String> {
        match self.kind {
            InstallKind::Flatpak => Some(format!("flatpak run {}", STEAM_FLATPAK_ID)),
            InstallKind::Native => have_cmd("steam").then(|| "steam".to_string()),
        }
    }
}

/// Steam platform implementation
#[derive(Clone, Debug)]
pub struct SteamGame {
    pub app_id: u32,
    pub name: String,
    install: SteamInstall,
}

impl SteamGame {
    pub fn new(app_id: u32, name: String, install: SteamInstall) -> Self {
        Self {
            app_id,
            name,
            install,
        }
    }
}

impl Platform for SteamGame {
    fn name(&self) -> &str {
        "steam"
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn app_identifier(&self) -> String {
        self.app_id.to_string()
    }

    fn launch_command(&self) -> String {
        match self.install.kind {
            InstallKind::Flatpak => format!(
                "flatpak-spawn --host flatpak run {} steam -applaunch {}",
                STEAM_FLATPAK_ID, self.app_id
            ),
            InstallKind::Native => format!("steam -applaunch {}", self.app_id),
        }
    }

    fn working_dir(&self) -> PathBuf {
        self.install.root.clone()
    }

    fn box_art_uri(&self) -> Option<String> {
        cache::box_art_uri(&self.install.root, self.app_id)
    }

    fn cdn_cover_url(&self) -> Option<String> {
        Some(format!("{}/{}/library_600x900.jpg", STEAM_CDN, self.app_id))
    }

    fn steam_appid(&self) -> Option<u32> {
        Some(self.app_id)
    }
}
