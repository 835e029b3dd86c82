//! Steam installation discovery
//!
//! Uses steamlocate crate to find the client and its installed apps.

use crate::paths::PATH_STEAM_FALLBACKS;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Steam root directory, preferring what steamlocate reports
pub fn find_steam_root() -> Option<PathBuf> {
    if let Ok(steam_dir) = steamlocate::SteamDir::locate() {
        return Some(steam_dir.path().to_path_buf());
    }

    PATH_STEAM_FALLBACKS
        .iter()
        .find(|root| root.join("steamapps").is_dir())
        .cloned()
}

/// `(app id, name)` of every installed app across all library folders
///
/// Apps without a name in their manifest are skipped.
pub fn installed_apps(steam_root: &Path) -> Vec<(u32, String)> {
    let steam_dir = match steamlocate::SteamDir::from_dir(steam_root) {
        Ok(dir) => dir,
        Err(e) => {
            warn!("Cannot read Steam at {}: {}", steam_root.display(), e);
            return Vec::new();
        }
    };
    let libraries = match steam_dir.libraries() {
        Ok(libraries) => libraries,
        Err(e) => {
            warn!("Cannot read Steam library folders: {}", e);
            return Vec::new();
        }
    };

    let mut apps = BTreeMap::new();
    for library in libraries {
        let library = match library {
            Ok(lib) => lib,
            Err(e) => {
                debug!("Skipping Steam library: {}", e);
                continue;
            }
        };

        for app in library.apps().flatten() {
            if let Some(name) = app.name.filter(|n| !n.trim().is_empty()) {
                apps.entry(app.app_id).or_insert(name);
            }
        }
    }

    apps.into_iter().collect()
}
