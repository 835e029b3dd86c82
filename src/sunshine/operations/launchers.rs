//! Fixed entries that open the desktop, the launchers themselves, or reboot

use crate::platform::{HeroicInstall, SteamInstall};
use crate::sunshine::types::{AppEntry, DetachedApp, SunshineApp};
use std::path::Path;
use tracing::info;

pub const REBOOT_APP_NAME: &str = "Zz Reboot System";

/// Desktop, Steam and Heroic (when they can be started) and a reboot entry
pub fn launcher_entries(
    home: &Path,
    images_dir: &Path,
    steam: Option<&SteamInstall>,
    heroic: Option<&HeroicInstall>,
) -> Vec<AppEntry> {
    let home_dir = home.display().to_string();
    let mut entries: Vec<AppEntry> = Vec::new();

    entries.push(SunshineApp::new("Desktop", "", &home_dir).with_image("steam.png").into());

    match steam.and_then(|s| Some((s.client_command()?, s))) {
        Some((cmd, install)) => {
            let app = SunshineApp::new("Steam", cmd, install.root.display().to_string());
            entries.push(app.with_image("steam.png").into());
        }
        None => info!("Steam not detected; skipping Steam launcher"),
    }

    match heroic.and_then(|h| h.client_command()) {
        Some(cmd) => {
            let app = SunshineApp::new("Heroic", cmd, &home_dir);
            entries.push(app.with_image("heroic.png").into());
        }
        None => info!("Heroic not detected; skipping Heroic launcher"),
    }

    entries.push(
        DetachedApp {
            name: REBOOT_APP_NAME.to_string(),
            output: String::new(),
            cmd: Vec::new(),
            detached: vec!["systemctl reboot".to_string()],
            auto_detach: true,
            wait_all: true,
            exit_timeout: 5,
            exclude_global_prep_cmd: false,
            image_path: images_dir.join("Reboot.png").display().to_string(),
        }
        .into(),
    );

    for entry in &entries {
        info!("Added {} launcher", entry.name());
    }
    entries
}
