//! Heroic Games Launcher implementation
//!
//! Heroic keeps one installed list per runner under its config root:
//! - legendaryConfig/legendary/installed.json (Epic)
//! - gog_store/installed.json (GOG)
//! - sideload_apps/library.json (user-added games)
//!
//! The same root doubles as the metadata corpus searched for cover URLs.

use super::{InstallKind, Platform};
use crate::paths::{heroic_roots, HEROIC_FLATPAK_ID, PATH_CONFIG, PATH_HOME};
use crate::util::{have_cmd, read_json};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeroicRunner {
    Legendary,
    Gog,
    Sideload,
}

impl HeroicRunner {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeroicRunner::Legendary => "legendary",
            HeroicRunner::Gog => "gog",
            HeroicRunner::Sideload => "sideload",
        }
    }
}

/// A located Heroic config root
#[derive(Clone, Debug, PartialEq)]
pub struct HeroicInstall {
    pub root: PathBuf,
    pub kind: InstallKind,
}

impl HeroicInstall {
    /// First existing Heroic config root (Flatpak, then native)
    pub fn locate() -> Option<Self> {
        Self::locate_in(&PATH_HOME, &PATH_CONFIG)
    }

    pub fn locate_in(home: &Path, config_home: &Path) -> Option<Self> {
        heroic_roots(home, config_home)
            .into_iter()
            .find(|root| root.is_dir())
            .map(|root| HeroicInstall {
                kind: InstallKind::of(&root),
                root,
            })
    }

    /// Command that opens the Heroic client itself, if it can be started
    pub fn client_command(&self) -> Option<String> {
        match self.kind {
            InstallKind::Flatpak => Some(format!("flatpak run {}", HEROIC_FLATPAK_ID)),
            InstallKind::Native => have_cmd("heroic").then(|| "heroic".to_string()),
        }
    }

    /// Every installed game across the three runners
    pub fn games(&self) -> Vec<HeroicGame> {
        let mut games = self.legendary_games();
        games.extend(self.gog_games());
        games.extend(self.sideload_games());
        games
    }

    fn game(&self, runner: HeroicRunner, app_name: &str, title: &str, install_path: Option<&str>) -> HeroicGame {
        HeroicGame {
            app_name: app_name.to_string(),
            title: (if title.trim().is_empty() { app_name } else { title }).to_string(),
            runner,
            install_path: install_path.filter(|p| !p.is_empty()).map(PathBuf::from),
            install: self.clone(),
        }
    }

    fn legendary_games(&self) -> Vec<HeroicGame> {
        let Some(doc) = load(&self.root.join("legendaryConfig/legendary/installed.json")) else {
            return Vec::new();
        };
        let Some(entries) = doc.as_object() else {
            return Vec::new();
        };

        let mut games: Vec<HeroicGame> = entries
            .iter()
            .filter_map(|(key, entry)| {
                let app_name = str_field(entry, "app_name").unwrap_or(key.as_str());
                if entry.get("is_dlc").and_then(Value::as_bool).unwrap_or(false) {
                    return None;
                }
                Some(self.game(
                    HeroicRunner::Legendary,
                    app_name,
                    str_field(entry, "title").unwrap_or(app_name),
                    str_field(entry, "install_path"),
                ))
            })
            .collect();
        games.sort_by(|a, b| a.app_name.cmp(&b.app_name));
        games
    }

    /// GOG titles are not in the installed list; look them up in the library caches
    fn gog_titles(&self) -> HashMap<String, String> {
        let mut titles = HashMap::new();
        for file in ["gog_store/library.json", "store_cache/gog_library.json"] {
            let Some(doc) = load(&self.root.join(file)) else {
                continue;
            };
            for entry in list_field(&doc, "games") {
                if let (Some(id), Some(title)) = (str_field(entry, "app_name"), str_field(entry, "title")) {
                    titles.entry(id.to_string()).or_insert_with(|| title.to_string());
                }
            }
        }
        titles
    }

    fn gog_games(&self) -> Vec<HeroicGame> {
        let Some(doc) = load(&self.root.join("gog_store/installed.json")) else {
            return Vec::new();
        };
        let titles = self.gog_titles();

        list_field(&doc, "installed")
            .filter(|entry| !entry.get("is_dlc").and_then(Value::as_bool).unwrap_or(false))
            .filter_map(|entry| {
                let app_name = str_field(entry, "appName")?;
                let title = titles.get(app_name).map(String::as_str).unwrap_or(app_name);
                Some(self.game(HeroicRunner::Gog, app_name, title, str_field(entry, "install_path")))
            })
            .collect()
    }

    fn sideload_games(&self) -> Vec<HeroicGame> {
        let Some(doc) = load(&self.root.join("sideload_apps/library.json")) else {
            return Vec::new();
        };

        list_field(&doc, "games")
            .filter_map(|entry| {
                let app_name = str_field(entry, "app_name")?;
                Some(self.game(
                    HeroicRunner::Sideload,
                    app_name,
                    str_field(entry, "title").unwrap_or(app_name),
                    str_field(entry, "folder_name"),
                ))
            })
            .collect()
    }
}

fn load(path: &Path) -> Option<Value> {
    if !path.is_file() {
        debug!("No Heroic list at {}", path.display());
        return None;
    }
    match read_json::<Value>(path) {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!("Cannot parse {}: {}", path.display(), e);
            None
        }
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn list_field<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Heroic platform implementation
#[derive(Clone, Debug)]
pub struct HeroicGame {
    pub app_name: String,
    pub title: String,
    pub runner: HeroicRunner,
    pub install_path: Option<PathBuf>,
    install: HeroicInstall,
}

impl HeroicGame {
    fn launch_uri(&self) -> String {
        format!(
            "heroic://launch/{}/{}",
            self.runner.as_str(),
            urlencoding::encode(&self.app_name)
        )
    }
}

impl Platform for HeroicGame {
    fn name(&self) -> &str {
        "heroic"
    }

    fn image_group(&self) -> &str {
        match self.runner {
            HeroicRunner::Sideload => "sideload",
            HeroicRunner::Legendary | HeroicRunner::Gog => "heroic",
        }
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn app_identifier(&self) -> String {
        self.app_name.clone()
    }

    fn launch_command(&self) -> String {
        match self.install.kind {
            InstallKind::Flatpak => format!(
                "flatpak run {} --no-gui {}",
                HEROIC_FLATPAK_ID,
                self.launch_uri()
            ),
            InstallKind::Native => format!("xdg-open {}", self.launch_uri()),
        }
    }

    fn working_dir(&self) -> PathBuf {
        self.install_path
            .clone()
            .filter(|p| p.is_absolute())
            .unwrap_or_else(|| PATH_HOME.clone())
    }

    fn cover_corpus(&self) -> Option<PathBuf> {
        Some(self.install.root.clone())
    }
}
