use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub static PATH_HOME: LazyLock<PathBuf> = LazyLock::new(|| {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"))
});

pub static PATH_CONFIG: LazyLock<PathBuf> = LazyLock::new(|| {
    if let Some(xdg_config_home) = env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg_config_home);
    }
    PATH_HOME.join(".config")
});

/// Flatpak application ids Sunshine ships under
pub const SUNSHINE_FLATPAK_IDS: [&str; 2] = ["dev.lizardbyte.app.Sunshine", "dev.lizardbyte.Sunshine"];

pub const STEAM_FLATPAK_ID: &str = "com.valvesoftware.Steam";
pub const HEROIC_FLATPAK_ID: &str = "com.heroicgameslauncher.hgl";

/// `~/.var/app/<id>`
pub fn flatpak_app_dir(home: &Path, app_id: &str) -> PathBuf {
    home.join(".var/app").join(app_id)
}

/// Sunshine's config directory: an existing Flatpak sandbox first, else the native location
pub fn sunshine_config_dir(home: &Path, config_home: &Path) -> PathBuf {
    for id in SUNSHINE_FLATPAK_IDS {
        let app = flatpak_app_dir(home, id);
        if app.is_dir() {
            return app.join("config/sunshine");
        }
    }
    config_home.join("sunshine")
}

pub static PATH_SUNSHINE: LazyLock<PathBuf> =
    LazyLock::new(|| sunshine_config_dir(&PATH_HOME, &PATH_CONFIG));

/// Heroic config roots in lookup order (Flatpak, then native)
pub fn heroic_roots(home: &Path, config_home: &Path) -> [PathBuf; 2] {
    [
        flatpak_app_dir(home, HEROIC_FLATPAK_ID).join("config/heroic"),
        config_home.join("heroic"),
    ]
}

/// Steam roots checked when steamlocate finds nothing
pub static PATH_STEAM_FALLBACKS: LazyLock<[PathBuf; 3]> = LazyLock::new(|| {
    [
        flatpak_app_dir(&PATH_HOME, STEAM_FLATPAK_ID).join(".local/share/Steam"),
        PATH_HOME.join(".local/share/Steam"),
        PATH_HOME.join(".steam/steam"),
    ]
});

/// Whether `path` lives inside a Flatpak sandbox
pub fn is_flatpak_path(path: &Path) -> bool {
    path.components()
        .collect::<Vec<_>>()
        .windows(2)
        .any(|w| w[0].as_os_str() == ".var" && w[1].as_os_str() == "app")
}
