//! Sunshine operations - apps.json I/O and built-in entries

mod apps_file;
mod launchers;

pub use apps_file::{
    backup_or_init, load_apps, merge_apps, prepare_dirs, save_apps, APPS_FILE,
};
pub use launchers::launcher_entries;
