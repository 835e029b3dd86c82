//! Reading, merging and writing Sunshine's `apps.json`

use crate::sunshine::types::AppEntry;
use crate::util::{read_json, write_json};
use serde_json::{json, Map, Value};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const APPS_FILE: &str = "apps.json";

/// Per-store image folders created under `images/`
pub const IMAGE_GROUPS: [&str; 3] = ["steam", "heroic", "sideload"];

/// Create the config directory and the image folders; returns the images root
pub fn prepare_dirs(config_dir: &Path, images_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    std::fs::create_dir_all(config_dir)?;
    for group in IMAGE_GROUPS {
        std::fs::create_dir_all(images_dir.join(group))?;
    }
    Ok(images_dir.to_path_buf())
}

/// Copy `apps.json` to `apps.json.bak`, or create an empty list when it is missing
pub fn backup_or_init(apps_path: &Path) -> Result<(), Box<dyn Error>> {
    if apps_path.is_file() {
        let mut bak = apps_path.as_os_str().to_owned();
        bak.push(".bak");
        match std::fs::copy(apps_path, &bak) {
            Ok(_) => info!("Backed up {}", apps_path.display()),
            Err(e) => warn!("Could not back up {}: {}", apps_path.display(), e),
        }
        return Ok(());
    }

    write_json(apps_path, &json!({ "apps": [] }))?;
    info!("Initialised {}", apps_path.display());
    Ok(())
}

/// Coerce whatever is on disk into an object with an `apps` array
///
/// A bare array becomes the app list. An object keeps its other keys.
pub fn ensure_obj_with_apps(doc: Value) -> Map<String, Value> {
    match doc {
        Value::Array(apps) => {
            let mut obj = Map::new();
            obj.insert("apps".into(), Value::Array(apps));
            obj
        }
        Value::Object(mut obj) => {
            let apps = match obj.remove("apps") {
                Some(Value::Array(apps)) => apps,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => vec![other],
            };
            obj.insert("apps".into(), Value::Array(apps));
            obj
        }
        _ => {
            let mut obj = Map::new();
            obj.insert("apps".into(), Value::Array(Vec::new()));
            obj
        }
    }
}

pub fn load_apps(apps_path: &Path) -> Map<String, Value> {
    let doc = match read_json::<Value>(apps_path) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("Starting from an empty app list ({}): {}", apps_path.display(), e);
            Value::Null
        }
    };
    ensure_obj_with_apps(doc)
}

/// Add `imported` to the document's app list
///
/// An app already in the file with the same name is replaced where it
/// stands, each at most once per merge; the rest are appended in order.
/// Imported entries never replace each other. Returns how many were appended.
pub fn merge_apps(doc: &mut Map<String, Value>, imported: Vec<AppEntry>) -> Result<usize, Box<dyn Error>> {
    let apps = doc
        .entry("apps")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !apps.is_array() {
        *apps = Value::Array(Vec::new());
    }
    let Value::Array(apps) = apps else {
        return Err("apps is not a list".into());
    };

    let existing_len = apps.len();
    let mut replaced = vec![false; existing_len];
    let mut appended = 0;
    for entry in imported {
        let name = entry.name().to_string();
        let value = serde_json::to_value(entry)?;
        let existing = apps[..existing_len].iter().enumerate().position(|(i, app)| {
            !replaced[i] && app.get("name").and_then(Value::as_str) == Some(name.as_str())
        });
        match existing {
            Some(i) => {
                apps[i] = value;
                replaced[i] = true;
            }
            None => {
                apps.push(value);
                appended += 1;
            }
        }
    }
    Ok(appended)
}

pub fn save_apps(apps_path: &Path, doc: &Map<String, Value>) -> Result<(), Box<dyn Error>> {
    write_json(apps_path, doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sunshine::types::SunshineApp;
    use tempfile::TempDir;

    fn app(name: &str, cmd: &str) -> AppEntry {
        SunshineApp::new(name, cmd, "/").into()
    }

    #[test]
    fn test_ensure_obj_with_apps() {
        let list = ensure_obj_with_apps(json!([{"name": "A"}]));
        assert_eq!(Value::Object(list), json!({"apps": [{"name": "A"}]}));

        let obj = ensure_obj_with_apps(json!({"env": {"PATH": "x"}, "apps": null}));
        assert_eq!(Value::Object(obj), json!({"env": {"PATH": "x"}, "apps": []}));

        let junk = ensure_obj_with_apps(json!("nope"));
        assert_eq!(Value::Object(junk), json!({"apps": []}));
    }

    #[test]
    fn test_merge_replaces_by_name_and_appends() {
        let mut doc = ensure_obj_with_apps(json!({
            "env": {},
            "apps": [{"name": "Desktop", "image-path": "desktop.png"}, {"name": "Portal 2", "cmd": "old"}]
        }));

        let appended = merge_apps(
            &mut doc,
            vec![app("Portal 2", "steam -applaunch 620"), app("Celeste", "steam -applaunch 504230")],
        )
        .unwrap();
        assert_eq!(appended, 1);

        let apps = doc["apps"].as_array().unwrap();
        let names: Vec<_> = apps.iter().map(|a| a["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Desktop", "Portal 2", "Celeste"]);
        assert_eq!(apps[1]["cmd"], json!("steam -applaunch 620"));
        assert_eq!(apps[0]["image-path"], json!("desktop.png"));
    }

    #[test]
    fn test_rerun_is_stable() {
        let mut doc = ensure_obj_with_apps(Value::Null);
        merge_apps(&mut doc, vec![app("A", "a"), app("B", "b")]).unwrap();
        let first = doc.clone();
        merge_apps(&mut doc, vec![app("A", "a"), app("B", "b")]).unwrap();
        assert_eq!(doc, first);
    }

    #[test]
    fn test_same_title_from_two_stores_keeps_both() {
        let mut doc = ensure_obj_with_apps(Value::Null);
        let batch = || {
            vec![
                app("Portal", "steam -applaunch 400"),
                app("Portal", "xdg-open heroic://launch/legendary/portal"),
                app("Steam", "steam -applaunch 1"),
                app("Steam", "steam"),
            ]
        };

        assert_eq!(merge_apps(&mut doc, batch()).unwrap(), 4);
        let cmds: Vec<_> = doc["apps"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["cmd"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            cmds,
            vec![
                "steam -applaunch 400",
                "xdg-open heroic://launch/legendary/portal",
                "steam -applaunch 1",
                "steam"
            ]
        );

        let first = doc.clone();
        assert_eq!(merge_apps(&mut doc, batch()).unwrap(), 0);
        assert_eq!(doc, first);
    }

    #[test]
    fn test_backup_init_and_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let images = tmp.path().join("cfg/images");
        prepare_dirs(&tmp.path().join("cfg"), &images).unwrap();
        for group in IMAGE_GROUPS {
            assert!(images.join(group).is_dir());
        }

        let path = tmp.path().join("cfg").join(APPS_FILE);
        backup_or_init(&path).unwrap();
        assert_eq!(Value::Object(load_apps(&path)), json!({"apps": []}));
        assert!(!tmp.path().join("cfg/apps.json.bak").exists());

        let mut doc = load_apps(&path);
        merge_apps(&mut doc, vec![app("A", "a")]).unwrap();
        save_apps(&path, &doc).unwrap();

        backup_or_init(&path).unwrap();
        let bak: Value = read_json(&tmp.path().join("cfg/apps.json.bak")).unwrap();
        assert_eq!(bak["apps"][0]["name"], json!("A"));
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(APPS_FILE);
        std::fs::write(&path, "{ broken").unwrap();
        assert_eq!(Value::Object(load_apps(&path)), json!({"apps": []}));
    }
}
