//! Steam artwork cache resolution
//!
//! Steam stores game artwork in the librarycache folder:
//! {STEAM}/appcache/librarycache/{appid}/{hash}/{filename}
//! or directly as: {STEAM}/appcache/librarycache/{appid}/{filename}
//! Older clients keep a flat layout: {STEAM}/appcache/librarycache/{appid}_{filename}

use std::path::{Path, PathBuf};

const BOX_ART: &str = "library_600x900.jpg";

/// Find a file in Steam's librarycache for an app
pub fn find_cache_file(steam_root: &Path, app_id: u32, filename: &str) -> Option<PathBuf> {
    let library_cache = steam_root.join("appcache/librarycache");

    let flat = library_cache.join(format!("{}_{}", app_id, filename));
    if flat.is_file() {
        return Some(flat);
    }

    let app_cache = library_cache.join(app_id.to_string());
    let direct_path = app_cache.join(filename);
    if direct_path.is_file() {
        return Some(direct_path);
    }

    // Hash subfolders, sorted so the pick is stable
    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(&app_cache)
        .ok()?
        .flatten()
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .map(|e| e.path())
        .collect();
    subdirs.sort();

    subdirs
        .into_iter()
        .map(|dir| dir.join(filename))
        .find(|p| p.is_file())
}

/// Get the box art (library_600x900.jpg) as a percent-encoded file:// URI
pub fn box_art_uri(steam_root: &Path, app_id: u32) -> Option<String> {
    let path = find_cache_file(steam_root, app_id, BOX_ART)?;
    reqwest::Url::from_file_path(&path).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cache_layouts() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("appcache/librarycache");

        assert_eq!(box_art_uri(tmp.path(), 620), None);

        std::fs::create_dir_all(cache.join("620/ab12")).unwrap();
        std::fs::write(cache.join("620/ab12").join(BOX_ART), b"x").unwrap();
        assert_eq!(
            find_cache_file(tmp.path(), 620, BOX_ART),
            Some(cache.join("620/ab12").join(BOX_ART))
        );

        std::fs::write(cache.join("620").join(BOX_ART), b"x").unwrap();
        assert_eq!(
            find_cache_file(tmp.path(), 620, BOX_ART),
            Some(cache.join("620").join(BOX_ART))
        );

        std::fs::write(cache.join(format!("620_{}", BOX_ART)), b"x").unwrap();
        assert_eq!(
            box_art_uri(tmp.path(), 620),
            Some(format!("file://{}", cache.join(format!("620_{}", BOX_ART)).display()))
        );
    }

    #[test]
    fn test_uri_survives_reserved_characters() {
        use crate::artwork::operations::fetch::parse_source;

        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("Games #1 100% ?");
        let cache = root.join("appcache/librarycache");
        std::fs::create_dir_all(&cache).unwrap();
        let art = cache.join(format!("440_{}", BOX_ART));
        std::fs::write(&art, b"x").unwrap();

        let uri = box_art_uri(&root, 440).unwrap();
        assert!(uri.contains("%23") && uri.contains("%25"));
        let direct = parse_source(&art.display().to_string());
        assert!(direct.is_some());
        assert_eq!(parse_source(&uri), direct);
    }
}
