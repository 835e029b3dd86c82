use crate::config::types::CoverConfig;
use crate::util::read_json;

use std::path::Path;
use tracing::{debug, warn};

pub const COVER_CONFIG_FILE: &str = "cover-rules.json";

/// Load `cover-rules.json` from the Sunshine config directory
///
/// Missing or malformed files fall back to the built-in rules.
pub fn load_cover_config(config_dir: &Path) -> CoverConfig {
    let path = config_dir.join(COVER_CONFIG_FILE);
    if !path.is_file() {
        debug!("No {} in {}, using built-in cover rules", COVER_CONFIG_FILE, config_dir.display());
        return CoverConfig::default();
    }

    match read_json::<CoverConfig>(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring {}: {}", path.display(), e);
            CoverConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let cfg = load_cover_config(tmp.path());
        assert_eq!(cfg.rules.id_keys, CoverConfig::default().rules.id_keys);
    }

    #[test]
    fn test_malformed_file_is_default() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(COVER_CONFIG_FILE), "{ not json").unwrap();
        let cfg = load_cover_config(tmp.path());
        assert_eq!(cfg.search_aliases, CoverConfig::default().search_aliases);
    }

    #[test]
    fn test_override_is_applied() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(COVER_CONFIG_FILE),
            json!({
                "rules": {"reject_keywords": ["placeholder", "blank"]},
                "search_aliases": []
            })
            .to_string(),
        )
        .unwrap();
        let cfg = load_cover_config(tmp.path());
        assert_eq!(cfg.rules.reject_keywords, vec!["placeholder", "blank"]);
        assert!(cfg.search_aliases.is_empty());
    }
}
