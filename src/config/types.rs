use crate::artwork::CanonicalSpec;
use crate::cover::{default_search_aliases, CoverRules, RemoteSearchConfig, SearchAlias};
use crate::util::parse_bool;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// What to import and how, read from the environment
#[derive(Clone, Debug, PartialEq)]
pub struct ImportSettings {
    pub import_steam: bool,
    pub import_heroic: bool,
    pub import_launchers: bool,
    pub use_default_blacklist: bool,
    /// Raw `BLACKLIST_IDS`, comma or whitespace separated
    pub blacklist_ids: String,
    pub blacklist_file: Option<PathBuf>,
    /// Raw `BLACKLIST_NAME_REGEX`, `|` separated
    pub blacklist_name_regex: String,
    pub sgdb_api_key: String,
    pub sgdb_enable: bool,
    pub sgdb_timeout_secs: u64,
    pub tool_timeout_secs: u64,
}

impl Default for ImportSettings {
    fn default() -> Self {
        ImportSettings {
            import_steam: true,
            import_heroic: true,
            import_launchers: true,
            use_default_blacklist: true,
            blacklist_ids: String::new(),
            blacklist_file: None,
            blacklist_name_regex: String::new(),
            sgdb_api_key: String::new(),
            sgdb_enable: true,
            sgdb_timeout_secs: 12,
            tool_timeout_secs: 60,
        }
    }
}

impl ImportSettings {
    /// Build from an environment snapshot; unknown or unparsable values keep defaults
    pub fn from_env_map(env: &HashMap<String, String>) -> Self {
        let d = ImportSettings::default();
        let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let flag = |key: &str, default: bool| get(key).and_then(parse_bool).unwrap_or(default);
        let secs = |key: &str, default: u64| {
            get(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };

        ImportSettings {
            import_steam: flag("IMPORT_STEAM", d.import_steam),
            import_heroic: flag("IMPORT_HEROIC", d.import_heroic),
            import_launchers: flag("IMPORT_LAUNCHERS", d.import_launchers),
            use_default_blacklist: flag("USE_DEFAULT_BLACKLIST", d.use_default_blacklist),
            blacklist_ids: get("BLACKLIST_IDS").unwrap_or_default().to_string(),
            blacklist_file: get("BLACKLIST_FILE").map(PathBuf::from),
            blacklist_name_regex: get("BLACKLIST_NAME_REGEX").unwrap_or_default().to_string(),
            sgdb_api_key: get("SGDB_API_KEY").unwrap_or_default().to_string(),
            sgdb_enable: flag("SGDB_ENABLE", d.sgdb_enable),
            sgdb_timeout_secs: secs("SGDB_TIMEOUT", d.sgdb_timeout_secs),
            tool_timeout_secs: secs("TOOL_TIMEOUT", d.tool_timeout_secs),
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_map(&std::env::vars().collect())
    }

    pub fn remote_search(&self, aliases: Vec<SearchAlias>) -> RemoteSearchConfig {
        RemoteSearchConfig {
            api_key: self.sgdb_api_key.clone(),
            enabled: self.sgdb_enable,
            timeout_secs: self.sgdb_timeout_secs,
            aliases,
            ..Default::default()
        }
    }

    pub fn canonical_spec(&self) -> CanonicalSpec {
        CanonicalSpec {
            tool_timeout_secs: self.tool_timeout_secs,
            ..Default::default()
        }
    }
}

/// Optional `cover-rules.json` next to `apps.json`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CoverConfig {
    #[serde(default)]
    pub rules: CoverRules,
    #[serde(default = "default_search_aliases")]
    pub search_aliases: Vec<SearchAlias>,
}

impl Default for CoverConfig {
    fn default() -> Self {
        CoverConfig {
            rules: CoverRules::default(),
            search_aliases: default_search_aliases(),
        }
    }
}
