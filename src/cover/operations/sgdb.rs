//! SteamGridDB client
//!
//! Used only when local resolution finds nothing. Every request failure is
//! logged and treated as "try the next endpoint".

use crate::cover::pure::search::{
    applicable_alias, best_image_url, normalize_name, parse_hits, pick_result, search_term,
};
use crate::cover::types::{RemoteSearchConfig, SearchAlias};
use crate::error::{CoverError, CoverResult};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// (endpoint, query) pairs tried in order for a SteamGridDB game id
const IMAGE_QUERIES: [(&str, &str); 4] = [
    ("grids", "?dimensions=600x900"),
    ("grids", ""),
    ("heroes", "?dimensions=600x900"),
    ("heroes", ""),
];

pub struct SgdbClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    aliases: Vec<SearchAlias>,
}

impl SgdbClient {
    /// `None` when the service is disabled or no API key is configured
    pub fn new(config: &RemoteSearchConfig) -> Option<Self> {
        if !config.enabled || config.api_key.trim().is_empty() {
            debug!("SteamGridDB disabled or missing API key");
            return None;
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("sunshine-manager/", env!("CARGO_PKG_VERSION")))
            .build()
            .ok()?;

        Some(SgdbClient {
            http,
            api_key: config.api_key.trim().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            aliases: config.aliases.clone(),
        })
    }

    fn get_json(&self, url: &str) -> CoverResult<Value> {
        let response = self.http.get(url).bearer_auth(&self.api_key).send()?;

        if !response.status().is_success() {
            return Err(CoverError::network(url, format!("HTTP {}", response.status())));
        }

        response
            .json::<Value>()
            .map_err(|e| CoverError::network(url, e))
    }

    /// SteamGridDB game id for a display name
    fn game_id_for(&self, game_name: &str) -> Option<u64> {
        let normalized = normalize_name(game_name);
        if normalized.is_empty() {
            return None;
        }

        let alias = applicable_alias(&normalized, &self.aliases);
        let term = search_term(&normalized, alias);
        let search_url = format!(
            "{}/search/autocomplete/{}",
            self.base_url,
            urlencoding::encode(&term)
        );

        let hits = match self.get_json(&search_url) {
            Ok(doc) => parse_hits(&doc),
            Err(e) => {
                debug!("SteamGridDB search failed for '{}': {}", game_name, e);
                return None;
            }
        };

        let Some(game_id) = pick_result(&hits, alias) else {
            debug!("SteamGridDB has no usable match for '{}'", game_name);
            return None;
        };
        info!("Found SteamGridDB ID for '{}': {}", game_name, game_id);
        Some(game_id)
    }

    fn best_image(&self, url: &str, require_success: bool) -> Option<String> {
        match self.get_json(url) {
            Ok(doc) => best_image_url(&doc, require_success),
            Err(e) => {
                debug!("SteamGridDB lookup failed: {}", e);
                None
            }
        }
    }

    /// Best image of each grid/hero query for a display name, in query order
    ///
    /// The name search runs up front; each image query only runs when the
    /// iterator is advanced to it.
    pub fn image_urls_by_name<'a>(&'a self, game_name: &str) -> impl Iterator<Item = String> + use<'a> {
        self.game_id_for(game_name).into_iter().flat_map(move |game_id| {
            IMAGE_QUERIES.into_iter().filter_map(move |(endpoint, query)| {
                self.best_image(&format!("{}/{}/{}{}", self.base_url, endpoint, game_id, query), true)
            })
        })
    }

    /// Cover URL for a game known only by its display name
    pub fn search_by_name(&self, game_name: &str) -> Option<String> {
        self.image_urls_by_name(game_name).next()
    }

    /// Highest-scored grid, then hero, for a Steam app id, lazily
    pub fn image_urls_by_steam_appid(&self, app_id: u32) -> impl Iterator<Item = String> + '_ {
        ["grids", "heroes"].into_iter().filter_map(move |endpoint| {
            self.best_image(&format!("{}/{}/steam/{}", self.base_url, endpoint, app_id), false)
        })
    }
}

/// Name search entry point; fails closed without a usable configuration
pub fn remote_cover_url(config: &RemoteSearchConfig, game_name: &str) -> Option<String> {
    SgdbClient::new(config)?.search_by_name(game_name)
}
