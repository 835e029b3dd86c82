//! Cover module type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step from a JSON node to one of its children
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a node inside a parsed document (empty = document root)
pub type JsonPath = Vec<PathSegment>;

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, ".{}", k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Which classification bucket a node landed in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchPool {
    Exact,
    Fuzzy,
}

/// A URL harvested from a matched node together with its rank fields
///
/// Field order mirrors the ranking key: earlier fields dominate later ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlCandidate {
    pub url: String,
    /// 2 = preferred image type, 1 = portrait-ish type, 0 = anything else
    pub epic_type_rank: u8,
    /// 1 when the URL came straight from a cover-key field
    pub cover_key_hit: u8,
    /// 1 when the path (query stripped) ends in a raster image extension
    pub has_image_extension: u8,
    pub prefer_score: u32,
    /// Always <= 0; closer to zero ranks higher
    pub deprioritize_score: i32,
}

/// Key sets and keyword lists driving the matcher, extractor and ranking
///
/// All comparisons against keywords are case-insensitive; key comparisons are exact.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverRules {
    /// Object keys that carry a store identifier
    pub id_keys: Vec<String>,
    /// Object keys whose string value is a direct cover URL
    pub cover_keys: Vec<String>,
    /// Object keys holding arrays/maps of typed image objects
    pub image_container_keys: Vec<String>,
    /// Keys inside a typed image object that hold its URL
    pub image_url_keys: Vec<String>,
    /// Exact `type` values ranked highest
    pub preferred_types: Vec<String>,
    /// Substrings of `type` hinting at a portrait image
    pub orientation_hints: Vec<String>,
    pub prefer_keywords: Vec<String>,
    pub deprioritize_keywords: Vec<String>,
    /// A URL containing any of these is never a candidate
    pub reject_keywords: Vec<String>,
    pub image_extensions: Vec<String>,
    /// File extensions scanned by the corpus walker
    pub corpus_extensions: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for CoverRules {
    fn default() -> Self {
        CoverRules {
            id_keys: strings(&[
                "appName",
                "app_name",
                "appId",
                "app_id",
                "appid",
                "id",
                "gameId",
                "game_id",
                "productId",
                "product_id",
                "catalogItemId",
                "catalog_item_id",
                "namespace",
                "slug",
            ]),
            cover_keys: strings(&[
                "art_cover",
                "art_square",
                "cover",
                "coverUrl",
                "cover_url",
                "boxart",
                "boxArt",
                "box_art",
                "poster",
                "image",
                "verticalCover",
                "vertical_cover",
                "art_hero",
                "hero",
            ]),
            image_container_keys: strings(&["keyImages", "images", "media", "artwork"]),
            image_url_keys: strings(&["url", "src", "uri"]),
            preferred_types: strings(&[
                "DieselGameBoxTall",
                "OfferImageTall",
                "Thumbnail",
                "boxart",
                "cover",
                "poster",
            ]),
            orientation_hints: strings(&["tall", "vertical", "boxart", "box_art"]),
            prefer_keywords: strings(&[
                "cover", "boxart", "poster", "portrait", "front", "artwork", "keyart", "hero",
                "tall", "vertical",
            ]),
            deprioritize_keywords: strings(&[
                "screenshot",
                "logo",
                "icon",
                "background",
                "wallpaper",
                "banner",
                "landscape",
                "wide",
                "placeholder",
                "default",
            ]),
            reject_keywords: strings(&["placeholder", "default"]),
            image_extensions: strings(&[".png", ".jpg", ".jpeg", ".webp", ".gif", ".bmp"]),
            corpus_extensions: strings(&["json"]),
        }
    }
}

/// Disambiguation data for the remote name search
///
/// An alias applies when every `when_name_contains` entry occurs in the
/// normalized game name. When several apply, the one with the most
/// conditions wins.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchAlias {
    pub when_name_contains: Vec<String>,
    /// Replaces the derived search term
    pub search_term: Option<String>,
    /// First result whose title contains all of these is picked
    pub preferred_title: Vec<String>,
    /// Otherwise the first result whose title contains all of these
    pub fallback_title: Vec<String>,
}

impl SearchAlias {
    pub fn applies_to(&self, normalized_name: &str) -> bool {
        !self.when_name_contains.is_empty()
            && self
                .when_name_contains
                .iter()
                .all(|needle| normalized_name.contains(&needle.to_lowercase()))
    }

    pub fn has_title_rules(&self) -> bool {
        !self.preferred_title.is_empty() || !self.fallback_title.is_empty()
    }
}

pub fn default_search_aliases() -> Vec<SearchAlias> {
    vec![
        SearchAlias {
            when_name_contains: strings(&["castlevania"]),
            search_term: Some("castlevania".to_string()),
            ..Default::default()
        },
        SearchAlias {
            when_name_contains: strings(&["castlevania", "lords of shadow"]),
            search_term: Some("castlevania".to_string()),
            preferred_title: strings(&["lords of shadow", "ultimate"]),
            fallback_title: strings(&["lords of shadow"]),
        },
    ]
}

/// Settings for the remote image search service
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteSearchConfig {
    pub api_key: String,
    pub enabled: bool,
    pub timeout_secs: u64,
    pub base_url: String,
    pub aliases: Vec<SearchAlias>,
}

pub const SGDB_BASE_URL: &str = "https://www.steamgriddb.com/api/v2";

impl Default for RemoteSearchConfig {
    fn default() -> Self {
        RemoteSearchConfig {
            api_key: String::new(),
            enabled: true,
            timeout_secs: 12,
            base_url: SGDB_BASE_URL.to_string(),
            aliases: default_search_aliases(),
        }
    }
}
