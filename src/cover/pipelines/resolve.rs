//! Resolve and materialize cover art for one discovered game
//!
//! Sources are evaluated lazily, cheapest first:
//! 1. art already cached locally by the launcher
//! 2. best URL from the launcher's JSON documents
//! 3. the store's own CDN
//! 4. SteamGridDB by Steam app id, then by name
//!
//! A source may offer several URLs in order; one that fails to materialize
//! falls through to the next URL, then to the next source.

use crate::artwork::Materializer;
use crate::cover::operations::{remote_cover_url, scan_corpus, SgdbClient};
use crate::cover::pure::select_best;
use crate::cover::types::{CoverRules, RemoteSearchConfig};
use crate::platform::Platform;
use crate::util::slugify;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything shared across the games of one import run
pub struct CoverContext {
    pub rules: CoverRules,
    pub materializer: Materializer,
    pub images_root: PathBuf,
    sgdb: Option<SgdbClient>,
}

impl CoverContext {
    pub fn new(
        rules: CoverRules,
        remote: &RemoteSearchConfig,
        materializer: Materializer,
        images_root: PathBuf,
    ) -> Self {
        CoverContext {
            rules,
            materializer,
            images_root,
            sgdb: SgdbClient::new(remote),
        }
    }

    /// Canonical destination for a game's cover
    pub fn destination(&self, game: &dyn Platform) -> PathBuf {
        let ext = self.materializer.spec().extension();
        self.images_root
            .join(game.image_group())
            .join(format!("{}.{}", slugify(&game.app_identifier()), ext))
    }
}

/// Best cover URL for `gid` among the JSON documents under `corpus`
pub fn resolve_local_url(corpus: &Path, gid: &str, rules: &CoverRules) -> Option<String> {
    select_best(scan_corpus(corpus, gid, rules).candidates)
}

/// Cover URL for one game outside an import run: the corpus first, then a
/// remote search by `name`
pub fn find_cover_url(
    corpus: Option<&Path>,
    gid: &str,
    name: Option<&str>,
    rules: &CoverRules,
    remote: &RemoteSearchConfig,
) -> Option<String> {
    if let Some(url) = corpus.and_then(|dir| resolve_local_url(dir, gid, rules)) {
        return Some(url);
    }
    remote_cover_url(remote, name?)
}

type Urls<'a> = Box<dyn Iterator<Item = String> + 'a>;
type SourceFn<'a> = Box<dyn Fn() -> Urls<'a> + 'a>;

fn single<'a>(url: Option<String>) -> Urls<'a> {
    Box::new(url.into_iter())
}

fn sources<'a>(game: &'a dyn Platform, ctx: &'a CoverContext) -> Vec<(&'static str, SourceFn<'a>)> {
    let mut out: Vec<(&'static str, SourceFn<'a>)> = Vec::new();

    out.push(("launcher cache", Box::new(move || single(game.box_art_uri()))));
    out.push((
        "launcher metadata",
        Box::new(move || {
            single(
                game.cover_corpus()
                    .and_then(|corpus| resolve_local_url(&corpus, &game.app_identifier(), &ctx.rules)),
            )
        }),
    ));
    out.push(("store cdn", Box::new(move || single(game.cdn_cover_url()))));

    if let Some(sgdb) = ctx.sgdb.as_ref() {
        out.push((
            "steamgriddb",
            Box::new(move || match game.steam_appid() {
                Some(app_id) => Box::new(sgdb.image_urls_by_steam_appid(app_id)) as Urls<'a>,
                None => single(None),
            }),
        ));
        out.push((
            "steamgriddb search",
            Box::new(move || Box::new(sgdb.image_urls_by_name(game.title())) as Urls<'a>),
        ));
    }

    out
}

/// Path of a canonical cover for `game`, or `None` when every source failed
pub fn resolve_cover(game: &dyn Platform, ctx: &CoverContext) -> Option<PathBuf> {
    let dst = ctx.destination(game);
    if let Some(existing) = ctx.materializer.existing(&dst) {
        return Some(existing);
    }

    for (label, source) in sources(game, ctx) {
        let mut offered = 0;
        for url in source() {
            offered += 1;
            match ctx.materializer.materialize(&url, &dst) {
                Ok(path) => {
                    info!("Cover for '{}' from {}", game.title(), label);
                    return Some(path);
                }
                Err(e) if e.is_terminal() => {
                    warn!("Cannot store cover for '{}': {}", game.title(), e);
                    return None;
                }
                Err(e) => debug!("{} cover for '{}' unusable: {}", label, game.title(), e),
            }
        }
        if offered == 0 {
            debug!("No {} cover for '{}'", label, game.title());
        }
    }

    warn!("Could not find any cover art for '{}'", game.title());
    None
}
