//! Scan a directory of launcher JSON documents for a game's cover URLs

use crate::cover::pure::{classify, extract_candidates, walk};
use crate::cover::types::{CoverRules, JsonPath, MatchPool, UrlCandidate};
use crate::error::CoverError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Result of one corpus scan
#[derive(Debug, Default)]
pub struct CorpusScan {
    pub candidates: Vec<UrlCandidate>,
    /// Pool the candidates came from (`None` when nothing matched)
    pub pool: Option<MatchPool>,
    pub files_seen: usize,
    pub files_mentioning: usize,
    pub parse_failures: usize,
}

fn has_corpus_extension(path: &Path, rules: &CoverRules) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            rules
                .corpus_extensions
                .iter()
                .any(|want| want.eq_ignore_ascii_case(ext))
        })
}

/// Every corpus file under `root`, sorted by path
pub fn corpus_files(root: &Path, rules: &CoverRules) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_corpus_extension(path, rules))
        .collect();
    files.sort();
    files
}

/// Read and parse a file, but only if its raw text mentions `gid`
fn load_if_mentions(path: &Path, gid: &str) -> Result<Option<Value>, CoverError> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    if !text.contains(gid) {
        return Ok(None);
    }
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| CoverError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn render_path(path: &JsonPath) -> String {
    if path.is_empty() {
        return "$".to_string();
    }
    path.iter().map(ToString::to_string).collect()
}

/// Collect URL candidates for `gid` from every JSON document under `root`
///
/// Exact-match nodes are extracted first; fuzzy-match nodes are only used
/// when the exact pool yields no candidate at all.
pub fn scan_corpus(root: &Path, gid: &str, rules: &CoverRules) -> CorpusScan {
    let mut scan = CorpusScan::default();
    if gid.is_empty() {
        return scan;
    }

    let mut documents: Vec<Value> = Vec::new();
    for path in corpus_files(root, rules) {
        scan.files_seen += 1;
        match load_if_mentions(&path, gid) {
            Ok(Some(doc)) => {
                scan.files_mentioning += 1;
                documents.push(doc);
            }
            Ok(None) => {}
            Err(e) => {
                if matches!(e, CoverError::Parse { .. }) {
                    scan.files_mentioning += 1;
                    scan.parse_failures += 1;
                }
                debug!("Skipping corpus file: {}", e);
            }
        }
    }

    let mut exact: Vec<&Value> = Vec::new();
    let mut fuzzy: Vec<&Value> = Vec::new();
    for doc in &documents {
        for (path, node) in walk(doc) {
            match classify(node, gid, rules) {
                Some(MatchPool::Exact) => {
                    trace!("Exact match for {} at {}", gid, render_path(&path));
                    exact.push(node);
                }
                Some(MatchPool::Fuzzy) => fuzzy.push(node),
                None => {}
            }
        }
    }

    let from_exact: Vec<UrlCandidate> = exact
        .iter()
        .flat_map(|node| extract_candidates(node, rules))
        .collect();

    if !from_exact.is_empty() {
        scan.candidates = from_exact;
        scan.pool = Some(MatchPool::Exact);
    } else {
        let from_fuzzy: Vec<UrlCandidate> = fuzzy
            .iter()
            .flat_map(|node| extract_candidates(node, rules))
            .collect();
        if !from_fuzzy.is_empty() {
            scan.candidates = from_fuzzy;
            scan.pool = Some(MatchPool::Fuzzy);
        }
    }

    debug!(
        "Corpus scan for {} in {}: {} files, {} mention it, {} unparsable, {} exact nodes, {} fuzzy nodes, {} candidates from {:?}",
        gid,
        root.display(),
        scan.files_seen,
        scan.files_mentioning,
        scan.parse_failures,
        exact.len(),
        fuzzy.len(),
        scan.candidates.len(),
        scan.pool
    );

    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cover::pure::select_best;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, body: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_cover_key_on_exact_node() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "a.json",
            r#"{"appName":"123","art_cover":"https://x/cover.jpg"}"#,
        );
        write(
            tmp.path(),
            "b.json",
            r#"{"notes":"see 123","shot":"https://x/other_cover_art.png"}"#,
        );

        let scan = scan_corpus(tmp.path(), "123", &CoverRules::default());
        assert_eq!(scan.pool, Some(MatchPool::Exact));
        assert_eq!(select_best(scan.candidates).as_deref(), Some("https://x/cover.jpg"));
    }

    #[test]
    fn test_fuzzy_typed_images() {
        let tmp = TempDir::new().unwrap();
        let doc = json!({
            "title": "Game gid-77",
            "images": [
                {"type": "DieselGameBoxTall", "url": "https://x/a.png"},
                {"type": "Logo", "url": "https://x/b.png"}
            ]
        });
        write(tmp.path(), "store/cache.json", &doc.to_string());

        let scan = scan_corpus(tmp.path(), "gid-77", &CoverRules::default());
        assert_eq!(scan.pool, Some(MatchPool::Fuzzy));
        assert_eq!(select_best(scan.candidates).as_deref(), Some("https://x/a.png"));
    }

    #[test]
    fn test_exact_pool_never_mixed_with_fuzzy() {
        let tmp = TempDir::new().unwrap();
        // The fuzzy document has a far better looking URL
        write(
            tmp.path(),
            "fuzzy.json",
            &json!({
                "ref": "g9",
                "keyImages": [{"type": "DieselGameBoxTall", "url": "https://x/boxart_cover.png"}]
            })
            .to_string(),
        );
        write(
            tmp.path(),
            "exact.json",
            &json!({"app_name": "g9", "misc": "https://x/plain"}).to_string(),
        );

        let scan = scan_corpus(tmp.path(), "g9", &CoverRules::default());
        assert_eq!(scan.pool, Some(MatchPool::Exact));
        assert_eq!(select_best(scan.candidates).as_deref(), Some("https://x/plain"));
    }

    #[test]
    fn test_empty_exact_pool_falls_back_to_fuzzy() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "exact.json",
            &json!({"app_name": "g42", "art_cover": "https://x/placeholder.png"}).to_string(),
        );
        write(
            tmp.path(),
            "fuzzy.json",
            &json!({
                "ref": "g42",
                "keyImages": [{"type": "DieselGameBoxTall", "url": "https://x/tall.png"}]
            })
            .to_string(),
        );

        let scan = scan_corpus(tmp.path(), "g42", &CoverRules::default());
        assert_eq!(scan.pool, Some(MatchPool::Fuzzy));
        assert_eq!(select_best(scan.candidates).as_deref(), Some("https://x/tall.png"));
    }

    #[test]
    fn test_fuzzy_root_does_not_rank_other_games_images() {
        let tmp = TempDir::new().unwrap();
        let doc = json!({
            "library": [
                {"title": "Target t-1", "keyImages": [{"type": "DieselGameBoxTall", "url": "https://x/target_tall.png"}]},
                {"title": "Other", "keyImages": [{"type": "DieselGameBoxTall", "url": "https://x/o.png"}]}
            ]
        });
        write(tmp.path(), "library.json", &doc.to_string());

        let scan = scan_corpus(tmp.path(), "t-1", &CoverRules::default());
        assert_eq!(scan.pool, Some(MatchPool::Fuzzy));
        let other = scan
            .candidates
            .iter()
            .find(|c| c.url == "https://x/o.png")
            .unwrap();
        assert_eq!(other.epic_type_rank, 0);
        assert_eq!(
            select_best(scan.candidates).as_deref(),
            Some("https://x/target_tall.png")
        );
    }

    #[test]
    fn test_malformed_and_unrelated_files_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "broken.json", r#"{"appName":"abc", "art_cover": "#);
        write(tmp.path(), "other.json", r#"{"appName":"zzz"}"#);
        write(tmp.path(), "notes.txt", r#"{"appName":"abc","art_cover":"https://x/t.png"}"#);
        write(
            tmp.path(),
            "good.json",
            r#"{"appName":"abc","art_cover":"https://x/good.png"}"#,
        );

        let scan = scan_corpus(tmp.path(), "abc", &CoverRules::default());
        assert_eq!(scan.files_seen, 3);
        assert_eq!(scan.files_mentioning, 2);
        assert_eq!(scan.parse_failures, 1);
        assert_eq!(select_best(scan.candidates).as_deref(), Some("https://x/good.png"));
    }

    #[test]
    fn test_placeholder_only_corpus_selects_nothing() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "p.json",
            r#"{"appName":"p1","art_cover":"https://x/placeholder.png","art_square":"https://x/default.jpg"}"#,
        );
        let scan = scan_corpus(tmp.path(), "p1", &CoverRules::default());
        assert!(scan.candidates.is_empty());
        assert_eq!(scan.pool, None);
    }

    #[test]
    fn test_repeated_scans_agree() {
        let tmp = TempDir::new().unwrap();
        for i in 0..5 {
            write(
                tmp.path(),
                &format!("d{}/lib.json", i),
                &json!({"app_name": "same", "art_cover": format!("https://x/c{}.png", i)})
                    .to_string(),
            );
        }
        let rules = CoverRules::default();
        let first = select_best(scan_corpus(tmp.path(), "same", &rules).candidates);
        let second = select_best(scan_corpus(tmp.path(), "same", &rules).candidates);
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some("https://x/c0.png"));
    }

    #[test]
    fn test_missing_root_is_empty() {
        let scan = scan_corpus(Path::new("/nonexistent/corpus/root"), "x", &CoverRules::default());
        assert_eq!(scan.files_seen, 0);
        assert!(scan.candidates.is_empty());
    }
}
