//! Source URL or path -> canonical image on disk

use crate::artwork::operations::{default_strategies, fetch_to_temp, is_canonical, ConvertStrategy};
use crate::artwork::types::CanonicalSpec;
use crate::error::{CoverError, CoverResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct Materializer {
    spec: CanonicalSpec,
    strategies: Vec<Box<dyn ConvertStrategy>>,
}

impl Materializer {
    pub fn new(spec: CanonicalSpec) -> Self {
        Self::with_strategies(spec, default_strategies())
    }

    pub fn with_strategies(spec: CanonicalSpec, strategies: Vec<Box<dyn ConvertStrategy>>) -> Self {
        Materializer { spec, strategies }
    }

    pub fn spec(&self) -> &CanonicalSpec {
        &self.spec
    }

    /// An existing destination that already meets the spec
    pub fn existing(&self, dst: &Path) -> Option<PathBuf> {
        is_canonical(dst, &self.spec).then(|| dst.to_path_buf())
    }

    /// Produce a canonical image at `dst` from `source`
    ///
    /// A valid existing destination is returned untouched, without fetching.
    pub fn materialize(&self, source: &str, dst: &Path) -> CoverResult<PathBuf> {
        if let Some(existing) = self.existing(dst) {
            debug!("Reusing existing image {}", existing.display());
            return Ok(existing);
        }

        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CoverError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp = fetch_to_temp(source, &self.spec)?;
        let written = self.convert(tmp.path(), dst)?;
        info!("Saved cover {} from {}", written.display(), source);
        Ok(written)
    }

    /// Run the strategies in order; the first success wins
    pub fn convert(&self, src: &Path, dst: &Path) -> CoverResult<PathBuf> {
        let mut last_err = None;

        for strategy in &self.strategies {
            match strategy.convert(src, dst, &self.spec) {
                Ok(path) => {
                    debug!("Converted with {}", strategy.name());
                    return Ok(path);
                }
                Err(e) if e.is_terminal() => return Err(e),
                Err(e) => {
                    debug!("Conversion via {} failed: {}", strategy.name(), e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| CoverError::Decode("no conversion strategy".to_string())))
    }
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new(CanonicalSpec::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::operations::validate::fixtures::write_noise;
    use crate::artwork::operations::convert::{InProcessResize, ReencodeCopy};
    use image::ImageFormat;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Records its name and fails softly
    struct Failing {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        terminal: bool,
    }

    impl ConvertStrategy for Failing {
        fn name(&self) -> &'static str {
            self.name
        }

        fn convert(&self, _src: &Path, dst: &Path, _spec: &CanonicalSpec) -> CoverResult<PathBuf> {
            self.log.borrow_mut().push(self.name);
            if self.terminal {
                Err(CoverError::Write {
                    path: dst.to_path_buf(),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                })
            } else {
                Err(CoverError::ToolUnavailable(self.name))
            }
        }
    }

    fn failing(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>, terminal: bool) -> Box<dyn ConvertStrategy> {
        Box::new(Failing {
            name,
            log: log.clone(),
            terminal,
        })
    }

    #[test]
    fn test_local_source_becomes_canonical() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("art.jpg");
        write_noise(&src, 200, 100, ImageFormat::Jpeg);
        let dst = tmp.path().join("images/steam/620.png");

        let m = Materializer::default();
        let out = m.materialize(src.to_str().unwrap(), &dst).unwrap();
        assert_eq!(out, dst);
        assert!(is_canonical(&dst, m.spec()));
    }

    #[test]
    fn test_existing_valid_destination_skips_fetch() {
        let tmp = TempDir::new().unwrap();
        let dst = tmp.path().join("cover.png");
        write_noise(&dst, 600, 900, ImageFormat::Png);
        let before = std::fs::read(&dst).unwrap();

        // An unreachable source proves nothing was fetched
        let m = Materializer::default();
        let out = m.materialize("http://127.0.0.1:9/never.png", &dst).unwrap();
        assert_eq!(out, dst);
        assert_eq!(std::fs::read(&dst).unwrap(), before);
    }

    #[test]
    fn test_invalid_destination_is_regenerated() {
        let tmp = TempDir::new().unwrap();
        let dst = tmp.path().join("cover.png");
        write_noise(&dst, 100, 100, ImageFormat::Png);
        let src = tmp.path().join("src.png");
        write_noise(&src, 64, 64, ImageFormat::Png);

        let m = Materializer::default();
        m.materialize(src.to_str().unwrap(), &dst).unwrap();
        assert!(is_canonical(&dst, m.spec()));
    }

    #[test]
    fn test_strategies_run_in_order_until_success() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.png");
        write_noise(&src, 64, 64, ImageFormat::Png);
        let dst = tmp.path().join("out.png");

        let log = Rc::new(RefCell::new(Vec::new()));
        let m = Materializer::with_strategies(
            CanonicalSpec::default(),
            vec![
                failing("first", &log, false),
                failing("second", &log, false),
                Box::new(InProcessResize),
                failing("never", &log, false),
            ],
        );
        m.convert(&src, &dst).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_write_failure_stops_the_chain() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.png");
        write_noise(&src, 64, 64, ImageFormat::Png);

        let log = Rc::new(RefCell::new(Vec::new()));
        let m = Materializer::with_strategies(
            CanonicalSpec::default(),
            vec![failing("denied", &log, true), Box::new(ReencodeCopy)],
        );
        let err = m.convert(&src, &tmp.path().join("out.png")).unwrap_err();
        assert!(err.is_terminal());
        assert!(!tmp.path().join("out.png").exists());
    }

    #[test]
    fn test_all_strategies_failing_reports_last_error() {
        let tmp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let m = Materializer::with_strategies(
            CanonicalSpec::default(),
            vec![failing("a", &log, false), failing("b", &log, false)],
        );
        let err = m
            .convert(&tmp.path().join("x"), &tmp.path().join("y.png"))
            .unwrap_err();
        assert!(matches!(err, CoverError::ToolUnavailable("b")));
    }
}
