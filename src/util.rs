use serde::Serialize;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static SLUG_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9._-]+").expect("static regex"));

/// Whether `name` resolves to an executable file on `PATH`
pub fn have_cmd(name: &str) -> bool {
    which(name).is_some()
}

fn which(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

/// Filesystem-safe, lowercase name for generated artwork files
pub fn slugify(s: &str) -> String {
    let slug = SLUG_INVALID.replace_all(s, "_");
    let slug = slug.trim_matches('_').to_lowercase();
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug
    }
}

/// Lenient boolean as found in shell-style config: 1/true/yes/on, 0/false/no/off
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read and deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

/// Pretty-print `value` to `path` through a sibling `.tmp` file and a rename
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    std::fs::write(&tmp, text)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Fall Guys"), "fall_guys");
        assert_eq!(slugify("Quail:Game/2"), "quail_game_2");
        assert_eq!(slugify("v1.2-beta"), "v1.2-beta");
        assert_eq!(slugify("  !!  "), "unnamed");
        assert_eq!(slugify("1207658930"), "1207658930");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool(" on "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_have_cmd() {
        assert!(have_cmd("sh"));
        assert!(!have_cmd("definitely-not-an-installed-tool"));
    }

    #[test]
    fn test_write_json_is_atomic_and_readable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("apps.json");
        let doc = json!({"apps": [{"name": "Desktop"}]});

        write_json(&path, &doc).unwrap();
        assert!(!tmp.path().join("apps.json.tmp").exists());
        let back: Value = read_json(&path).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_read_json_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(read_json::<Value>(&tmp.path().join("missing.json")).is_err());

        let bad = tmp.path().join("bad.json");
        std::fs::write(&bad, "{ nope").unwrap();
        assert!(read_json::<Value>(&bad).is_err());
    }
}
