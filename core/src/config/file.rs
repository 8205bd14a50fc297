//! Configuration files (`config.json` and per-title overrides)
//!
//! Files are UTF-8 JSON objects carrying a `formatVersion`. Older formats are
//! migrated on load; saving always writes the current format.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::migration::{self, FORMAT_VERSION};
use super::{ConfigError, ConfigKey, Node};

/// Returns the platform-specific configuration directory.
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "joyport", "joyport")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Location of the global configuration file.
pub fn global_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Location of the override file for one title.
///
/// # Errors
///
/// [`ConfigError::InvalidTitle`] if `title_id` is not a safe file name.
pub fn title_path(dir: &Path, title_id: &str) -> Result<PathBuf, ConfigError> {
    if !is_safe_title_id(title_id) {
        return Err(ConfigError::InvalidTitle(title_id.to_string()));
    }
    Ok(dir.join("titles").join(format!("{}.json", title_id)))
}

/// Returns true if a title ID is safe to use as a single path component on all platforms.
pub fn is_safe_title_id(id: &str) -> bool {
    if id.is_empty() || id == "." || id == ".." {
        return false;
    }

    if id.ends_with('.') || id.ends_with(' ') {
        return false;
    }

    !id.chars().any(|c| {
        matches!(
            c,
            '/' | '\\' | '\0' | ':' | '*' | '?' | '"' | '<' | '>' | '|'
        ) || c.is_control()
    })
}

/// Parse a configuration document and bring it to the current format.
pub fn parse(content: &str) -> Result<Node, ConfigError> {
    let json: serde_json::Value = serde_json::from_str(content)?;
    if !json.is_object() {
        return Err(ConfigError::NotAnObject);
    }
    let root: Node = serde_json::from_value(json)?;
    migration::migrate(root)
}

/// Load and migrate a configuration file.
///
/// # Errors
///
/// Fails if the file cannot be read, is not a JSON object, or carries a
/// format version with no migration path.
pub fn load(path: &Path) -> Result<Node, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    parse(&content)
}

/// Load a configuration file, falling back to an empty tree on any error.
///
/// A missing file is expected on first run and is not logged above debug level.
pub fn load_or_default(path: &Path) -> Node {
    match load(path) {
        Ok(root) => root,
        Err(e) if e.is_not_found() => {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Node::default()
        }
        Err(e) => {
            tracing::warn!("Ignoring configuration {}: {}", path.display(), e);
            Node::default()
        }
    }
}

/// Write `root` to `path` in the current format.
///
/// The file is written to a temporary sibling and renamed into place, so a
/// crash never leaves a truncated configuration behind.
pub fn save(path: &Path, root: &Node) -> Result<(), ConfigError> {
    let mut root = root.clone();
    root.set(ConfigKey::FormatVersion, FORMAT_VERSION);
    let content = serde_json::to_string_pretty(&root)?;

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;
    }

    let tmp_path = path.with_extension("json.tmp");
    {
        let mut f = fs::File::create(&tmp_path).map_err(|e| ConfigError::io(&tmp_path, e))?;
        f.write_all(content.as_bytes())
            .and_then(|_| f.sync_all())
            .map_err(|e| ConfigError::io(&tmp_path, e))?;
    }

    #[cfg(windows)]
    {
        if path.exists() {
            // Windows rename fails if destination exists.
            fs::remove_file(path).map_err(|e| ConfigError::io(path, e))?;
        }
    }

    fs::rename(&tmp_path, path).map_err(|e| ConfigError::io(path, e))
}
