//! Local template storage.
//! Templates live as `<name>.yaml` files under `templates/`, archived ones
//! under `archive/`, and user settings in `config.json`, all inside one base
//! directory (`~/.pilot` unless overridden).

use crate::constants::{
    ARCHIVE_DIR, CONFIG_FILE, STORAGE_DIR_ENV, TEMPLATES_DIR, TEMPLATE_EXTENSION,
    TEMPLATE_NAME_PATTERN,
};
use crate::error::{Error, Result};
use globset::Glob;
use log::debug;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static TEMPLATE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TEMPLATE_NAME_PATTERN).expect("template name pattern is valid"));

/// Which half of the store a template lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Active,
    Archived,
}

impl Location {
    pub fn from_archived(archived: bool) -> Self {
        if archived {
            Location::Archived
        } else {
            Location::Active
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Active => write!(f, "templates"),
            Location::Archived => write!(f, "archive"),
        }
    }
}

/// Returns the default base directory: `$PILOT_STORAGE_DIR`, else `~/.pilot`.
pub fn default_base_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(STORAGE_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".pilot"))
        .ok_or_else(|| Error::ConfigError("could not determine the home directory".to_string()))
}

/// Checks that `name` is usable as a store key.
///
/// # Errors
/// * `Error::InvalidTemplateName` for empty names, path separators or traversal
pub fn validate_template_name(name: &str) -> Result<()> {
    if TEMPLATE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidTemplateName(name.to_string()))
    }
}

/// Directory-backed template store.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    base_dir: PathBuf,
    templates_dir: PathBuf,
    archive_dir: PathBuf,
    config_file: PathBuf,
}

impl TemplateStore {
    /// Opens the store rooted at `base_dir`, creating its layout if missing.
    pub fn open<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let store = Self {
            templates_dir: base_dir.join(TEMPLATES_DIR),
            archive_dir: base_dir.join(ARCHIVE_DIR),
            config_file: base_dir.join(CONFIG_FILE),
            base_dir,
        };

        fs::create_dir_all(&store.templates_dir)?;
        fs::create_dir_all(&store.archive_dir)?;
        if !store.config_file.exists() {
            debug!("Creating empty settings file {}", store.config_file.display());
            fs::write(&store.config_file, "{}")?;
        }
        Ok(store)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn dir(&self, location: Location) -> &Path {
        match location {
            Location::Active => &self.templates_dir,
            Location::Archived => &self.archive_dir,
        }
    }

    /// Path where template `name` is (or would be) stored.
    pub fn template_path(&self, name: &str, location: Location) -> Result<PathBuf> {
        validate_template_name(name)?;
        Ok(self.dir(location).join(format!("{name}.{TEMPLATE_EXTENSION}")))
    }

    pub fn exists(&self, name: &str, location: Location) -> Result<bool> {
        Ok(self.template_path(name, location)?.is_file())
    }

    /// Writes `content` as the active template `name`, replacing any previous version.
    pub fn save(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.template_path(name, Location::Active)?;
        fs::write(&path, content)?;
        debug!("Saved template '{}' to {}", name, path.display());
        Ok(path)
    }

    /// Returns the raw template text, or `None` if there is no such template.
    pub fn read(&self, name: &str, location: Location) -> Result<Option<String>> {
        let path = self.template_path(name, location)?;
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    /// Lists template names in `location`, sorted.
    pub fn list(&self, location: Location) -> Result<Vec<String>> {
        let matcher = Glob::new(&format!("*.{TEMPLATE_EXTENSION}"))
            .map_err(|e| Error::ConfigError(e.to_string()))?
            .compile_matcher();

        let mut names = Vec::new();
        for entry in fs::read_dir(self.dir(location))? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name() else {
                continue;
            };
            if !matcher.is_match(file_name) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Removes a template. Returns false if it did not exist.
    pub fn delete(&self, name: &str, location: Location) -> Result<bool> {
        let path = self.template_path(name, location)?;
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        debug!("Deleted template '{}' from {}", name, location);
        Ok(true)
    }

    /// Moves an active template into the archive. Returns false if it did not exist.
    pub fn archive(&self, name: &str) -> Result<bool> {
        self.relocate(name, Location::Active, Location::Archived)
    }

    /// Moves an archived template back to the active set. Returns false if it did not exist.
    pub fn restore(&self, name: &str) -> Result<bool> {
        self.relocate(name, Location::Archived, Location::Active)
    }

    fn relocate(&self, name: &str, from: Location, to: Location) -> Result<bool> {
        let source = self.template_path(name, from)?;
        let dest = self.template_path(name, to)?;
        if !source.is_file() {
            return Ok(false);
        }
        fs::rename(&source, &dest)?;
        debug!("Moved template '{}' from {} to {}", name, from, to);
        Ok(true)
    }

    /// Copies active template `source` to active template `dest`.
    /// Returns false if the source did not exist.
    pub fn duplicate(&self, source: &str, dest: &str) -> Result<bool> {
        let source_path = self.template_path(source, Location::Active)?;
        let dest_path = self.template_path(dest, Location::Active)?;
        if !source_path.is_file() {
            return Ok(false);
        }
        fs::copy(&source_path, &dest_path)?;
        debug!("Duplicated template '{}' as '{}'", source, dest);
        Ok(true)
    }

    /// Writes the active template `name` to an external file, creating parent
    /// directories as needed. Returns false if the template did not exist.
    pub fn export(&self, name: &str, output: &Path) -> Result<bool> {
        let Some(content) = self.read(name, Location::Active)? else {
            return Ok(false);
        };
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, content)?;
        debug!("Exported template '{}' to {}", name, output.display());
        Ok(true)
    }

    /// Reads the user settings object. A missing file reads as empty.
    pub fn read_config(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        if !self.config_file.exists() {
            return Ok(serde_json::Map::new());
        }
        let content = fs::read_to_string(&self.config_file)?;
        match serde_json::from_str::<serde_json::Value>(&content)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(Error::ConfigError(format!(
                "{} must contain a JSON object",
                self.config_file.display()
            ))),
        }
    }

    pub fn write_config(&self, config: &serde_json::Map<String, serde_json::Value>) -> Result<()> {
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, content)?;
        debug!("Saved settings to {}", self.config_file.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_name_rules() {
        assert!(validate_template_name("web-app").is_ok());
        assert!(validate_template_name("rust_cli.v2").is_ok());
        assert!(validate_template_name("").is_err());
        assert!(validate_template_name("../escape").is_err());
        assert!(validate_template_name("a/b").is_err());
        assert!(validate_template_name(".hidden").is_err());
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::Active.to_string(), "templates");
        assert_eq!(Location::Archived.to_string(), "archive");
        assert_eq!(Location::from_archived(true), Location::Archived);
    }
}
