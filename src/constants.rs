//! Common constants used throughout the Pilot application.

/// Subdirectory of the store holding active templates
pub const TEMPLATES_DIR: &str = "templates";

/// Subdirectory of the store holding archived templates
pub const ARCHIVE_DIR: &str = "archive";

/// User settings file inside the store
pub const CONFIG_FILE: &str = "config.json";

/// Extension of stored template files
pub const TEMPLATE_EXTENSION: &str = "yaml";

/// Allowed template names: no separators, no leading dot
pub const TEMPLATE_NAME_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9._-]*$";

/// Overrides the store location
pub const STORAGE_DIR_ENV: &str = "PILOT_STORAGE_DIR";

/// Prefix of environment variables overriding settings (`PILOT_EDITOR`)
pub const ENV_PREFIX: &str = "PILOT_";

/// At most this many created files are listed after `init`
pub const MAX_LISTED_FILES: usize = 15;

/// Deepest directory nesting the YAML decoder accepts. serde_yaml stops at
/// 128 nested collections and every directory level costs two of them.
pub const MAX_DIRECTORY_DEPTH: usize = 62;
