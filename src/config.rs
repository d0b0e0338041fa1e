//! User configuration from `~/.buildgen/config.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml::value::Table;

/// Boilerplate written by `buildgen config init`.
pub const CONFIG_TEMPLATE: &str = "\
# buildgen user configuration

[user]
# name = \"Your Name\"
# email = \"you@example.com\"

[defaults]
# license = \"MIT\"
# cxx_standard = 17
# c_standard = 11
";

/// Path of the user config file, if a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    directories::UserDirs::new().map(|dirs| dirs.home_dir().join(".buildgen/config.toml"))
}

/// User-level configuration.
///
/// A missing or malformed config file degrades to the empty default; config
/// problems must never break generation or scaffolding.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub user: UserSection,

    /// Free-form defaults merged into the scaffold render context.
    #[serde(default)]
    pub defaults: Table,
}

/// The `[user]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSection {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,
}

impl UserConfig {
    /// Load from `path`, or the default location when `None`.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            return UserConfig::default();
        };
        if !path.is_file() {
            return UserConfig::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("ignoring malformed config {}: {}", path.display(), e);
                    UserConfig::default()
                }
            },
            Err(e) => {
                tracing::warn!("could not read config {}: {}", path.display(), e);
                UserConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[user]
name = "Jess Doe"
email = "jess@example.com"

[defaults]
license = "MIT"
cxx_standard = 17
"#,
        )
        .unwrap();

        let config = UserConfig::load(Some(&path));
        assert_eq!(config.user.name, "Jess Doe");
        assert_eq!(config.user.email, "jess@example.com");
        assert_eq!(
            config.defaults.get("license").and_then(|v| v.as_str()),
            Some("MIT")
        );
    }

    #[test]
    fn test_missing_file_degrades_to_default() {
        let tmp = TempDir::new().unwrap();
        let config = UserConfig::load(Some(&tmp.path().join("missing.toml")));
        assert_eq!(config.user.name, "");
        assert!(config.defaults.is_empty());
    }

    #[test]
    fn test_malformed_file_degrades_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "this is [not valid toml").unwrap();

        let config = UserConfig::load(Some(&path));
        assert_eq!(config.user.name, "");
    }
}
