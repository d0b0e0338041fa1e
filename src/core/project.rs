//! Project configuration: define a project once, generate both Makefile and
//! CMakeLists.txt from it.
//!
//! The configuration loads from JSON or YAML (detected by extension, with a
//! try-JSON-then-YAML fallback for unknown extensions) and round-trips
//! through either format without losing fields.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The kind of artifact a target produces.
///
/// Accepts both `"static"` and `"STATIC"` spellings in config files so the
/// two generator paths always agree on the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Executable binary
    #[default]
    #[serde(alias = "EXECUTABLE", alias = "exe")]
    Executable,

    /// Static library (lib<name>.a)
    #[serde(alias = "STATIC")]
    Static,

    /// Shared library (lib<name>.so)
    #[serde(alias = "SHARED")]
    Shared,

    /// Object library (compiled objects, no link step)
    #[serde(alias = "OBJECT")]
    Object,

    /// Header-only interface library
    #[serde(alias = "INTERFACE")]
    Interface,
}

impl TargetType {
    /// Check if this is a library kind.
    pub fn is_library(&self) -> bool {
        !matches!(self, TargetType::Executable)
    }
}

/// Configuration for a build target (executable or library).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Target name
    pub name: String,

    /// What kind of artifact to produce
    #[serde(rename = "type", default)]
    pub target_type: TargetType,

    /// Source files
    #[serde(default)]
    pub sources: Vec<String>,

    /// Target-specific include directories
    #[serde(default)]
    pub include_dirs: Vec<String>,

    /// Libraries to link against
    #[serde(default)]
    pub link_libraries: Vec<String>,

    /// Target-specific compile definitions
    #[serde(default)]
    pub compile_definitions: Vec<String>,

    /// Target-specific compile options
    #[serde(default)]
    pub compile_options: Vec<String>,

    /// Target-specific link options
    #[serde(default)]
    pub link_options: Vec<String>,

    /// Whether this target is installed
    #[serde(default)]
    pub install: bool,
}

impl TargetConfig {
    /// Create a target with the given name and type.
    pub fn new(name: impl Into<String>, target_type: TargetType) -> Self {
        TargetConfig {
            name: name.into(),
            target_type,
            ..Default::default()
        }
    }
}

/// Configuration for an external dependency.
///
/// Deserializes from either a bare string (`"OpenSSL"` or `"Boost>=1.70"`,
/// which splits into name and version) or a detailed map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DependencySpec")]
pub struct DependencyConfig {
    /// Package name
    pub name: String,

    /// Version requirement
    #[serde(default)]
    pub version: Option<String>,

    /// Whether the dependency is required
    #[serde(default = "default_true")]
    pub required: bool,

    /// Package components (e.g., Boost components)
    #[serde(default)]
    pub components: Vec<String>,

    /// Git repository URL (routes the dependency to FetchContent)
    #[serde(default)]
    pub git_repository: Option<String>,

    /// Git tag for `git_repository`
    #[serde(default)]
    pub git_tag: Option<String>,

    /// Archive URL (routes the dependency to FetchContent)
    #[serde(default)]
    pub url: Option<String>,
}

impl DependencyConfig {
    /// Create a bare dependency on `name`.
    pub fn new(name: impl Into<String>) -> Self {
        DependencyConfig {
            name: name.into(),
            version: None,
            required: true,
            components: Vec::new(),
            git_repository: None,
            git_tag: None,
            url: None,
        }
    }

    /// Whether this dependency must be fetched rather than found.
    pub fn is_fetched(&self) -> bool {
        self.git_repository.is_some() || self.url.is_some()
    }
}

fn default_true() -> bool {
    true
}

/// Dependency as it appears in a config file (before normalization).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DependencySpec {
    /// Bare string: `"OpenSSL"` or `"Boost>=1.70"`
    Simple(String),

    /// Detailed specification
    Detailed {
        name: String,
        #[serde(default)]
        version: Option<String>,
        #[serde(default = "default_true")]
        required: bool,
        #[serde(default)]
        components: Vec<String>,
        #[serde(default)]
        git_repository: Option<String>,
        #[serde(default)]
        git_tag: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl From<DependencySpec> for DependencyConfig {
    fn from(spec: DependencySpec) -> Self {
        match spec {
            DependencySpec::Simple(text) => match text.split_once(">=") {
                Some((name, version)) => DependencyConfig {
                    name: name.trim().to_string(),
                    version: Some(version.trim().to_string()),
                    ..DependencyConfig::new("")
                },
                None => DependencyConfig::new(text),
            },
            DependencySpec::Detailed {
                name,
                version,
                required,
                components,
                git_repository,
                git_tag,
                url,
            } => DependencyConfig {
                name,
                version,
                required,
                components,
                git_repository,
                git_tag,
                url,
            },
        }
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_languages() -> Vec<String> {
    vec!["CXX".to_string()]
}

fn default_cc() -> String {
    "gcc".to_string()
}

fn default_cxx() -> String {
    "g++".to_string()
}

fn default_cmake_version() -> String {
    "3.16".to_string()
}

/// Project configuration that can generate both Makefile and CMakeLists.txt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Project description
    #[serde(default)]
    pub description: String,

    /// Project languages (CMake notation, e.g. `CXX`)
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// C++ standard (17, 20, ...)
    #[serde(default)]
    pub cxx_standard: Option<u32>,

    /// C standard (99, 11, ...)
    #[serde(default)]
    pub c_standard: Option<u32>,

    /// C compiler (primarily for the Makefile backend)
    #[serde(default = "default_cc")]
    pub cc: String,

    /// C++ compiler (primarily for the Makefile backend)
    #[serde(default = "default_cxx")]
    pub cxx: String,

    /// Global include directories
    #[serde(default)]
    pub include_dirs: Vec<String>,

    /// Global link directories
    #[serde(default)]
    pub link_dirs: Vec<String>,

    /// Global compile definitions
    #[serde(default)]
    pub compile_definitions: Vec<String>,

    /// Global compile options
    #[serde(default)]
    pub compile_options: Vec<String>,

    /// Global link options
    #[serde(default)]
    pub link_options: Vec<String>,

    /// Build targets
    #[serde(default)]
    pub targets: Vec<TargetConfig>,

    /// External dependencies
    #[serde(default)]
    pub dependencies: Vec<DependencyConfig>,

    /// Free-form variables, emitted in insertion order
    #[serde(default)]
    pub variables: IndexMap<String, String>,

    /// Minimum CMake version
    #[serde(default = "default_cmake_version")]
    pub cmake_minimum_version: String,

    /// Install prefix
    #[serde(default)]
    pub install_prefix: Option<String>,
}

impl ProjectConfig {
    /// Create a minimal configuration with defaults.
    pub fn new(name: impl Into<String>) -> Self {
        ProjectConfig {
            name: name.into(),
            version: default_version(),
            description: String::new(),
            languages: default_languages(),
            cxx_standard: None,
            c_standard: None,
            cc: default_cc(),
            cxx: default_cxx(),
            include_dirs: Vec::new(),
            link_dirs: Vec::new(),
            compile_definitions: Vec::new(),
            compile_options: Vec::new(),
            link_options: Vec::new(),
            targets: Vec::new(),
            dependencies: Vec::new(),
            variables: IndexMap::new(),
            cmake_minimum_version: default_cmake_version(),
            install_prefix: None,
        }
    }

    /// Load from a JSON file.
    pub fn from_json(path: &Path) -> Result<Self> {
        let content = crate::util::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse project config: {}", path.display()))
    }

    /// Load from a YAML file.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let content = crate::util::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse project config: {}", path.display()))
    }

    /// Load from a file, detecting the format by extension.
    ///
    /// Unknown extensions try JSON first and fall back to YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("json") => Self::from_json(path),
            Some("yaml") | Some("yml") => Self::from_yaml(path),
            _ => {
                let content = crate::util::fs::read_to_string(path)?;
                match serde_json::from_str(&content) {
                    Ok(config) => Ok(config),
                    Err(json_err) => serde_yaml::from_str(&content).with_context(|| {
                        format!(
                            "failed to parse project config {} as JSON ({}) or YAML",
                            path.display(),
                            json_err
                        )
                    }),
                }
            }
        }
    }

    /// Save as JSON.
    pub fn to_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .context("failed to serialize project config to JSON")?;
        crate::util::fs::write_string(path, &content)
    }

    /// Save as YAML.
    pub fn to_yaml(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).context("failed to serialize project config to YAML")?;
        crate::util::fs::write_string(path, &content)
    }

    /// Get a target by name.
    pub fn target(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> ProjectConfig {
        let mut config = ProjectConfig::new("myproject");
        config.version = "2.1.0".to_string();
        config.description = "A test project".to_string();
        config.cxx_standard = Some(17);
        config.compile_options = vec!["-Wall".to_string(), "-Wextra".to_string()];
        config
            .variables
            .insert("PROJECT_ROOT".to_string(), "${CMAKE_CURRENT_SOURCE_DIR}".to_string());
        config.targets = vec![
            TargetConfig {
                name: "mylib".to_string(),
                target_type: TargetType::Static,
                sources: vec!["src/lib.cpp".to_string()],
                include_dirs: vec!["include".to_string()],
                install: true,
                ..Default::default()
            },
            TargetConfig {
                name: "myapp".to_string(),
                sources: vec!["src/main.cpp".to_string()],
                link_libraries: vec!["mylib".to_string()],
                ..Default::default()
            },
        ];
        config.dependencies = vec![
            DependencyConfig::new("Threads"),
            DependencyConfig {
                git_repository: Some("https://github.com/fmtlib/fmt.git".to_string()),
                git_tag: Some("10.1.1".to_string()),
                ..DependencyConfig::new("fmt")
            },
        ];
        config
    }

    #[test]
    fn test_json_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("project.json");

        let config = sample_config();
        config.to_json(&path).unwrap();
        let loaded = ProjectConfig::from_json(&path).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_yaml_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("project.yaml");

        let config = sample_config();
        config.to_yaml(&path).unwrap();
        let loaded = ProjectConfig::from_yaml(&path).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_parse_minimal() {
        let config: ProjectConfig = serde_json::from_str(r#"{"name": "tiny"}"#).unwrap();
        assert_eq!(config.name, "tiny");
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.languages, vec!["CXX".to_string()]);
        assert_eq!(config.cxx, "g++");
        assert_eq!(config.cmake_minimum_version, "3.16");
        assert!(config.targets.is_empty());
    }

    #[test]
    fn test_parse_simple_dependency_strings() {
        let config: ProjectConfig = serde_json::from_str(
            r#"{"name": "p", "dependencies": ["Threads", "Boost>=1.70"]}"#,
        )
        .unwrap();

        assert_eq!(config.dependencies[0].name, "Threads");
        assert_eq!(config.dependencies[0].version, None);
        assert!(config.dependencies[0].required);

        assert_eq!(config.dependencies[1].name, "Boost");
        assert_eq!(config.dependencies[1].version, Some("1.70".to_string()));
    }

    #[test]
    fn test_target_type_case_insensitive() {
        let lower: TargetConfig =
            serde_json::from_str(r#"{"name": "a", "type": "static"}"#).unwrap();
        let upper: TargetConfig =
            serde_json::from_str(r#"{"name": "a", "type": "STATIC"}"#).unwrap();
        assert_eq!(lower.target_type, TargetType::Static);
        assert_eq!(upper.target_type, lower.target_type);
    }

    #[test]
    fn test_load_detects_extension() {
        let tmp = TempDir::new().unwrap();

        let json_path = tmp.path().join("p.json");
        std::fs::write(&json_path, r#"{"name": "from-json"}"#).unwrap();
        assert_eq!(ProjectConfig::load(&json_path).unwrap().name, "from-json");

        let yaml_path = tmp.path().join("p.yaml");
        std::fs::write(&yaml_path, "name: from-yaml\n").unwrap();
        assert_eq!(ProjectConfig::load(&yaml_path).unwrap().name, "from-yaml");
    }

    #[test]
    fn test_load_unknown_extension_falls_back() {
        let tmp = TempDir::new().unwrap();

        let path = tmp.path().join("p.conf");
        std::fs::write(&path, r#"{"name": "json-body"}"#).unwrap();
        assert_eq!(ProjectConfig::load(&path).unwrap().name, "json-body");

        std::fs::write(&path, "name: yaml-body\ncxx_standard: 20\n").unwrap();
        let config = ProjectConfig::load(&path).unwrap();
        assert_eq!(config.name, "yaml-body");
        assert_eq!(config.cxx_standard, Some(20));
    }

    #[test]
    fn test_variables_preserve_insertion_order() {
        let config: ProjectConfig = serde_json::from_str(
            r#"{"name": "p", "variables": {"ZETA": "1", "ALPHA": "2", "MIDDLE": "3"}}"#,
        )
        .unwrap();

        let keys: Vec<&String> = config.variables.keys().collect();
        assert_eq!(keys, ["ZETA", "ALPHA", "MIDDLE"]);
    }
}
