//! Template resolver with override support.
//!
//! Templates are resolved by checking four root directories in priority
//! order and returning the first match, so users can override individual
//! template files while falling back to the built-in defaults:
//!
//! 1. `$BUILDGEN_TEMPLATES` (if set)
//! 2. `<project_dir>/.buildgen/templates` (if a project directory was given)
//! 3. `~/.buildgen/templates`
//! 4. Built-in templates shipped with the crate

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Extension used by template files.
pub const TEMPLATE_EXT: &str = "j2";

/// Template lookup errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template not found: {recipe}/{filename}")]
    NotFound { recipe: String, filename: String },

    #[error("common template not found: common/{filename}")]
    CommonNotFound { filename: String },

    #[error("unknown recipe: {name}")]
    UnknownRecipe { name: String },
}

/// The search tier a template was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Env,
    Local,
    Global,
    BuiltIn,
}

impl Tier {
    /// Label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Env => "env",
            Tier::Local => "local",
            Tier::Global => "global",
            Tier::BuiltIn => "built-in",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One root of the template search hierarchy.
#[derive(Debug, Clone)]
pub struct SearchRoot {
    pub tier: Tier,
    /// Absent when the tier is not configured (no env var, no project dir).
    pub path: Option<PathBuf>,
}

/// Directory of the built-in templates shipped with the crate.
///
/// An installed binary finds them next to the executable; a development
/// checkout falls back to the source tree.
pub fn builtin_templates_dir() -> PathBuf {
    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent().map(|p| p.join("templates")) {
            if dir.is_dir() {
                return dir;
            }
        }
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

/// Resolves template paths against the four-tier override hierarchy.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    roots: Vec<SearchRoot>,
}

impl TemplateResolver {
    /// Create a resolver with the default root hierarchy.
    ///
    /// `project_dir` enables the project-local tier; pass `None` to skip it.
    pub fn new(project_dir: Option<&Path>) -> Self {
        let env_root = env::var("BUILDGEN_TEMPLATES").ok().map(PathBuf::from);
        let home_root = directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".buildgen/templates"));

        TemplateResolver {
            roots: vec![
                SearchRoot {
                    tier: Tier::Env,
                    path: env_root,
                },
                SearchRoot {
                    tier: Tier::Local,
                    path: project_dir.map(|dir| dir.join(".buildgen/templates")),
                },
                SearchRoot {
                    tier: Tier::Global,
                    path: home_root,
                },
                SearchRoot {
                    tier: Tier::BuiltIn,
                    path: Some(builtin_templates_dir()),
                },
            ],
        }
    }

    /// Create a resolver from an explicit root list (used in tests and by
    /// tools that relocate the hierarchy).
    pub fn with_roots(roots: Vec<SearchRoot>) -> Self {
        TemplateResolver { roots }
    }

    /// The configured search roots, in priority order.
    pub fn roots(&self) -> &[SearchRoot] {
        &self.roots
    }

    fn find(&self, relative: &Path) -> Option<(PathBuf, Tier)> {
        for root in &self.roots {
            let Some(base) = &root.path else { continue };
            let candidate = base.join(relative);
            if candidate.exists() {
                return Some((candidate, root.tier));
            }
        }
        None
    }

    /// Find a recipe template file, checking override roots first.
    ///
    /// Returns the resolved path together with the tier it came from.
    pub fn resolve(&self, recipe: &str, filename: &str) -> Result<(PathBuf, Tier), TemplateError> {
        self.find(&Path::new(recipe).join(filename))
            .ok_or_else(|| TemplateError::NotFound {
                recipe: recipe.to_string(),
                filename: filename.to_string(),
            })
    }

    /// Find a template shared across recipes, under the `common/` sub-path.
    pub fn resolve_common(&self, filename: &str) -> Result<(PathBuf, Tier), TemplateError> {
        self.find(&Path::new("common").join(filename))
            .ok_or_else(|| TemplateError::CommonNotFound {
                filename: filename.to_string(),
            })
    }

    /// List which of a recipe's files are overridden, and from which tier.
    ///
    /// Only used for diagnostics: resolution always re-walks the root list,
    /// so this map going stale between calls cannot affect priority.
    pub fn list_overrides(&self, recipe: &str) -> BTreeMap<String, Tier> {
        let mut overrides = BTreeMap::new();

        for root in &self.roots {
            if root.tier == Tier::BuiltIn {
                continue;
            }
            let Some(base) = &root.path else { continue };
            let override_dir = base.join(recipe);
            if !override_dir.is_dir() {
                continue;
            }

            for entry in WalkDir::new(&override_dir)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
            {
                if entry.path().extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXT) {
                    continue;
                }
                let Ok(rel) = entry.path().strip_prefix(&override_dir) else {
                    continue;
                };
                let rel = rel.to_string_lossy().to_string();
                overrides.entry(rel).or_insert(root.tier);
            }
        }

        overrides
    }
}
