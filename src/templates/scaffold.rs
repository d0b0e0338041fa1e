//! Template-driven project scaffolding.
//!
//! A scaffolder takes a recipe, resolves each of the recipe's template
//! files through the four-tier hierarchy, renders them, and writes a
//! complete project skeleton.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use minijinja::{context, Environment};
use walkdir::WalkDir;

use crate::config::UserConfig;
use crate::templates::recipes::{get_recipe, BuildSystem, Recipe};
use crate::templates::resolver::{builtin_templates_dir, TemplateResolver, TEMPLATE_EXT};
use crate::util::fs::{ensure_dir, read_to_string, write_string};

/// Python environment tool driving the generated Makefile for `py/*` recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvTool {
    #[default]
    Uv,
    Venv,
}

impl EnvTool {
    /// The Makefile template for this tool.
    fn makefile_template(&self) -> &'static str {
        match self {
            EnvTool::Uv => "common/Makefile.uv.j2",
            EnvTool::Venv => "common/Makefile.venv.j2",
        }
    }
}

/// Generates a project skeleton from a recipe's templates.
pub struct ProjectScaffolder {
    name: String,
    version: String,
    recipe: &'static Recipe,
    output_dir: PathBuf,
    resolver: TemplateResolver,
    env_tool: EnvTool,
    user_config: UserConfig,
}

impl ProjectScaffolder {
    /// Create a scaffolder for `recipe_name`.
    ///
    /// `project_dir` enables the project-local template override tier.
    pub fn new(
        name: impl Into<String>,
        recipe_name: &str,
        output_dir: impl Into<PathBuf>,
        project_dir: Option<&Path>,
    ) -> Result<Self> {
        let name = name.into();
        let recipe = get_recipe(recipe_name)?;

        if recipe.build_system == BuildSystem::Skbuild && !is_identifier(&name) {
            bail!(
                "invalid project name `{}`: Python extension names must be valid identifiers",
                name
            );
        }

        Ok(ProjectScaffolder {
            name,
            version: "0.1.0".to_string(),
            recipe,
            output_dir: output_dir.into(),
            resolver: TemplateResolver::new(project_dir),
            env_tool: EnvTool::default(),
            user_config: UserConfig::default(),
        })
    }

    /// Select the environment tool for Python recipes.
    pub fn env_tool(mut self, tool: EnvTool) -> Self {
        self.env_tool = tool;
        self
    }

    /// Merge user-level configuration into the render context.
    pub fn user_config(mut self, config: UserConfig) -> Self {
        self.user_config = config;
        self
    }

    /// Set the initial project version.
    pub fn version(mut self, version: &str) -> Result<Self> {
        semver::Version::parse(version)
            .with_context(|| format!("invalid project version: {}", version))?;
        self.version = version.to_string();
        Ok(self)
    }

    /// The recipe being scaffolded.
    pub fn recipe(&self) -> &'static Recipe {
        self.recipe
    }

    /// Output path → template source for every file this recipe creates.
    ///
    /// Sources under `common/` are shared across recipes and resolved
    /// through the common sub-path.
    fn file_map(&self) -> Vec<(&'static str, &'static str)> {
        match self.recipe.build_system {
            BuildSystem::CMake => {
                let mut files = vec![
                    (".gitignore", "common/gitignore.cmake.j2"),
                    ("Makefile", "common/Makefile.cmake.j2"),
                    ("CMakeLists.txt", "CMakeLists.txt.j2"),
                ];
                match (self.recipe.language, self.recipe.variant) {
                    ("cpp", "executable") => files.push(("src/main.cpp", "src/main.cpp.j2")),
                    ("cpp", _) => {
                        files.push(("src/lib.cpp", "src/lib.cpp.j2"));
                        files.push(("include/{{ name }}/lib.hpp", "include/lib.hpp.j2"));
                    }
                    ("c", "executable") => files.push(("src/main.c", "src/main.c.j2")),
                    _ => {
                        files.push(("src/lib.c", "src/lib.c.j2"));
                        files.push(("include/{{ name }}/lib.h", "include/lib.h.j2"));
                    }
                }
                files
            }
            BuildSystem::Skbuild => {
                let source = if self.recipe.language == "cpp" {
                    ("src/{{ name }}/_core.cpp", "src/_core.cpp.j2")
                } else {
                    ("src/{{ name }}/_core.c", "src/_core.c.j2")
                };
                vec![
                    (".gitignore", "common/gitignore.py.j2"),
                    ("Makefile", self.env_tool.makefile_template()),
                    ("pyproject.toml", "pyproject.toml.j2"),
                    ("CMakeLists.txt", "CMakeLists.txt.j2"),
                    ("src/{{ name }}/__init__.py", "src/__init__.py.j2"),
                    source,
                    ("tests/test_{{ name }}.py", "tests/test_module.py.j2"),
                ]
            }
        }
    }

    fn render(&self, env: &Environment, source: &str) -> Result<String> {
        let rendered = env
            .render_str(
                source,
                context! {
                    name => self.name,
                    version => self.version,
                    user => context! {
                        name => self.user_config.user.name,
                        email => self.user_config.user.email,
                    },
                    defaults => minijinja::Value::from_serialize(&self.user_config.defaults),
                },
            )
            .context("failed to render template")?;
        Ok(rendered)
    }

    /// Generate every project file, returning the created paths.
    pub fn generate(&self) -> Result<Vec<PathBuf>> {
        let env = Environment::new();
        let mut created = Vec::new();

        for (output_template, template_path) in self.file_map() {
            let (resolved, tier) = if let Some(filename) = template_path.strip_prefix("common/") {
                self.resolver.resolve_common(filename)?
            } else {
                self.resolver.resolve(self.recipe.name, template_path)?
            };
            tracing::debug!(
                "template {} resolved from {} tier",
                template_path,
                tier
            );

            let content = self.render(&env, &read_to_string(&resolved)?)?;
            let relative = self.render(&env, output_template)?;
            let file_path = self.output_dir.join(relative);

            write_string(&file_path, &content)?;
            created.push(file_path);
        }

        Ok(created)
    }
}

/// Copy a recipe's built-in templates into an override root so they can be
/// customised, optionally including the shared `common/` templates.
pub fn copy_builtin_templates(
    recipe_name: &str,
    dest_dir: &Path,
    include_common: bool,
) -> Result<Vec<PathBuf>> {
    let recipe = get_recipe(recipe_name)?;
    let builtin = builtin_templates_dir();

    let mut copied = Vec::new();
    let mut sources = vec![recipe.name];
    if include_common {
        sources.push("common");
    }

    for source in sources {
        let src_dir = builtin.join(source);
        if !src_dir.is_dir() {
            bail!("built-in templates not found: {}", src_dir.display());
        }
        for entry in WalkDir::new(&src_dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            if entry.path().extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXT) {
                continue;
            }
            let rel = entry.path().strip_prefix(&src_dir)?;
            let dest = dest_dir.join(source).join(rel);
            if let Some(parent) = dest.parent() {
                ensure_dir(parent)?;
            }
            std::fs::copy(entry.path(), &dest).with_context(|| {
                format!("failed to copy template to {}", dest.display())
            })?;
            copied.push(dest);
        }
    }

    Ok(copied)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scaffold_cpp_executable() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("myapp");

        let scaffolder = ProjectScaffolder::new("myapp", "cpp/executable", &out, None).unwrap();
        let created = scaffolder.generate().unwrap();

        assert_eq!(created.len(), 4);
        assert!(out.join(".gitignore").exists());
        assert!(out.join("Makefile").exists());
        assert!(out.join("CMakeLists.txt").exists());
        assert!(out.join("src/main.cpp").exists());

        let cmake = std::fs::read_to_string(out.join("CMakeLists.txt")).unwrap();
        assert!(cmake.contains("project(myapp"));
        assert!(cmake.contains("add_executable(myapp"));

        let makefile = std::fs::read_to_string(out.join("Makefile")).unwrap();
        assert!(makefile.contains("cmake"));
    }

    #[test]
    fn test_scaffold_cpp_static_renders_name_in_paths() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("mylib");

        let scaffolder = ProjectScaffolder::new("mylib", "cpp/static", &out, None).unwrap();
        scaffolder.generate().unwrap();

        assert!(out.join("include/mylib/lib.hpp").exists());
        let cmake = std::fs::read_to_string(out.join("CMakeLists.txt")).unwrap();
        assert!(cmake.contains("add_library(mylib STATIC"));
    }

    #[test]
    fn test_scaffold_pybind11_project() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("myext");

        let scaffolder = ProjectScaffolder::new("myext", "py/pybind11", &out, None).unwrap();
        let created = scaffolder.generate().unwrap();

        assert_eq!(created.len(), 7);
        assert!(out.join("src/myext/__init__.py").exists());
        assert!(out.join("src/myext/_core.cpp").exists());
        assert!(out.join("tests/test_myext.py").exists());

        let pyproject = std::fs::read_to_string(out.join("pyproject.toml")).unwrap();
        assert!(pyproject.contains("name = \"myext\""));
        assert!(pyproject.contains("scikit-build-core"));
        assert!(pyproject.contains("pybind11"));

        let cmake = std::fs::read_to_string(out.join("CMakeLists.txt")).unwrap();
        assert!(cmake.contains("find_package(pybind11"));
        assert!(cmake.contains("pybind11_add_module"));

        let makefile = std::fs::read_to_string(out.join("Makefile")).unwrap();
        assert!(makefile.contains("uv sync"));
    }

    #[test]
    fn test_scaffold_cext_project() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("cext");

        let scaffolder = ProjectScaffolder::new("cext", "py/cext", &out, None)
            .unwrap()
            .env_tool(EnvTool::Venv);
        scaffolder.generate().unwrap();

        let source = std::fs::read_to_string(out.join("src/cext/_core.c")).unwrap();
        assert!(source.contains("#include <Python.h>"));
        assert!(source.contains("PyInit__core"));

        let pyproject = std::fs::read_to_string(out.join("pyproject.toml")).unwrap();
        assert!(!pyproject.contains("pybind11"));

        let makefile = std::fs::read_to_string(out.join("Makefile")).unwrap();
        assert!(makefile.contains("venv"));
    }

    #[test]
    fn test_py_recipe_requires_identifier_name() {
        let tmp = TempDir::new().unwrap();
        let result = ProjectScaffolder::new("my-ext", "py/pybind11", tmp.path(), None);
        assert!(result.is_err());

        // Hyphens are fine for C++ projects.
        ProjectScaffolder::new("my-app", "cpp/executable", tmp.path(), None).unwrap();
    }

    #[test]
    fn test_invalid_version_rejected() {
        let tmp = TempDir::new().unwrap();
        let scaffolder = ProjectScaffolder::new("myapp", "cpp/executable", tmp.path(), None).unwrap();
        assert!(scaffolder.version("not-a-version").is_err());
    }

    #[test]
    fn test_local_override_changes_output() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("workspace");
        let out = project_dir.join("myapp");

        let override_path = project_dir.join(".buildgen/templates/cpp/executable/src/main.cpp.j2");
        std::fs::create_dir_all(override_path.parent().unwrap()).unwrap();
        std::fs::write(&override_path, "// custom main for {{ name }}\n").unwrap();

        let scaffolder =
            ProjectScaffolder::new("myapp", "cpp/executable", &out, Some(&project_dir)).unwrap();
        scaffolder.generate().unwrap();

        let main = std::fs::read_to_string(out.join("src/main.cpp")).unwrap();
        assert_eq!(main, "// custom main for myapp\n");
    }

    #[test]
    fn test_copy_builtin_templates() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join(".buildgen/templates");

        let copied = copy_builtin_templates("cpp/executable", &dest, true).unwrap();

        assert!(!copied.is_empty());
        assert!(dest.join("cpp/executable/CMakeLists.txt.j2").exists());
        assert!(dest.join("common/Makefile.cmake.j2").exists());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("myext"));
        assert!(is_identifier("_core2"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("my-ext"));
        assert!(!is_identifier(""));
    }
}
