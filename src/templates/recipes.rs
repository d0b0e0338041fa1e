//! Recipe registry for project scaffolding.
//!
//! Recipes use a `category/variant` naming convention: `cpp/executable`,
//! `c/static`, `py/pybind11`, and so on. Legacy flat names from earlier
//! releases (`executable`, `skbuild-pybind11`) resolve to their canonical
//! paths.

use crate::templates::resolver::TemplateError;

/// The build system a recipe scaffolds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildSystem {
    /// CMake with a Makefile frontend
    CMake,
    /// scikit-build-core (Python extensions)
    Skbuild,
}

/// Definition of a project recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Canonical name, e.g. `cpp/executable`
    pub name: &'static str,
    pub description: &'static str,
    /// Category component, e.g. `cpp`
    pub category: &'static str,
    /// Variant component, e.g. `executable`
    pub variant: &'static str,
    pub build_system: BuildSystem,
    /// Source language scaffolded (`c`, `cpp`)
    pub language: &'static str,
    /// Binding framework for Python extension recipes
    pub framework: Option<&'static str>,
}

/// Every registered recipe.
pub const RECIPES: &[Recipe] = &[
    Recipe {
        name: "cpp/executable",
        description: "C++ executable",
        category: "cpp",
        variant: "executable",
        build_system: BuildSystem::CMake,
        language: "cpp",
        framework: None,
    },
    Recipe {
        name: "cpp/static",
        description: "C++ static library",
        category: "cpp",
        variant: "static",
        build_system: BuildSystem::CMake,
        language: "cpp",
        framework: None,
    },
    Recipe {
        name: "cpp/shared",
        description: "C++ shared library",
        category: "cpp",
        variant: "shared",
        build_system: BuildSystem::CMake,
        language: "cpp",
        framework: None,
    },
    Recipe {
        name: "c/executable",
        description: "C executable",
        category: "c",
        variant: "executable",
        build_system: BuildSystem::CMake,
        language: "c",
        framework: None,
    },
    Recipe {
        name: "c/static",
        description: "C static library",
        category: "c",
        variant: "static",
        build_system: BuildSystem::CMake,
        language: "c",
        framework: None,
    },
    Recipe {
        name: "py/pybind11",
        description: "Python extension using pybind11",
        category: "py",
        variant: "pybind11",
        build_system: BuildSystem::Skbuild,
        language: "cpp",
        framework: Some("pybind11"),
    },
    Recipe {
        name: "py/cext",
        description: "Python C extension (Python.h)",
        category: "py",
        variant: "cext",
        build_system: BuildSystem::Skbuild,
        language: "c",
        framework: Some("c"),
    },
];

/// Resolve a recipe name to its canonical form, mapping legacy flat names.
pub fn resolve_recipe_name(name: &str) -> &str {
    match name {
        "executable" => "cpp/executable",
        "static" => "cpp/static",
        "shared" => "cpp/shared",
        "skbuild-pybind11" => "py/pybind11",
        "skbuild-c" => "py/cext",
        other => other,
    }
}

/// Look up a recipe by name, supporting legacy names.
pub fn get_recipe(name: &str) -> Result<&'static Recipe, TemplateError> {
    let canonical = resolve_recipe_name(name);
    RECIPES
        .iter()
        .find(|r| r.name == canonical)
        .ok_or_else(|| TemplateError::UnknownRecipe {
            name: name.to_string(),
        })
}

/// Recipe names in a category, or all names when `category` is `None`.
pub fn list_recipes(category: Option<&str>) -> Vec<&'static Recipe> {
    RECIPES
        .iter()
        .filter(|r| category.map_or(true, |c| r.category == c))
        .collect()
}
