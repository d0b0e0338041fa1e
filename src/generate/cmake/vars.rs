//! CMake variable rendering: `set()`, cache variables, and options.

use std::fmt;
use std::str::FromStr;

use crate::generate::GenerateError;

/// Quote a value if it contains whitespace.
fn quote(value: &str) -> String {
    if value.contains(' ') {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

/// A normal CMake variable set with `set()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMakeVar {
    pub name: String,
    pub values: Vec<String>,
    pub parent_scope: bool,
}

impl CMakeVar {
    /// Create a variable with a single value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        CMakeVar {
            name: name.into(),
            values: vec![value.into()],
            parent_scope: false,
        }
    }

    /// Create a list variable from multiple values.
    pub fn list(name: impl Into<String>, values: impl IntoIterator<Item = String>) -> Self {
        CMakeVar {
            name: name.into(),
            values: values.into_iter().collect(),
            parent_scope: false,
        }
    }

    /// Set the variable in the parent scope.
    pub fn parent_scope(mut self) -> Self {
        self.parent_scope = true;
        self
    }
}

impl fmt::Display for CMakeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.values.iter().map(|v| quote(v)).collect();
        write!(f, "set({} {}", self.name, values.join(" "))?;
        if self.parent_scope {
            write!(f, " PARENT_SCOPE")?;
        }
        write!(f, ")")
    }
}

/// Legal cache variable types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheType {
    Bool,
    Filepath,
    Path,
    String,
    Internal,
}

impl CacheType {
    fn as_str(&self) -> &'static str {
        match self {
            CacheType::Bool => "BOOL",
            CacheType::Filepath => "FILEPATH",
            CacheType::Path => "PATH",
            CacheType::String => "STRING",
            CacheType::Internal => "INTERNAL",
        }
    }
}

impl FromStr for CacheType {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOOL" => Ok(CacheType::Bool),
            "FILEPATH" => Ok(CacheType::Filepath),
            "PATH" => Ok(CacheType::Path),
            "STRING" => Ok(CacheType::String),
            "INTERNAL" => Ok(CacheType::Internal),
            other => Err(GenerateError::InvalidCacheType {
                given: other.to_string(),
            }),
        }
    }
}

/// A cache variable set with `set(... CACHE ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMakeCacheVar {
    pub name: String,
    pub value: String,
    pub cache_type: CacheType,
    pub docstring: String,
    pub force: bool,
}

impl CMakeCacheVar {
    /// Create a cache variable.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        cache_type: CacheType,
        docstring: impl Into<String>,
    ) -> Self {
        CMakeCacheVar {
            name: name.into(),
            value: value.into(),
            cache_type,
            docstring: docstring.into(),
            force: false,
        }
    }

    /// Overwrite an existing cache value.
    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }
}

impl fmt::Display for CMakeCacheVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "set({} {} CACHE {} \"{}\"",
            self.name,
            quote(&self.value),
            self.cache_type.as_str(),
            self.docstring
        )?;
        if self.force {
            write!(f, " FORCE")?;
        }
        write!(f, ")")
    }
}

/// A CMake option (boolean cache variable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMakeOption {
    pub name: String,
    pub docstring: String,
    pub default: bool,
}

impl CMakeOption {
    /// Create an option with the given default.
    pub fn new(name: impl Into<String>, docstring: impl Into<String>, default: bool) -> Self {
        CMakeOption {
            name: name.into(),
            docstring: docstring.into(),
            default,
        }
    }
}

impl fmt::Display for CMakeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "option({} \"{}\" {})",
            self.name,
            self.docstring,
            cmake_bool(self.default)
        )
    }
}

/// Convert a bool to a CMake `ON`/`OFF` literal.
pub fn cmake_bool(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_variable() {
        let var = CMakeVar::new("PROJECT_ROOT", "${CMAKE_CURRENT_SOURCE_DIR}");
        assert_eq!(var.to_string(), "set(PROJECT_ROOT ${CMAKE_CURRENT_SOURCE_DIR})");
    }

    #[test]
    fn test_set_quotes_values_with_spaces() {
        let var = CMakeVar::new("GREETING", "hello world");
        assert_eq!(var.to_string(), "set(GREETING \"hello world\")");
    }

    #[test]
    fn test_set_list_variable() {
        let var = CMakeVar::list("SOURCES", ["a.cpp".to_string(), "b.cpp".to_string()]);
        assert_eq!(var.to_string(), "set(SOURCES a.cpp b.cpp)");
    }

    #[test]
    fn test_parent_scope() {
        let var = CMakeVar::new("RESULT", "1").parent_scope();
        assert_eq!(var.to_string(), "set(RESULT 1 PARENT_SCOPE)");
    }

    #[test]
    fn test_cache_variable() {
        let var = CMakeCacheVar::new("MY_PATH", "/opt/thing", CacheType::Path, "Install path");
        assert_eq!(
            var.to_string(),
            "set(MY_PATH /opt/thing CACHE PATH \"Install path\")"
        );

        let forced = var.force();
        assert!(forced.to_string().ends_with("FORCE)"));
    }

    #[test]
    fn test_cache_type_parse() {
        assert_eq!("STRING".parse::<CacheType>().unwrap(), CacheType::String);
        assert!("STRINGY".parse::<CacheType>().is_err());
    }

    #[test]
    fn test_option() {
        let opt = CMakeOption::new("BUILD_TESTS", "Build the test suite", true);
        assert_eq!(opt.to_string(), "option(BUILD_TESTS \"Build the test suite\" ON)");
    }
}
