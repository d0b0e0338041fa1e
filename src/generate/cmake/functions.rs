//! CMake command text builders.
//!
//! Each function renders one CMake command as a string; the generator
//! composes them into the final CMakeLists.txt.

/// `cmake_minimum_required(VERSION ...)`.
pub fn minimum_required(version: &str, fatal_error: bool) -> String {
    if fatal_error {
        format!("cmake_minimum_required(VERSION {} FATAL_ERROR)", version)
    } else {
        format!("cmake_minimum_required(VERSION {})", version)
    }
}

/// `project()` with optional version, description, and languages.
pub fn project(
    name: &str,
    version: Option<&str>,
    description: Option<&str>,
    languages: &[String],
) -> String {
    let mut parts = vec![format!("project({}", name)];
    if let Some(version) = version {
        parts.push(format!("VERSION {}", version));
    }
    if let Some(description) = description {
        parts.push(format!("DESCRIPTION \"{}\"", description));
    }
    if !languages.is_empty() {
        parts.push(format!("LANGUAGES {}", languages.join(" ")));
    }
    parts.join(" ") + ")"
}

/// `add_executable()`.
pub fn add_executable(name: &str, sources: &[String]) -> String {
    let mut parts = vec![format!("add_executable({}", name)];
    parts.extend(sources.iter().cloned());
    parts.join(" ") + ")"
}

/// `add_library()` with an explicit kind (STATIC, SHARED, ...).
pub fn add_library(name: &str, lib_kind: &str, sources: &[String]) -> String {
    let mut parts = vec![format!("add_library({}", name), lib_kind.to_string()];
    parts.extend(sources.iter().cloned());
    parts.join(" ") + ")"
}

/// `target_include_directories()`.
pub fn target_include_directories(target: &str, visibility: &str, dirs: &[String]) -> String {
    let mut parts = vec![format!("target_include_directories({}", target)];
    parts.push(visibility.to_string());
    parts.extend(dirs.iter().cloned());
    parts.join(" ") + ")"
}

/// `target_link_libraries()`.
pub fn target_link_libraries(target: &str, visibility: &str, libraries: &[String]) -> String {
    format!(
        "target_link_libraries({} {} {})",
        target,
        visibility,
        libraries.join(" ")
    )
}

/// `target_compile_definitions()`.
pub fn target_compile_definitions(target: &str, visibility: &str, definitions: &[String]) -> String {
    format!(
        "target_compile_definitions({} {} {})",
        target,
        visibility,
        definitions.join(" ")
    )
}

/// `target_compile_options()`.
pub fn target_compile_options(target: &str, visibility: &str, options: &[String]) -> String {
    format!(
        "target_compile_options({} {} {})",
        target,
        visibility,
        options.join(" ")
    )
}

/// `find_package()` with conditional version/COMPONENTS/CONFIG/REQUIRED/QUIET.
pub fn find_package(
    package: &str,
    version: Option<&str>,
    required: bool,
    components: &[String],
    config: bool,
    quiet: bool,
) -> String {
    let mut parts = vec![format!("find_package({}", package)];
    if let Some(version) = version {
        parts.push(version.to_string());
    }
    if !components.is_empty() {
        parts.push(format!("COMPONENTS {}", components.join(" ")));
    }
    if config {
        parts.push("CONFIG".to_string());
    }
    if required {
        parts.push("REQUIRED".to_string());
    }
    if quiet {
        parts.push("QUIET".to_string());
    }
    parts.join(" ") + ")"
}

/// `FetchContent_Declare()` for a git+tag or url+hash source (never both).
pub fn fetchcontent_declare(
    name: &str,
    git_repository: Option<&str>,
    git_tag: Option<&str>,
    url: Option<&str>,
    url_hash: Option<&str>,
) -> String {
    let mut parts = vec![format!("FetchContent_Declare({}", name)];
    if let Some(repo) = git_repository {
        parts.push(format!("GIT_REPOSITORY {}", repo));
        if let Some(tag) = git_tag {
            parts.push(format!("GIT_TAG {}", tag));
        }
    } else if let Some(url) = url {
        parts.push(format!("URL {}", url));
        if let Some(hash) = url_hash {
            parts.push(format!("URL_HASH {}", hash));
        }
    }
    parts.join("\n    ") + ")"
}

/// `FetchContent_MakeAvailable()`.
pub fn fetchcontent_make_available(names: &[String]) -> String {
    format!("FetchContent_MakeAvailable({})", names.join(" "))
}

/// `install(TARGETS ...)` with the three standard destinations.
pub fn install_targets(targets: &[String]) -> String {
    format!(
        "install(TARGETS {}\n    RUNTIME DESTINATION bin\n    LIBRARY DESTINATION lib\n    ARCHIVE DESTINATION lib)",
        targets.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_minimum_required() {
        assert_eq!(
            minimum_required("3.16", true),
            "cmake_minimum_required(VERSION 3.16 FATAL_ERROR)"
        );
        assert_eq!(
            minimum_required("3.16", false),
            "cmake_minimum_required(VERSION 3.16)"
        );
    }

    #[test]
    fn test_project() {
        assert_eq!(
            project("myapp", Some("1.0.0"), None, &strings(&["CXX"])),
            "project(myapp VERSION 1.0.0 LANGUAGES CXX)"
        );
        assert_eq!(
            project("myapp", None, Some("An app"), &[]),
            "project(myapp DESCRIPTION \"An app\")"
        );
    }

    #[test]
    fn test_targets() {
        assert_eq!(
            add_executable("myapp", &strings(&["src/main.cpp"])),
            "add_executable(myapp src/main.cpp)"
        );
        assert_eq!(
            add_library("mylib", "STATIC", &strings(&["src/lib.cpp"])),
            "add_library(mylib STATIC src/lib.cpp)"
        );
    }

    #[test]
    fn test_find_package_modifiers() {
        assert_eq!(
            find_package("Threads", None, true, &[], false, false),
            "find_package(Threads REQUIRED)"
        );
        assert_eq!(
            find_package(
                "Boost",
                Some("1.70"),
                true,
                &strings(&["filesystem", "system"]),
                false,
                false
            ),
            "find_package(Boost 1.70 COMPONENTS filesystem system REQUIRED)"
        );
        assert_eq!(
            find_package("fmt", None, false, &[], true, true),
            "find_package(fmt CONFIG QUIET)"
        );
    }

    #[test]
    fn test_fetchcontent_declare_git() {
        assert_eq!(
            fetchcontent_declare(
                "fmt",
                Some("https://github.com/fmtlib/fmt.git"),
                Some("10.1.1"),
                None,
                None
            ),
            "FetchContent_Declare(fmt\n    GIT_REPOSITORY https://github.com/fmtlib/fmt.git\n    GIT_TAG 10.1.1)"
        );
    }

    #[test]
    fn test_fetchcontent_declare_url_ignores_git_tag() {
        let rendered = fetchcontent_declare(
            "zlib",
            None,
            Some("ignored"),
            Some("https://example.com/zlib.tar.gz"),
            None,
        );
        assert!(rendered.contains("URL https://example.com/zlib.tar.gz"));
        assert!(!rendered.contains("GIT_TAG"));
    }

    #[test]
    fn test_install_targets_standard_destinations() {
        let rendered = install_targets(&strings(&["myapp", "mylib"]));
        assert!(rendered.starts_with("install(TARGETS myapp mylib"));
        assert!(rendered.contains("RUNTIME DESTINATION bin"));
        assert!(rendered.contains("LIBRARY DESTINATION lib"));
        assert!(rendered.contains("ARCHIVE DESTINATION lib)"));
    }
}
