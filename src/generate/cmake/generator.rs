//! CMakeLists.txt generator.

use std::path::Path;
use std::str::FromStr;

use anyhow::Result;

use crate::generate::cmake::functions;
use crate::generate::cmake::vars::{cmake_bool, CMakeCacheVar, CMakeOption, CMakeVar, CacheType};
use crate::generate::{BuildFileWriter, GenerateError, Generator, VarKind};
use crate::util::UniqueList;

/// Library kind accepted by `add_library`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibKind {
    Static,
    Shared,
    Module,
    Object,
    Interface,
}

impl LibKind {
    /// The CMake keyword for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            LibKind::Static => "STATIC",
            LibKind::Shared => "SHARED",
            LibKind::Module => "MODULE",
            LibKind::Object => "OBJECT",
            LibKind::Interface => "INTERFACE",
        }
    }
}

impl FromStr for LibKind {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "STATIC" => Ok(LibKind::Static),
            "SHARED" => Ok(LibKind::Shared),
            "MODULE" => Ok(LibKind::Module),
            "OBJECT" => Ok(LibKind::Object),
            "INTERFACE" => Ok(LibKind::Interface),
            other => Err(GenerateError::UnsupportedLibraryType {
                given: other.to_string(),
            }),
        }
    }
}

/// Per-target property lists, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetProps {
    pub include_dirs: Vec<String>,
    pub link_libraries: Vec<String>,
    pub compile_definitions: Vec<String>,
    pub compile_options: Vec<String>,
}

/// A registered `find_package` dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindPackage {
    pub package: String,
    pub version: Option<String>,
    pub required: bool,
    pub components: Vec<String>,
    pub config: bool,
    pub quiet: bool,
}

/// A registered FetchContent dependency (git+tag or url+hash, never both).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchContentDep {
    pub name: String,
    pub git_repository: Option<String>,
    pub git_tag: Option<String>,
    pub url: Option<String>,
    pub url_hash: Option<String>,
}

#[derive(Debug)]
enum VarEntry {
    Set(CMakeVar),
    Cache(CMakeCacheVar),
    Option(CMakeOption),
}

impl VarEntry {
    fn key(&self) -> &str {
        match self {
            VarEntry::Set(v) => &v.name,
            VarEntry::Cache(v) => &v.name,
            VarEntry::Option(v) => &v.name,
        }
    }

    fn render(&self) -> String {
        match self {
            VarEntry::Set(v) => v.to_string(),
            VarEntry::Cache(v) => v.to_string(),
            VarEntry::Option(v) => v.to_string(),
        }
    }
}

/// Generates a CMakeLists.txt for C/C++ projects.
///
/// Targets are emitted in registration order; dependency, standard, and
/// install sections only appear when something was registered for them.
#[derive(Debug)]
pub struct CMakeGenerator {
    writer: BuildFileWriter,
    cmake_version: String,
    project_name: Option<String>,
    project_version: Option<String>,
    project_description: Option<String>,
    project_languages: Vec<String>,
    cxx_standard: Option<u32>,
    cxx_standard_required: bool,
    cxx_extensions: bool,
    vars: Vec<VarEntry>,
    include_dirs: UniqueList<String>,
    link_dirs: UniqueList<String>,
    compile_options: UniqueList<String>,
    link_options: UniqueList<String>,
    find_packages: UniqueList<FindPackage>,
    fetchcontent_deps: UniqueList<FetchContentDep>,
    libraries: Vec<(String, LibKind, Vec<String>, TargetProps)>,
    executables: Vec<(String, Vec<String>, TargetProps)>,
    install_targets: UniqueList<String>,
    custom_sections: Vec<String>,
}

impl CMakeGenerator {
    /// Create a generator writing to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        CMakeGenerator {
            writer: BuildFileWriter::new(path),
            cmake_version: "3.16".to_string(),
            project_name: None,
            project_version: None,
            project_description: None,
            project_languages: vec!["CXX".to_string()],
            cxx_standard: None,
            cxx_standard_required: true,
            cxx_extensions: false,
            vars: Vec::new(),
            include_dirs: UniqueList::new(),
            link_dirs: UniqueList::new(),
            compile_options: UniqueList::new(),
            link_options: UniqueList::new(),
            find_packages: UniqueList::new(),
            fetchcontent_deps: UniqueList::new(),
            libraries: Vec::new(),
            executables: Vec::new(),
            install_targets: UniqueList::new(),
            custom_sections: Vec::new(),
        }
    }

    /// Set the minimum required CMake version.
    pub fn set_cmake_version(&mut self, version: impl Into<String>) {
        self.cmake_version = version.into();
    }

    /// Set project name, version, description, and languages.
    pub fn set_project(
        &mut self,
        name: impl Into<String>,
        version: Option<&str>,
        description: Option<&str>,
        languages: Option<&[String]>,
    ) {
        self.project_name = Some(name.into());
        self.project_version = version.map(str::to_string);
        self.project_description = description.filter(|d| !d.is_empty()).map(str::to_string);
        if let Some(languages) = languages {
            self.project_languages = languages.to_vec();
        }
    }

    /// Set the C++ standard for all targets.
    pub fn set_cxx_standard(&mut self, standard: u32, required: bool, extensions: bool) {
        self.cxx_standard = Some(standard);
        self.cxx_standard_required = required;
        self.cxx_extensions = extensions;
    }

    fn add_var_entry(&mut self, entry: VarEntry) {
        if let Some(existing) = self.vars.iter_mut().find(|v| v.key() == entry.key()) {
            *existing = entry;
        } else {
            self.vars.push(entry);
        }
    }

    /// Add a cache variable.
    pub fn add_cache_variable(
        &mut self,
        key: &str,
        value: &str,
        cache_type: &str,
        docstring: &str,
        force: bool,
    ) -> Result<(), GenerateError> {
        let cache_type = CacheType::from_str(cache_type)?;
        let mut var = CMakeCacheVar::new(key, value, cache_type, docstring);
        if force {
            var = var.force();
        }
        self.add_var_entry(VarEntry::Cache(var));
        Ok(())
    }

    /// Add an option (boolean cache variable).
    pub fn add_option(&mut self, name: &str, docstring: &str, default: bool) {
        self.add_var_entry(VarEntry::Option(CMakeOption::new(name, docstring, default)));
    }

    /// Add global include directories.
    pub fn add_include_dirs(&mut self, entries: &[&str]) {
        self.include_dirs.extend(entries.iter().map(|e| e.to_string()));
    }

    /// Add global link directories.
    pub fn add_link_dirs(&mut self, entries: &[&str]) {
        self.link_dirs.extend(entries.iter().map(|e| e.to_string()));
    }

    /// Add global compile options.
    pub fn add_compile_options(&mut self, entries: &[&str]) {
        self.compile_options
            .extend(entries.iter().map(|e| e.to_string()));
    }

    /// Add global link options.
    pub fn add_link_options(&mut self, entries: &[&str]) {
        self.link_options.extend(entries.iter().map(|e| e.to_string()));
    }

    /// Register an executable target. Re-registering a name with a
    /// different configuration replaces the earlier entry in place.
    pub fn add_executable(&mut self, name: &str, sources: &[String], props: TargetProps) {
        let entry = (name.to_string(), sources.to_vec(), props);
        if let Some(existing) = self.executables.iter_mut().find(|(n, _, _)| n == name) {
            *existing = entry;
        } else {
            self.executables.push(entry);
        }
    }

    /// Register a library target. Re-registering a name with a different
    /// configuration replaces the earlier entry in place.
    pub fn add_library(
        &mut self,
        name: &str,
        kind: LibKind,
        sources: &[String],
        props: TargetProps,
    ) {
        let entry = (name.to_string(), kind, sources.to_vec(), props);
        if let Some(existing) = self.libraries.iter_mut().find(|(n, _, _, _)| n == name) {
            *existing = entry;
        } else {
            self.libraries.push(entry);
        }
    }

    /// Register a `find_package` dependency.
    pub fn add_find_package(&mut self, dep: FindPackage) {
        self.find_packages.push(dep);
    }

    /// Register a FetchContent dependency.
    pub fn add_fetchcontent(&mut self, dep: FetchContentDep) {
        self.fetchcontent_deps.push(dep);
    }

    /// Mark targets for installation.
    pub fn add_install_targets(&mut self, targets: &[&str]) {
        self.install_targets
            .extend(targets.iter().map(|t| t.to_string()));
    }

    /// Append a free-form section verbatim.
    pub fn add_custom(&mut self, content: impl Into<String>) {
        self.custom_sections.push(content.into());
    }

    fn write_header(&mut self) {
        self.writer
            .write(functions::minimum_required(&self.cmake_version, true));
        self.writer.blank();

        if let Some(name) = self.project_name.clone() {
            self.writer.write(functions::project(
                &name,
                self.project_version.as_deref(),
                self.project_description.as_deref(),
                &self.project_languages,
            ));
            self.writer.blank();
        }
    }

    fn write_standards(&mut self) {
        if let Some(standard) = self.cxx_standard {
            self.writer.write("# C++ Standard");
            self.writer
                .write(format!("set(CMAKE_CXX_STANDARD {})", standard));
            self.writer.write(format!(
                "set(CMAKE_CXX_STANDARD_REQUIRED {})",
                cmake_bool(self.cxx_standard_required)
            ));
            self.writer.write(format!(
                "set(CMAKE_CXX_EXTENSIONS {})",
                cmake_bool(self.cxx_extensions)
            ));
            self.writer.blank();
        }
    }

    fn write_variables(&mut self) {
        if self.vars.is_empty() {
            return;
        }
        self.writer.write("# Variables");
        for var in &self.vars {
            self.writer.write(var.render());
        }
        self.writer.blank();
    }

    fn write_global_settings(&mut self) {
        if !self.include_dirs.is_empty() {
            self.writer.write("# Global include directories");
            self.writer
                .write(format!("include_directories({})", self.include_dirs.join(" ")));
            self.writer.blank();
        }
        if !self.link_dirs.is_empty() {
            self.writer.write("# Global link directories");
            self.writer
                .write(format!("link_directories({})", self.link_dirs.join(" ")));
            self.writer.blank();
        }
        if !self.compile_options.is_empty() {
            self.writer.write("# Global compile options");
            self.writer
                .write(format!("add_compile_options({})", self.compile_options.join(" ")));
            self.writer.blank();
        }
        if !self.link_options.is_empty() {
            self.writer.write("# Global link options");
            self.writer
                .write(format!("add_link_options({})", self.link_options.join(" ")));
            self.writer.blank();
        }
    }

    fn write_dependencies(&mut self) {
        if !self.find_packages.is_empty() {
            self.writer.write("# Dependencies");
            for dep in &self.find_packages {
                self.writer.write(functions::find_package(
                    &dep.package,
                    dep.version.as_deref(),
                    dep.required,
                    &dep.components,
                    dep.config,
                    dep.quiet,
                ));
            }
            self.writer.blank();
        }

        if !self.fetchcontent_deps.is_empty() {
            self.writer.write("# FetchContent dependencies");
            self.writer.write("include(FetchContent)");
            for dep in &self.fetchcontent_deps {
                self.writer.blank();
                self.writer.write(functions::fetchcontent_declare(
                    &dep.name,
                    dep.git_repository.as_deref(),
                    dep.git_tag.as_deref(),
                    dep.url.as_deref(),
                    dep.url_hash.as_deref(),
                ));
            }
            let names: Vec<String> = self
                .fetchcontent_deps
                .iter()
                .map(|d| d.name.clone())
                .collect();
            self.writer.blank();
            self.writer
                .write(functions::fetchcontent_make_available(&names));
            self.writer.blank();
        }
    }

    fn write_target_props(
        writer: &mut BuildFileWriter,
        name: &str,
        props: &TargetProps,
        default_visibility: &str,
        options_visibility: &str,
    ) {
        if !props.include_dirs.is_empty() {
            writer.write(functions::target_include_directories(
                name,
                default_visibility,
                &props.include_dirs,
            ));
        }
        if !props.link_libraries.is_empty() {
            writer.write(functions::target_link_libraries(
                name,
                default_visibility,
                &props.link_libraries,
            ));
        }
        if !props.compile_definitions.is_empty() {
            writer.write(functions::target_compile_definitions(
                name,
                default_visibility,
                &props.compile_definitions,
            ));
        }
        if !props.compile_options.is_empty() {
            writer.write(functions::target_compile_options(
                name,
                options_visibility,
                &props.compile_options,
            ));
        }
    }

    fn write_libraries(&mut self) {
        if self.libraries.is_empty() {
            return;
        }
        self.writer.write("# Libraries");
        for (name, kind, sources, props) in &self.libraries {
            self.writer
                .write(functions::add_library(name, kind.as_str(), sources));
            Self::write_target_props(&mut self.writer, name, props, "PUBLIC", "PRIVATE");
            self.writer.blank();
        }
    }

    fn write_executables(&mut self) {
        if self.executables.is_empty() {
            return;
        }
        self.writer.write("# Executables");
        for (name, sources, props) in &self.executables {
            self.writer.write(functions::add_executable(name, sources));
            Self::write_target_props(&mut self.writer, name, props, "PRIVATE", "PRIVATE");
            self.writer.blank();
        }
    }

    fn write_install(&mut self) {
        if self.install_targets.is_empty() {
            return;
        }
        self.writer.write("# Install");
        let targets: Vec<String> = self.install_targets.iter().cloned().collect();
        self.writer.write(functions::install_targets(&targets));
        self.writer.blank();
    }

    fn write_custom(&mut self) {
        for section in &self.custom_sections {
            self.writer.write(section.clone());
            self.writer.blank();
        }
    }
}

impl Generator for CMakeGenerator {
    fn add_variable(&mut self, key: &str, value: &str, _kind: VarKind) {
        // CMake has no deferred assignment forms; every kind is a set().
        self.add_var_entry(VarEntry::Set(CMakeVar::new(key, value)));
    }

    fn add_target(
        &mut self,
        name: &str,
        recipe: Option<&str>,
        deps: &[String],
    ) -> Result<(), GenerateError> {
        // The shared contract maps onto an executable whose sources are the
        // dependency list; recipes have no CMake equivalent.
        if recipe.is_none() && deps.is_empty() {
            return Err(GenerateError::EmptyTarget {
                name: name.to_string(),
            });
        }

        let rendered = functions::add_executable(name, deps);
        if let Some((_, sources, _)) = self.executables.iter().find(|(n, _, _)| n == name) {
            if functions::add_executable(name, sources) == rendered {
                return Err(GenerateError::DuplicateTarget { rendered });
            }
        }
        self.add_executable(name, deps, TargetProps::default());
        Ok(())
    }

    fn generate(&mut self) -> Result<()> {
        tracing::debug!(
            "generating CMakeLists.txt at {}",
            self.writer.path().display()
        );

        self.write_header();
        self.write_standards();
        self.write_variables();
        self.write_global_settings();
        self.write_dependencies();
        self.write_libraries();
        self.write_executables();
        self.write_install();
        self.write_custom();
        self.writer.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn generate_to_string(gen: &mut CMakeGenerator, path: &std::path::Path) -> String {
        gen.generate().unwrap();
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_simple_executable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CMakeLists.txt");

        let mut gen = CMakeGenerator::new(&path);
        gen.set_project("myapp", Some("1.0.0"), None, Some(&strings(&["CXX"])));
        gen.set_cxx_standard(17, true, false);
        gen.add_executable("myapp", &strings(&["src/main.cpp"]), TargetProps::default());

        let content = generate_to_string(&mut gen, &path);
        assert!(content.starts_with("cmake_minimum_required(VERSION 3.16 FATAL_ERROR)"));
        assert!(content.contains("project(myapp VERSION 1.0.0 LANGUAGES CXX)"));
        assert!(content.contains("set(CMAKE_CXX_STANDARD 17)"));
        assert!(content.contains("set(CMAKE_CXX_STANDARD_REQUIRED ON)"));
        assert!(content.contains("set(CMAKE_CXX_EXTENSIONS OFF)"));
        assert!(content.contains("add_executable(myapp src/main.cpp)"));
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_project_only_emitted_when_named() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CMakeLists.txt");

        let mut gen = CMakeGenerator::new(&path);
        gen.add_executable("app", &strings(&["main.cpp"]), TargetProps::default());

        let content = generate_to_string(&mut gen, &path);
        assert!(!content.contains("project("));
    }

    #[test]
    fn test_library_visibility_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CMakeLists.txt");

        let mut gen = CMakeGenerator::new(&path);
        gen.set_project("mylib", None, None, None);
        gen.add_library(
            "mylib",
            LibKind::Static,
            &strings(&["src/lib.cpp"]),
            TargetProps {
                include_dirs: strings(&["include"]),
                link_libraries: strings(&["m"]),
                compile_definitions: strings(&["MYLIB_EXPORTS"]),
                compile_options: strings(&["-fno-rtti"]),
            },
        );

        let content = generate_to_string(&mut gen, &path);
        assert!(content.contains("add_library(mylib STATIC src/lib.cpp)"));
        assert!(content.contains("target_include_directories(mylib PUBLIC include)"));
        assert!(content.contains("target_link_libraries(mylib PUBLIC m)"));
        assert!(content.contains("target_compile_definitions(mylib PUBLIC MYLIB_EXPORTS)"));
        assert!(content.contains("target_compile_options(mylib PRIVATE -fno-rtti)"));
    }

    #[test]
    fn test_executable_visibility_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CMakeLists.txt");

        let mut gen = CMakeGenerator::new(&path);
        gen.set_project("myapp", None, None, None);
        gen.add_executable(
            "myapp",
            &strings(&["src/main.cpp"]),
            TargetProps {
                include_dirs: strings(&["include"]),
                link_libraries: strings(&["mylib"]),
                ..Default::default()
            },
        );

        let content = generate_to_string(&mut gen, &path);
        assert!(content.contains("target_include_directories(myapp PRIVATE include)"));
        assert!(content.contains("target_link_libraries(myapp PRIVATE mylib)"));
    }

    #[test]
    fn test_empty_property_lists_not_emitted() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CMakeLists.txt");

        let mut gen = CMakeGenerator::new(&path);
        gen.set_project("app", None, None, None);
        gen.add_executable("app", &strings(&["main.cpp"]), TargetProps::default());

        let content = generate_to_string(&mut gen, &path);
        assert!(!content.contains("target_include_directories"));
        assert!(!content.contains("target_link_libraries"));
        assert!(!content.contains("target_compile_definitions"));
        assert!(!content.contains("target_compile_options"));
    }

    #[test]
    fn test_find_package_section() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CMakeLists.txt");

        let mut gen = CMakeGenerator::new(&path);
        gen.set_project("myapp", None, None, None);
        gen.add_find_package(FindPackage {
            package: "Threads".to_string(),
            version: None,
            required: true,
            components: vec![],
            config: false,
            quiet: false,
        });
        gen.add_find_package(FindPackage {
            package: "Boost".to_string(),
            version: Some("1.70".to_string()),
            required: false,
            components: strings(&["filesystem", "system"]),
            config: false,
            quiet: false,
        });
        gen.add_executable("myapp", &strings(&["main.cpp"]), TargetProps::default());

        let content = generate_to_string(&mut gen, &path);
        assert!(content.contains("find_package(Threads REQUIRED)"));
        assert!(content.contains("find_package(Boost 1.70 COMPONENTS filesystem system)"));
    }

    #[test]
    fn test_fetchcontent_block() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CMakeLists.txt");

        let mut gen = CMakeGenerator::new(&path);
        gen.set_project("myapp", None, None, None);
        gen.add_fetchcontent(FetchContentDep {
            name: "fmt".to_string(),
            git_repository: Some("https://github.com/fmtlib/fmt.git".to_string()),
            git_tag: Some("10.1.1".to_string()),
            url: None,
            url_hash: None,
        });
        gen.add_fetchcontent(FetchContentDep {
            name: "nlohmann_json".to_string(),
            git_repository: Some("https://github.com/nlohmann/json.git".to_string()),
            git_tag: Some("v3.11.2".to_string()),
            url: None,
            url_hash: None,
        });
        gen.add_executable("myapp", &strings(&["main.cpp"]), TargetProps::default());

        let content = generate_to_string(&mut gen, &path);
        assert_eq!(content.matches("include(FetchContent)").count(), 1);
        assert_eq!(content.matches("FetchContent_Declare").count(), 2);
        assert!(content.contains("FetchContent_MakeAvailable(fmt nlohmann_json)"));
    }

    #[test]
    fn test_install_rule() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CMakeLists.txt");

        let mut gen = CMakeGenerator::new(&path);
        gen.set_project("mylib", None, None, None);
        gen.add_library(
            "mylib",
            LibKind::Static,
            &strings(&["src/lib.cpp"]),
            TargetProps::default(),
        );
        gen.add_install_targets(&["mylib"]);

        let content = generate_to_string(&mut gen, &path);
        assert!(content.contains("install(TARGETS mylib"));
        assert!(content.contains("RUNTIME DESTINATION bin"));
        assert!(content.contains("ARCHIVE DESTINATION lib)"));
    }

    #[test]
    fn test_registration_order_preserved() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("CMakeLists.txt");

        let mut gen = CMakeGenerator::new(&path);
        gen.set_project("proj", None, None, None);
        gen.add_library("core", LibKind::Static, &strings(&["core.cpp"]), TargetProps::default());
        gen.add_executable("zapp", &strings(&["z.cpp"]), TargetProps::default());
        gen.add_executable("app", &strings(&["a.cpp"]), TargetProps::default());

        let content = generate_to_string(&mut gen, &path);
        let zapp = content.find("add_executable(zapp").unwrap();
        let app = content.find("add_executable(app").unwrap();
        assert!(zapp < app, "executables must appear in registration order");
    }

    #[test]
    fn test_trait_add_target_duplicate() {
        let tmp = TempDir::new().unwrap();
        let mut gen = CMakeGenerator::new(tmp.path().join("CMakeLists.txt"));

        Generator::add_target(&mut gen, "tool", None, &strings(&["tool.cpp"])).unwrap();
        let err = Generator::add_target(&mut gen, "tool", None, &strings(&["tool.cpp"]))
            .unwrap_err();
        assert!(matches!(err, GenerateError::DuplicateTarget { .. }));
    }

    #[test]
    fn test_cache_variable_type_validated() {
        let tmp = TempDir::new().unwrap();
        let mut gen = CMakeGenerator::new(tmp.path().join("CMakeLists.txt"));

        gen.add_cache_variable("MY_PATH", "/opt", "PATH", "docs", false)
            .unwrap();
        let err = gen
            .add_cache_variable("BAD", "x", "NOT_A_TYPE", "", false)
            .unwrap_err();
        assert!(matches!(err, GenerateError::InvalidCacheType { .. }));
    }

    #[test]
    fn test_lib_kind_parse() {
        assert_eq!("static".parse::<LibKind>().unwrap(), LibKind::Static);
        assert_eq!("SHARED".parse::<LibKind>().unwrap(), LibKind::Shared);
        assert!(matches!(
            "plugin".parse::<LibKind>(),
            Err(GenerateError::UnsupportedLibraryType { .. })
        ));
    }
}
