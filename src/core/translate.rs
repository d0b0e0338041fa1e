//! Translate a [`ProjectConfig`] into generator calls.
//!
//! One declarative model drives both backends. The translation rules keep
//! target naming consistent across the two outputs: the Makefile side applies
//! the `lib<name>.a`/`lib<name>.so` convention, CMake keeps the bare name.

use std::path::Path;

use anyhow::Result;

use crate::core::project::{ProjectConfig, TargetConfig, TargetType};
use crate::generate::cmake::generator::{FetchContentDep, FindPackage, TargetProps};
use crate::generate::cmake::{CMakeGenerator, LibKind};
use crate::generate::{Generator, MakefileGenerator, VarKind};

/// Options for the CMake-with-Makefile-frontend mode.
#[derive(Debug, Clone)]
pub struct FrontendOptions {
    /// CMake build directory (default `build`)
    pub build_dir: String,
    /// CMake build type (default `Release`)
    pub build_type: String,
}

impl Default for FrontendOptions {
    fn default() -> Self {
        FrontendOptions {
            build_dir: "build".to_string(),
            build_type: "Release".to_string(),
        }
    }
}

/// Derive the object file name for a source file (`src/main.cpp` → `src/main.o`).
fn object_name(source: &str) -> String {
    match source.rfind('.') {
        Some(idx) => format!("{}.o", &source[..idx]),
        None => format!("{}.o", source),
    }
}

/// The artifact a target produces on the Makefile side.
fn makefile_artifact(target: &TargetConfig) -> String {
    match target.target_type {
        TargetType::Static => format!("lib{}.a", target.name),
        TargetType::Shared => format!("lib{}.so", target.name),
        _ => target.name.clone(),
    }
}

fn link_libs_flags(link_libraries: &[String]) -> String {
    link_libraries
        .iter()
        .map(|lib| {
            if lib.starts_with('-') {
                lib.clone()
            } else {
                format!("-l{}", lib)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl ProjectConfig {
    /// Generate a Makefile from this configuration.
    pub fn generate_makefile(&self, output_path: &Path) -> Result<()> {
        let mut gen = MakefileGenerator::new(output_path);
        gen.cxx = self.cxx.clone();

        for (key, value) in &self.variables {
            gen.add_variable(key, value, VarKind::Recursive);
        }

        let include_dirs: Vec<&str> = self.include_dirs.iter().map(String::as_str).collect();
        if !include_dirs.is_empty() {
            gen.add_include_dirs(&include_dirs)?;
        }
        let link_dirs: Vec<&str> = self.link_dirs.iter().map(String::as_str).collect();
        if !link_dirs.is_empty() {
            gen.add_link_dirs(&link_dirs)?;
        }
        let compile_options: Vec<&str> = self.compile_options.iter().map(String::as_str).collect();
        if !compile_options.is_empty() {
            gen.add_cxxflags(&compile_options)?;
        }
        let link_options: Vec<&str> = self.link_options.iter().map(String::as_str).collect();
        if !link_options.is_empty() {
            gen.add_ldflags(&link_options)?;
        }

        if let Some(standard) = self.cxx_standard {
            gen.add_cxxflags(&[&format!("-std=c++{}", standard)])?;
        }
        if let Some(standard) = self.c_standard {
            gen.add_cflags(&[&format!("-std=c{}", standard)])?;
        }

        for definition in &self.compile_definitions {
            gen.add_cxxflags(&[&format!("-D{}", definition)])?;
        }

        // Bare dependencies become system libraries; fetched dependencies
        // have no Makefile-side equivalent.
        for dep in &self.dependencies {
            if dep.name.eq_ignore_ascii_case("threads") {
                gen.add_ldlibs(&["-lpthread"])?;
            } else if !dep.is_fetched() {
                gen.add_ldlibs(&[&format!("-l{}", dep.name.to_lowercase())])?;
            }
        }

        let mut all_targets: Vec<String> = Vec::new();
        let mut clean_files: Vec<String> = Vec::new();

        for target in &self.targets {
            let objects: Vec<String> = target.sources.iter().map(|s| object_name(s)).collect();
            clean_files.extend(objects.iter().cloned());

            match target.target_type {
                TargetType::Executable => {
                    let libs = link_libs_flags(&target.link_libraries);
                    let recipe =
                        format!("$(CXX) $(CXXFLAGS) -o $@ $^ $(LDFLAGS) {}", libs);
                    gen.add_target(&target.name, Some(recipe.trim_end()), &objects)?;
                    all_targets.push(target.name.clone());
                    clean_files.push(target.name.clone());
                }
                TargetType::Static => {
                    let artifact = makefile_artifact(target);
                    gen.add_target(&artifact, Some("$(AR) rcs $@ $^"), &objects)?;
                    all_targets.push(artifact.clone());
                    clean_files.push(artifact);
                }
                TargetType::Shared => {
                    let artifact = makefile_artifact(target);
                    gen.add_target(
                        &artifact,
                        Some("$(CXX) -shared -o $@ $^ $(LDFLAGS)"),
                        &objects,
                    )?;
                    all_targets.push(artifact.clone());
                    clean_files.push(artifact);
                }
                TargetType::Object => {
                    // Aggregate target over the compiled objects.
                    gen.add_target(&target.name, None, &objects)?;
                    all_targets.push(target.name.clone());
                }
                TargetType::Interface => {
                    // Header-only: nothing to build or clean.
                    tracing::debug!(
                        "target `{}` is header-only, skipping Makefile rule",
                        target.name
                    );
                }
            }
        }

        gen.add_pattern_rule("%.o", "%.cpp", "$(CXX) $(CXXFLAGS) -c $< -o $@")?;
        if !all_targets.is_empty() {
            gen.add_target("all", None, &all_targets)?;
        }
        gen.add_phony(&["all", "clean"]);
        let clean_refs: Vec<&str> = clean_files.iter().map(String::as_str).collect();
        gen.add_clean(&clean_refs);

        gen.generate()
    }

    /// Generate a CMakeLists.txt from this configuration.
    pub fn generate_cmake(&self, output_path: &Path) -> Result<()> {
        let mut gen = CMakeGenerator::new(output_path);

        gen.set_cmake_version(&self.cmake_minimum_version);
        gen.set_project(
            &self.name,
            Some(&self.version),
            Some(&self.description),
            Some(&self.languages),
        );

        if let Some(standard) = self.cxx_standard {
            gen.set_cxx_standard(standard, true, false);
        }
        if let Some(standard) = self.c_standard {
            gen.add_variable("CMAKE_C_STANDARD", &standard.to_string(), VarKind::Simple);
        }
        if let Some(prefix) = &self.install_prefix {
            gen.add_cache_variable("CMAKE_INSTALL_PREFIX", prefix, "PATH", "Install prefix", false)?;
        }

        for (key, value) in &self.variables {
            gen.add_variable(key, value, VarKind::Simple);
        }

        let include_dirs: Vec<&str> = self.include_dirs.iter().map(String::as_str).collect();
        gen.add_include_dirs(&include_dirs);
        let link_dirs: Vec<&str> = self.link_dirs.iter().map(String::as_str).collect();
        gen.add_link_dirs(&link_dirs);
        let compile_options: Vec<&str> = self.compile_options.iter().map(String::as_str).collect();
        gen.add_compile_options(&compile_options);
        let link_options: Vec<&str> = self.link_options.iter().map(String::as_str).collect();
        gen.add_link_options(&link_options);

        // Fetched dependencies always go through FetchContent and are never
        // passed to find_package.
        for dep in &self.dependencies {
            if dep.is_fetched() {
                gen.add_fetchcontent(FetchContentDep {
                    name: dep.name.clone(),
                    git_repository: dep.git_repository.clone(),
                    git_tag: dep.git_tag.clone(),
                    url: dep.url.clone(),
                    url_hash: None,
                });
            } else {
                gen.add_find_package(FindPackage {
                    package: dep.name.clone(),
                    version: dep.version.clone(),
                    required: dep.required,
                    components: dep.components.clone(),
                    config: false,
                    quiet: false,
                });
            }
        }

        let mut install_targets: Vec<String> = Vec::new();
        for target in &self.targets {
            let mut definitions = self.compile_definitions.clone();
            definitions.extend(target.compile_definitions.iter().cloned());

            let props = TargetProps {
                include_dirs: target.include_dirs.clone(),
                link_libraries: target.link_libraries.clone(),
                compile_definitions: definitions,
                compile_options: target.compile_options.clone(),
            };

            match target.target_type {
                TargetType::Executable => {
                    gen.add_executable(&target.name, &target.sources, props);
                }
                TargetType::Static => {
                    gen.add_library(&target.name, LibKind::Static, &target.sources, props);
                }
                TargetType::Shared => {
                    gen.add_library(&target.name, LibKind::Shared, &target.sources, props);
                }
                TargetType::Object => {
                    gen.add_library(&target.name, LibKind::Object, &target.sources, props);
                }
                TargetType::Interface => {
                    gen.add_library(&target.name, LibKind::Interface, &target.sources, props);
                }
            }

            if target.install {
                install_targets.push(target.name.clone());
            }
        }

        if !install_targets.is_empty() {
            let refs: Vec<&str> = install_targets.iter().map(String::as_str).collect();
            gen.add_install_targets(&refs);
        }

        gen.generate()
    }

    /// Generate both build files.
    pub fn generate_all(&self, makefile_path: &Path, cmake_path: &Path) -> Result<()> {
        self.generate_makefile(makefile_path)?;
        self.generate_cmake(cmake_path)
    }

    /// Generate a CMakeLists.txt plus a Makefile frontend wrapping the CMake
    /// workflow (configure/build/install/test), instead of a standalone
    /// Makefile duplicating the build rules.
    pub fn generate_cmake_with_frontend(
        &self,
        makefile_path: &Path,
        cmake_path: &Path,
        opts: &FrontendOptions,
    ) -> Result<()> {
        self.generate_cmake(cmake_path)?;

        let mut gen = MakefileGenerator::new(makefile_path);
        gen.cxx = self.cxx.clone();
        gen.set_header("# Makefile frontend for CMake build");

        gen.add_variable("CMAKE", "cmake", VarKind::Conditional);
        gen.add_variable("BUILD_DIR", &opts.build_dir, VarKind::Conditional);
        gen.add_variable("BUILD_TYPE", &opts.build_type, VarKind::Conditional);

        gen.add_target("all", None, &["build".to_string()])?;
        gen.add_target(
            "configure",
            Some("$(CMAKE) -S . -B $(BUILD_DIR) -DCMAKE_BUILD_TYPE=$(BUILD_TYPE)"),
            &[],
        )?;
        gen.add_target(
            "build",
            Some("$(CMAKE) --build $(BUILD_DIR)"),
            &["configure".to_string()],
        )?;

        let mut phony = vec!["all", "configure", "build", "test", "clean", "help"];

        let executables: Vec<&TargetConfig> = self
            .targets
            .iter()
            .filter(|t| t.target_type == TargetType::Executable)
            .collect();
        for target in &executables {
            gen.add_target(
                &target.name,
                Some(&format!(
                    "$(CMAKE) --build $(BUILD_DIR) --target {}",
                    target.name
                )),
                &["configure".to_string()],
            )?;
        }

        if self.targets.iter().any(|t| t.install) {
            gen.add_target(
                "install",
                Some("$(CMAKE) --install $(BUILD_DIR)"),
                &["build".to_string()],
            )?;
            phony.push("install");
        }

        gen.add_target(
            "test",
            Some("cd $(BUILD_DIR) && ctest --output-on-failure"),
            &["build".to_string()],
        )?;

        let mut help_lines = vec![
            "@echo 'Available targets:'".to_string(),
            "@echo '  all        - configure and build (default)'".to_string(),
            "@echo '  configure  - run the CMake configure step'".to_string(),
            "@echo '  build      - build every target'".to_string(),
            "@echo '  test       - build and run ctest'".to_string(),
            "@echo '  clean      - remove the build directory'".to_string(),
        ];
        for target in &executables {
            help_lines.push(format!("@echo '  {:<10} - build this target only'", target.name));
        }
        gen.add_target("help", Some(&help_lines.join("\n\t")), &[])?;

        let mut phony_refs: Vec<&str> = phony.clone();
        phony_refs.extend(executables.iter().map(|t| t.name.as_str()));
        gen.add_phony(&phony_refs);
        gen.add_clean(&["$(BUILD_DIR)"]);

        gen.generate()
    }
}
