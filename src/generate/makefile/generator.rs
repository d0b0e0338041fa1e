//! Makefile generator.

use std::path::Path;

use anyhow::Result;

use crate::generate::makefile::vars::MakeVar;
use crate::generate::{BuildFileWriter, GenerateError, Generator, VarKind};
use crate::util::UniqueList;

/// Makefile conditional directive kind.
///
/// `ifeq`/`ifneq` take a parenthesised condition; `ifdef`/`ifndef` take a
/// bare variable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondKind {
    IfEq,
    IfNeq,
    IfDef,
    IfNdef,
}

impl CondKind {
    fn directive(&self) -> &'static str {
        match self {
            CondKind::IfEq => "ifeq",
            CondKind::IfNeq => "ifneq",
            CondKind::IfDef => "ifdef",
            CondKind::IfNdef => "ifndef",
        }
    }

    fn parenthesised(&self) -> bool {
        matches!(self, CondKind::IfEq | CondKind::IfNeq)
    }
}

/// Generates a Makefile for C/C++ code.
///
/// Entities are registered through `add_*` calls and serialized by
/// [`Generator::generate`] in a fixed section order: header comment,
/// variables, include directives, conditional blocks, `.PHONY`, pattern
/// rules, targets (sorted by rendered text), and the `clean` target.
/// Sections with no registered content are skipped.
#[derive(Debug)]
pub struct MakefileGenerator {
    writer: BuildFileWriter,
    strict: bool,
    /// C++ compiler written to the `CXX` variable.
    pub cxx: String,
    header: Option<String>,
    vars: Vec<MakeVar>,
    include_dirs: UniqueList<String>,
    cflags: UniqueList<String>,
    cxxflags: UniqueList<String>,
    link_dirs: UniqueList<String>,
    ldlibs: UniqueList<String>,
    ldflags: UniqueList<String>,
    targets: UniqueList<String>,
    pattern_rules: UniqueList<String>,
    includes: UniqueList<String>,
    includes_optional: UniqueList<String>,
    conditionals: Vec<String>,
    phony: UniqueList<String>,
    clean: UniqueList<String>,
}

impl MakefileGenerator {
    /// Create a generator writing to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        MakefileGenerator {
            writer: BuildFileWriter::new(path),
            strict: false,
            cxx: "g++".to_string(),
            header: None,
            vars: Vec::new(),
            include_dirs: UniqueList::new(),
            cflags: UniqueList::new(),
            cxxflags: UniqueList::new(),
            link_dirs: UniqueList::new(),
            ldlibs: UniqueList::new(),
            ldflags: UniqueList::new(),
            targets: UniqueList::new(),
            pattern_rules: UniqueList::new(),
            includes: UniqueList::new(),
            includes_optional: UniqueList::new(),
            conditionals: Vec::new(),
            phony: UniqueList::new(),
            clean: UniqueList::new(),
        }
    }

    /// In strict mode, duplicate flag/directory entries raise instead of
    /// being silently dropped.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set a header comment written as the first line of the Makefile.
    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = Some(header.into());
    }

    /// Register a variable, replacing any existing assignment to the same key.
    pub fn add_var(&mut self, var: MakeVar) {
        if let Some(existing) = self.vars.iter_mut().find(|v| v.key == var.key) {
            *existing = var;
        } else {
            self.vars.push(var);
        }
    }

    /// Look up a registered variable by key.
    pub fn var(&self, key: &str) -> Option<&MakeVar> {
        self.vars.iter().find(|v| v.key == key)
    }

    /// Check that a directory entry is usable: either an existing directory
    /// or a `$(VAR)` reference to a built-in or registered variable.
    fn check_dir(&self, entry: &str) -> Result<(), GenerateError> {
        const BUILTINS: [&str; 3] = ["$(HOME)", "$(PWD)", "$(CURDIR)"];
        if BUILTINS.contains(&entry) {
            return Ok(());
        }

        if let Some(name) = var_reference(entry) {
            if ["HOME", "PWD", "CURDIR"].contains(&name) {
                return Ok(());
            }
            let var = self
                .vars
                .iter()
                .find(|v| v.key == name)
                .ok_or_else(|| GenerateError::UnknownVariable {
                    name: name.to_string(),
                })?;
            if !Path::new(&var.value).is_dir() {
                return Err(GenerateError::InvalidDirectory {
                    path: var.value.clone(),
                });
            }
            return Ok(());
        }

        if !Path::new(entry).is_dir() {
            return Err(GenerateError::InvalidDirectory {
                path: entry.to_string(),
            });
        }
        Ok(())
    }

    fn add_entries<F>(
        list: &mut UniqueList<String>,
        list_name: &str,
        strict: bool,
        entries: &[&str],
        mut render: F,
    ) -> Result<(), GenerateError>
    where
        F: FnMut(&str) -> String,
    {
        for &entry in entries {
            let rendered = render(entry);
            if list.contains(&rendered) {
                if strict {
                    return Err(GenerateError::DuplicateEntry {
                        entry: rendered,
                        list: list_name.to_string(),
                    });
                }
                continue;
            }
            list.push(rendered);
        }
        Ok(())
    }

    /// Add include directories (rendered as `-I<dir>`).
    pub fn add_include_dirs(&mut self, entries: &[&str]) -> Result<(), GenerateError> {
        for &entry in entries {
            self.check_dir(entry)?;
        }
        let strict = self.strict;
        Self::add_entries(&mut self.include_dirs, "include_dirs", strict, entries, |e| {
            format!("-I{}", e)
        })
    }

    /// Add link directories (rendered as `-L<dir>`).
    pub fn add_link_dirs(&mut self, entries: &[&str]) -> Result<(), GenerateError> {
        for &entry in entries {
            self.check_dir(entry)?;
        }
        let strict = self.strict;
        Self::add_entries(&mut self.link_dirs, "link_dirs", strict, entries, |e| {
            format!("-L{}", e)
        })
    }

    /// Add C compiler flags.
    pub fn add_cflags(&mut self, entries: &[&str]) -> Result<(), GenerateError> {
        let strict = self.strict;
        Self::add_entries(&mut self.cflags, "cflags", strict, entries, str::to_string)
    }

    /// Add C++ compiler flags.
    pub fn add_cxxflags(&mut self, entries: &[&str]) -> Result<(), GenerateError> {
        let strict = self.strict;
        Self::add_entries(&mut self.cxxflags, "cxxflags", strict, entries, str::to_string)
    }

    /// Add link libraries.
    pub fn add_ldlibs(&mut self, entries: &[&str]) -> Result<(), GenerateError> {
        let strict = self.strict;
        Self::add_entries(&mut self.ldlibs, "ldlibs", strict, entries, str::to_string)
    }

    /// Add linker flags.
    pub fn add_ldflags(&mut self, entries: &[&str]) -> Result<(), GenerateError> {
        let strict = self.strict;
        Self::add_entries(&mut self.ldflags, "ldflags", strict, entries, str::to_string)
    }

    /// Add a pattern rule (e.g., `%.o: %.cpp`).
    pub fn add_pattern_rule(
        &mut self,
        target_pattern: &str,
        source_pattern: &str,
        recipe: &str,
    ) -> Result<(), GenerateError> {
        if !target_pattern.contains('%') {
            return Err(GenerateError::MissingWildcard {
                pattern: target_pattern.to_string(),
            });
        }
        if !source_pattern.contains('%') {
            return Err(GenerateError::MissingWildcard {
                pattern: source_pattern.to_string(),
            });
        }

        let rendered = format!("{}: {}\n\t{}", target_pattern, source_pattern, recipe);
        if self.pattern_rules.contains(&rendered) {
            return Err(GenerateError::DuplicatePatternRule { rendered });
        }
        self.pattern_rules.push(rendered);
        Ok(())
    }

    /// Add `include` directives.
    pub fn add_include(&mut self, paths: &[&str]) {
        self.includes
            .extend(paths.iter().filter(|p| !p.is_empty()).map(|p| p.to_string()));
    }

    /// Add optional (`-include`) directives.
    pub fn add_include_optional(&mut self, paths: &[&str]) {
        self.includes_optional
            .extend(paths.iter().filter(|p| !p.is_empty()).map(|p| p.to_string()));
    }

    /// Add a conditional block.
    ///
    /// For `ifeq`/`ifneq` the condition is wrapped in parentheses
    /// (e.g., `$(CC),gcc` becomes `ifeq ($(CC),gcc)`); `ifdef`/`ifndef`
    /// take the variable name bare. Every block is closed with `endif`.
    pub fn add_conditional(
        &mut self,
        kind: CondKind,
        condition: &str,
        content: &str,
        else_content: Option<&str>,
    ) {
        let mut block = if kind.parenthesised() {
            format!("{} ({})\n{}", kind.directive(), condition, content)
        } else {
            format!("{} {}\n{}", kind.directive(), condition, content)
        };
        if let Some(else_content) = else_content {
            block.push_str(&format!("\nelse\n{}", else_content));
        }
        block.push_str("\nendif");
        self.conditionals.push(block);
    }

    /// Add an `ifeq` conditional block.
    pub fn add_ifeq(&mut self, condition: &str, content: &str, else_content: Option<&str>) {
        self.add_conditional(CondKind::IfEq, condition, content, else_content);
    }

    /// Add an `ifneq` conditional block.
    pub fn add_ifneq(&mut self, condition: &str, content: &str, else_content: Option<&str>) {
        self.add_conditional(CondKind::IfNeq, condition, content, else_content);
    }

    /// Add an `ifdef` conditional block.
    pub fn add_ifdef(&mut self, variable: &str, content: &str, else_content: Option<&str>) {
        self.add_conditional(CondKind::IfDef, variable, content, else_content);
    }

    /// Add an `ifndef` conditional block.
    pub fn add_ifndef(&mut self, variable: &str, content: &str, else_content: Option<&str>) {
        self.add_conditional(CondKind::IfNdef, variable, content, else_content);
    }

    /// Add phony targets.
    pub fn add_phony(&mut self, entries: &[&str]) {
        self.phony
            .extend(entries.iter().filter(|e| !e.is_empty()).map(|e| e.to_string()));
    }

    /// Add entries to the clean target.
    pub fn add_clean(&mut self, entries: &[&str]) {
        self.clean
            .extend(entries.iter().filter(|e| !e.is_empty()).map(|e| e.to_string()));
    }

    fn write_variables(&mut self) {
        self.writer.write("# project variables");
        for var in &self.vars {
            self.writer.write(var.to_string());
        }
        self.writer.blank();

        if !self.include_dirs.is_empty() {
            self.writer
                .write(format!("INCLUDEDIRS = {}", self.include_dirs.join(" ")));
        }
        if !self.link_dirs.is_empty() {
            self.writer
                .write(format!("LINKDIRS = {}", self.link_dirs.join(" ")));
        }
        self.writer.blank();

        self.writer.write(format!("CXX = {}", self.cxx));
        if !self.cflags.is_empty() {
            self.writer
                .write(format!("CFLAGS += {} $(INCLUDEDIRS)", self.cflags.join(" ")));
        }
        if !self.cxxflags.is_empty() {
            self.writer.write(format!(
                "CXXFLAGS += {} $(INCLUDEDIRS)",
                self.cxxflags.join(" ")
            ));
        }
        if !self.ldflags.is_empty() || !self.link_dirs.is_empty() {
            self.writer
                .write(format!("LDFLAGS += {} $(LINKDIRS)", self.ldflags.join(" ")));
        }
        if !self.ldlibs.is_empty() {
            self.writer
                .write(format!("LDLIBS = {}", self.ldlibs.join(" ")));
        }
        self.writer.blank();
    }

    fn write_includes(&mut self) {
        if self.includes.is_empty() && self.includes_optional.is_empty() {
            return;
        }
        self.writer.write("# Include directives");
        for path in &self.includes {
            self.writer.write(format!("include {}", path));
        }
        for path in &self.includes_optional {
            self.writer.write(format!("-include {}", path));
        }
        self.writer.blank();
    }

    fn write_conditionals(&mut self) {
        if self.conditionals.is_empty() {
            return;
        }
        self.writer.write("# Conditional blocks");
        for block in &self.conditionals {
            self.writer.write(block.clone());
            self.writer.blank();
        }
    }

    fn write_phony(&mut self) {
        if self.phony.is_empty() {
            return;
        }
        self.writer.blank();
        self.writer.write(format!(".PHONY: {}", self.phony.join(" ")));
        self.writer.blank();
    }

    fn write_pattern_rules(&mut self) {
        if self.pattern_rules.is_empty() {
            return;
        }
        self.writer.write("# Pattern rules");
        for rule in &self.pattern_rules {
            self.writer.write(rule.clone());
            self.writer.blank();
        }
    }

    fn write_targets(&mut self) {
        let mut sorted: Vec<&String> = self.targets.iter().collect();
        sorted.sort();
        for target in sorted {
            self.writer.write(target.clone());
            self.writer.blank();
        }
    }

    fn write_clean(&mut self) {
        if self.clean.is_empty() {
            return;
        }
        self.writer
            .write(format!("clean:\n\t@rm -rf {}", self.clean.join(" ")));
        self.writer.blank();
    }
}

impl Generator for MakefileGenerator {
    fn add_variable(&mut self, key: &str, value: &str, kind: VarKind) {
        self.add_var(MakeVar::new(key, value, kind));
    }

    fn add_target(
        &mut self,
        name: &str,
        recipe: Option<&str>,
        deps: &[String],
    ) -> Result<(), GenerateError> {
        let rendered = match (recipe, deps.is_empty()) {
            (None, true) => {
                return Err(GenerateError::EmptyTarget {
                    name: name.to_string(),
                })
            }
            (Some(recipe), true) => format!("{}:\n\t{}", name, recipe),
            (Some(recipe), false) => format!("{}: {}\n\t{}", name, deps.join(" "), recipe),
            (None, false) => format!("{}: {}", name, deps.join(" ")),
        };

        if self.targets.contains(&rendered) {
            return Err(GenerateError::DuplicateTarget { rendered });
        }
        self.targets.push(rendered);
        Ok(())
    }

    fn generate(&mut self) -> Result<()> {
        tracing::debug!("generating Makefile at {}", self.writer.path().display());

        // Sources resolve against the working directory by default.
        let _ = self.add_include_dirs(&["$(CURDIR)"]);

        if let Some(header) = self.header.clone() {
            self.writer.write(header);
        }
        self.write_variables();
        self.write_includes();
        self.write_conditionals();
        self.write_phony();
        self.write_pattern_rules();
        self.write_targets();
        self.write_clean();
        self.writer.close()
    }
}

/// Extract the variable name from a `$(NAME)` reference, if any.
fn var_reference(entry: &str) -> Option<&str> {
    let start = entry.find("$(")?;
    let rest = &entry[start + 2..];
    let end = rest.find(')')?;
    Some(&rest[..end])
}
