//! Build-file generator core.
//!
//! This module defines the contract shared by the two generator backends
//! (Makefile and CMakeLists.txt) plus the line-buffered writer both use.
//! A generator is mutated through `add_*` calls and flushed exactly once
//! with [`Generator::generate`].

pub mod cmake;
pub mod error;
pub mod makefile;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use cmake::CMakeGenerator;
pub use error::GenerateError;
pub use makefile::MakefileGenerator;

/// Variable assignment kind, shared across backends.
///
/// The Makefile backend maps each kind to its assignment operator; the CMake
/// backend renders every kind as a plain `set()` since CMake has no deferred
/// assignment forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarKind {
    /// Recursively expanded (`=`)
    #[default]
    Recursive,
    /// Simply expanded (`:=`)
    Simple,
    /// Immediately expanded (`:::=`)
    Immediate,
    /// Set only if unset (`?=`)
    Conditional,
    /// Appended (`+=`)
    Append,
}

/// Contract implemented by every build-file generator backend.
pub trait Generator {
    /// Register a variable. Insertion order of keys is preserved;
    /// re-adding an existing key replaces its value in place.
    fn add_variable(&mut self, key: &str, value: &str, kind: VarKind);

    /// Register a build target.
    ///
    /// At least one of `recipe`/`deps` must be given, and the fully rendered
    /// target text must be unique within this generator instance.
    fn add_target(
        &mut self,
        name: &str,
        recipe: Option<&str>,
        deps: &[String],
    ) -> Result<(), GenerateError>;

    /// Serialize every registered section and write the output file.
    ///
    /// All content is buffered in memory and flushed with a single write,
    /// so a failing generation never leaves a partial file behind. The
    /// output always ends with a trailing newline.
    fn generate(&mut self) -> Result<()>;
}

/// Line buffer that flushes to disk in one write.
#[derive(Debug)]
pub struct BuildFileWriter {
    path: PathBuf,
    lines: Vec<String>,
}

impl BuildFileWriter {
    /// Create a writer targeting `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        BuildFileWriter {
            path: path.as_ref().to_path_buf(),
            lines: Vec::new(),
        }
    }

    /// Buffer a line.
    pub fn write(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Buffer an empty line.
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// The output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush all buffered lines to the file, with a trailing newline.
    pub fn close(&mut self) -> Result<()> {
        let mut content = self.lines.join("\n");
        content.push('\n');
        crate::util::fs::write_string(&self.path, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writer_single_flush_with_trailing_newline() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.txt");

        let mut writer = BuildFileWriter::new(&path);
        writer.write("first");
        writer.blank();
        writer.write("second");

        assert!(!path.exists());
        writer.close().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\n\nsecond\n");
    }
}
