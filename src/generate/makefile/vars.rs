//! Makefile variable rendering and make version detection.

use std::fmt;
use std::process::Command;
use std::sync::OnceLock;

use crate::generate::VarKind;

/// Fallback when the installed make cannot be probed. Matches current GNU
/// make releases, so the modern `define KEY =` block syntax is used.
const DEFAULT_MAKE_VERSION: (u32, u32) = (4, 4);

/// GNU make 3.81 and older reject an assignment operator on the `define`
/// line; anything newer accepts it.
const DEFINE_OP_SINCE: (u32, u32) = (3, 82);

static MAKE_VERSION: OnceLock<(u32, u32)> = OnceLock::new();

/// Major.minor version of the installed GNU make.
///
/// Probed once per process by running `make -v`; every failure mode
/// (missing executable, non-zero exit, unparsable output) degrades to
/// [`DEFAULT_MAKE_VERSION`] instead of surfacing an error.
pub fn make_version() -> (u32, u32) {
    *MAKE_VERSION.get_or_init(|| match probe_make_version() {
        Some(version) => version,
        None => {
            tracing::debug!(
                "could not determine make version, assuming {}.{}",
                DEFAULT_MAKE_VERSION.0,
                DEFAULT_MAKE_VERSION.1
            );
            DEFAULT_MAKE_VERSION
        }
    })
}

fn probe_make_version() -> Option<(u32, u32)> {
    let make = which::which("make").ok()?;
    let output = Command::new(make).arg("-v").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_make_version(&stdout)
}

/// Parse major.minor out of `make -v` output ("GNU Make 4.4.1").
fn parse_make_version(output: &str) -> Option<(u32, u32)> {
    let first_line = output.lines().next()?;
    let version_str = first_line.strip_prefix("GNU Make ")?;
    let mut parts = version_str.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}

impl VarKind {
    /// The Makefile assignment operator for this kind.
    pub fn assign_op(&self) -> &'static str {
        match self {
            VarKind::Recursive => "=",
            VarKind::Simple => ":=",
            VarKind::Immediate => ":::=",
            VarKind::Conditional => "?=",
            VarKind::Append => "+=",
        }
    }
}

/// A Makefile variable assignment.
///
/// Single-line values render as `KEY <op> VALUE`; multi-line values switch
/// to a `define KEY ... endef` block, whose exact first line depends on the
/// installed make version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeVar {
    pub key: String,
    pub value: String,
    pub kind: VarKind,
}

impl MakeVar {
    /// Create a variable with the given assignment kind.
    pub fn new(key: impl Into<String>, value: impl Into<String>, kind: VarKind) -> Self {
        MakeVar {
            key: key.into(),
            value: value.into(),
            kind,
        }
    }

    /// Create a recursively expanded (`=`) variable.
    pub fn recursive(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, value, VarKind::Recursive)
    }

    fn render_with_version(&self, version: (u32, u32)) -> String {
        if self.value.contains('\n') {
            if version >= DEFINE_OP_SINCE {
                format!(
                    "define {} {}\n{}\nendef\n",
                    self.key,
                    self.kind.assign_op(),
                    self.value
                )
            } else {
                format!("define {}\n{}\nendef\n", self.key, self.value)
            }
        } else {
            format!("{} {} {}", self.key, self.kind.assign_op(), self.value)
        }
    }
}

impl fmt::Display for MakeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_with_version(make_version()))
    }
}
