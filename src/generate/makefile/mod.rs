//! Makefile generation backend.

pub mod generator;
pub mod vars;

pub use generator::{CondKind, MakefileGenerator};
pub use vars::{make_version, MakeVar};
