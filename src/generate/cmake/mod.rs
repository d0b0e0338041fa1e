//! CMakeLists.txt generation backend.

pub mod functions;
pub mod generator;
pub mod vars;

pub use generator::{CMakeGenerator, LibKind};
pub use vars::{CMakeCacheVar, CMakeOption, CMakeVar, CacheType};
