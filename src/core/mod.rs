//! Declarative project model and cross-generator translation.

pub mod project;
pub mod translate;
