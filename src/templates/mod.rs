//! Template resolution, recipe registry, and project scaffolding.

pub mod recipes;
pub mod resolver;
pub mod scaffold;

pub use recipes::Recipe;
pub use resolver::{TemplateError, TemplateResolver, Tier};
pub use scaffold::ProjectScaffolder;
